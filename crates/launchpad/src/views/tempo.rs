//! Transient tempo overlay.

use gridctl_core::{
    Context, EventPhase, FeatureGroup, PadGrid, SessionModel, SurfaceConfig, View,
};

use crate::colors;
use crate::views::pad_note;

const COARSE_DOWN: u8 = 36;
const FINE_DOWN: u8 = 37;
const FINE_UP: u8 = 42;
const COARSE_UP: u8 = 43;

const BAR_ROW: usize = 3;
const BAR_MIN: f64 = 60.0;
const BAR_MAX: f64 = 188.0;

pub struct TempoView;

impl TempoView {
    pub fn new() -> Self {
        Self
    }

    fn bar_width(tempo: f64) -> usize {
        let clamped = tempo.clamp(BAR_MIN, BAR_MAX);
        (((clamped - BAR_MIN) / (BAR_MAX - BAR_MIN)) * 8.0).round() as usize
    }
}

impl Default for TempoView {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureGroup for TempoView {
    fn name(&self) -> &str {
        super::TEMPO
    }
}

impl View for TempoView {
    fn on_pad(&mut self, ctx: &mut Context<'_>, note: u8, phase: EventPhase, velocity: u8) {
        if phase != EventPhase::Down || velocity == 0 {
            return;
        }
        let delta = match note {
            COARSE_DOWN => -10.0,
            FINE_DOWN => -1.0,
            FINE_UP => 1.0,
            COARSE_UP => 10.0,
            _ => return,
        };
        ctx.model.transport_mut().change_tempo(delta);
        let text = format!("Tempo: {:.1} BPM", ctx.model.transport().tempo());
        ctx.display.notify(&text);
    }

    fn draw_grid(&self, model: &dyn SessionModel, _config: &SurfaceConfig, grid: &mut dyn PadGrid) {
        for note in 36..=99u8 {
            grid.light(note, colors::BLACK);
        }

        let width = Self::bar_width(model.transport().tempo());
        for column in 0..8 {
            let color = if column < width {
                colors::AMBER
            } else {
                colors::GREY_LO
            };
            grid.light(pad_note(column, BAR_ROW), color);
        }

        grid.light(COARSE_DOWN, colors::RED);
        grid.light(FINE_DOWN, colors::RED_LO);
        grid.light(FINE_UP, colors::GREEN_LO);
        grid.light(COARSE_UP, colors::GREEN);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridctl_core::{LocalSession, Transport};

    #[test]
    fn bar_width_tracks_the_tempo_range() {
        assert_eq!(TempoView::bar_width(BAR_MIN), 0);
        assert_eq!(TempoView::bar_width(124.0), 4);
        assert_eq!(TempoView::bar_width(BAR_MAX), 8);
        assert_eq!(TempoView::bar_width(500.0), 8);
    }

    #[test]
    fn nudge_pads_change_the_tempo() {
        let mut model = LocalSession::new();
        let mut config = SurfaceConfig::default();
        let mut surface = crate::views::test_support::NullSurface;
        let mut display = crate::views::test_support::RecordingDisplay::default();
        let mut ctx = Context::new(&mut model, &mut config, &mut surface, &mut display, None);

        let mut view = TempoView::new();
        view.on_pad(&mut ctx, COARSE_UP, EventPhase::Down, 127);
        view.on_pad(&mut ctx, FINE_DOWN, EventPhase::Down, 127);
        assert_eq!(model.tempo(), 129.0);
        assert_eq!(display.0, ["Tempo: 130.0 BPM", "Tempo: 129.0 BPM"]);
    }
}
