//! Transient shuffle overlay.

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

pub struct ShuffleView;

impl ShuffleView {
    pub fn new() -> Self {
        Self
    }

    fn bar_width(shuffle: f64) -> usize {
        (shuffle.clamp(0.0, 1.0) * 8.0).round() as usize
    }
}

impl Default for ShuffleView {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureGroup for ShuffleView {
    fn name(&self) -> &str {
        super::SHUFFLE
    }
}

impl View for ShuffleView {
    fn on_pad(&mut self, ctx: &mut Context<'_>, note: u8, phase: EventPhase, velocity: u8) {
        if phase != EventPhase::Down || velocity == 0 {
            return;
        }
        let delta = match note {
            COARSE_DOWN => -0.05,
            FINE_DOWN => -0.01,
            FINE_UP => 0.01,
            COARSE_UP => 0.05,
            _ => return,
        };
        ctx.model.transport_mut().change_shuffle(delta);
        let text = format!(
            "Shuffle: {:.0}%",
            ctx.model.transport().shuffle() * 100.0
        );
        ctx.display.notify(&text);
    }

    fn draw_grid(&self, model: &dyn SessionModel, _config: &SurfaceConfig, grid: &mut dyn PadGrid) {
        for note in 36..=99u8 {
            grid.light(note, colors::BLACK);
        }

        let width = Self::bar_width(model.transport().shuffle());
        for column in 0..8 {
            let color = if column < width {
                colors::ORCHID
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
    fn shuffle_is_clamped_to_the_unit_range() {
        let mut model = LocalSession::new();
        let mut config = SurfaceConfig::default();
        let mut surface = crate::views::test_support::NullSurface;
        let mut display = crate::views::test_support::RecordingDisplay::default();
        let mut ctx = Context::new(&mut model, &mut config, &mut surface, &mut display, None);

        let mut view = ShuffleView::new();
        view.on_pad(&mut ctx, COARSE_DOWN, EventPhase::Down, 127);
        assert_eq!(model.shuffle(), 0.0);
        assert_eq!(display.0, ["Shuffle: 0%"]);
    }

    #[test]
    fn bar_width_tracks_the_amount() {
        assert_eq!(ShuffleView::bar_width(0.0), 0);
        assert_eq!(ShuffleView::bar_width(0.5), 4);
        assert_eq!(ShuffleView::bar_width(1.0), 8);
    }
}
