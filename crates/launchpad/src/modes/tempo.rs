//! Tempo on the encoder. Directional presses step by a whole BPM, the knob
//! nudges in tenths.

use gridctl_core::{Context, Direction, FeatureGroup, Mode};

const FINE_STEP: f64 = 0.1;
const COARSE_STEP: f64 = 1.0;

pub struct TempoMode;

impl TempoMode {
    pub fn new() -> Self {
        Self
    }

    fn notify(ctx: &mut Context<'_>) {
        let text = format!("Tempo: {:.1} BPM", ctx.model.transport().tempo());
        ctx.display.notify(&text);
    }
}

impl Default for TempoMode {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureGroup for TempoMode {
    fn name(&self) -> &str {
        super::TEMPO
    }
}

impl Mode for TempoMode {
    fn on_knob(&mut self, ctx: &mut Context<'_>, delta: i8) {
        ctx.model
            .transport_mut()
            .change_tempo(f64::from(delta) * FINE_STEP);
        Self::notify(ctx);
    }

    fn on_knob_pressed(&mut self, ctx: &mut Context<'_>) {
        ctx.model.transport_mut().tap_tempo();
        ctx.display.notify("Tap Tempo");
    }

    fn on_directional(&mut self, ctx: &mut Context<'_>, direction: Direction) {
        let delta = match direction {
            Direction::Left => -COARSE_STEP,
            Direction::Right => COARSE_STEP,
            Direction::Up | Direction::Down => return,
        };
        ctx.model.transport_mut().change_tempo(delta);
        Self::notify(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::test_support::{NullSurface, RecordingDisplay};
    use gridctl_core::{LocalSession, SurfaceConfig, Transport};

    #[test]
    fn directional_steps_are_coarse() {
        let mut model = LocalSession::new();
        let mut config = SurfaceConfig::default();
        let mut surface = NullSurface;
        let mut display = RecordingDisplay::default();
        let mut ctx = Context::new(&mut model, &mut config, &mut surface, &mut display, None);

        let mut mode = TempoMode::new();
        mode.on_directional(&mut ctx, Direction::Right);
        mode.on_knob(&mut ctx, -2);
        assert!((model.tempo() - 120.8).abs() < 1e-9);
        assert_eq!(display.0, ["Tempo: 121.0 BPM", "Tempo: 120.8 BPM"]);
    }
}
