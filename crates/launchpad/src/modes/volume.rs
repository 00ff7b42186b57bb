//! Master volume on the encoder.

use gridctl_core::{Context, FeatureGroup, Mode};

const STEP: f64 = 0.01;
const DEFAULT_VOLUME: f64 = 0.8;

pub struct VolumeMode;

impl VolumeMode {
    pub fn new() -> Self {
        Self
    }
}

impl Default for VolumeMode {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureGroup for VolumeMode {
    fn name(&self) -> &str {
        super::VOLUME
    }
}

impl Mode for VolumeMode {
    fn on_knob(&mut self, ctx: &mut Context<'_>, delta: i8) {
        let transport = ctx.model.transport_mut();
        transport.change_master_volume(f64::from(delta) * STEP);
        let text = format!("Master: {:.0}%", transport.master_volume() * 100.0);
        ctx.display.notify(&text);
    }

    fn on_knob_pressed(&mut self, ctx: &mut Context<'_>) {
        let transport = ctx.model.transport_mut();
        let delta = DEFAULT_VOLUME - transport.master_volume();
        transport.change_master_volume(delta);
        ctx.display.notify("Master: reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::test_support::{NullSurface, RecordingDisplay};
    use gridctl_core::{LocalSession, SurfaceConfig, Transport};

    #[test]
    fn knob_deltas_move_the_master_fader() {
        let mut model = LocalSession::new();
        let mut config = SurfaceConfig::default();
        let mut surface = NullSurface;
        let mut display = RecordingDisplay::default();
        let mut ctx = Context::new(&mut model, &mut config, &mut surface, &mut display, None);

        let mut mode = VolumeMode::new();
        mode.on_knob(&mut ctx, 5);
        mode.on_knob(&mut ctx, -10);
        assert!((model.master_volume() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn press_resets_to_the_default_level() {
        let mut model = LocalSession::new();
        let mut config = SurfaceConfig::default();
        let mut surface = NullSurface;
        let mut display = RecordingDisplay::default();
        let mut ctx = Context::new(&mut model, &mut config, &mut surface, &mut display, None);

        let mut mode = VolumeMode::new();
        mode.on_knob(&mut ctx, -30);
        mode.on_knob_pressed(&mut ctx);
        assert!((model.master_volume() - DEFAULT_VOLUME).abs() < 1e-9);
        assert_eq!(display.0.last().map(String::as_str), Some("Master: reset"));
    }
}
