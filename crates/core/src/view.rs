//! View and mode contracts.

use crate::command::Context;
use crate::config::SurfaceConfig;
use crate::event::{ButtonId, Direction, EventPhase};
use crate::model::SessionModel;
use crate::registry::FeatureGroup;
use crate::surface::PadGrid;

/// Color returned by [`View::button_color`] for a button with nothing to
/// show.
pub const BUTTON_COLOR_OFF: u8 = 0;

/// A named bundle of pad/button behavior plus a full-frame render function.
///
/// `draw_grid` must be deterministic and assign a color to every pad in the
/// view's domain on every call; the device has no incremental diff channel.
pub trait View: FeatureGroup {
    fn on_pad(&mut self, _ctx: &mut Context<'_>, _note: u8, _phase: EventPhase, _velocity: u8) {}

    fn on_button(&mut self, _ctx: &mut Context<'_>, _button: ButtonId, _phase: EventPhase) {}

    fn draw_grid(&self, model: &dyn SessionModel, config: &SurfaceConfig, grid: &mut dyn PadGrid);

    /// Color for a named button (scene row), queried per press and per
    /// redraw.
    fn button_color(&self, _model: &dyn SessionModel, _button: ButtonId) -> u8 {
        BUTTON_COLOR_OFF
    }
}

/// A named bundle of behavior for the multiplexed encoder.
pub trait Mode: FeatureGroup {
    fn on_knob(&mut self, _ctx: &mut Context<'_>, _delta: i8) {}

    fn on_knob_pressed(&mut self, _ctx: &mut Context<'_>) {}

    fn on_directional(&mut self, _ctx: &mut Context<'_>, _direction: Direction) {}
}
