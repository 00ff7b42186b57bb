//! Collaborator traits provided by the device layer.

use std::time::{Duration, Instant};

use crate::ControlId;

/// First note of the 8x8 pad grid.
pub const GRID_FIRST_NOTE: u8 = 36;
/// Last note of the 8x8 pad grid.
pub const GRID_LAST_NOTE: u8 = 99;

/// Work the framework asks the device layer to run after a delay.
///
/// Tasks re-enter through [`crate::Dispatcher::handle_task`] on the same
/// logical thread as event dispatch, so handlers see current state at fire
/// time. The device layer never cancels a scheduled task; superseded tasks
/// resolve to no-ops via generation checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Decide between quick-tap and shift overlay for the press identified
    /// by `generation`.
    ShiftDecision { generation: u64 },
    /// Show a notification on the display.
    Notify(String),
}

/// Transport-side services: time, long-press tracking, trigger
/// consumption and delayed task scheduling.
pub trait Surface {
    fn now(&self) -> Instant;

    /// True while `control` has been held past the hold threshold.
    fn is_long_pressed(&self, control: ControlId) -> bool;

    /// Suppress the default Up handling of `control` for one press cycle.
    fn set_trigger_consumed(&mut self, control: ControlId);

    /// Consume and return the suppression flag for `control`.
    fn take_trigger_consumed(&mut self, control: ControlId) -> bool;

    /// Run `task` after `delay`. Fire-and-forget; staleness is resolved by
    /// the task handler, not by cancellation.
    fn schedule_task(&mut self, task: Task, delay: Duration);
}

/// LED sink for the pad grid. Fire-and-forget and idempotent: views redraw
/// every pad they own on every frame, there is no diff channel.
pub trait PadGrid {
    fn light(&mut self, note: u8, color: u8);

    /// Alternate between two colors.
    fn light_blink(&mut self, note: u8, color: u8, blink_color: u8);
}

/// Text notification sink.
pub trait Display {
    fn notify(&mut self, text: &str);
}
