//! Shift button handling.
//!
//! The physical shift button serves three competing semantics decided by
//! timing:
//! - a quick tap (release within the decision threshold) toggles launcher
//!   overdub and never shows the overlay;
//! - holding it past the threshold activates the shift view as a temporary
//!   overlay;
//! - pressing it while a transient overlay (tempo/shuffle) is resolved-active
//!   dismisses that overlay instead, consuming the release.
//!
//! The decision is a race between a scheduled callback and the physical Up.
//! The scheduler gives no race-free cancellation guarantee, so the race is
//! resolved by re-checking state and a generation counter at fire time:
//! every Down supersedes the previous pending decision, and a stale fire is
//! a no-op.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::SurfaceConfig;
use crate::error::SurfaceError;
use crate::event::{ButtonId, ControlId, EventPhase};
use crate::model::SessionModel;
use crate::registry::ViewManager;
use crate::surface::{Display, Surface, Task};

/// Default decision threshold: releases faster than this are taps.
pub const DEFAULT_TAP_THRESHOLD: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftState {
    Idle,
    /// Shift is down, waiting for the decision task or an early release.
    PendingDecision,
    /// The shift overlay is showing.
    ShiftActive,
}

/// Wiring for one surface's shift handling.
#[derive(Debug, Clone)]
pub struct ShiftOverlaySettings {
    /// Name of the overlay view shown while shift is held.
    pub shift_view: String,
    /// View forced on deactivation while a destructive sub-mode
    /// (duplicate/delete) is flagged, so the user is never stranded there.
    pub fallback_view: String,
    /// Transient overlays a shift press dismisses instead of starting a
    /// pending decision.
    pub competing_overlays: Vec<String>,
    pub tap_threshold: Duration,
}

/// One instance per control surface; never process-global.
pub struct ShiftOverlayController {
    settings: ShiftOverlaySettings,
    state: ShiftState,
    pressed_at: Option<Instant>,
    /// Bumped on every press and every decision; a scheduled task only acts
    /// if it still carries the current value.
    generation: u64,
}

impl ShiftOverlayController {
    pub fn new(settings: ShiftOverlaySettings) -> Self {
        Self {
            settings,
            state: ShiftState::Idle,
            pressed_at: None,
            generation: 0,
        }
    }

    pub fn state(&self) -> ShiftState {
        self.state
    }

    pub fn settings(&self) -> &ShiftOverlaySettings {
        &self.settings
    }

    fn reset(&mut self) {
        self.state = ShiftState::Idle;
        self.pressed_at = None;
        self.generation += 1;
    }

    /// Called after any view-manager mutation: leaving the shift view by a
    /// path outside this controller also resets the press cycle.
    pub fn sync_with_resolved(&mut self, views: &ViewManager) {
        if self.state == ShiftState::ShiftActive && !views.is_active(&self.settings.shift_view) {
            self.reset();
        }
    }

    /// Restore or fall back, depending on the exclusive sub-mode flags.
    fn deactivate_overlay(
        &self,
        views: &mut ViewManager,
        config: &SurfaceConfig,
    ) -> Result<(), SurfaceError> {
        if config.duplicate_mode_active || config.delete_mode_active {
            views.set_active(&self.settings.fallback_view)
        } else {
            views.restore();
            Ok(())
        }
    }

    fn competing_overlay_active(&self, views: &ViewManager) -> bool {
        self.settings
            .competing_overlays
            .iter()
            .any(|name| views.is_active(name))
    }

    /// Handle a phase of the shift control itself.
    #[allow(clippy::too_many_arguments)]
    pub fn on_shift_event(
        &mut self,
        phase: EventPhase,
        views: &mut ViewManager,
        model: &mut dyn SessionModel,
        config: &SurfaceConfig,
        surface: &mut dyn Surface,
        display: &mut dyn Display,
    ) -> Result<(), SurfaceError> {
        match phase {
            EventPhase::Down => self.on_down(views, config, surface),
            EventPhase::Up => self.on_up(views, model, config, surface, display),
            // ShiftActive entry already happened via the timer; the long
            // press itself carries no further action.
            EventPhase::Long => Ok(()),
        }
    }

    fn on_down(
        &mut self,
        views: &mut ViewManager,
        config: &SurfaceConfig,
        surface: &mut dyn Surface,
    ) -> Result<(), SurfaceError> {
        // Any new Down unconditionally supersedes a prior pending decision.
        self.generation += 1;

        if views.is_active(&self.settings.shift_view) {
            // Latched overlay (left behind by a long press): this press
            // dismisses it, and the release must not quick-tap.
            self.deactivate_overlay(views, config)?;
            surface.set_trigger_consumed(ControlId::Button(ButtonId::Shift));
            self.reset();
            return Ok(());
        }

        if self.competing_overlay_active(views) {
            views.restore();
            surface.set_trigger_consumed(ControlId::Button(ButtonId::Shift));
            self.state = ShiftState::Idle;
            self.pressed_at = None;
            debug!("shift press dismissed a transient overlay");
            return Ok(());
        }

        self.state = ShiftState::PendingDecision;
        self.pressed_at = Some(surface.now());
        surface.schedule_task(
            Task::ShiftDecision {
                generation: self.generation,
            },
            self.settings.tap_threshold,
        );
        Ok(())
    }

    fn on_up(
        &mut self,
        views: &mut ViewManager,
        model: &mut dyn SessionModel,
        config: &SurfaceConfig,
        surface: &mut dyn Surface,
        display: &mut dyn Display,
    ) -> Result<(), SurfaceError> {
        match self.state {
            ShiftState::PendingDecision => {
                let elapsed = self
                    .pressed_at
                    .map(|at| surface.now().saturating_duration_since(at))
                    .unwrap_or(Duration::ZERO);
                let long = surface.is_long_pressed(ControlId::Button(ButtonId::Shift));
                // Superseding the generation makes the still-scheduled
                // decision task a no-op whenever it fires.
                self.reset();
                if !long && elapsed < self.settings.tap_threshold {
                    let transport = model.transport_mut();
                    transport.toggle_launcher_overdub();
                    let text = format!(
                        "Clip Overdub: {}",
                        if transport.is_launcher_overdub() {
                            "On"
                        } else {
                            "Off"
                        }
                    );
                    display.notify(&text);
                }
                // Released past the threshold before the timer ran: too slow
                // for a tap, released before the overlay showed. Nothing to
                // do either way.
                Ok(())
            }
            ShiftState::ShiftActive => {
                let long = surface.is_long_pressed(ControlId::Button(ButtonId::Shift));
                self.reset();
                if !long {
                    self.deactivate_overlay(views, config)?;
                }
                // A long hold latches the overlay; the next shift press
                // dismisses it (see on_down).
                Ok(())
            }
            ShiftState::Idle => Ok(()),
        }
    }

    /// The delayed decision task fired. Acts only if it is still current.
    pub fn on_decision_due(
        &mut self,
        generation: u64,
        views: &mut ViewManager,
    ) -> Result<(), SurfaceError> {
        if generation != self.generation || self.state != ShiftState::PendingDecision {
            debug!(generation, "stale shift decision ignored");
            return Ok(());
        }
        views.set_temporary(&self.settings.shift_view)?;
        self.state = ShiftState::ShiftActive;
        Ok(())
    }
}
