//! Command binding and the handler context.
//!
//! Handlers never hold a borrow of the view/mode registries. Registry
//! mutations are queued as [`DispatchAction`]s on the [`Context`] and
//! applied by the dispatcher once the handler returns, which keeps commands
//! re-entrant-safe whether they run from the transport callback or from a
//! scheduled task.

use crate::config::SurfaceConfig;
use crate::event::{Direction, EventPhase};
use crate::model::SessionModel;
use crate::surface::{Display, Surface};

/// Deferred mutation of (or relay into) the view and mode registries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchAction {
    SetActiveView(String),
    SetTemporaryView(String),
    RestoreView,
    SetActiveMode(String),
    SetTemporaryMode(String),
    RestoreMode,
    /// Relay a directional press to the resolved mode.
    ModeScroll(Direction),
}

/// Everything a handler may touch while processing one event.
pub struct Context<'a> {
    pub model: &'a mut dyn SessionModel,
    pub config: &'a mut SurfaceConfig,
    pub surface: &'a mut dyn Surface,
    pub display: &'a mut dyn Display,
    resolved_view: Option<String>,
    actions: Vec<DispatchAction>,
}

impl<'a> Context<'a> {
    pub fn new(
        model: &'a mut dyn SessionModel,
        config: &'a mut SurfaceConfig,
        surface: &'a mut dyn Surface,
        display: &'a mut dyn Display,
        resolved_view: Option<String>,
    ) -> Self {
        Self {
            model,
            config,
            surface,
            display,
            resolved_view,
            actions: Vec::new(),
        }
    }

    /// Name of the view that owned dispatch when this event arrived.
    pub fn resolved_view(&self) -> Option<&str> {
        self.resolved_view.as_deref()
    }

    pub fn is_view_active(&self, name: &str) -> bool {
        self.resolved_view.as_deref() == Some(name)
    }

    pub fn request(&mut self, action: DispatchAction) {
        self.actions.push(action);
    }

    pub fn activate_view(&mut self, name: &str) {
        self.request(DispatchAction::SetActiveView(name.to_string()));
    }

    pub fn activate_temporary_view(&mut self, name: &str) {
        self.request(DispatchAction::SetTemporaryView(name.to_string()));
    }

    pub fn restore_view(&mut self) {
        self.request(DispatchAction::RestoreView);
    }

    pub fn activate_mode(&mut self, name: &str) {
        self.request(DispatchAction::SetActiveMode(name.to_string()));
    }

    pub fn scroll_mode(&mut self, direction: Direction) {
        self.request(DispatchAction::ModeScroll(direction));
    }

    /// Drain the queued actions. Called by the dispatcher after the handler
    /// returns.
    pub fn take_actions(self) -> Vec<DispatchAction> {
        self.actions
    }
}

/// A unit of behavior bound to one control at install time. Stateless with
/// respect to dispatch; may read and mutate collaborator state through the
/// context.
pub trait TriggerCommand {
    fn execute(&mut self, ctx: &mut Context<'_>, phase: EventPhase, magnitude: u8);
}
