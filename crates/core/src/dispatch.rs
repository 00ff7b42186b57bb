//! Top-level event routing.
//!
//! The dispatcher is the single entry point for raw input events and for
//! scheduled-task callbacks. Everything runs on one logical thread (the
//! transport's callback thread); no locking, mutations are sequential.

use std::collections::HashMap;

use tracing::trace;

use crate::command::{Context, DispatchAction, TriggerCommand};
use crate::config::SurfaceConfig;
use crate::error::SurfaceError;
use crate::event::{ButtonId, ControlId, EventPhase, InputEvent, KnobId};
use crate::model::SessionModel;
use crate::registry::{FeatureGroupManager, GroupKind, ModeManager, ViewManager};
use crate::shift::{ShiftOverlayController, ShiftOverlaySettings, ShiftState};
use crate::surface::{Display, PadGrid, Surface, Task, GRID_FIRST_NOTE, GRID_LAST_NOTE};
use crate::view::{Mode, View, BUTTON_COLOR_OFF};

pub struct Dispatcher {
    views: ViewManager,
    modes: ModeManager,
    shift: ShiftOverlayController,
    bindings: HashMap<ControlId, Box<dyn TriggerCommand>>,
    config: SurfaceConfig,
    model: Box<dyn SessionModel>,
    surface: Box<dyn Surface>,
    display: Box<dyn Display>,
}

impl Dispatcher {
    pub fn new(
        model: Box<dyn SessionModel>,
        surface: Box<dyn Surface>,
        display: Box<dyn Display>,
        config: SurfaceConfig,
        shift_settings: ShiftOverlaySettings,
    ) -> Self {
        Self {
            views: FeatureGroupManager::new(GroupKind::Views),
            modes: FeatureGroupManager::new(GroupKind::Modes),
            shift: ShiftOverlayController::new(shift_settings),
            bindings: HashMap::new(),
            config,
            model,
            surface,
            display,
        }
    }

    // --- installation (startup only) ---

    pub fn install_view(&mut self, view: Box<dyn View>) -> Result<(), SurfaceError> {
        self.views.install(view)
    }

    pub fn install_mode(&mut self, mode: Box<dyn Mode>) -> Result<(), SurfaceError> {
        self.modes.install(mode)
    }

    /// Bind a command to a control. Bindings are immutable once installed.
    pub fn bind(
        &mut self,
        control: ControlId,
        command: Box<dyn TriggerCommand>,
    ) -> Result<(), SurfaceError> {
        if self.bindings.contains_key(&control) {
            return Err(SurfaceError::DuplicateBinding(control));
        }
        self.bindings.insert(control, command);
        Ok(())
    }

    // --- view/mode state ---

    pub fn set_active_view(&mut self, name: &str) -> Result<(), SurfaceError> {
        self.views.set_active(name)?;
        self.shift.sync_with_resolved(&self.views);
        Ok(())
    }

    pub fn set_temporary_view(&mut self, name: &str) -> Result<(), SurfaceError> {
        self.views.set_temporary(name)?;
        self.shift.sync_with_resolved(&self.views);
        Ok(())
    }

    pub fn restore_view(&mut self) {
        self.views.restore();
        self.shift.sync_with_resolved(&self.views);
    }

    pub fn set_active_mode(&mut self, name: &str) -> Result<(), SurfaceError> {
        self.modes.set_active(name)
    }

    pub fn set_temporary_mode(&mut self, name: &str) -> Result<(), SurfaceError> {
        self.modes.set_temporary(name)
    }

    pub fn restore_mode(&mut self) {
        self.modes.restore();
    }

    pub fn active_view_name(&self) -> Option<&str> {
        self.views.active_or_temp_name()
    }

    pub fn active_mode_name(&self) -> Option<&str> {
        self.modes.active_or_temp_name()
    }

    pub fn is_view_active(&self, name: &str) -> bool {
        self.views.is_active(name)
    }

    pub fn shift_state(&self) -> ShiftState {
        self.shift.state()
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut SurfaceConfig {
        &mut self.config
    }

    pub fn model(&self) -> &dyn SessionModel {
        self.model.as_ref()
    }

    pub fn model_mut(&mut self) -> &mut dyn SessionModel {
        self.model.as_mut()
    }

    // --- dispatch ---

    /// Route one raw event to the shift controller, a bound command, the
    /// resolved view or the resolved mode. Events for unbound controls are
    /// dropped silently; many controls are legitimately unbound in a view.
    pub fn handle_event(&mut self, event: InputEvent) -> Result<(), SurfaceError> {
        // Degenerate pad releases (magnitude 0) and notes outside the grid
        // never reach a view.
        if let ControlId::Pad(note) = event.control {
            if event.magnitude == 0 || !(GRID_FIRST_NOTE..=GRID_LAST_NOTE).contains(&note) {
                trace!(?event, "filtered pad event");
                return Ok(());
            }
        }

        // A consumed trigger suppresses default Up handling for one cycle.
        if event.phase == EventPhase::Up && self.surface.take_trigger_consumed(event.control) {
            trace!(?event.control, "trigger consumed, Up suppressed");
            return Ok(());
        }

        if event.control == ControlId::Button(ButtonId::Shift) {
            let result = self.shift.on_shift_event(
                event.phase,
                &mut self.views,
                self.model.as_mut(),
                &self.config,
                self.surface.as_mut(),
                self.display.as_mut(),
            );
            self.shift.sync_with_resolved(&self.views);
            return result;
        }

        let resolved = self.views.active_or_temp_name().map(str::to_string);
        let mut ctx = Context::new(
            self.model.as_mut(),
            &mut self.config,
            self.surface.as_mut(),
            self.display.as_mut(),
            resolved,
        );

        match event.control {
            ControlId::Knob(KnobId::Main) => {
                if let Some(mode) = self.modes.active_or_temp_mut() {
                    let delta = event.knob_delta();
                    if delta != 0 {
                        mode.on_knob(&mut ctx, delta);
                    }
                }
            }
            ControlId::Button(ButtonId::EncoderPress) => {
                if event.phase == EventPhase::Down {
                    if let Some(mode) = self.modes.active_or_temp_mut() {
                        mode.on_knob_pressed(&mut ctx);
                    }
                }
            }
            ControlId::Button(button) => {
                if let Some(command) = self.bindings.get_mut(&event.control) {
                    command.execute(&mut ctx, event.phase, event.magnitude);
                } else if let Some(view) = self.views.active_or_temp_mut() {
                    view.on_button(&mut ctx, button, event.phase);
                } else {
                    trace!(?event, "no view installed, event dropped");
                }
            }
            ControlId::Pad(note) => {
                if let Some(view) = self.views.active_or_temp_mut() {
                    view.on_pad(&mut ctx, note, event.phase, event.magnitude);
                } else {
                    trace!(?event, "no view installed, event dropped");
                }
            }
        }

        // Ends the context's borrows before the registries are touched.
        let actions = ctx.take_actions();
        self.apply_actions(actions)
    }

    /// Re-entry point for scheduled tasks. Runs on the same logical thread
    /// as [`Self::handle_event`], with fresh state.
    pub fn handle_task(&mut self, task: Task) -> Result<(), SurfaceError> {
        match task {
            Task::ShiftDecision { generation } => {
                self.shift.on_decision_due(generation, &mut self.views)
            }
            Task::Notify(text) => {
                self.display.notify(&text);
                Ok(())
            }
        }
    }

    fn apply_actions(&mut self, mut actions: Vec<DispatchAction>) -> Result<(), SurfaceError> {
        // Relayed mode calls may queue further actions; drain until settled.
        while !actions.is_empty() {
            let mut follow_ups = Vec::new();
            for action in actions {
                match action {
                    DispatchAction::SetActiveView(name) => self.views.set_active(&name)?,
                    DispatchAction::SetTemporaryView(name) => self.views.set_temporary(&name)?,
                    DispatchAction::RestoreView => self.views.restore(),
                    DispatchAction::SetActiveMode(name) => self.modes.set_active(&name)?,
                    DispatchAction::SetTemporaryMode(name) => self.modes.set_temporary(&name)?,
                    DispatchAction::RestoreMode => self.modes.restore(),
                    DispatchAction::ModeScroll(direction) => {
                        let resolved = self.views.active_or_temp_name().map(str::to_string);
                        if let Some(mode) = self.modes.active_or_temp_mut() {
                            let mut ctx = Context::new(
                                self.model.as_mut(),
                                &mut self.config,
                                self.surface.as_mut(),
                                self.display.as_mut(),
                                resolved,
                            );
                            mode.on_directional(&mut ctx, direction);
                            follow_ups.extend(ctx.take_actions());
                        }
                    }
                }
                self.shift.sync_with_resolved(&self.views);
            }
            actions = follow_ups;
        }
        Ok(())
    }

    // --- rendering ---

    /// Full redraw of the resolved view's grid domain.
    pub fn render(&self, grid: &mut dyn PadGrid) {
        if let Some(view) = self.views.active_or_temp() {
            view.draw_grid(self.model.as_ref(), &self.config, grid);
        }
    }

    /// Color for a named button, resolved against the current view.
    pub fn button_color(&self, button: ButtonId) -> u8 {
        self.views
            .active_or_temp()
            .map(|view| view.button_color(self.model.as_ref(), button))
            .unwrap_or(BUTTON_COLOR_OFF)
    }
}
