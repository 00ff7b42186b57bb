//! Trigger commands bound to the named buttons.
//!
//! Commands defer view/mode switches through the context so they stay safe
//! to run from inside a dispatch cycle.

use gridctl_core::{ButtonId, Context, ControlId, Direction, EventPhase, TriggerCommand};

use crate::views;

/// Toggles playback on press.
pub struct PlayCommand;

impl TriggerCommand for PlayCommand {
    fn execute(&mut self, ctx: &mut Context<'_>, phase: EventPhase, _magnitude: u8) {
        if phase != EventPhase::Down {
            return;
        }
        ctx.model.transport_mut().toggle_play();
    }
}

/// Toggles arranger recording on press.
pub struct RecordCommand;

impl TriggerCommand for RecordCommand {
    fn execute(&mut self, ctx: &mut Context<'_>, phase: EventPhase, _magnitude: u8) {
        if phase != EventPhase::Down {
            return;
        }
        ctx.model.transport_mut().toggle_record();
    }
}

/// Toggles the metronome on press.
pub struct MetronomeCommand;

impl TriggerCommand for MetronomeCommand {
    fn execute(&mut self, ctx: &mut Context<'_>, phase: EventPhase, _magnitude: u8) {
        if phase != EventPhase::Down {
            return;
        }
        ctx.model.transport_mut().toggle_metronome();
        let text = format!(
            "Metronome: {}",
            if ctx.model.transport().is_metronome_on() {
                "On"
            } else {
                "Off"
            }
        );
        ctx.display.notify(&text);
    }
}

/// Undo on release, redo when held long. The long press consumes the
/// release so only one of the two fires per cycle.
pub struct UndoCommand;

impl TriggerCommand for UndoCommand {
    fn execute(&mut self, ctx: &mut Context<'_>, phase: EventPhase, _magnitude: u8) {
        match phase {
            EventPhase::Up => {
                ctx.model.application_mut().undo();
                ctx.display.notify("Undo");
            }
            EventPhase::Long => {
                ctx.surface
                    .set_trigger_consumed(ControlId::Button(ButtonId::Undo));
                ctx.model.application_mut().redo();
                ctx.display.notify("Redo");
            }
            EventPhase::Down => {}
        }
    }
}

/// Quantizes the selected clip on press.
pub struct QuantizeCommand;

impl TriggerCommand for QuantizeCommand {
    fn execute(&mut self, ctx: &mut Context<'_>, phase: EventPhase, _magnitude: u8) {
        if phase != EventPhase::Down {
            return;
        }
        ctx.model.application_mut().quantize();
        ctx.display.notify("Quantize");
    }
}

/// Creates a new clip at the cursor with the configured length.
pub struct NewCommand;

impl TriggerCommand for NewCommand {
    fn execute(&mut self, ctx: &mut Context<'_>, phase: EventPhase, _magnitude: u8) {
        if phase != EventPhase::Down {
            return;
        }
        let length = ctx.config.new_clip_length;
        ctx.model.application_mut().new_clip(length);
        let text = format!("New: {}", ctx.config.new_clip_length_label());
        ctx.display.notify(&text);
    }
}

/// Arms the exclusive delete sub-mode while held.
pub struct DeleteCommand;

impl TriggerCommand for DeleteCommand {
    fn execute(&mut self, ctx: &mut Context<'_>, phase: EventPhase, _magnitude: u8) {
        match phase {
            EventPhase::Down => ctx.config.delete_mode_active = true,
            EventPhase::Up => ctx.config.delete_mode_active = false,
            EventPhase::Long => {}
        }
    }
}

/// Arms the exclusive duplicate sub-mode while held.
pub struct DuplicateCommand;

impl TriggerCommand for DuplicateCommand {
    fn execute(&mut self, ctx: &mut Context<'_>, phase: EventPhase, _magnitude: u8) {
        match phase {
            EventPhase::Down => ctx.config.duplicate_mode_active = true,
            EventPhase::Up => ctx.config.duplicate_mode_active = false,
            EventPhase::Long => {}
        }
    }
}

/// Makes the session view the base view, clearing any overlay.
pub struct SessionViewCommand;

impl TriggerCommand for SessionViewCommand {
    fn execute(&mut self, ctx: &mut Context<'_>, phase: EventPhase, _magnitude: u8) {
        if phase != EventPhase::Down {
            return;
        }
        ctx.activate_view(views::SESSION);
    }
}

/// Toggles a transient overlay view: press once to show it on top of the
/// current view, press again to drop back.
pub struct OverlayToggleCommand {
    view: &'static str,
}

impl OverlayToggleCommand {
    pub fn new(view: &'static str) -> Self {
        Self { view }
    }
}

impl TriggerCommand for OverlayToggleCommand {
    fn execute(&mut self, ctx: &mut Context<'_>, phase: EventPhase, _magnitude: u8) {
        if phase != EventPhase::Down {
            return;
        }
        if ctx.is_view_active(self.view) {
            ctx.restore_view();
        } else {
            ctx.activate_temporary_view(self.view);
        }
    }
}

/// Routes a directional press to the resolved mode.
pub struct ArrowCommand {
    direction: Direction,
}

impl ArrowCommand {
    pub fn new(direction: Direction) -> Self {
        Self { direction }
    }
}

impl TriggerCommand for ArrowCommand {
    fn execute(&mut self, ctx: &mut Context<'_>, phase: EventPhase, _magnitude: u8) {
        if phase != EventPhase::Down {
            return;
        }
        ctx.scroll_mode(self.direction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::test_support::{NullSurface, RecordingDisplay};
    use gridctl_core::{DispatchAction, LocalSession, SurfaceConfig, Transport};

    fn run(
        command: &mut dyn TriggerCommand,
        model: &mut LocalSession,
        config: &mut SurfaceConfig,
        phase: EventPhase,
    ) -> (Vec<DispatchAction>, Vec<String>) {
        let mut surface = NullSurface;
        let mut display = RecordingDisplay::default();
        let mut ctx = Context::new(
            model,
            config,
            &mut surface,
            &mut display,
            Some(views::SESSION.to_string()),
        );
        command.execute(&mut ctx, phase, 127);
        (ctx.take_actions(), display.0)
    }

    #[test]
    fn play_toggles_only_on_down() {
        let mut model = LocalSession::new();
        let mut config = SurfaceConfig::default();
        run(&mut PlayCommand, &mut model, &mut config, EventPhase::Down);
        assert!(model.is_playing());
        run(&mut PlayCommand, &mut model, &mut config, EventPhase::Up);
        assert!(model.is_playing());
    }

    #[test]
    fn delete_sub_mode_is_momentary() {
        let mut model = LocalSession::new();
        let mut config = SurfaceConfig::default();
        run(&mut DeleteCommand, &mut model, &mut config, EventPhase::Down);
        assert!(config.delete_mode_active);
        run(&mut DeleteCommand, &mut model, &mut config, EventPhase::Up);
        assert!(!config.delete_mode_active);
    }

    #[test]
    fn overlay_toggle_requests_temporary_then_restore() {
        let mut model = LocalSession::new();
        let mut config = SurfaceConfig::default();
        let mut command = OverlayToggleCommand::new(views::TEMPO);

        let (actions, _) = run(&mut command, &mut model, &mut config, EventPhase::Down);
        assert_eq!(
            actions,
            [DispatchAction::SetTemporaryView(views::TEMPO.to_string())]
        );

        let mut surface = NullSurface;
        let mut display = RecordingDisplay::default();
        let mut ctx = Context::new(
            &mut model,
            &mut config,
            &mut surface,
            &mut display,
            Some(views::TEMPO.to_string()),
        );
        command.execute(&mut ctx, EventPhase::Down, 127);
        assert_eq!(ctx.take_actions(), [DispatchAction::RestoreView]);
    }

    #[test]
    fn arrows_relay_to_the_mode() {
        let mut model = LocalSession::new();
        let mut config = SurfaceConfig::default();
        let mut command = ArrowCommand::new(Direction::Left);
        let (actions, _) = run(&mut command, &mut model, &mut config, EventPhase::Down);
        assert_eq!(actions, [DispatchAction::ModeScroll(Direction::Left)]);
    }

    #[test]
    fn long_press_turns_undo_into_redo() {
        let mut model = LocalSession::new();
        let mut config = SurfaceConfig::default();
        let (_, shown) = run(&mut UndoCommand, &mut model, &mut config, EventPhase::Long);
        assert_eq!(shown, ["Redo"]);
        assert_eq!(model.undo_depth(), 1);
    }
}
