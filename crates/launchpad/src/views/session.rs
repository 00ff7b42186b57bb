//! The session view: an 8x8 window onto the clip grid.

use gridctl_core::{
    ButtonId, ClipState, Context, EventPhase, FeatureGroup, PadGrid, SessionModel, SurfaceConfig,
    View, BUTTON_COLOR_OFF,
};

use crate::colors;
use crate::views::{pad_note, pad_position};

pub const COLOR_SCENE: u8 = colors::GREEN_LO;
pub const COLOR_SELECTED_SCENE: u8 = colors::GREEN_HI;

/// Color pair for one clip state; `blink` alternates with `color`.
#[derive(Debug, Clone, Copy)]
struct ClipColor {
    color: u8,
    blink: Option<u8>,
}

impl ClipColor {
    const fn solid(color: u8) -> Self {
        Self { color, blink: None }
    }

    const fn blinking(color: u8, blink: u8) -> Self {
        Self {
            color,
            blink: Some(blink),
        }
    }
}

pub struct SessionView {
    recording: ClipColor,
    record_queued: ClipColor,
    playing: ClipColor,
    play_queued: ClipColor,
    has_content: ClipColor,
    no_content: ClipColor,
    rec_armed: ClipColor,
}

impl SessionView {
    pub fn new() -> Self {
        Self {
            recording: ClipColor::solid(colors::RED_HI),
            record_queued: ClipColor::blinking(colors::RED_HI, colors::BLACK),
            playing: ClipColor::solid(colors::GREEN),
            play_queued: ClipColor::blinking(colors::GREEN, colors::GREEN_HI),
            has_content: ClipColor::solid(colors::AMBER),
            no_content: ClipColor::solid(colors::BLACK),
            rec_armed: ClipColor::solid(colors::RED_LO),
        }
    }

    /// Base functional color for a slot; overlay highlights are applied on
    /// top of this in `draw_grid`.
    fn clip_color(&self, state: ClipState, armed: bool) -> ClipColor {
        match state {
            ClipState::Recording => self.recording,
            ClipState::RecordQueued => self.record_queued,
            ClipState::Playing => self.playing,
            ClipState::PlayQueued => self.play_queued,
            ClipState::HasContent => self.has_content,
            ClipState::Empty if armed => self.rec_armed,
            ClipState::Empty => self.no_content,
        }
    }
}

impl Default for SessionView {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureGroup for SessionView {
    fn name(&self) -> &str {
        super::SESSION
    }
}

impl View for SessionView {
    fn on_pad(&mut self, ctx: &mut Context<'_>, note: u8, phase: EventPhase, velocity: u8) {
        if phase != EventPhase::Down || velocity == 0 {
            return;
        }
        let (track, slot) = pad_position(note);
        let bank = ctx.model.track_bank_mut();
        if ctx.config.delete_mode_active {
            bank.delete_clip(track, slot);
        } else if ctx.config.duplicate_mode_active {
            bank.duplicate_clip(track, slot);
        } else {
            bank.launch_clip(track, slot);
        }
    }

    fn on_button(&mut self, ctx: &mut Context<'_>, button: ButtonId, phase: EventPhase) {
        if phase != EventPhase::Down {
            return;
        }
        match button {
            ButtonId::Scene(index) => {
                ctx.model.scene_bank_mut().launch_scene(index as usize);
            }
            ButtonId::Up => ctx.model.scene_bank_mut().select_previous_page(),
            ButtonId::Down => ctx.model.scene_bank_mut().select_next_page(),
            _ => {}
        }
    }

    fn draw_grid(&self, model: &dyn SessionModel, config: &SurfaceConfig, grid: &mut dyn PadGrid) {
        let bank = model.track_bank();
        for track in 0..8 {
            let armed = bank.is_armed(track);
            for slot in 0..8 {
                let state = bank.clip_state(track, slot);
                let note = pad_note(track, slot);
                let base = self.clip_color(state, armed);

                // Overlay highlight beats the functional color.
                if config.delete_mode_active && state != ClipState::Empty {
                    grid.light_blink(note, base.color, colors::MAGENTA_PINK);
                } else if config.duplicate_mode_active && state != ClipState::Empty {
                    grid.light_blink(note, base.color, colors::OCEAN_BLUE);
                } else {
                    match base.blink {
                        Some(blink) => grid.light_blink(note, base.color, blink),
                        None => grid.light(note, base.color),
                    }
                }
            }
        }
    }

    fn button_color(&self, model: &dyn SessionModel, button: ButtonId) -> u8 {
        let Some(index) = button.scene_index() else {
            return BUTTON_COLOR_OFF;
        };
        let scenes = model.scene_bank();
        if !scenes.scene_exists(index as usize) {
            return BUTTON_COLOR_OFF;
        }
        if scenes.is_scene_selected(index as usize) {
            COLOR_SELECTED_SCENE
        } else {
            COLOR_SCENE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridctl_core::LocalSession;

    struct Recorder(Vec<(u8, u8, Option<u8>)>);

    impl PadGrid for Recorder {
        fn light(&mut self, note: u8, color: u8) {
            self.0.push((note, color, None));
        }

        fn light_blink(&mut self, note: u8, color: u8, blink: u8) {
            self.0.push((note, color, Some(blink)));
        }
    }

    fn draw(model: &LocalSession, config: &SurfaceConfig) -> Vec<(u8, u8, Option<u8>)> {
        let mut grid = Recorder(Vec::new());
        SessionView::new().draw_grid(model, config, &mut grid);
        grid.0
    }

    #[test]
    fn draws_every_pad_exactly_once() {
        let lights = draw(&LocalSession::new(), &SurfaceConfig::default());
        assert_eq!(lights.len(), 64);
        let mut notes: Vec<u8> = lights.iter().map(|(note, _, _)| *note).collect();
        notes.sort_unstable();
        notes.dedup();
        assert_eq!(notes.len(), 64);
    }

    #[test]
    fn content_beats_armed_beats_idle() {
        let model = LocalSession::new();
        let lights = draw(&model, &SurfaceConfig::default());
        // Track 0 slot 0 has content (note 92); track 0 is armed, so its
        // empty slots show the armed color; unarmed empty tracks are dark.
        assert!(lights.contains(&(92, colors::AMBER, None)));
        assert!(lights.contains(&(pad_note(0, 2), colors::RED_LO, None)));
        assert!(lights.contains(&(pad_note(7, 7), colors::BLACK, None)));
    }

    #[test]
    fn delete_mode_highlight_overrides_functional_color() {
        let model = LocalSession::new();
        let mut config = SurfaceConfig::default();
        config.delete_mode_active = true;
        let lights = draw(&model, &config);
        assert!(lights.contains(&(92, colors::AMBER, Some(colors::MAGENTA_PINK))));
        // Empty slots are not highlighted.
        assert!(lights.contains(&(pad_note(7, 7), colors::BLACK, None)));
    }

    #[test]
    fn scene_button_colors_follow_existence_and_selection() {
        let mut model = LocalSession::new();
        let view = SessionView::new();
        assert_eq!(
            view.button_color(&model, ButtonId::Scene(0)),
            COLOR_SELECTED_SCENE
        );
        assert_eq!(view.button_color(&model, ButtonId::Scene(3)), COLOR_SCENE);

        // Page past the end of the bank: the backing scene for index 8 no
        // longer exists, selection flag or not.
        model.scene_bank_mut().select_next_page();
        assert_eq!(
            view.button_color(&model, ButtonId::Scene(8)),
            BUTTON_COLOR_OFF
        );
    }

    #[test]
    fn non_scene_buttons_are_off() {
        let model = LocalSession::new();
        let view = SessionView::new();
        assert_eq!(view.button_color(&model, ButtonId::Play), BUTTON_COLOR_OFF);
    }
}
