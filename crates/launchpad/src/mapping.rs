//! Launchpad MIDI mapping.
//!
//! Translates raw MIDI from the device into [`InputEvent`]s.
//!
//! # Layout
//!
//! ```text
//! Grid:       notes 36-99, note 36 bottom-left, note 99 top-right
//! Top row:    CC 91-98  (Up, Down, Left, Right, Session, Note, Tempo, Shuffle)
//! Left side:  CC 80, 70, 60, 50, 40, 30, 20, 10
//!             (Shift, Metronome, Undo, Delete, Quantize, Duplicate, New, Record)
//! Right side: CC 89, 79, 69, 59, 49, 39, 29, 19 (scene launch, top to bottom)
//! Transport:  CC 85 (Play), CC 86 (encoder press), CC 14 (relative encoder)
//! ```

use gridctl_core::{ButtonId, EventPhase, InputEvent, KnobId, GRID_FIRST_NOTE, GRID_LAST_NOTE};

const NOTE_ON: u8 = 0x90;
const NOTE_OFF: u8 = 0x80;
const CONTROL_CHANGE: u8 = 0xB0;

/// Substring used to pick the MIDI ports belonging to the device.
pub const PORT_NAME_HINT: &str = "Launchpad";

/// Launchpad MIDI mapping constants and translation.
pub struct LaunchpadMapping;

impl LaunchpadMapping {
    // === Top row (CC 91-98) ===
    pub const UP: u8 = 91;
    pub const DOWN: u8 = 92;
    pub const LEFT: u8 = 93;
    pub const RIGHT: u8 = 94;
    pub const SESSION: u8 = 95;
    pub const NOTE: u8 = 96;
    pub const TEMPO: u8 = 97;
    pub const SHUFFLE: u8 = 98;

    // === Left column ===
    pub const SHIFT: u8 = 80;
    pub const METRONOME: u8 = 70;
    pub const UNDO: u8 = 60;
    pub const DELETE: u8 = 50;
    pub const QUANTIZE: u8 = 40;
    pub const DUPLICATE: u8 = 30;
    pub const NEW: u8 = 20;
    pub const RECORD: u8 = 10;

    // === Transport / encoder ===
    pub const PLAY: u8 = 85;
    pub const ENCODER_PRESS: u8 = 86;
    pub const MAIN_KNOB: u8 = 14;

    /// Scene launch CCs, top row first.
    pub const SCENE_CCS: [u8; 8] = [89, 79, 69, 59, 49, 39, 29, 19];

    /// Translate one raw MIDI message into an input event. Messages the
    /// surface does not care about yield `None`.
    pub fn translate(raw: &[u8]) -> Option<InputEvent> {
        let (&status, rest) = raw.split_first()?;
        if rest.len() < 2 {
            return None;
        }
        let (data1, data2) = (rest[0], rest[1]);

        match status & 0xF0 {
            NOTE_ON if Self::is_grid_note(data1) => {
                let phase = if data2 == 0 {
                    EventPhase::Up
                } else {
                    EventPhase::Down
                };
                Some(InputEvent::pad(data1, phase, data2))
            }
            NOTE_OFF if Self::is_grid_note(data1) => {
                Some(InputEvent::pad(data1, EventPhase::Up, 0))
            }
            CONTROL_CHANGE if data1 == Self::MAIN_KNOB => {
                Some(InputEvent::knob(KnobId::Main, data2))
            }
            CONTROL_CHANGE => {
                let button = Self::button_for_cc(data1)?;
                let phase = if data2 == 0 {
                    EventPhase::Up
                } else {
                    EventPhase::Down
                };
                Some(InputEvent::button(button, phase))
            }
            _ => None,
        }
    }

    fn is_grid_note(note: u8) -> bool {
        (GRID_FIRST_NOTE..=GRID_LAST_NOTE).contains(&note)
    }

    pub fn button_for_cc(cc: u8) -> Option<ButtonId> {
        if let Some(index) = Self::SCENE_CCS.iter().position(|scene| *scene == cc) {
            return Some(ButtonId::Scene(index as u8));
        }
        let button = match cc {
            Self::UP => ButtonId::Up,
            Self::DOWN => ButtonId::Down,
            Self::LEFT => ButtonId::Left,
            Self::RIGHT => ButtonId::Right,
            Self::SESSION => ButtonId::Session,
            Self::NOTE => ButtonId::Note,
            Self::TEMPO => ButtonId::Tempo,
            Self::SHUFFLE => ButtonId::Shuffle,
            Self::SHIFT => ButtonId::Shift,
            Self::METRONOME => ButtonId::Metronome,
            Self::UNDO => ButtonId::Undo,
            Self::DELETE => ButtonId::Delete,
            Self::QUANTIZE => ButtonId::Quantize,
            Self::DUPLICATE => ButtonId::Duplicate,
            Self::NEW => ButtonId::New,
            Self::RECORD => ButtonId::Record,
            Self::PLAY => ButtonId::Play,
            Self::ENCODER_PRESS => ButtonId::EncoderPress,
            _ => return None,
        };
        Some(button)
    }

    /// CC used to light a named button, where one exists.
    pub fn cc_for_button(button: ButtonId) -> Option<u8> {
        if let Some(index) = button.scene_index() {
            return Self::SCENE_CCS.get(index as usize).copied();
        }
        let cc = match button {
            ButtonId::Up => Self::UP,
            ButtonId::Down => Self::DOWN,
            ButtonId::Left => Self::LEFT,
            ButtonId::Right => Self::RIGHT,
            ButtonId::Session => Self::SESSION,
            ButtonId::Note => Self::NOTE,
            ButtonId::Tempo => Self::TEMPO,
            ButtonId::Shuffle => Self::SHUFFLE,
            ButtonId::Shift => Self::SHIFT,
            ButtonId::Metronome => Self::METRONOME,
            ButtonId::Undo => Self::UNDO,
            ButtonId::Delete => Self::DELETE,
            ButtonId::Quantize => Self::QUANTIZE,
            ButtonId::Duplicate => Self::DUPLICATE,
            ButtonId::New => Self::NEW,
            ButtonId::Record => Self::RECORD,
            ButtonId::Play => Self::PLAY,
            ButtonId::EncoderPress => Self::ENCODER_PRESS,
            ButtonId::Scene(_) => return None,
        };
        Some(cc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridctl_core::ControlId;

    #[test]
    fn grid_notes_become_pad_events() {
        let event = LaunchpadMapping::translate(&[0x90, 36, 100]).unwrap();
        assert_eq!(event.control, ControlId::Pad(36));
        assert_eq!(event.phase, EventPhase::Down);
        assert_eq!(event.magnitude, 100);

        let release = LaunchpadMapping::translate(&[0x80, 36, 64]).unwrap();
        assert_eq!(release.phase, EventPhase::Up);
        assert_eq!(release.magnitude, 0);
    }

    #[test]
    fn note_on_with_zero_velocity_is_a_release() {
        let event = LaunchpadMapping::translate(&[0x90, 99, 0]).unwrap();
        assert_eq!(event.phase, EventPhase::Up);
    }

    #[test]
    fn out_of_grid_notes_are_ignored() {
        assert!(LaunchpadMapping::translate(&[0x90, 35, 100]).is_none());
        assert!(LaunchpadMapping::translate(&[0x90, 100, 100]).is_none());
    }

    #[test]
    fn scene_ccs_map_in_row_order() {
        for (index, cc) in LaunchpadMapping::SCENE_CCS.iter().enumerate() {
            let event = LaunchpadMapping::translate(&[0xB0, *cc, 127]).unwrap();
            assert_eq!(
                event.control,
                ControlId::Button(ButtonId::Scene(index as u8))
            );
        }
    }

    #[test]
    fn encoder_cc_carries_the_raw_value() {
        let event =
            LaunchpadMapping::translate(&[0xB0, LaunchpadMapping::MAIN_KNOB, 62]).unwrap();
        assert_eq!(event.control, ControlId::Knob(KnobId::Main));
        assert_eq!(event.knob_delta(), -2);
    }

    #[test]
    fn unknown_ccs_are_ignored() {
        assert!(LaunchpadMapping::translate(&[0xB0, 15, 127]).is_none());
        assert!(LaunchpadMapping::translate(&[0xF8]).is_none());
    }

    #[test]
    fn button_cc_mapping_round_trips() {
        for cc in [
            LaunchpadMapping::SHIFT,
            LaunchpadMapping::PLAY,
            LaunchpadMapping::SESSION,
            LaunchpadMapping::SCENE_CCS[4],
        ] {
            let button = LaunchpadMapping::button_for_cc(cc).unwrap();
            assert_eq!(LaunchpadMapping::cc_for_button(button), Some(cc));
        }
    }
}
