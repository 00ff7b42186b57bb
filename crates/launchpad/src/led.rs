//! LED feedback buffer.
//!
//! Views redraw the whole frame every tick; the buffer diffs against what
//! the device is already showing and only emits MIDI for pads and buttons
//! that changed. Channel 1 note-ons set static pad colors, channel 2
//! note-ons arm the flashing color.

use gridctl_core::{GRID_FIRST_NOTE, GRID_LAST_NOTE};

const PAD_COUNT: usize = (GRID_LAST_NOTE - GRID_FIRST_NOTE + 1) as usize;

const NOTE_ON_STATIC: u8 = 0x90;
const NOTE_ON_FLASH: u8 = 0x91;
const CC_STATIC: u8 = 0xB0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct PadLed {
    color: u8,
    blink: Option<u8>,
}

/// Double-buffered LED state for the grid and the named buttons.
pub struct LedBuffer {
    desired: [PadLed; PAD_COUNT],
    shown: [Option<PadLed>; PAD_COUNT],
    desired_buttons: Vec<(u8, u8)>,
    shown_buttons: Vec<(u8, u8)>,
}

impl LedBuffer {
    pub fn new() -> Self {
        Self {
            desired: [PadLed::default(); PAD_COUNT],
            shown: [None; PAD_COUNT],
            desired_buttons: Vec::new(),
            shown_buttons: Vec::new(),
        }
    }

    fn slot(note: u8) -> Option<usize> {
        if (GRID_FIRST_NOTE..=GRID_LAST_NOTE).contains(&note) {
            Some((note - GRID_FIRST_NOTE) as usize)
        } else {
            None
        }
    }

    /// Queue a color for a named button's CC.
    pub fn set_button(&mut self, cc: u8, color: u8) {
        match self.desired_buttons.iter_mut().find(|(c, _)| *c == cc) {
            Some(entry) => entry.1 = color,
            None => self.desired_buttons.push((cc, color)),
        }
    }

    /// Messages needed to bring the device in line with the desired frame.
    pub fn take_dirty_messages(&mut self) -> Vec<[u8; 3]> {
        let mut messages = Vec::new();

        for (index, desired) in self.desired.iter().enumerate() {
            if self.shown[index] == Some(*desired) {
                continue;
            }
            let note = GRID_FIRST_NOTE + index as u8;
            messages.push([NOTE_ON_STATIC, note, desired.color]);
            if let Some(blink) = desired.blink {
                messages.push([NOTE_ON_FLASH, note, blink]);
            }
            self.shown[index] = Some(*desired);
        }

        for (cc, color) in &self.desired_buttons {
            let shown = self
                .shown_buttons
                .iter()
                .find(|(c, _)| c == cc)
                .map(|(_, color)| *color);
            if shown == Some(*color) {
                continue;
            }
            messages.push([CC_STATIC, *cc, *color]);
            match self.shown_buttons.iter_mut().find(|(c, _)| c == cc) {
                Some(entry) => entry.1 = *color,
                None => self.shown_buttons.push((*cc, *color)),
            }
        }

        messages
    }

    /// Messages that black out everything currently lit.
    pub fn blackout(&mut self) -> Vec<[u8; 3]> {
        self.desired = [PadLed::default(); PAD_COUNT];
        for entry in &mut self.desired_buttons {
            entry.1 = 0;
        }
        self.take_dirty_messages()
    }
}

impl Default for LedBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl gridctl_core::PadGrid for LedBuffer {
    fn light(&mut self, note: u8, color: u8) {
        if let Some(slot) = Self::slot(note) {
            self.desired[slot] = PadLed { color, blink: None };
        }
    }

    fn light_blink(&mut self, note: u8, color: u8, blink_color: u8) {
        if let Some(slot) = Self::slot(note) {
            self.desired[slot] = PadLed {
                color,
                blink: Some(blink_color),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridctl_core::PadGrid;

    #[test]
    fn first_frame_sends_every_pad_once() {
        let mut buffer = LedBuffer::new();
        buffer.light(36, 5);
        let messages = buffer.take_dirty_messages();
        assert_eq!(messages.len(), PAD_COUNT);
        assert!(messages.contains(&[0x90, 36, 5]));
    }

    #[test]
    fn unchanged_frames_emit_nothing() {
        let mut buffer = LedBuffer::new();
        buffer.light(40, 21);
        buffer.take_dirty_messages();

        buffer.light(40, 21);
        assert!(buffer.take_dirty_messages().is_empty());

        buffer.light(40, 22);
        assert_eq!(buffer.take_dirty_messages(), [[0x90, 40, 22]]);
    }

    #[test]
    fn blink_colors_go_out_on_the_flash_channel() {
        let mut buffer = LedBuffer::new();
        buffer.take_dirty_messages();

        buffer.light_blink(50, 10, 54);
        let messages = buffer.take_dirty_messages();
        assert_eq!(messages, [[0x90, 50, 10], [0x91, 50, 54]]);
    }

    #[test]
    fn button_colors_are_diffed_by_cc() {
        let mut buffer = LedBuffer::new();
        buffer.take_dirty_messages();

        buffer.set_button(89, 23);
        assert_eq!(buffer.take_dirty_messages(), [[0xB0, 89, 23]]);
        buffer.set_button(89, 23);
        assert!(buffer.take_dirty_messages().is_empty());
    }

    #[test]
    fn blackout_clears_lit_state() {
        let mut buffer = LedBuffer::new();
        buffer.light(36, 5);
        buffer.set_button(89, 23);
        buffer.take_dirty_messages();

        let messages = buffer.blackout();
        assert!(messages.contains(&[0x90, 36, 0]));
        assert!(messages.contains(&[0xB0, 89, 0]));
    }
}
