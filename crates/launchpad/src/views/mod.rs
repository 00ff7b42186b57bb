//! Views shipped with the launchpad bundle.

mod session;
mod shift_view;
mod shuffle;
mod tempo;

pub use session::SessionView;
pub use shift_view::ShiftView;
pub use shuffle::ShuffleView;
pub use tempo::TempoView;

/// View names used when wiring the surface.
pub const SESSION: &str = "Session";
pub const SHIFT: &str = "Shift";
pub const TEMPO: &str = "Tempo";
pub const SHUFFLE: &str = "Shuffle";

/// Grid geometry shared by the views: note 36 is bottom-left, note 99 is
/// top-right, eight pads per row.
pub(crate) fn pad_position(note: u8) -> (usize, usize) {
    let index = (note - 36) as usize;
    let track = index % 8;
    let slot = 7 - index / 8;
    (track, slot)
}

pub(crate) fn pad_note(track: usize, slot: usize) -> u8 {
    36 + ((7 - slot) * 8 + track) as u8
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::time::{Duration, Instant};

    use gridctl_core::{ControlId, Display, Surface, Task};

    pub struct NullSurface;

    impl Surface for NullSurface {
        fn now(&self) -> Instant {
            Instant::now()
        }

        fn is_long_pressed(&self, _control: ControlId) -> bool {
            false
        }

        fn set_trigger_consumed(&mut self, _control: ControlId) {}

        fn take_trigger_consumed(&mut self, _control: ControlId) -> bool {
            false
        }

        fn schedule_task(&mut self, _task: Task, _delay: Duration) {}
    }

    #[derive(Default)]
    pub struct RecordingDisplay(pub Vec<String>);

    impl Display for RecordingDisplay {
        fn notify(&mut self, text: &str) {
            self.0.push(text.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_geometry_round_trips() {
        assert_eq!(pad_position(92), (0, 0));
        assert_eq!(pad_position(99), (7, 0));
        assert_eq!(pad_position(36), (0, 7));
        for note in 36..=99u8 {
            let (track, slot) = pad_position(note);
            assert_eq!(pad_note(track, slot), note);
        }
    }
}
