//! Control identifiers and input events.

/// One of the named (non-grid) buttons on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonId {
    Shift,
    Play,
    Record,
    Session,
    Note,
    Tempo,
    Shuffle,
    Metronome,
    Undo,
    Delete,
    Duplicate,
    Quantize,
    New,
    Up,
    Down,
    Left,
    Right,
    /// Push of the main encoder cap.
    EncoderPress,
    /// Scene launch button, row index 0..=7.
    Scene(u8),
}

impl ButtonId {
    /// Scene-row index if this is a scene button.
    pub fn scene_index(self) -> Option<u8> {
        match self {
            ButtonId::Scene(index) => Some(index),
            _ => None,
        }
    }

    /// The four directional buttons are routed to the active mode.
    pub fn direction(self) -> Option<Direction> {
        match self {
            ButtonId::Up => Some(Direction::Up),
            ButtonId::Down => Some(Direction::Down),
            ButtonId::Left => Some(Direction::Left),
            ButtonId::Right => Some(Direction::Right),
            _ => None,
        }
    }
}

/// A continuous control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnobId {
    /// The multiplexed main encoder; the active mode decides its meaning.
    Main,
}

/// Identifies one physical control. Stable for the lifetime of a device,
/// used as a map key everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlId {
    /// Grid pad, addressed by note number 36..=99.
    Pad(u8),
    Button(ButtonId),
    Knob(KnobId),
}

/// Scroll direction for mode navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Phase of a button/pad interaction.
///
/// `Long` is emitted once when a press is held past the hold threshold and
/// replaces the Up semantics of activate-on-press commands; the physical
/// `Up` still arrives at release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPhase {
    Down,
    Up,
    Long,
}

/// Immutable description of one physical interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub control: ControlId,
    pub phase: EventPhase,
    /// Velocity for pads/buttons, raw encoder value for knobs. A magnitude
    /// of zero on a pad is a degenerate release.
    pub magnitude: u8,
}

impl InputEvent {
    pub fn new(control: ControlId, phase: EventPhase, magnitude: u8) -> Self {
        Self {
            control,
            phase,
            magnitude,
        }
    }

    pub fn pad(note: u8, phase: EventPhase, velocity: u8) -> Self {
        Self::new(ControlId::Pad(note), phase, velocity)
    }

    pub fn button(button: ButtonId, phase: EventPhase) -> Self {
        let magnitude = match phase {
            EventPhase::Up => 0,
            _ => 127,
        };
        Self::new(ControlId::Button(button), phase, magnitude)
    }

    /// Relative encoder turn. Encoders send 64 +/- delta; see
    /// [`InputEvent::knob_delta`].
    pub fn knob(knob: KnobId, raw_value: u8) -> Self {
        Self::new(ControlId::Knob(knob), phase_for_knob(raw_value), raw_value)
    }

    /// Decode the relative delta of a knob event (-63..=63).
    pub fn knob_delta(&self) -> i8 {
        (self.magnitude as i16 - 64) as i8
    }
}

fn phase_for_knob(_raw: u8) -> EventPhase {
    EventPhase::Down
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knob_delta_is_relative_to_center() {
        assert_eq!(InputEvent::knob(KnobId::Main, 65).knob_delta(), 1);
        assert_eq!(InputEvent::knob(KnobId::Main, 60).knob_delta(), -4);
        assert_eq!(InputEvent::knob(KnobId::Main, 64).knob_delta(), 0);
    }

    #[test]
    fn button_up_has_zero_magnitude() {
        let event = InputEvent::button(ButtonId::Play, EventPhase::Up);
        assert_eq!(event.magnitude, 0);
    }

    #[test]
    fn directional_buttons_map_to_directions() {
        assert_eq!(ButtonId::Left.direction(), Some(Direction::Left));
        assert_eq!(ButtonId::Play.direction(), None);
        assert_eq!(ButtonId::Scene(3).scene_index(), Some(3));
    }
}
