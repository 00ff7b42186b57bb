//! The shift overlay: secondary functions on the grid while shift is held.
//!
//! Simulates the buttons the device is missing. Every pad is a one-shot
//! action or a toggle; the exclusive duplicate/delete sub-modes get a
//! pulsing highlight so it is obvious the next grid press is destructive.

use std::time::Duration;

use gridctl_core::{
    ButtonId, Context, EventPhase, FeatureGroup, PadGrid, RecordQuantization, Resolution,
    SessionModel, SurfaceConfig, Task, View, BUTTON_COLOR_OFF,
};

use crate::colors;
use crate::modes;

const CLIP_REC_AUTOMATION: u8 = 99;
const STOP: u8 = 91;
const PLAY: u8 = 83;
const RECORD: u8 = 75;
const ARR_OVERDUB: u8 = 67;

const NEW: u8 = 98;
const DOUBLE: u8 = 90;
const DUPLICATE: u8 = 82;
const ARR_REC_AUTOMATION: u8 = 74;

const DELETE: u8 = 97;
const UNDO: u8 = 89;
const REDO: u8 = 81;

const TAP_TEMPO: u8 = 96;
const METRONOME: u8 = 88;
const TOGGLE_ACCENT: u8 = 80;

const QUANTIZE: u8 = 95;
const REC_QUANTIZE: u8 = 87;
const ARR_LOOP: u8 = 79;

const ADD_TRACK_INST: u8 = 94;
const ADD_TRACK_AUDIO: u8 = 86;
const NOTE_REPEAT: u8 = 78;

const ADD_TRACK_EFFECT: u8 = 93;

const NEW_CLIP_LENGTH: u8 = 36;

/// Pads showing/selecting the note-repeat period, by resolution index.
const PERIOD_PADS: [u8; 8] = [70, 71, 62, 63, 54, 55, 46, 47];
/// Pads showing/selecting the note-repeat length, by resolution index.
const LENGTH_PADS: [u8; 8] = [72, 73, 64, 65, 56, 57, 48, 49];

const NOTIFY_DELAY: Duration = Duration::from_millis(100);

pub struct ShiftView;

impl ShiftView {
    pub fn new() -> Self {
        Self
    }

    fn set_period(&self, ctx: &mut Context<'_>, index: usize) {
        let resolution = Resolution::ALL[index];
        ctx.config.note_repeat_period = resolution;
        ctx.surface.schedule_task(
            Task::Notify(format!("Period: {}", resolution.label())),
            NOTIFY_DELAY,
        );
    }

    fn set_note_length(&self, ctx: &mut Context<'_>, index: usize) {
        let resolution = Resolution::ALL[index];
        ctx.config.note_repeat_length = resolution;
        ctx.surface.schedule_task(
            Task::Notify(format!("Note Length: {}", resolution.label())),
            NOTIFY_DELAY,
        );
    }

    fn quantize_color(&self, model: &dyn SessionModel) -> u8 {
        let cursor = model.cursor_track();
        if !cursor.exists() {
            return colors::TURQUOISE_HI - 5;
        }
        colors::TURQUOISE_HI - cursor.record_quantization().index() as u8
    }

    fn cycle_record_quantization(&self, ctx: &mut Context<'_>) {
        let current = ctx.model.cursor_track().record_quantization().index();
        let next = RecordQuantization::ALL[(current + 1) % RecordQuantization::ALL.len()];
        ctx.model.cursor_track_mut().set_record_quantization(next);
    }
}

impl Default for ShiftView {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureGroup for ShiftView {
    fn name(&self) -> &str {
        super::SHIFT
    }
}

impl View for ShiftView {
    fn on_pad(&mut self, ctx: &mut Context<'_>, note: u8, phase: EventPhase, velocity: u8) {
        if phase != EventPhase::Down || velocity == 0 {
            return;
        }

        if let Some(index) = PERIOD_PADS.iter().position(|pad| *pad == note) {
            self.set_period(ctx, index);
            return;
        }
        if let Some(index) = LENGTH_PADS.iter().position(|pad| *pad == note) {
            self.set_note_length(ctx, index);
            return;
        }

        match note {
            NEW_CLIP_LENGTH..=43 => {
                let index = (note - NEW_CLIP_LENGTH) as usize;
                ctx.config.set_new_clip_length(index);
                let text = format!("New clip length: {}", ctx.config.new_clip_length_label());
                ctx.display.notify(&text);
            }
            STOP => {
                ctx.model.track_bank_mut().stop_all_clips();
                ctx.display.notify("Clip Stop");
            }
            NOTE_REPEAT => {
                ctx.config.toggle_note_repeat();
                let text = format!(
                    "Note Repeat: {}",
                    if ctx.config.note_repeat_active {
                        "Active"
                    } else {
                        "Off"
                    }
                );
                ctx.surface.schedule_task(Task::Notify(text), NOTIFY_DELAY);
            }
            TOGGLE_ACCENT => {
                ctx.config.toggle_accent();
                let text = format!(
                    "Fixed Accent: {}",
                    if ctx.config.accent_active { "On" } else { "Off" }
                );
                ctx.display.notify(&text);
            }
            ADD_TRACK_INST => ctx.model.application_mut().add_instrument_track(),
            ADD_TRACK_AUDIO => ctx.model.application_mut().add_audio_track(),
            ADD_TRACK_EFFECT => ctx.model.application_mut().add_effect_track(),
            METRONOME => {
                ctx.model.transport_mut().toggle_metronome();
                let text = format!(
                    "Metronome: {}",
                    if ctx.model.transport().is_metronome_on() {
                        "On"
                    } else {
                        "Off"
                    }
                );
                ctx.surface.schedule_task(Task::Notify(text), NOTIFY_DELAY);
            }
            TAP_TEMPO => {
                ctx.model.transport_mut().tap_tempo();
                ctx.display.notify("Tap Tempo");
            }
            UNDO => {
                ctx.model.application_mut().undo();
                ctx.display.notify("Undo");
            }
            REDO => {
                ctx.model.application_mut().redo();
                ctx.display.notify("Redo");
            }
            DELETE => {
                ctx.config.toggle_delete_mode();
                let text = format!(
                    "Delete {}",
                    if ctx.config.delete_mode_active {
                        "Active"
                    } else {
                        "Off"
                    }
                );
                ctx.display.notify(&text);
            }
            ARR_LOOP => {
                ctx.model.transport_mut().toggle_loop();
                let text = format!(
                    "Arrangement Loop: {}",
                    if ctx.model.transport().is_loop() {
                        "On"
                    } else {
                        "Off"
                    }
                );
                ctx.surface.schedule_task(Task::Notify(text), NOTIFY_DELAY);
            }
            REC_QUANTIZE => self.cycle_record_quantization(ctx),
            QUANTIZE => {
                ctx.model.application_mut().quantize();
                ctx.display.notify("Quantize");
            }
            DUPLICATE => {
                ctx.config.toggle_duplicate_mode();
                let text = format!(
                    "Duplicate {}",
                    if ctx.config.duplicate_mode_active {
                        "Active"
                    } else {
                        "Off"
                    }
                );
                ctx.display.notify(&text);
            }
            DOUBLE => {
                ctx.model.application_mut().double_clip();
                ctx.display.notify("Double");
            }
            PLAY => {
                ctx.model.transport_mut().toggle_play();
                ctx.display.notify("Play");
            }
            NEW => {
                let length = ctx.config.new_clip_length;
                ctx.model.application_mut().new_clip(length);
                ctx.display.notify("New");
            }
            RECORD => {
                ctx.model.transport_mut().toggle_record();
                ctx.display.notify("Arranger record");
            }
            ARR_OVERDUB => ctx.model.transport_mut().toggle_arranger_overdub(),
            CLIP_REC_AUTOMATION => ctx.model.transport_mut().toggle_writing_clip_automation(),
            ARR_REC_AUTOMATION => ctx
                .model
                .transport_mut()
                .toggle_writing_arranger_automation(),
            _ => {}
        }
    }

    fn on_button(&mut self, ctx: &mut Context<'_>, button: ButtonId, phase: EventPhase) {
        if phase != EventPhase::Down {
            return;
        }
        // Scene buttons select the encoder mode while the overlay is up.
        match button {
            ButtonId::Scene(0) => ctx.activate_mode(modes::VOLUME),
            ButtonId::Scene(1) => ctx.activate_mode(modes::TEMPO),
            _ => {}
        }
    }

    fn draw_grid(&self, model: &dyn SessionModel, config: &SurfaceConfig, grid: &mut dyn PadGrid) {
        let transport = model.transport();

        for note in 36..=99u8 {
            grid.light(note, colors::BLACK);
        }

        // Add tracks
        grid.light(ADD_TRACK_INST, colors::GREEN);
        grid.light(ADD_TRACK_AUDIO, colors::GREEN_SPRING);
        grid.light(ADD_TRACK_EFFECT, colors::TURQUOISE_CYAN);

        // Accent on/off
        grid.light(
            TOGGLE_ACCENT,
            if config.accent_active {
                colors::YELLOW_HI
            } else {
                colors::YELLOW_LO
            },
        );

        // New clip length
        for index in 0..8u8 {
            grid.light(
                NEW_CLIP_LENGTH + index,
                if index as usize == config.new_clip_length {
                    colors::WHITE
                } else {
                    colors::GREY_LO
                },
            );
        }

        // Note repeat with period/length selectors
        grid.light(
            NOTE_REPEAT,
            if config.note_repeat_active {
                colors::ORCHID_HI
            } else {
                colors::ORCHID_LO
            },
        );
        let period = config.note_repeat_period.index();
        let length = config.note_repeat_length.index();
        for (index, (period_pad, length_pad)) in
            PERIOD_PADS.iter().zip(LENGTH_PADS.iter()).enumerate()
        {
            let (hi, lo) = if index % 2 == 0 {
                (colors::SKY_HI, colors::SKY_LO)
            } else {
                (colors::PINK_HI, colors::PINK_LO)
            };
            grid.light(*period_pad, if index == period { hi } else { lo });
            grid.light(*length_pad, if index == length { hi } else { lo });
        }

        // Stop all
        grid.light(STOP, colors::RED);

        // Record / automation / overdub
        grid.light(
            RECORD,
            if transport.is_recording() {
                colors::RED_HI
            } else {
                colors::RED_LO
            },
        );
        grid.light(
            CLIP_REC_AUTOMATION,
            if transport.is_writing_clip_automation() {
                colors::AMBER_HI
            } else {
                colors::AMBER_LO
            },
        );
        grid.light(
            ARR_REC_AUTOMATION,
            if transport.is_writing_arranger_automation() {
                colors::AMBER_HI
            } else {
                colors::AMBER_LO
            },
        );
        grid.light(
            ARR_OVERDUB,
            if transport.is_arranger_overdub() {
                colors::ROSE
            } else {
                colors::RED_LO
            },
        );

        // Play / New
        grid.light(
            PLAY,
            if transport.is_playing() {
                colors::GREEN_HI
            } else {
                colors::GREEN_LO
            },
        );
        grid.light(NEW, colors::GREEN_SPRING);

        // Duplicate / Double
        if config.duplicate_mode_active {
            grid.light_blink(DUPLICATE, colors::BLUE, colors::OCEAN_BLUE);
        } else {
            grid.light(DUPLICATE, colors::BLUE);
        }
        grid.light(DOUBLE, colors::BLUE_ORCHID);

        // Quantize / record quantization
        grid.light(QUANTIZE, colors::LIME_GREEN);
        grid.light(REC_QUANTIZE, self.quantize_color(model));

        // Delete
        if config.delete_mode_active {
            grid.light_blink(DELETE, colors::MAGENTA, colors::MAGENTA_PINK);
        } else {
            grid.light(DELETE, colors::MAGENTA);
        }
        grid.light(
            ARR_LOOP,
            if transport.is_loop() {
                colors::LIME_GREEN
            } else {
                colors::GREEN_HI
            },
        );

        // Undo / Redo
        grid.light(UNDO, colors::AMBER);
        grid.light(REDO, colors::AMBER_YELLOW);

        // Metronome / tap tempo
        grid.light(
            METRONOME,
            if transport.is_metronome_on() {
                colors::SKY_HI
            } else {
                colors::SKY_LO
            },
        );
        grid.light(TAP_TEMPO, colors::GREY_HALF);
    }

    fn button_color(&self, _model: &dyn SessionModel, button: ButtonId) -> u8 {
        match button {
            ButtonId::Scene(0) => colors::CYAN,
            ButtonId::Scene(1) => colors::SKY,
            ButtonId::Scene(2) => colors::ORCHID,
            ButtonId::Scene(3) => colors::GREEN,
            ButtonId::Scene(4) => colors::ROSE,
            ButtonId::Scene(5) => colors::YELLOW_HI,
            ButtonId::Scene(6) => colors::BLUE,
            ButtonId::Scene(7) => colors::RED,
            _ => BUTTON_COLOR_OFF,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    use gridctl_core::{ControlId, LocalSession, Surface};

    #[derive(Default)]
    struct TestSurface {
        scheduled: Vec<(Task, Duration)>,
    }

    impl Surface for TestSurface {
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

        fn schedule_task(&mut self, task: Task, delay: Duration) {
            self.scheduled.push((task, delay));
        }
    }

    #[derive(Default)]
    struct TestDisplay(Vec<String>);

    impl gridctl_core::Display for TestDisplay {
        fn notify(&mut self, text: &str) {
            self.0.push(text.to_string());
        }
    }

    struct Fixture {
        model: LocalSession,
        config: SurfaceConfig,
        surface: TestSurface,
        display: TestDisplay,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                model: LocalSession::new(),
                config: SurfaceConfig::default(),
                surface: TestSurface::default(),
                display: TestDisplay::default(),
            }
        }

        fn press(&mut self, note: u8) {
            let mut ctx = Context::new(
                &mut self.model,
                &mut self.config,
                &mut self.surface,
                &mut self.display,
                Some(crate::views::SHIFT.to_string()),
            );
            ShiftView::new().on_pad(&mut ctx, note, EventPhase::Down, 127);
        }
    }

    #[test]
    fn delete_pad_toggles_the_sub_mode() {
        let mut fixture = Fixture::new();
        fixture.press(DELETE);
        assert!(fixture.config.delete_mode_active);
        assert_eq!(fixture.display.0, ["Delete Active"]);

        fixture.press(DELETE);
        assert!(!fixture.config.delete_mode_active);
    }

    #[test]
    fn period_pad_schedules_a_delayed_notification() {
        let mut fixture = Fixture::new();
        fixture.press(PERIOD_PADS[3]);
        assert_eq!(fixture.config.note_repeat_period, Resolution::EighthTriplet);
        assert_eq!(
            fixture.surface.scheduled,
            [(Task::Notify("Period: 1/8t".to_string()), NOTIFY_DELAY)]
        );
        assert!(fixture.display.0.is_empty());
    }

    #[test]
    fn new_clip_length_row_selects_by_offset() {
        let mut fixture = Fixture::new();
        fixture.press(NEW_CLIP_LENGTH + 5);
        assert_eq!(fixture.config.new_clip_length, 5);
        assert_eq!(fixture.display.0, ["New clip length: 8 bars"]);
    }

    #[test]
    fn record_quantization_cycles_and_colors_follow() {
        let mut fixture = Fixture::new();
        let view = ShiftView::new();
        assert_eq!(view.quantize_color(&fixture.model), colors::TURQUOISE_HI);

        fixture.press(REC_QUANTIZE);
        assert_eq!(view.quantize_color(&fixture.model), colors::TURQUOISE_HI - 1);
    }

    #[test]
    fn duplicate_pad_pulses_when_armed() {
        let mut fixture = Fixture::new();
        fixture.press(DUPLICATE);

        struct Recorder(Vec<(u8, u8, Option<u8>)>);
        impl PadGrid for Recorder {
            fn light(&mut self, note: u8, color: u8) {
                self.0.push((note, color, None));
            }
            fn light_blink(&mut self, note: u8, color: u8, blink: u8) {
                self.0.push((note, color, Some(blink)));
            }
        }

        let mut grid = Recorder(Vec::new());
        ShiftView::new().draw_grid(&fixture.model, &fixture.config, &mut grid);
        assert!(grid
            .0
            .contains(&(DUPLICATE, colors::BLUE, Some(colors::OCEAN_BLUE))));
    }
}
