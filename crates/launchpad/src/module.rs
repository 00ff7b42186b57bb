//! Async module owning the MIDI connections and the dispatch loop.
//!
//! Raw MIDI lands in a callback on midir's thread and is forwarded over an
//! unbounded channel; everything else (dispatch, scheduled tasks, LED
//! refresh, long-press tracking) runs sequentially inside the tokio select
//! loop, which is what lets the core stay lock-free.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use midir::{MidiInput, MidiInputConnection, MidiOutput, MidiOutputConnection};
use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use gridctl_core::{
    ButtonId, ControlId, Direction, Dispatcher, Display, EventPhase, InputEvent, SessionModel,
    ShiftOverlaySettings, Surface, SurfaceConfig, SurfaceError, Task, DEFAULT_TAP_THRESHOLD,
};

use crate::commands::{
    ArrowCommand, DeleteCommand, DuplicateCommand, MetronomeCommand, NewCommand,
    OverlayToggleCommand, PlayCommand, QuantizeCommand, RecordCommand, SessionViewCommand,
    UndoCommand,
};
use crate::led::LedBuffer;
use crate::mapping::LaunchpadMapping;
use crate::modes::{TempoMode, VolumeMode};
use crate::views::{SessionView, ShiftView, ShuffleView, TempoView};
use crate::{modes, views};

/// Held past this, a press counts as long.
const LONG_PRESS_THRESHOLD: Duration = Duration::from_millis(800);

const LED_REFRESH: Duration = Duration::from_millis(100);
const LONG_PRESS_POLL: Duration = Duration::from_millis(50);

#[derive(Debug, Error)]
pub enum ModuleError {
    #[error("MIDI init failed: {0}")]
    MidiInit(#[from] midir::InitError),

    #[error("no MIDI port matching {0:?} found")]
    PortNotFound(String),

    #[error("MIDI connect failed: {0}")]
    Connect(String),

    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// Press tracking and the scheduling channel, shared between the dispatcher
/// (through [`SharedSurface`]) and the select loop.
struct SurfaceState {
    pressed: HashMap<ControlId, Instant>,
    long_fired: HashSet<ControlId>,
    consumed: HashSet<ControlId>,
    schedule_tx: mpsc::UnboundedSender<(Task, Duration)>,
}

impl SurfaceState {
    fn new(schedule_tx: mpsc::UnboundedSender<(Task, Duration)>) -> Self {
        Self {
            pressed: HashMap::new(),
            long_fired: HashSet::new(),
            consumed: HashSet::new(),
            schedule_tx,
        }
    }
}

/// The [`Surface`] handle given to the dispatcher.
struct SharedSurface(Arc<Mutex<SurfaceState>>);

impl Surface for SharedSurface {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn is_long_pressed(&self, control: ControlId) -> bool {
        self.0.lock().long_fired.contains(&control)
    }

    fn set_trigger_consumed(&mut self, control: ControlId) {
        self.0.lock().consumed.insert(control);
    }

    fn take_trigger_consumed(&mut self, control: ControlId) -> bool {
        self.0.lock().consumed.remove(&control)
    }

    fn schedule_task(&mut self, task: Task, delay: Duration) {
        // Receiver lives in the select loop; send only fails at shutdown.
        let _ = self.0.lock().schedule_tx.send((task, delay));
    }
}

/// Notifications go to the log; the device has no text display.
struct LogDisplay;

impl Display for LogDisplay {
    fn notify(&mut self, text: &str) {
        info!(target: "gridctl::notify", "{text}");
    }
}

/// Install the stock views, modes and button bindings.
pub fn build_dispatcher(
    model: Box<dyn SessionModel>,
    surface: Box<dyn Surface>,
    display: Box<dyn Display>,
    config: SurfaceConfig,
) -> Result<Dispatcher, SurfaceError> {
    let settings = ShiftOverlaySettings {
        shift_view: views::SHIFT.to_string(),
        fallback_view: views::SESSION.to_string(),
        competing_overlays: vec![views::TEMPO.to_string(), views::SHUFFLE.to_string()],
        tap_threshold: DEFAULT_TAP_THRESHOLD,
    };
    let mut dispatcher = Dispatcher::new(model, surface, display, config, settings);

    dispatcher.install_view(Box::new(SessionView::new()))?;
    dispatcher.install_view(Box::new(ShiftView::new()))?;
    dispatcher.install_view(Box::new(TempoView::new()))?;
    dispatcher.install_view(Box::new(ShuffleView::new()))?;

    dispatcher.install_mode(Box::new(VolumeMode::new()))?;
    dispatcher.install_mode(Box::new(TempoMode::new()))?;

    dispatcher.bind(ControlId::Button(ButtonId::Play), Box::new(PlayCommand))?;
    dispatcher.bind(ControlId::Button(ButtonId::Record), Box::new(RecordCommand))?;
    dispatcher.bind(
        ControlId::Button(ButtonId::Metronome),
        Box::new(MetronomeCommand),
    )?;
    dispatcher.bind(ControlId::Button(ButtonId::Undo), Box::new(UndoCommand))?;
    dispatcher.bind(ControlId::Button(ButtonId::Delete), Box::new(DeleteCommand))?;
    dispatcher.bind(
        ControlId::Button(ButtonId::Duplicate),
        Box::new(DuplicateCommand),
    )?;
    dispatcher.bind(
        ControlId::Button(ButtonId::Quantize),
        Box::new(QuantizeCommand),
    )?;
    dispatcher.bind(ControlId::Button(ButtonId::New), Box::new(NewCommand))?;
    dispatcher.bind(
        ControlId::Button(ButtonId::Session),
        Box::new(SessionViewCommand),
    )?;
    dispatcher.bind(
        ControlId::Button(ButtonId::Tempo),
        Box::new(OverlayToggleCommand::new(views::TEMPO)),
    )?;
    dispatcher.bind(
        ControlId::Button(ButtonId::Shuffle),
        Box::new(OverlayToggleCommand::new(views::SHUFFLE)),
    )?;
    dispatcher.bind(
        ControlId::Button(ButtonId::Left),
        Box::new(ArrowCommand::new(Direction::Left)),
    )?;
    dispatcher.bind(
        ControlId::Button(ButtonId::Right),
        Box::new(ArrowCommand::new(Direction::Right)),
    )?;

    dispatcher.set_active_view(views::SESSION)?;
    dispatcher.set_active_mode(modes::VOLUME)?;
    Ok(dispatcher)
}

/// Launchpad controller module: owns the connections and runs the loop.
pub struct LaunchpadModule {
    dispatcher: Dispatcher,
    shared: Arc<Mutex<SurfaceState>>,
    leds: LedBuffer,

    midi_input: Option<MidiInputConnection<mpsc::UnboundedSender<Vec<u8>>>>,
    midi_output: Option<MidiOutputConnection>,
    midi_rx: Option<mpsc::UnboundedReceiver<Vec<u8>>>,
    schedule_rx: Option<mpsc::UnboundedReceiver<(Task, Duration)>>,

    config_path: PathBuf,
}

impl LaunchpadModule {
    pub fn new(
        model: Box<dyn SessionModel>,
        config: SurfaceConfig,
        config_path: PathBuf,
    ) -> Result<Self, ModuleError> {
        let (schedule_tx, schedule_rx) = mpsc::unbounded_channel();
        let shared = Arc::new(Mutex::new(SurfaceState::new(schedule_tx)));

        let dispatcher = build_dispatcher(
            model,
            Box::new(SharedSurface(shared.clone())),
            Box::new(LogDisplay),
            config,
        )?;

        Ok(Self {
            dispatcher,
            shared,
            leds: LedBuffer::new(),
            midi_input: None,
            midi_output: None,
            midi_rx: None,
            schedule_rx: Some(schedule_rx),
            config_path,
        })
    }

    /// Connect to the first MIDI port pair whose name contains `hint`.
    pub fn connect_midi(&mut self, hint: &str) -> Result<(), ModuleError> {
        let midi_in = MidiInput::new("gridctl_in")?;
        let in_ports = midi_in.ports();
        let in_port = in_ports
            .iter()
            .find(|port| {
                midi_in
                    .port_name(port)
                    .map(|name| name.contains(hint))
                    .unwrap_or(false)
            })
            .cloned()
            .ok_or_else(|| ModuleError::PortNotFound(hint.to_string()))?;

        let (tx, rx) = mpsc::unbounded_channel();
        self.midi_rx = Some(rx);

        let connection = midi_in
            .connect(
                &in_port,
                "gridctl-input",
                move |_timestamp, message, tx| {
                    let _ = tx.send(message.to_vec());
                },
                tx,
            )
            .map_err(|e| ModuleError::Connect(e.to_string()))?;
        self.midi_input = Some(connection);

        let midi_out = MidiOutput::new("gridctl_out")?;
        let out_ports = midi_out.ports();
        let out_port = out_ports.iter().find(|port| {
            midi_out
                .port_name(port)
                .map(|name| name.contains(hint))
                .unwrap_or(false)
        });
        match out_port {
            Some(port) => {
                let connection = midi_out
                    .connect(port, "gridctl-output")
                    .map_err(|e| ModuleError::Connect(e.to_string()))?;
                self.midi_output = Some(connection);
            }
            None => warn!("no MIDI output matching {hint:?}, LED feedback disabled"),
        }

        info!(port = hint, "MIDI connected");
        Ok(())
    }

    /// List the MIDI input port names visible on this machine.
    pub fn list_ports() -> Result<Vec<String>, ModuleError> {
        let midi_in = MidiInput::new("gridctl_probe")?;
        Ok(midi_in
            .ports()
            .iter()
            .filter_map(|port| midi_in.port_name(port).ok())
            .collect())
    }

    fn handle_raw_midi(&mut self, raw: &[u8]) {
        let Some(event) = LaunchpadMapping::translate(raw) else {
            return;
        };

        if event.phase == EventPhase::Down && !matches!(event.control, ControlId::Knob(_)) {
            let mut state = self.shared.lock();
            state.pressed.insert(event.control, Instant::now());
            state.long_fired.remove(&event.control);
        }

        self.dispatch(event);

        if event.phase == EventPhase::Up {
            let mut state = self.shared.lock();
            state.pressed.remove(&event.control);
            state.long_fired.remove(&event.control);
        }
    }

    fn dispatch(&mut self, event: InputEvent) {
        if let Err(e) = self.dispatcher.handle_event(event) {
            warn!(?event, "dispatch failed: {e}");
        }
    }

    /// Promote held presses to Long events once past the threshold.
    fn fire_long_presses(&mut self) {
        let now = Instant::now();
        let due: Vec<ControlId> = {
            let mut state = self.shared.lock();
            let fired: Vec<ControlId> = state
                .pressed
                .iter()
                .filter(|(control, pressed_at)| {
                    now.duration_since(**pressed_at) >= LONG_PRESS_THRESHOLD
                        && !state.long_fired.contains(*control)
                })
                .map(|(control, _)| *control)
                .collect();
            for control in &fired {
                state.long_fired.insert(*control);
            }
            fired
        };
        for control in due {
            debug!(?control, "long press");
            self.dispatch(InputEvent::new(control, EventPhase::Long, 127));
        }
    }

    fn refresh_leds(&mut self) {
        self.dispatcher.render(&mut self.leds);
        for index in 0..LaunchpadMapping::SCENE_CCS.len() {
            let color = self.dispatcher.button_color(ButtonId::Scene(index as u8));
            self.leds
                .set_button(LaunchpadMapping::SCENE_CCS[index], color);
        }
        self.flush_leds();
    }

    fn flush_leds(&mut self) {
        if let Some(ref mut output) = self.midi_output {
            for message in self.leds.take_dirty_messages() {
                let _ = output.send(&message);
            }
        }
    }

    /// Run until Ctrl-C. Saves the surface config on the way out.
    pub async fn run(&mut self) -> Result<(), ModuleError> {
        info!("launchpad module running");

        let mut midi_rx = self.midi_rx.take();
        let mut schedule_rx = self.schedule_rx.take();
        let (due_tx, mut due_rx) = mpsc::unbounded_channel::<Task>();

        let mut led_interval = tokio::time::interval(LED_REFRESH);
        let mut long_interval = tokio::time::interval(LONG_PRESS_POLL);

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = &mut ctrl_c => {
                    info!("shutdown requested");
                    break;
                }

                Some(message) = async {
                    match midi_rx {
                        Some(ref mut rx) => rx.recv().await,
                        None => std::future::pending().await,
                    }
                } => {
                    self.handle_raw_midi(&message);
                }

                Some((task, delay)) = async {
                    match schedule_rx {
                        Some(ref mut rx) => rx.recv().await,
                        None => std::future::pending().await,
                    }
                } => {
                    let due_tx = due_tx.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = due_tx.send(task);
                    });
                }

                Some(task) = due_rx.recv() => {
                    if let Err(e) = self.dispatcher.handle_task(task) {
                        warn!("task failed: {e}");
                    }
                }

                _ = led_interval.tick() => {
                    self.refresh_leds();
                }

                _ = long_interval.tick() => {
                    self.fire_long_presses();
                }
            }
        }

        self.shutdown();
        Ok(())
    }

    fn shutdown(&mut self) {
        if let Err(e) = self.dispatcher.config().save(&self.config_path) {
            warn!("failed to save config: {e}");
        }

        let messages = self.leds.blackout();
        if let Some(ref mut output) = self.midi_output {
            for message in messages {
                let _ = output.send(&message);
            }
        }

        self.midi_input = None;
        self.midi_output = None;
        info!("launchpad module stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridctl_core::{LocalSession, ShiftState};

    fn test_dispatcher() -> Dispatcher {
        let (schedule_tx, _schedule_rx) = mpsc::unbounded_channel();
        let shared = Arc::new(Mutex::new(SurfaceState::new(schedule_tx)));
        build_dispatcher(
            Box::new(LocalSession::new()),
            Box::new(SharedSurface(shared)),
            Box::new(LogDisplay),
            SurfaceConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn dispatcher_starts_in_the_session_view() {
        let dispatcher = test_dispatcher();
        assert_eq!(dispatcher.active_view_name(), Some(views::SESSION));
        assert_eq!(dispatcher.active_mode_name(), Some(modes::VOLUME));
        assert_eq!(dispatcher.shift_state(), ShiftState::Idle);
    }

    #[test]
    fn tempo_button_toggles_the_overlay() {
        let mut dispatcher = test_dispatcher();
        dispatcher
            .handle_event(InputEvent::button(ButtonId::Tempo, EventPhase::Down))
            .unwrap();
        assert_eq!(dispatcher.active_view_name(), Some(views::TEMPO));
        assert!(!dispatcher.is_view_active(views::SESSION));

        dispatcher
            .handle_event(InputEvent::button(ButtonId::Tempo, EventPhase::Up))
            .unwrap();
        dispatcher
            .handle_event(InputEvent::button(ButtonId::Tempo, EventPhase::Down))
            .unwrap();
        assert_eq!(dispatcher.active_view_name(), Some(views::SESSION));
    }

    #[test]
    fn scheduled_tasks_cross_the_channel() {
        let (schedule_tx, mut schedule_rx) = mpsc::unbounded_channel();
        let shared = Arc::new(Mutex::new(SurfaceState::new(schedule_tx)));
        let mut surface = SharedSurface(shared);

        surface.schedule_task(Task::Notify("hello".to_string()), Duration::from_millis(5));
        let (task, delay) = schedule_rx.try_recv().unwrap();
        assert_eq!(task, Task::Notify("hello".to_string()));
        assert_eq!(delay, Duration::from_millis(5));
    }

    #[test]
    fn consumed_triggers_are_taken_once() {
        let (schedule_tx, _rx) = mpsc::unbounded_channel();
        let shared = Arc::new(Mutex::new(SurfaceState::new(schedule_tx)));
        let mut surface = SharedSurface(shared);

        let control = ControlId::Button(ButtonId::Shift);
        assert!(!surface.take_trigger_consumed(control));
        surface.set_trigger_consumed(control);
        assert!(surface.take_trigger_consumed(control));
        assert!(!surface.take_trigger_consumed(control));
    }
}
