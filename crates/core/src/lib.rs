//! Device-independent dispatch framework for grid control surfaces.
//!
//! A control surface is driven by three layered pieces:
//! - **Views** own the pad grid and the named buttons; exactly one view is
//!   resolved at any time (a temporary overlay, else the active view).
//! - **Modes** own the multiplexed encoder.
//! - The **dispatcher** routes every incoming [`InputEvent`] to the resolved
//!   view or mode, runs the shift-overlay state machine, and drives
//!   full-frame LED rendering through the [`PadGrid`] sink.
//!
//! The DAW session, the physical transport and the LED/display hardware are
//! collaborators behind traits ([`SessionModel`], [`Surface`], [`PadGrid`],
//! [`Display`]); the framework never talks to a device directly.

pub use command::{Context, DispatchAction, TriggerCommand};
pub use config::{ConfigError, SurfaceConfig, NEW_CLIP_LENGTHS};
pub use dispatch::Dispatcher;
pub use error::SurfaceError;
pub use event::{ButtonId, ControlId, Direction, EventPhase, InputEvent, KnobId};
pub use model::{
    Application, ClipState, CursorTrack, LocalSession, RecordQuantization, Resolution, SceneBank,
    SessionModel, TrackBank, Transport,
};
pub use registry::{FeatureGroup, FeatureGroupManager, GroupKind, ModeManager, ViewManager};
pub use shift::{
    ShiftOverlayController, ShiftOverlaySettings, ShiftState, DEFAULT_TAP_THRESHOLD,
};
pub use surface::{Display, PadGrid, Surface, Task, GRID_FIRST_NOTE, GRID_LAST_NOTE};
pub use view::{Mode, View, BUTTON_COLOR_OFF};

mod command;
mod config;
mod dispatch;
mod error;
mod event;
mod model;
mod registry;
mod shift;
mod surface;
mod view;
