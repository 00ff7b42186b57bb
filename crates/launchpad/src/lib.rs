//! Launchpad-style grid controller bundle.
//!
//! Builds a full surface on top of `gridctl-core`: session/shift/tempo/
//! shuffle views, encoder modes, the trigger-command bindings, raw MIDI
//! translation, and the tokio module owning the MIDI connections, the LED
//! feedback buffer and delayed-task delivery.

pub mod colors;
pub mod commands;
pub mod led;
pub mod mapping;
pub mod modes;
pub mod module;
pub mod views;

pub use module::{build_dispatcher, LaunchpadModule, ModuleError};
