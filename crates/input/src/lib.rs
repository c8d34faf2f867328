//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` events into [`crate::types::InputEvent`] and drains them
//! without blocking, once per frame, through [`TerminalInput`].

pub mod handler;
pub mod map;

pub use tui_skirmish_engine as engine;
pub use tui_skirmish_types as types;

pub use handler::TerminalInput;
pub use map::{handle_key_event, map_event, should_quit};
