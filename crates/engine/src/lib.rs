//! Frame loop and display/input seam.
//!
//! [`Session`] owns the registry, the RNG and the player, and runs one frame
//! at a time against any [`Display`] and [`InputSource`]. The terminal
//! front-end lives in `tui-skirmish-term` / `tui-skirmish-input`; tests use
//! headless implementations.

pub mod config;
pub mod display;
pub mod session;

pub use tui_skirmish_core as core;
pub use tui_skirmish_types as types;

pub use config::SimConfig;
pub use display::{
    Display, EventBatch, FrameStatus, InputSource, PlayerStatus, MAX_EVENTS_PER_FRAME,
};
pub use session::{FrameFlow, Session};
