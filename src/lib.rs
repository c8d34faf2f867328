//! TUI Skirmish (workspace facade crate).
//!
//! Re-exports `tui_skirmish::{core,engine,input,term,types}` while the
//! implementation lives in dedicated crates under `crates/`.

pub mod logging;

pub use tui_skirmish_core as core;
pub use tui_skirmish_engine as engine;
pub use tui_skirmish_input as input;
pub use tui_skirmish_term as term;
pub use tui_skirmish_types as types;
