//! Terminal front-end for the skirmish simulation.
//!
//! Rendering goes arena pixels -> cells -> escape sequences:
//! - entities blit into a pixel [`core::Surface`] owned by [`TerminalDisplay`]
//! - [`SceneView`] packs two pixel rows into each terminal row with half blocks
//! - [`TerminalRenderer`] diffs cells against the previous frame and flushes
//!
//! Everything except the renderer's `enter`/`exit`/`draw_swap` is pure and
//! unit-tested.

pub mod display;
pub mod fb;
pub mod renderer;
pub mod scene_view;

pub use tui_skirmish_core as core;
pub use tui_skirmish_engine as engine;
pub use tui_skirmish_types as types;

pub use display::TerminalDisplay;
pub use fb::{Cell, CellBuffer, CellStyle};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
pub use scene_view::SceneView;
