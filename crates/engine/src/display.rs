//! The seam between the simulation and whatever shows it.
//!
//! A [`Display`] is a [`Canvas`] the frame loop clears and blits into, plus a
//! `present` step that pushes the finished frame out. An [`InputSource`]
//! hands over the discrete input events that arrived since the last frame.

use anyhow::Result;
use arrayvec::ArrayVec;

use crate::core::Canvas;
use crate::types::InputEvent;

/// Most input events consumed in a single frame; extras wait for the next one.
pub const MAX_EVENTS_PER_FRAME: usize = 32;

/// Input events drained for one frame.
pub type EventBatch = ArrayVec<InputEvent, MAX_EVENTS_PER_FRAME>;

/// HUD summary of the player character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerStatus {
    pub name: String,
    pub current_hp: u32,
    pub max_hp: u32,
    pub size: u32,
    pub melee: bool,
}

/// Per-frame information handed to [`Display::present`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrameStatus {
    pub frame: u64,
    pub entities: usize,
    pub player: Option<PlayerStatus>,
}

pub trait Display: Canvas {
    /// Drawable area in pixels.
    fn size(&self) -> (u32, u32);

    /// Push the composed frame to the screen.
    fn present(&mut self, status: &FrameStatus) -> Result<()>;
}

pub trait InputSource {
    /// Drain pending events without blocking.
    fn poll_events(&mut self) -> Result<EventBatch>;
}
