//! Non-blocking input drain for terminal environments.

use std::time::Duration;

use anyhow::Result;
use crossterm::event;

use crate::engine::{EventBatch, InputSource};
use crate::map::map_event;
use crate::types::InputEvent;

/// Reads pending crossterm events; never waits for new ones.
#[derive(Debug, Default)]
pub struct TerminalInput {
    _private: (),
}

impl TerminalInput {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InputSource for TerminalInput {
    fn poll_events(&mut self) -> Result<EventBatch> {
        let mut batch = EventBatch::new();
        while !batch.is_full() && event::poll(Duration::ZERO)? {
            match map_event(event::read()?) {
                InputEvent::Other => {}
                mapped => batch.push(mapped),
            }
        }
        Ok(batch)
    }
}
