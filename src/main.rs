//! Terminal skirmish runner (default binary).
//!
//! One player sprite sits in an arena that fills the terminal. Any key
//! wounds it, `f` fires, `m` toggles melee, `r` respawns after death and
//! `q` / Ctrl-C quits.

use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use log::info;

use tui_skirmish::engine::{Display, FrameFlow, InputSource, Session, SimConfig};
use tui_skirmish::input::TerminalInput;
use tui_skirmish::term::TerminalDisplay;
use tui_skirmish::types::InputEvent;

fn main() -> Result<()> {
    let config = SimConfig::from_env();
    tui_skirmish::logging::init(&config)?;
    info!("starting with seed {}", config.seed);

    let mut display = TerminalDisplay::from_terminal();
    display.enter()?;

    let result = run(config, &mut display);

    // Always try to restore terminal state.
    let _ = display.exit();
    result
}

fn run(config: SimConfig, display: &mut TerminalDisplay) -> Result<()> {
    let tick = Duration::from_millis(config.tick_ms() as u64);
    let (width, height) = display.size();
    let mut session = Session::new(config, width, height)?;
    let mut input = TerminalInput::new();

    loop {
        let frame_start = Instant::now();

        let events = input.poll_events()?;
        for event in &events {
            if let InputEvent::Resize { width, height } = *event {
                display.resize(width, height);
            }
        }
        if session.frame_with(&events, display)? == FrameFlow::Quit {
            info!("quit after {} frames", session.world().frame());
            return Ok(());
        }

        if let Some(rest) = tick.checked_sub(frame_start.elapsed()) {
            thread::sleep(rest);
        }
    }
}
