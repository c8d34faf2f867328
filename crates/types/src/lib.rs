//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! Everything here is plain data (plus `glam` vectors), which makes it usable
//! from the simulation, the terminal front-end and the tests alike.
//!
//! # Stat Multipliers
//!
//! Entity stats are given as *factors* and scaled by a base multiplier:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `BASE_SPEED` | 1 | pixels per step for a speed factor of 1 |
//! | `BASE_DAMAGE` | 1 | damage for a damage factor of 1 |
//! | `BASE_HP` | 10 | hit points for an hp factor of 1 |
//! | `BASE_SIZE` | 0.1 | sprite side length (pixels) per hit point |
//!
//! Sprite size is derived from maximum HP: `size = ceil(BASE_SIZE * max_hp)`.
//!
//! # Projectiles
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `BULLET_SPEED` | 1 | speed factor of every projectile |
//! | `DEATH_DISTANCE` | 10000 | distance a death-burst particle travels before expiring |
//! | `DEATH_BURST_MIN`..`DEATH_BURST_MAX` | 4..=12 | particles spawned on death |
//! | `DEATH_BURST_MARGIN` | 5 | pixels around the bounding box that particles aim at |
//!
//! # Examples
//!
//! ```
//! use tui_skirmish_types::{death_burst_lifetime, sprite_size, SimAction, BASE_HP};
//!
//! // hp factor 10 => 100 hit points => 10x10 sprite
//! assert_eq!(sprite_size(10.0 * BASE_HP), 10);
//!
//! assert_eq!(death_burst_lifetime(), 10000);
//! assert_eq!(SimAction::from_str("fire"), Some(SimAction::Fire));
//! ```

pub use glam::DVec2;

/// Speed multiplier (pixels per step per speed factor)
pub const BASE_SPEED: f64 = 1.0;

/// Damage multiplier
pub const BASE_DAMAGE: f64 = 1.0;

/// Hit point multiplier
pub const BASE_HP: f64 = 10.0;

/// Ratio of sprite pixels to hit points
pub const BASE_SIZE: f64 = 0.1;

/// Speed factor used for every projectile
pub const BULLET_SPEED: f64 = 1.0;

/// Distance a death-burst particle travels before it expires
pub const DEATH_DISTANCE: f64 = 10000.0;

/// Fewest particles spawned by a death burst
pub const DEATH_BURST_MIN: u32 = 4;

/// Most particles spawned by a death burst
pub const DEATH_BURST_MAX: u32 = 12;

/// Margin (pixels) around the bounding box that death-burst particles aim at
pub const DEATH_BURST_MARGIN: i32 = 5;

/// Background colour; wounds are punched into sprites with this colour
pub const BACKGROUND: Rgb = Rgb::new(0, 0, 0);

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Upper bound (inclusive) of the random damage dealt by a test wound
pub const TEST_WOUND_MAX: u32 = 100;

/// Player defaults
pub const PLAYER_NAME: &str = "Jeremy";
pub const PLAYER_SPEED_FACTOR: f64 = 5.0;
pub const PLAYER_DAMAGE_FACTOR: f64 = 5.0;
pub const PLAYER_HP_FACTOR_MIN: u32 = 10;
pub const PLAYER_HP_FACTOR_MAX: u32 = 40;
pub const PLAYER_COLOUR: Rgb = Rgb::new(255, 0, 0);

/// Sprite side length in pixels for the given maximum HP.
pub fn sprite_size(max_hp: f64) -> u32 {
    (BASE_SIZE * max_hp).ceil() as u32
}

/// Number of frames a death-burst particle lives.
pub fn death_burst_lifetime() -> u32 {
    (DEATH_DISTANCE / BULLET_SPEED).ceil() as u32
}

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Actions a key press can trigger in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimAction {
    /// Deal a random amount of damage to the player
    Wound,
    /// Player fires a projectile at a random point
    Fire,
    /// Switch the player between melee and ranged
    ToggleMelee,
    /// Spawn a fresh player once the previous one is gone
    Respawn,
}

impl SimAction {
    /// Parse action from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_skirmish_types::SimAction;
    ///
    /// assert_eq!(SimAction::from_str("wound"), Some(SimAction::Wound));
    /// assert_eq!(SimAction::from_str("toggleMelee"), Some(SimAction::ToggleMelee));
    /// assert_eq!(SimAction::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "wound" => Some(SimAction::Wound),
            "fire" => Some(SimAction::Fire),
            "togglemelee" => Some(SimAction::ToggleMelee),
            "respawn" => Some(SimAction::Respawn),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SimAction::Wound => "wound",
            SimAction::Fire => "fire",
            SimAction::ToggleMelee => "toggleMelee",
            SimAction::Respawn => "respawn",
        }
    }
}

/// Discrete input event drained from the display once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A key was pressed and maps to an action
    Action(SimAction),
    /// The display area changed size (in pixels)
    Resize { width: u32, height: u32 },
    /// The user asked to leave
    Quit,
    /// Anything else; ignored
    Other,
}

/// Terminal rows reserved for the status line under the arena
pub const HUD_ROWS: u16 = 1;

/// Arena pixels stacked in one terminal row (upper/lower half blocks)
pub const PIXELS_PER_ROW: u32 = 2;

/// Arena size in pixels for a terminal of `cols`x`rows` cells.
pub fn arena_for_terminal(cols: u16, rows: u16) -> (u32, u32) {
    (
        cols as u32,
        rows.saturating_sub(HUD_ROWS) as u32 * PIXELS_PER_ROW,
    )
}
