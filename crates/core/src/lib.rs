//! Core simulation module - pure, deterministic, and testable
//!
//! This crate contains the whole skirmish simulation: entities, their
//! sprites, wounds, projectiles and the registry that drives them frame by
//! frame. It has no dependency on terminals or input devices, making it:
//!
//! - **Deterministic**: Same seed produces identical wounds and bursts
//! - **Testable**: Every state transition can be driven from a unit test
//! - **Portable**: Any [`Canvas`] can receive the rendered sprites
//!
//! # Module Structure
//!
//! - [`entity`]: Characters and projectiles (one type), wounds, launches
//! - [`world`]: Entity registry with snapshot updates and deferred removal
//! - [`surface`]: Pixel grids, sub-region views and the [`Canvas`] seam
//! - [`geometry`]: Edge midpoints and projectile spawn offsets
//! - [`rng`]: Seeded LCG shared by every random decision
//! - [`error`]: Construction-time validation errors
//!
//! # Example
//!
//! ```
//! use tui_skirmish_core::{Entity, EntityParams, SimpleRng, World, WoundOutcome};
//!
//! let mut world = World::new();
//! let mut rng = SimpleRng::new(12345);
//!
//! // hp factor 10 => 100 HP => 10x10 sprite
//! let id = world.spawn(Entity::new(EntityParams::new("Jeremy", 10.0)).unwrap());
//!
//! // Half the HP carves an 8x8 hole.
//! let outcome = world.wound(id, 50, &mut rng).unwrap();
//! assert!(matches!(outcome, WoundOutcome::Placed { size: 8, .. }));
//! assert_eq!(world.get(id).unwrap().current_hp(), 50);
//!
//! // The rest kills it; the next update explodes and removes it.
//! world.wound(id, 50, &mut rng);
//! let report = world.update(&mut rng);
//! assert_eq!(report.removed, vec![id]);
//! assert!(!report.spawned.is_empty());
//! ```

pub mod entity;
pub mod error;
pub mod geometry;
pub mod rng;
pub mod surface;
pub mod world;

pub use tui_skirmish_types as types;

// Re-export commonly used types for convenience
pub use entity::{
    Entity, EntityId, EntityParams, EntityState, Fate, FiredProjectile, Launch, Transition,
    WoundOutcome,
};
pub use error::EntityError;
pub use geometry::{edge_midpoints, nearest_edge, Edge};
pub use rng::SimpleRng;
pub use surface::{Canvas, Region, Surface};
pub use world::{UpdateReport, World};
