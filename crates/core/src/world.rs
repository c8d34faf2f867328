//! World module - the entity registry
//!
//! The [`World`] owns every live entity in spawn order. One call to
//! [`World::update`] advances the whole simulation by a frame:
//!
//! 1. The ids of live entities are snapshotted.
//! 2. Each entity in the snapshot ticks, then its projectiles step along
//!    their stored velocities. Deaths explode into a burst of particles.
//! 3. Entities that died or expired are swept out; projectiles they still
//!    had in flight are adopted by the world and keep moving.
//!
//! Entities spawned during the pass are appended to the registry but first
//! update on the next frame, and removal happens only in the sweep, so no
//! entity is skipped, updated twice or removed twice.

use log::{debug, info};

use crate::entity::{Entity, EntityId, FiredProjectile, Transition, WoundOutcome};
use crate::rng::SimpleRng;
use crate::surface::Canvas;
use crate::types::DVec2;

/// What happened during one [`World::update`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    pub died: Vec<EntityId>,
    pub expired: Vec<EntityId>,
    pub spawned: Vec<EntityId>,
    pub removed: Vec<EntityId>,
}

#[derive(Debug, Clone, Default)]
pub struct World {
    entities: Vec<(EntityId, Entity)>,
    /// Projectiles whose owner has left the registry
    strays: Vec<FiredProjectile>,
    next_id: u64,
    frame: u64,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity and return its id.
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        debug!("spawn {} {}", id, entity.name());
        self.entities.push((id, entity));
        id
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Frames advanced so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index_of(id).map(|i| &self.entities[i].1)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.index_of(id).map(move |i| &mut self.entities[i].1)
    }

    /// Registered entities in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities.iter().map(|(id, e)| (*id, e))
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.iter().map(|(id, _)| *id).collect()
    }

    pub fn strays(&self) -> &[FiredProjectile] {
        &self.strays
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.iter().position(|(eid, _)| *eid == id)
    }

    /// Wound an entity. Returns `None` if the id is not registered.
    pub fn wound(&mut self, id: EntityId, damage: u32, rng: &mut SimpleRng) -> Option<WoundOutcome> {
        self.get_mut(id).map(|e| e.wound(damage, rng))
    }

    /// Fire one projectile from `caster` toward `target`.
    ///
    /// Returns the projectile's id, or `None` when the caster is unknown,
    /// already leaving, or melee.
    pub fn attack(&mut self, caster: EntityId, target: DVec2) -> Option<EntityId> {
        self.launch(caster, target, false)
    }

    fn launch(&mut self, caster: EntityId, target: DVec2, death_burst: bool) -> Option<EntityId> {
        let pid = EntityId(self.next_id);
        let owner = self.get_mut(caster)?;
        if !death_burst && !owner.is_alive() {
            return None;
        }
        let launch = owner.launch(target, death_burst)?;
        owner.track(FiredProjectile {
            id: pid,
            velocity: launch.velocity,
            slot: launch.slot,
        });
        self.spawn(launch.projectile);
        Some(pid)
    }

    /// Advance every live entity by one frame.
    pub fn update(&mut self, rng: &mut SimpleRng) -> UpdateReport {
        let mut report = UpdateReport::default();
        let first_new = self.next_id;
        let snapshot: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|(_, e)| e.is_alive())
            .map(|(id, _)| *id)
            .collect();

        for id in snapshot {
            let Some(entity) = self.get_mut(id) else {
                continue;
            };
            let transition = entity.tick();
            let in_flight: Vec<(EntityId, DVec2)> =
                entity.fired().iter().map(|f| (f.id, f.velocity)).collect();

            for (pid, velocity) in in_flight {
                if let Some(projectile) = self.get_mut(pid) {
                    if projectile.is_alive() {
                        projectile.step(velocity);
                    }
                }
            }

            match transition {
                Transition::Alive => {}
                Transition::Died => {
                    self.explode(id, rng);
                    report.died.push(id);
                }
                Transition::Expired => {
                    debug!("{} expired", id);
                    report.expired.push(id);
                }
            }
        }

        for i in 0..self.strays.len() {
            let FiredProjectile { id, velocity, .. } = self.strays[i];
            if let Some(projectile) = self.get_mut(id) {
                if projectile.is_alive() {
                    projectile.step(velocity);
                }
            }
        }

        report.spawned = self
            .entities
            .iter()
            .map(|(id, _)| *id)
            .filter(|id| id.0 >= first_new)
            .collect();
        self.sweep(&mut report);
        self.frame += 1;
        report
    }

    /// Blank the sprite and scatter a death burst around it.
    fn explode(&mut self, id: EntityId, rng: &mut SimpleRng) {
        let Some(entity) = self.get_mut(id) else {
            return;
        };
        entity.clear_surface();
        let targets = entity.death_burst_targets(rng);
        info!("{} died, bursting into {} pieces", entity.name(), targets.len());
        for target in targets {
            self.launch(id, target, true);
        }
    }

    /// Remove dead and expired entities.
    fn sweep(&mut self, report: &mut UpdateReport) {
        if self.entities.iter().all(|(_, e)| e.is_alive()) {
            return;
        }

        let (kept, departed): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entities)
            .into_iter()
            .partition(|(_, e)| e.is_alive());
        self.entities = kept;

        for (id, mut entity) in departed {
            debug!("sweep {} {}", id, entity.name());
            self.strays.extend(entity.take_fired());
            report.removed.push(id);
        }

        let removed = &report.removed;
        for (_, owner) in self.entities.iter_mut() {
            owner.forget_fired(|pid| removed.contains(&pid));
        }
        self.strays.retain(|f| !removed.contains(&f.id));
    }

    /// Draw every registered entity once, in spawn order.
    pub fn render(&self, canvas: &mut (impl Canvas + ?Sized)) {
        for (_, entity) in &self.entities {
            entity.render(canvas);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityParams, EntityState};
    use crate::surface::Surface;
    use crate::types::{death_burst_lifetime, Rgb, BACKGROUND};

    fn gunner(world: &mut World) -> EntityId {
        let e = Entity::new(
            EntityParams::new("Gun", 10.0)
                .with_damage(2.0)
                .with_colour(Rgb::new(0, 255, 0))
                .with_position(DVec2::new(20.0, 20.0)),
        )
        .unwrap();
        world.spawn(e)
    }

    #[test]
    fn attack_registers_projectile_and_tracks_it() {
        let mut world = World::new();
        let gun = gunner(&mut world);

        let pid = world.attack(gun, DVec2::new(100.0, 25.0)).unwrap();
        assert_eq!(world.len(), 2);
        assert_eq!(world.get(gun).unwrap().state(), EntityState::Attacking);
        assert_eq!(world.get(gun).unwrap().fired()[0].id, pid);
        assert!(world.get(pid).unwrap().is_attacking());
    }

    #[test]
    fn projectiles_move_once_per_frame() {
        let mut world = World::new();
        let mut rng = SimpleRng::new(1);
        let gun = gunner(&mut world);
        let pid = world.attack(gun, DVec2::new(1000.0, 25.0)).unwrap();
        let start = world.get(pid).unwrap().position();

        world.update(&mut rng);
        let after = world.get(pid).unwrap().position();
        assert!((after.distance(start) - 1.0).abs() < 1e-9);
        assert_eq!(world.get(pid).unwrap().current_life(), 1);
    }

    #[test]
    fn death_explodes_and_removes_exactly_once() {
        let mut world = World::new();
        let mut rng = SimpleRng::new(3);
        let gun = gunner(&mut world);

        world.wound(gun, 1000, &mut rng);
        let report = world.update(&mut rng);

        assert_eq!(report.died, vec![gun]);
        assert_eq!(report.removed, vec![gun]);
        assert!(!world.contains(gun));

        let burst = report.spawned.len();
        assert!((4..=12).contains(&burst), "burst size {}", burst);
        assert_eq!(world.len(), burst);
        assert_eq!(world.strays().len(), burst);
        for (_, p) in world.iter() {
            assert!(!p.is_attacking());
            assert_eq!(p.lifetime(), Some(death_burst_lifetime()));
        }

        let report = world.update(&mut rng);
        assert!(report.died.is_empty());
        assert!(report.removed.is_empty());
    }

    #[test]
    fn orphaned_burst_keeps_moving() {
        let mut world = World::new();
        let mut rng = SimpleRng::new(8);
        let gun = gunner(&mut world);
        world.wound(gun, 1000, &mut rng);
        world.update(&mut rng);

        let before: Vec<DVec2> = world.iter().map(|(_, e)| e.position()).collect();
        world.update(&mut rng);
        let after: Vec<DVec2> = world.iter().map(|(_, e)| e.position()).collect();
        let moved = before
            .iter()
            .zip(&after)
            .filter(|(a, b)| a.distance(**b) > 0.5)
            .count();
        // A particle aimed exactly at its own spawn point has zero velocity.
        assert!(moved + 1 >= before.len());
    }

    #[test]
    fn expired_projectiles_leave_and_free_their_slot() {
        let mut world = World::new();
        let mut rng = SimpleRng::new(1);
        let gun = gunner(&mut world);
        let pid = world.attack(gun, DVec2::new(100.0, 25.0)).unwrap();
        world.get_mut(pid).unwrap().set_lifetime(Some(2));

        let report = world.update(&mut rng);
        assert!(report.expired.is_empty());
        let report = world.update(&mut rng);
        assert_eq!(report.expired, vec![pid]);
        assert_eq!(report.removed, vec![pid]);
        assert!(!world.contains(pid));

        let owner = world.get(gun).unwrap();
        assert!(owner.fired().is_empty());
        assert!(owner.slots_used().is_empty());
        assert_eq!(owner.state(), EntityState::Idle);
    }

    #[test]
    fn spawned_this_frame_waits_for_next_update() {
        let mut world = World::new();
        let mut rng = SimpleRng::new(2);
        let gun = gunner(&mut world);
        world.wound(gun, 1000, &mut rng);
        let report = world.update(&mut rng);

        for id in report.spawned {
            assert_eq!(world.get(id).unwrap().current_life(), 0);
        }
    }

    #[test]
    fn render_blits_each_entity() {
        let mut world = World::new();
        let gun = gunner(&mut world);
        world.attack(gun, DVec2::new(100.0, 25.0));

        let mut frame = Surface::new(64, 64, BACKGROUND);
        world.render(&mut frame);
        // 10x10 caster plus a 2x2 projectile.
        assert_eq!(frame.count(Rgb::new(0, 255, 0)), 104);
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut world = World::new();
        let mut rng = SimpleRng::new(1);
        assert!(world.attack(EntityId(42), DVec2::ZERO).is_none());
        assert!(world.wound(EntityId(42), 5, &mut rng).is_none());
    }
}
