//! Entity module - characters and projectiles
//!
//! Characters and the projectiles they fire are the same type. An entity
//! owns a square sprite whose side length follows its maximum HP, takes
//! damage as background-coloured "wounds" punched into that sprite, and
//! fires projectiles out of the edge nearest its target.
//!
//! An entity never touches the registry itself: [`Entity::launch`] hands the
//! new projectile back to the caller ([`crate::World`]), which assigns it an
//! id and records it with [`Entity::track`].

use std::collections::BTreeSet;
use std::fmt;

use arrayvec::ArrayVec;
use log::{debug, warn};

use crate::error::{non_negative_damage, non_negative_speed, positive_hp, EntityError};
use crate::geometry::{direction, nearest_edge};
use crate::rng::SimpleRng;
use crate::surface::{Canvas, Surface};
use crate::types::{
    death_burst_lifetime, sprite_size, DVec2, Rgb, BACKGROUND, BASE_DAMAGE, BASE_HP, BASE_SIZE,
    BASE_SPEED, BULLET_SPEED, DEATH_BURST_MARGIN, DEATH_BURST_MAX, DEATH_BURST_MIN,
};

/// Registry handle of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Construction parameters. Stats are factors of the `BASE_*` multipliers.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityParams {
    pub name: String,
    pub speed: f64,
    pub damage: f64,
    pub hp: f64,
    pub colour: Rgb,
    pub position: DVec2,
    pub melee: bool,
    /// Frames until forced expiry; `None` lives forever.
    pub lifetime: Option<u32>,
}

impl EntityParams {
    pub fn new(name: impl Into<String>, hp: f64) -> Self {
        Self {
            name: name.into(),
            speed: 1.0,
            damage: 1.0,
            hp,
            colour: Rgb::new(255, 255, 255),
            position: DVec2::ZERO,
            melee: false,
            lifetime: None,
        }
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_damage(mut self, damage: f64) -> Self {
        self.damage = damage;
        self
    }

    pub fn with_colour(mut self, colour: Rgb) -> Self {
        self.colour = colour;
        self
    }

    pub fn with_position(mut self, position: DVec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_melee(mut self, melee: bool) -> Self {
        self.melee = melee;
        self
    }

    pub fn with_lifetime(mut self, lifetime: Option<u32>) -> Self {
        self.lifetime = lifetime;
        self
    }
}

/// Observable lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityState {
    /// Alive with no projectiles in flight
    Idle,
    /// Alive with at least one projectile in flight
    Attacking,
    /// HP reached zero; explodes and leaves the registry this frame
    Dead,
    /// Lifetime exhausted; leaves the registry this frame
    Expired,
}

/// Terminal state reached during [`Entity::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fate {
    Dead,
    Expired,
}

/// What a single [`Entity::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Alive,
    Died,
    Expired,
}

/// Result of [`Entity::wound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WoundOutcome {
    /// Zero damage, or the entity is already leaving; nothing changed
    Ignored,
    /// A `size`x`size` hole was punched at `(x, y)`
    Placed { x: u32, y: u32, size: u32 },
    /// The wound would cover the whole sprite; HP dropped to zero
    Lethal,
}

/// A projectile in flight, as seen by the entity that fired it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiredProjectile {
    pub id: EntityId,
    /// Unit-length (or zero) step direction
    pub velocity: DVec2,
    pub slot: u32,
}

/// A freshly built projectile waiting to be registered.
#[derive(Debug, Clone)]
pub struct Launch {
    pub projectile: Entity,
    pub velocity: DVec2,
    pub slot: u32,
}

#[derive(Debug, Clone)]
pub struct Entity {
    name: String,
    speed: u32,
    damage: u32,
    max_hp: u32,
    current_hp: u32,
    size: u32,
    colour: Rgb,
    surface: Surface,
    position: DVec2,
    melee: bool,
    attacking: bool,
    lifetime: Option<u32>,
    current_life: u32,
    fired: Vec<FiredProjectile>,
    slots_used: BTreeSet<u32>,
    fate: Option<Fate>,
}

impl Entity {
    /// Build an entity, rejecting non-finite, negative or zero-HP factors.
    pub fn new(params: EntityParams) -> Result<Self, EntityError> {
        let speed = scaled(non_negative_speed(params.speed)?, BASE_SPEED);
        let damage = scaled(non_negative_damage(params.damage)?, BASE_DAMAGE);
        let max_hp = scaled(positive_hp(params.hp)?, BASE_HP);
        let position = DVec2::new(
            crate::error::finite("position.x", params.position.x)?,
            crate::error::finite("position.y", params.position.y)?,
        );
        let size = sprite_size(max_hp as f64);

        Ok(Self {
            name: params.name,
            speed,
            damage,
            max_hp,
            current_hp: max_hp,
            size,
            colour: params.colour,
            surface: Surface::new(size, size, params.colour),
            position,
            melee: params.melee,
            attacking: false,
            lifetime: params.lifetime,
            current_life: 0,
            fired: Vec::new(),
            slots_used: BTreeSet::new(),
            fate: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn damage(&self) -> u32 {
        self.damage
    }

    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    pub fn current_hp(&self) -> u32 {
        self.current_hp
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn colour(&self) -> Rgb {
        self.colour
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn melee(&self) -> bool {
        self.melee
    }

    /// Whether this entity, as a projectile, may damage others.
    pub fn is_attacking(&self) -> bool {
        self.attacking
    }

    pub fn lifetime(&self) -> Option<u32> {
        self.lifetime
    }

    pub fn current_life(&self) -> u32 {
        self.current_life
    }

    pub fn fired(&self) -> &[FiredProjectile] {
        &self.fired
    }

    pub fn slots_used(&self) -> &BTreeSet<u32> {
        &self.slots_used
    }

    pub fn fate(&self) -> Option<Fate> {
        self.fate
    }

    pub fn is_alive(&self) -> bool {
        self.fate.is_none()
    }

    pub fn state(&self) -> EntityState {
        match self.fate {
            Some(Fate::Dead) => EntityState::Dead,
            Some(Fate::Expired) => EntityState::Expired,
            None if self.fired.is_empty() => EntityState::Idle,
            None => EntityState::Attacking,
        }
    }

    /// Edge midpoints (top, right, bottom, left) in absolute coordinates.
    pub fn edge_midpoints(&self) -> [DVec2; 4] {
        crate::geometry::edge_midpoints(self.position, self.size)
    }

    pub fn set_speed(&mut self, factor: f64) -> Result<(), EntityError> {
        self.speed = scaled(non_negative_speed(factor)?, BASE_SPEED);
        Ok(())
    }

    pub fn increment_speed(&mut self) {
        self.speed = (self.speed as f64 + BASE_SPEED).ceil() as u32;
    }

    pub fn set_damage(&mut self, factor: f64) -> Result<(), EntityError> {
        self.damage = scaled(non_negative_damage(factor)?, BASE_DAMAGE);
        Ok(())
    }

    pub fn increment_damage(&mut self) {
        self.damage = (self.damage as f64 + BASE_DAMAGE).ceil() as u32;
    }

    /// Change maximum HP; the sprite is rescaled to the new size.
    pub fn set_max_hp(&mut self, factor: f64) -> Result<(), EntityError> {
        let max_hp = scaled(positive_hp(factor)?, BASE_HP);
        self.resize_for(max_hp);
        Ok(())
    }

    pub fn increment_max_hp(&mut self) {
        let max_hp = (self.max_hp as f64 + BASE_HP).ceil() as u32;
        self.resize_for(max_hp);
    }

    /// Set current HP from a factor, clamped into `[0, max_hp]`.
    pub fn set_current_hp(&mut self, factor: f64) -> Result<(), EntityError> {
        let factor = crate::error::finite("hp", factor)?;
        let hp = (factor * BASE_HP).ceil().max(0.0);
        self.current_hp = if hp >= self.max_hp as f64 {
            self.max_hp
        } else {
            hp as u32
        };
        Ok(())
    }

    pub fn increment_current_hp(&mut self) {
        let hp = (self.current_hp as f64 + BASE_HP).ceil() as u32;
        self.current_hp = hp.min(self.max_hp);
    }

    /// Recolour the sprite, leaving wounds untouched.
    pub fn set_colour(&mut self, colour: Rgb) {
        self.surface.recolour_except(BACKGROUND, colour);
        self.colour = colour;
    }

    pub fn set_position(&mut self, position: DVec2) {
        self.position = position;
    }

    pub fn set_melee(&mut self, melee: bool) {
        self.melee = melee;
    }

    pub fn toggle_melee(&mut self) {
        self.melee = !self.melee;
    }

    pub fn set_attacking(&mut self, attacking: bool) {
        self.attacking = attacking;
    }

    pub fn set_lifetime(&mut self, lifetime: Option<u32>) {
        self.lifetime = lifetime;
    }

    fn resize_for(&mut self, max_hp: u32) {
        self.max_hp = max_hp;
        self.current_hp = self.current_hp.min(max_hp);
        let size = sprite_size(max_hp as f64);
        if size != self.size {
            self.surface = self.surface.scaled(size, size);
            self.size = size;
        }
    }

    /// Move `speed` pixels along `direction_vector`. A zero vector is a no-op.
    pub fn step(&mut self, direction_vector: DVec2) {
        let unit = direction(direction_vector);
        if unit == DVec2::ZERO {
            return;
        }
        self.set_position(self.position + unit * self.speed as f64);
    }

    /// Move one step toward `destination`.
    pub fn step_toward(&mut self, destination: DVec2) {
        self.step(destination - self.position);
    }

    /// Take `damage` points, punching a proportional hole into the sprite.
    ///
    /// The hole's side length is chosen so that its area relative to the
    /// sprite roughly matches `damage / max_hp`. A hole that would cover the
    /// whole sprite is lethal and nothing is drawn. Otherwise up to `size`
    /// retries look for a spot that does not overlap an earlier wound; when
    /// they run out the last drawn spot is used.
    pub fn wound(&mut self, damage: u32, rng: &mut SimpleRng) -> WoundOutcome {
        if damage == 0 || self.fate.is_some() {
            return WoundOutcome::Ignored;
        }

        let scale = (self.max_hp as f64 / damage as f64).sqrt();
        let wound_size = (damage as f64 * BASE_SIZE * scale).ceil() as u32;

        if wound_size >= self.size {
            self.current_hp = 0;
            debug!("{} took {} damage: lethal", self.name, damage);
            return WoundOutcome::Lethal;
        }

        let span = (self.size - wound_size) as i64;
        let mut retries = 0u32;
        let (x, y) = loop {
            let x = rng.range_inclusive(0, span) as u32;
            let y = rng.range_inclusive(0, span) as u32;
            let overlaps = self
                .surface
                .region(x, y, wound_size, wound_size)
                .is_some_and(|r| r.contains(BACKGROUND));
            if !overlaps {
                break (x, y);
            }
            retries += 1;
            if retries > self.size {
                break (x, y);
            }
        };

        self.surface
            .fill_rect(x, y, wound_size, wound_size, BACKGROUND);
        self.current_hp = self.current_hp.saturating_sub(damage);
        debug!(
            "{} took {} damage: {}px wound at ({}, {}), hp {}/{}",
            self.name, damage, wound_size, x, y, self.current_hp, self.max_hp
        );
        WoundOutcome::Placed {
            x,
            y,
            size: wound_size,
        }
    }

    /// Build a projectile aimed at `target`.
    ///
    /// Melee entities only produce projectiles for a death burst. The
    /// projectile carries this entity's damage (as a factor) and an HP factor
    /// of the same value (at least one hit point), starts just outside the edge nearest `target`, and
    /// travels along the unit vector from its spawn point to `target`. Burst
    /// particles are harmless and expire after `DEATH_DISTANCE` worth of
    /// frames.
    pub fn launch(&mut self, target: DVec2, death_burst: bool) -> Option<Launch> {
        if self.melee && !death_burst {
            return None;
        }

        let slot = self.lowest_free_slot();
        let factor = self.damage as f64 / BASE_DAMAGE;
        // A harmless owner still fires a 1 hp, 1x1 projectile.
        let hp_factor = factor.max(1.0 / BASE_HP);
        let projectile_size = sprite_size(scaled(hp_factor, BASE_HP) as f64);

        let edge = nearest_edge(self.position, self.size, target);
        let origin = edge.spawn_origin(edge.midpoint(self.position, self.size), projectile_size);

        let lifetime = death_burst.then(death_burst_lifetime);
        let params = EntityParams::new(format!("{}Bullet{}", self.name, slot), hp_factor)
            .with_speed(BULLET_SPEED)
            .with_damage(factor)
            .with_colour(self.colour)
            .with_position(origin)
            .with_melee(true)
            .with_lifetime(lifetime);

        let mut projectile = match Entity::new(params) {
            Ok(p) => p,
            Err(err) => {
                warn!("{} cannot fire: {}", self.name, err);
                return None;
            }
        };
        projectile.set_attacking(!death_burst);
        self.slots_used.insert(slot);

        Some(Launch {
            projectile,
            velocity: direction(target - origin),
            slot,
        })
    }

    /// Record a registered projectile so [`crate::World`] steps it every frame.
    pub fn track(&mut self, fired: FiredProjectile) {
        self.slots_used.insert(fired.slot);
        self.fired.push(fired);
    }

    /// Drop projectiles that left the registry and release their slots.
    pub fn forget_fired(&mut self, mut gone: impl FnMut(EntityId) -> bool) {
        let slots_used = &mut self.slots_used;
        self.fired.retain(|f| {
            if gone(f.id) {
                slots_used.remove(&f.slot);
                false
            } else {
                true
            }
        });
    }

    /// Hand over every projectile in flight (used when this entity leaves).
    pub fn take_fired(&mut self) -> Vec<FiredProjectile> {
        self.slots_used.clear();
        std::mem::take(&mut self.fired)
    }

    fn lowest_free_slot(&self) -> u32 {
        let mut slot = 0;
        for &used in &self.slots_used {
            if used != slot {
                break;
            }
            slot += 1;
        }
        slot
    }

    /// Advance one frame: count life, then detect death or expiry.
    ///
    /// A terminal transition is reported once; later ticks return `Alive`
    /// without touching the entity.
    pub fn tick(&mut self) -> Transition {
        if self.fate.is_some() {
            return Transition::Alive;
        }
        self.current_life = self.current_life.saturating_add(1);

        if self.current_hp == 0 {
            self.fate = Some(Fate::Dead);
            return Transition::Died;
        }
        if self.lifetime.is_some_and(|life| self.current_life >= life) {
            self.surface.fill(BACKGROUND);
            self.fate = Some(Fate::Expired);
            return Transition::Expired;
        }
        Transition::Alive
    }

    /// Blank the sprite (explosion or expiry).
    pub fn clear_surface(&mut self) {
        self.surface.fill(BACKGROUND);
    }

    /// Random aim points for a death burst: 4 to 12 points within a small
    /// margin around the bounding box.
    pub fn death_burst_targets(
        &self,
        rng: &mut SimpleRng,
    ) -> ArrayVec<DVec2, { DEATH_BURST_MAX as usize }> {
        let count = rng.range_inclusive(DEATH_BURST_MIN as i64, DEATH_BURST_MAX as i64);
        let x = self.position.x.floor() as i64;
        let y = self.position.y.floor() as i64;
        let margin = DEATH_BURST_MARGIN as i64;
        let extent = self.size as i64 + margin;

        let mut targets = ArrayVec::new();
        for _ in 0..count {
            let tx = rng.range_inclusive(x - margin, x + extent);
            let ty = rng.range_inclusive(y - margin, y + extent);
            targets.push(DVec2::new(tx as f64, ty as f64));
        }
        targets
    }

    /// Draw the sprite at the entity's position.
    pub fn render(&self, canvas: &mut (impl Canvas + ?Sized)) {
        canvas.blit(
            &self.surface,
            self.position.x.floor() as i32,
            self.position.y.floor() as i32,
        );
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Speed: {}", self.speed)?;
        writeln!(f, "Damage: {}", self.damage)?;
        writeln!(f, "MaxHP: {}", self.max_hp)?;
        writeln!(f, "CurrentHP: {}", self.current_hp)?;
        write!(f, "Size: {}", self.size)
    }
}

fn scaled(factor: f64, base: f64) -> u32 {
    (factor * base).ceil() as u32
}
