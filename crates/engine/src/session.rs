//! Session: one player, one registry, one frame loop.
//!
//! Each frame clears the display, applies that frame's input events, updates
//! every registered entity, renders every registered entity once and
//! presents the result.

use anyhow::Result;
use log::{debug, info};

use crate::config::SimConfig;
use crate::core::{Entity, EntityError, EntityId, EntityParams, SimpleRng, UpdateReport, World};
use crate::display::{Display, FrameStatus, InputSource, PlayerStatus};
use crate::types::{
    sprite_size, DVec2, InputEvent, SimAction, BACKGROUND, BASE_DAMAGE, BASE_HP, PLAYER_COLOUR,
    PLAYER_DAMAGE_FACTOR, PLAYER_NAME, PLAYER_SPEED_FACTOR, TEST_WOUND_MAX,
};

/// Whether the frame loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameFlow {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct Session {
    config: SimConfig,
    world: World,
    rng: SimpleRng,
    player: Option<EntityId>,
    arena: (u32, u32),
    last_report: UpdateReport,
}

impl Session {
    /// Start a session on an arena of `width`x`height` pixels and spawn the player.
    pub fn new(config: SimConfig, width: u32, height: u32) -> Result<Self, EntityError> {
        let rng = SimpleRng::new(config.seed);
        let mut session = Self {
            config,
            world: World::new(),
            rng,
            player: None,
            arena: (width, height),
            last_report: UpdateReport::default(),
        };
        session.spawn_player()?;
        info!("session started with seed {}", session.config.seed);
        Ok(session)
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn rng_mut(&mut self) -> &mut SimpleRng {
        &mut self.rng
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// The player, while it is registered.
    pub fn player(&self) -> Option<EntityId> {
        self.player
    }

    pub fn arena(&self) -> (u32, u32) {
        self.arena
    }

    pub fn last_report(&self) -> &UpdateReport {
        &self.last_report
    }

    /// Spawn a fresh player at a random spot inside the arena.
    pub fn spawn_player(&mut self) -> Result<EntityId, EntityError> {
        let (lo, hi) = self.config.player_hp_range();
        let hp = self.rng.range_inclusive(lo as i64, hi as i64) as f64;
        let size = sprite_size(hp * BASE_HP) as i64;
        let x = self.rng.range_inclusive(0, (self.arena.0 as i64 - size).max(0));
        let y = self.rng.range_inclusive(0, (self.arena.1 as i64 - size).max(0));

        let player = Entity::new(
            EntityParams::new(PLAYER_NAME, hp)
                .with_speed(PLAYER_SPEED_FACTOR)
                .with_damage(PLAYER_DAMAGE_FACTOR)
                .with_colour(PLAYER_COLOUR)
                .with_position(DVec2::new(x as f64, y as f64))
                .with_melee(true),
        )?;
        info!("spawned player\n{}", player);
        let id = self.world.spawn(player);
        self.player = Some(id);
        Ok(id)
    }

    /// Apply one input event.
    pub fn apply(&mut self, event: InputEvent) -> FrameFlow {
        match event {
            InputEvent::Action(action) => self.apply_action(action),
            InputEvent::Resize { width, height } => {
                debug!("arena resized to {}x{}", width, height);
                self.arena = (width, height);
            }
            InputEvent::Quit => return FrameFlow::Quit,
            InputEvent::Other => {}
        }
        FrameFlow::Continue
    }

    fn apply_action(&mut self, action: SimAction) {
        match action {
            SimAction::Wound => {
                let Some(id) = self.player else {
                    return;
                };
                let damage = (self.rng.range_inclusive(1, TEST_WOUND_MAX as i64) as f64
                    * BASE_DAMAGE)
                    .ceil() as u32;
                if let Some(outcome) = self.world.wound(id, damage, &mut self.rng) {
                    if let Some(player) = self.world.get(id) {
                        info!("wound {} -> {:?}\n{}", damage, outcome, player);
                    }
                }
            }
            SimAction::Fire => {
                let Some(id) = self.player else {
                    return;
                };
                let target = self.random_point();
                match self.world.attack(id, target) {
                    Some(pid) => debug!("player fired {} at {:?}", pid, target),
                    None => debug!("player cannot fire (melee or gone)"),
                }
            }
            SimAction::ToggleMelee => {
                if let Some(player) = self.player.and_then(|id| self.world.get_mut(id)) {
                    player.toggle_melee();
                    info!("player melee: {}", player.melee());
                }
            }
            SimAction::Respawn => {
                if self.player.is_some() {
                    return;
                }
                if let Err(err) = self.spawn_player() {
                    log::warn!("respawn failed: {}", err);
                }
            }
        }
    }

    fn random_point(&mut self) -> DVec2 {
        let x = self.rng.range_inclusive(0, self.arena.0 as i64);
        let y = self.rng.range_inclusive(0, self.arena.1 as i64);
        DVec2::new(x as f64, y as f64)
    }

    /// Update every entity once; forget the player once it leaves.
    pub fn update(&mut self) -> &UpdateReport {
        self.last_report = self.world.update(&mut self.rng);
        if let Some(id) = self.player {
            if self.last_report.removed.contains(&id) {
                info!("player {} is gone", id);
                self.player = None;
            }
        }
        &self.last_report
    }

    pub fn status(&self) -> FrameStatus {
        let player = self.player.and_then(|id| self.world.get(id)).map(|p| PlayerStatus {
            name: p.name().to_string(),
            current_hp: p.current_hp(),
            max_hp: p.max_hp(),
            size: p.size(),
            melee: p.melee(),
        });
        FrameStatus {
            frame: self.world.frame(),
            entities: self.world.len(),
            player,
        }
    }

    /// Run one frame with the given events.
    pub fn frame_with(
        &mut self,
        events: &[InputEvent],
        display: &mut (impl Display + ?Sized),
    ) -> Result<FrameFlow> {
        display.clear(BACKGROUND);
        for &event in events {
            if self.apply(event) == FrameFlow::Quit {
                return Ok(FrameFlow::Quit);
            }
        }
        self.update();
        self.world.render(&mut *display);
        display.present(&self.status())?;
        Ok(FrameFlow::Continue)
    }

    /// Drain `input` and run one frame.
    pub fn frame(
        &mut self,
        input: &mut (impl InputSource + ?Sized),
        display: &mut (impl Display + ?Sized),
    ) -> Result<FrameFlow> {
        let events = input.poll_events()?;
        self.frame_with(&events, display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Canvas, Surface};

    /// Headless display: composes into a surface and records statuses.
    struct Recorder {
        frame: Surface,
        presented: Vec<FrameStatus>,
    }

    impl Recorder {
        fn new(w: u32, h: u32) -> Self {
            Self {
                frame: Surface::new(w, h, BACKGROUND),
                presented: Vec::new(),
            }
        }
    }

    impl Canvas for Recorder {
        fn clear(&mut self, colour: crate::types::Rgb) {
            self.frame.clear(colour);
        }

        fn blit(&mut self, surface: &Surface, x: i32, y: i32) {
            self.frame.blit(surface, x, y);
        }
    }

    impl Display for Recorder {
        fn size(&self) -> (u32, u32) {
            (self.frame.width(), self.frame.height())
        }

        fn present(&mut self, status: &FrameStatus) -> Result<()> {
            self.presented.push(status.clone());
            Ok(())
        }
    }

    fn config(seed: u32) -> SimConfig {
        SimConfig {
            seed,
            ..SimConfig::default()
        }
    }

    #[test]
    fn new_session_spawns_melee_player_inside_arena() {
        let session = Session::new(config(5), 200, 100).unwrap();
        let id = session.player().unwrap();
        let p = session.world().get(id).unwrap();
        assert_eq!(p.name(), PLAYER_NAME);
        assert!(p.melee());
        assert_eq!(p.speed(), 5);
        assert_eq!(p.damage(), 5);
        assert!((100..=400).contains(&p.max_hp()));
        assert!(p.position().x + p.size() as f64 <= 200.0);
        assert!(p.position().y + p.size() as f64 <= 100.0);
    }

    #[test]
    fn frame_renders_player_and_presents_status() {
        let mut session = Session::new(config(9), 120, 80).unwrap();
        let mut display = Recorder::new(120, 80);

        let flow = session.frame_with(&[], &mut display).unwrap();
        assert_eq!(flow, FrameFlow::Continue);

        let size = session.status().player.unwrap().size as usize;
        assert_eq!(display.frame.count(PLAYER_COLOUR), size * size);
        assert_eq!(display.presented.len(), 1);
        assert_eq!(display.presented[0].frame, 1);
        assert_eq!(display.presented[0].entities, 1);
    }

    #[test]
    fn wound_action_lowers_player_hp() {
        let mut session = Session::new(config(3), 200, 200).unwrap();
        let mut display = Recorder::new(200, 200);
        let before = session.status().player.unwrap().current_hp;

        session
            .frame_with(&[InputEvent::Action(SimAction::Wound)], &mut display)
            .unwrap();
        match session.status().player {
            Some(p) => assert!(p.current_hp < before),
            None => assert!(session.last_report().died.len() == 1),
        }
    }

    #[test]
    fn repeated_wounds_kill_the_player_and_respawn_brings_it_back() {
        let mut session = Session::new(config(21), 200, 200).unwrap();
        let mut display = Recorder::new(200, 200);

        let wound = [InputEvent::Action(SimAction::Wound)];
        let mut frames = 0;
        while session.player().is_some() {
            session.frame_with(&wound, &mut display).unwrap();
            frames += 1;
            assert!(frames < 500, "player never died");
        }
        let report = session.last_report();
        assert_eq!(report.died.len(), 1);
        assert!((4..=12).contains(&report.spawned.len()));
        assert!(display.presented.last().unwrap().player.is_none());

        session
            .frame_with(&[InputEvent::Action(SimAction::Respawn)], &mut display)
            .unwrap();
        assert!(session.player().is_some());
    }

    #[test]
    fn fire_needs_ranged_player() {
        let mut session = Session::new(config(4), 200, 200).unwrap();
        let mut display = Recorder::new(200, 200);

        session
            .frame_with(&[InputEvent::Action(SimAction::Fire)], &mut display)
            .unwrap();
        assert_eq!(session.world().len(), 1);

        session
            .frame_with(
                &[
                    InputEvent::Action(SimAction::ToggleMelee),
                    InputEvent::Action(SimAction::Fire),
                ],
                &mut display,
            )
            .unwrap();
        assert_eq!(session.world().len(), 2);
        assert!(!session.status().player.unwrap().melee);
    }

    #[test]
    fn quit_stops_before_update() {
        let mut session = Session::new(config(1), 50, 50).unwrap();
        let mut display = Recorder::new(50, 50);
        let flow = session
            .frame_with(&[InputEvent::Quit], &mut display)
            .unwrap();
        assert_eq!(flow, FrameFlow::Quit);
        assert_eq!(session.world().frame(), 0);
        assert!(display.presented.is_empty());
    }

    #[test]
    fn resize_changes_arena() {
        let mut session = Session::new(config(1), 50, 50).unwrap();
        session.apply(InputEvent::Resize {
            width: 90,
            height: 30,
        });
        assert_eq!(session.arena(), (90, 30));
    }
}
