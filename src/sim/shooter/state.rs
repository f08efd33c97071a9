//! Square Shooter entities and world state
//!
//! Everything lives on the unit square and wraps around its edges.

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::sim::collision::{circles_overlap, is_outside_unit, wrap_unit};
use crate::tuning::ShooterTuning;

/// Bubble sizes, largest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BubbleKind {
    Big,
    Medium,
    Small,
}

impl BubbleKind {
    /// Size of the two bubbles this one splits into
    pub fn child(self) -> Option<BubbleKind> {
        match self {
            BubbleKind::Big => Some(BubbleKind::Medium),
            BubbleKind::Medium => Some(BubbleKind::Small),
            BubbleKind::Small => None,
        }
    }
}

/// Number of entries in the bubble colour palette
pub const BUBBLE_PALETTE_LEN: u8 = 6;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bubble {
    pub kind: BubbleKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Index into the renderer's bubble palette
    pub color: u8,
}

impl Bubble {
    /// A bubble at a random position with a random velocity
    pub fn random(kind: BubbleKind, tuning: &ShooterTuning, rng: &mut Pcg32) -> Self {
        let pos = Vec2::new(rng.random::<f32>(), rng.random::<f32>());
        Self::at(kind, pos, tuning, rng)
    }

    /// A bubble at `pos` with a random velocity
    pub fn at(kind: BubbleKind, pos: Vec2, tuning: &ShooterTuning, rng: &mut Pcg32) -> Self {
        let t = tuning.bubble(kind);
        let vel = Vec2::new(
            rng.random_range(-t.speed..=t.speed),
            rng.random_range(-t.speed..=t.speed),
        );
        Self {
            kind,
            pos,
            vel,
            radius: t.radius,
            color: rng.random_range(0..BUBBLE_PALETTE_LEN),
        }
    }

    /// Move; returns true if the bubble wrapped around an edge
    pub fn update(&mut self, dt: f32) -> bool {
        advance(&mut self.pos, self.vel, dt)
    }

    /// What a popped bubble leaves behind
    ///
    /// Big and medium bubbles split into two of the next size; small ones
    /// sometimes drop a power-up.
    pub fn pop(&self, tuning: &ShooterTuning, rng: &mut Pcg32) -> (Vec<Bubble>, Option<Powerup>) {
        match self.kind.child() {
            Some(child) => {
                let children = (0..2)
                    .map(|_| Bubble::at(child, self.pos, tuning, rng))
                    .collect();
                (children, None)
            }
            None => {
                let powerup = rng
                    .random_bool(tuning.powerup_drop_chance)
                    .then(|| Powerup::random(self.pos, tuning, rng));
                (Vec::new(), powerup)
            }
        }
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerupKind {
    Shield,
    SuperBullets,
    Freeze,
    Shotgun,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 4] = [
        PowerupKind::Shield,
        PowerupKind::SuperBullets,
        PowerupKind::Freeze,
        PowerupKind::Shotgun,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PowerupKind::Shield => "Shield",
            PowerupKind::SuperBullets => "Super Bullet",
            PowerupKind::Freeze => "Freeze",
            PowerupKind::Shotgun => "Shotgun",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Powerup {
    pub kind: PowerupKind,
    pub pos: Vec2,
    pub radius: f32,
    /// Seconds since it appeared
    pub age: f32,
}

impl Powerup {
    pub fn random(pos: Vec2, tuning: &ShooterTuning, rng: &mut Pcg32) -> Self {
        let kind = *PowerupKind::ALL
            .choose(rng)
            .unwrap_or(&PowerupKind::Shield);
        Self {
            kind,
            pos,
            radius: tuning.powerup_radius,
            age: 0.0,
        }
    }
}

/// Seconds remaining on each power-up; never negative
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerupTimers {
    shield: f32,
    super_bullets: f32,
    freeze: f32,
    shotgun: f32,
}

impl PowerupTimers {
    fn slot(&mut self, kind: PowerupKind) -> &mut f32 {
        match kind {
            PowerupKind::Shield => &mut self.shield,
            PowerupKind::SuperBullets => &mut self.super_bullets,
            PowerupKind::Freeze => &mut self.freeze,
            PowerupKind::Shotgun => &mut self.shotgun,
        }
    }

    /// Extend a power-up by `secs`
    pub fn add(&mut self, kind: PowerupKind, secs: f32) {
        *self.slot(kind) += secs.max(0.0);
    }

    /// Seconds left on a power-up (0 when inactive)
    pub fn remaining(&self, kind: PowerupKind) -> f32 {
        match kind {
            PowerupKind::Shield => self.shield,
            PowerupKind::SuperBullets => self.super_bullets,
            PowerupKind::Freeze => self.freeze,
            PowerupKind::Shotgun => self.shotgun,
        }
    }

    pub fn is_active(&self, kind: PowerupKind) -> bool {
        self.remaining(kind) > 0.0
    }

    /// Count every active timer down, clamping at zero
    pub fn decay(&mut self, dt: f32) {
        for kind in PowerupKind::ALL {
            let slot = self.slot(kind);
            *slot = (*slot - dt).max(0.0);
        }
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    pub vel: Vec2,
    pub accel: Vec2,
    pub radius: f32,
    pub timers: PowerupTimers,
}

impl Ship {
    /// A stationary ship in the middle of the map
    pub fn new(tuning: &ShooterTuning) -> Self {
        Self {
            pos: Vec2::splat(0.5),
            vel: Vec2::ZERO,
            accel: Vec2::ZERO,
            radius: tuning.ship_radius,
            timers: PowerupTimers::default(),
        }
    }

    /// Accelerate toward `target`; farther targets push harder
    pub fn thrust_at(&mut self, target: Vec2, tuning: &ShooterTuning) {
        self.accel += (target - self.pos) * tuning.thrust_factor;
    }

    /// Drop all acceleration (velocity is kept)
    pub fn stop_thrust(&mut self) {
        self.accel = Vec2::ZERO;
    }

    pub fn has(&self, kind: PowerupKind) -> bool {
        self.timers.is_active(kind)
    }

    pub fn update(&mut self, dt: f32, tuning: &ShooterTuning) -> bool {
        self.vel += self.accel;
        self.vel *= tuning.deceleration;
        self.timers.decay(dt);
        advance(&mut self.pos, self.vel, dt)
    }

    /// Bullets fired toward `target`
    pub fn shoot_at(&self, target: Vec2, tuning: &ShooterTuning, rng: &mut Pcg32) -> Vec<Bullet> {
        let offset = target - self.pos;
        let mut vel = offset * tuning.bullet_speed_factor;

        // Clicking on (or right next to) the ship would leave the bullet stuck
        if offset.x.abs() < tuning.close_shot_threshold
            && offset.y.abs() < tuning.close_shot_threshold
        {
            vel *= tuning.close_shot_boost;
        }

        if !self.has(PowerupKind::Shotgun) {
            return vec![Bullet::new(self.pos, vel, tuning)];
        }

        let spread = tuning.shotgun_spread;
        (0..tuning.shotgun_pellets)
            .map(|_| {
                let jitter = Vec2::new(
                    rng.random_range(-spread..=spread),
                    rng.random_range(-spread..=spread),
                );
                Bullet::new(self.pos, vel + jitter, tuning)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Bullet {
    pub fn new(pos: Vec2, vel: Vec2, tuning: &ShooterTuning) -> Self {
        Self {
            pos,
            vel,
            radius: tuning.bullet_radius,
        }
    }

    /// Move; returns true if the bullet crossed a map edge
    pub fn update(&mut self, dt: f32) -> bool {
        advance(&mut self.pos, self.vel, dt)
    }
}

/// Expanding ring left behind by popped bubbles and destroyed ships
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec2,
    pub radius: f32,
}

impl Explosion {
    pub fn new(pos: Vec2) -> Self {
        Self { pos, radius: 0.0 }
    }

    pub fn update(&mut self, dt: f32) {
        self.radius += dt;
    }
}

/// Move `pos` by `vel * dt` and wrap it; true if it had left the map
fn advance(pos: &mut Vec2, vel: Vec2, dt: f32) -> bool {
    *pos += vel * dt;
    let wrapped = is_outside_unit(*pos);
    *pos = wrap_unit(*pos);
    wrapped
}

/// Where the game is at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShooterPhase {
    /// Title screen (level 0)
    Title,
    Playing,
    Paused,
}

/// Things that happened during a tick (for audio and bookkeeping)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShooterEvent {
    GameStarted,
    Shot,
    BubblePopped(BubbleKind),
    PowerupCollected(PowerupKind),
    ShipDestroyed,
    ShipRespawned,
    LevelStarted(u32),
    LevelCleared(u32),
    GameOver { score: u64, level: u32 },
    /// Quit back to the title screen mid-run
    RunAbandoned { score: u64, level: u32 },
}

/// Complete Square Shooter state
#[derive(Debug, Clone)]
pub struct ShooterWorld {
    pub tuning: ShooterTuning,
    pub rng: Pcg32,
    pub phase: ShooterPhase,
    /// Current level (0 on the title screen)
    pub level: u32,
    pub score: u64,
    pub lives: u32,
    pub high_score: u64,
    pub max_level: u32,
    pub ship: Option<Ship>,
    pub bubbles: Vec<Bubble>,
    pub bullets: Vec<Bullet>,
    pub explosions: Vec<Explosion>,
    pub powerups: Vec<Powerup>,
    /// Seconds until the next ship appears after a death
    pub afterdeath_timer: f32,
    /// Seconds until the next level after the last bubble pops
    pub afterfinish_timer: f32,
    /// Set when the player asked to leave the game entirely
    pub exit_requested: bool,
    events: Vec<ShooterEvent>,
}

impl ShooterWorld {
    pub fn new(seed: u64, tuning: ShooterTuning) -> Self {
        Self {
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            phase: ShooterPhase::Title,
            level: 0,
            score: 0,
            lives: 0,
            high_score: 0,
            max_level: 0,
            ship: None,
            bubbles: Vec::new(),
            bullets: Vec::new(),
            explosions: Vec::new(),
            powerups: Vec::new(),
            afterdeath_timer: 0.0,
            afterfinish_timer: 0.0,
            exit_requested: false,
            events: Vec::new(),
        }
    }

    /// Seed the in-memory records (e.g. from the saved leaderboard)
    pub fn with_records(mut self, high_score: u64, max_level: u32) -> Self {
        self.high_score = high_score;
        self.max_level = max_level;
        self
    }

    pub fn is_playing(&self) -> bool {
        self.level > 0 && self.phase == ShooterPhase::Playing
    }

    pub(crate) fn push_event(&mut self, event: ShooterEvent) {
        self.events.push(event);
    }

    /// Take the events queued since the last call
    pub fn drain_events(&mut self) -> Vec<ShooterEvent> {
        std::mem::take(&mut self.events)
    }

    /// Fresh run from the title screen
    pub fn start_game(&mut self) {
        self.score = 0;
        self.lives = self.tuning.starting_lives;
        self.ship = None;
        self.phase = ShooterPhase::Playing;
        self.push_event(ShooterEvent::GameStarted);
        self.init_level(1);
    }

    /// Back to the title screen
    pub fn end_game(&mut self) {
        self.level = 0;
        self.phase = ShooterPhase::Title;
    }

    /// Set up a level: `level` big bubbles, a shielded ship, clean map
    pub fn init_level(&mut self, level: u32) {
        self.level = level;
        self.max_level = self.max_level.max(level);

        let secs = self.tuning.powerup_secs;
        let ship = self.ship.get_or_insert_with(|| Ship::new(&self.tuning));
        ship.timers.add(PowerupKind::Shield, secs);

        self.bullets.clear();
        self.explosions.clear();
        self.powerups.clear();
        self.afterdeath_timer = 0.0;
        self.afterfinish_timer = 0.0;

        let tuning = &self.tuning;
        let rng = &mut self.rng;
        self.bubbles = (0..level)
            .map(|_| Bubble::random(BubbleKind::Big, tuning, rng))
            .collect();

        log::info!("Square Shooter level {} ({} bubbles)", level, level);
        self.push_event(ShooterEvent::LevelStarted(level));
    }

    /// Fire at and thrust toward a map position (mouse button down)
    pub fn fire_at(&mut self, target: Vec2) {
        if !self.is_playing() {
            return;
        }
        let Some(ship) = self.ship.as_mut() else {
            return;
        };

        if self.bullets.len() < self.tuning.max_live_bullets {
            let shots = ship.shoot_at(target, &self.tuning, &mut self.rng);
            self.bullets.extend(shots);
            self.events.push(ShooterEvent::Shot);
        }
        ship.thrust_at(target, &self.tuning);
    }

    /// Stop thrusting (mouse button up)
    pub fn release_thrust(&mut self) {
        if self.level == 0 {
            return;
        }
        if let Some(ship) = self.ship.as_mut() {
            ship.stop_thrust();
        }
    }

    /// Advance the world by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        self.handle_collisions(dt);

        for explosion in &mut self.explosions {
            explosion.update(dt);
        }
        let max_radius = self.tuning.max_explosion_radius;
        self.explosions.retain(|e| e.radius <= max_radius);

        for powerup in &mut self.powerups {
            powerup.age += dt;
        }
        let max_age = self.tuning.max_powerup_age;
        self.powerups.retain(|p| p.age <= max_age);

        if self.bubbles.is_empty() {
            if self.afterfinish_timer > 0.0 {
                self.afterfinish_timer = (self.afterfinish_timer - dt).max(0.0);
            } else {
                self.lives += 1;
                self.init_level(self.level + 1);
                return;
            }
        } else if !self.ship.as_ref().is_some_and(|s| s.has(PowerupKind::Freeze)) {
            for bubble in &mut self.bubbles {
                bubble.update(dt);
            }
        }

        // Bullets vanish once they reach an edge
        self.bullets.retain_mut(|b| !b.update(dt));

        if let Some(ship) = self.ship.as_mut() {
            ship.update(dt, &self.tuning);
            return;
        }

        if self.afterdeath_timer > 0.0 {
            self.afterdeath_timer = (self.afterdeath_timer - dt).max(0.0);
        } else if self.lives > 0 {
            let mut ship = Ship::new(&self.tuning);
            ship.timers.add(PowerupKind::Shield, self.tuning.powerup_secs);
            self.ship = Some(ship);
            self.push_event(ShooterEvent::ShipRespawned);
        } else {
            log::info!(
                "Square Shooter game over: score {}, level {}",
                self.score,
                self.level
            );
            let event = ShooterEvent::GameOver {
                score: self.score,
                level: self.level,
            };
            self.end_game();
            self.push_event(event);
        }
    }

    /// Bullets vs bubbles, bubbles vs ship, ship vs power-ups
    pub fn handle_collisions(&mut self, dt: f32) {
        let bubbles = std::mem::take(&mut self.bubbles);
        let mut survivors = Vec::with_capacity(bubbles.len() + 4);
        let mut spawned = Vec::new();
        let mut popped_any = false;

        let mut remaining = bubbles.into_iter();
        while let Some(bubble) = remaining.next() {
            // The most recently fired bullet wins
            let hit = self
                .bullets
                .iter()
                .rposition(|b| circles_overlap(b.pos, b.radius, bubble.pos, bubble.radius));

            if let Some(index) = hit {
                let super_bullets = self
                    .ship
                    .as_ref()
                    .is_none_or(|s| s.has(PowerupKind::SuperBullets));
                if super_bullets {
                    // Push it along so it doesn't pop the fresh children at once
                    let push = dt * self.tuning.super_bullet_push;
                    self.bullets[index].update(push);
                } else {
                    self.bullets.remove(index);
                }

                let (children, powerup) = bubble.pop(&self.tuning, &mut self.rng);
                spawned.extend(children);
                self.powerups.extend(powerup);
                self.explosions.push(Explosion::new(bubble.pos));
                self.mark_score(bubble.kind);
                self.push_event(ShooterEvent::BubblePopped(bubble.kind));
                popped_any = true;
            }

            // A bubble popped against the ship still takes the ship with it
            let rams_ship = self.ship.as_ref().is_some_and(|ship| {
                !ship.has(PowerupKind::Shield)
                    && circles_overlap(bubble.pos, bubble.radius, ship.pos, ship.radius)
            });
            if hit.is_none() {
                survivors.push(bubble);
            }

            if rams_ship {
                if let Some(ship) = self.ship.take() {
                    self.explosions.push(Explosion::new(ship.pos));
                }
                self.lives = self.lives.saturating_sub(1);
                self.afterdeath_timer = self.tuning.respawn_delay;
                self.push_event(ShooterEvent::ShipDestroyed);
                survivors.extend(remaining.by_ref());
                break;
            }
        }

        survivors.extend(spawned);
        self.bubbles = survivors;
        if popped_any && self.bubbles.is_empty() {
            self.afterfinish_timer = self.tuning.level_clear_delay;
            self.push_event(ShooterEvent::LevelCleared(self.level));
        }

        let Some(ship) = self.ship.as_ref() else {
            return;
        };
        let (ship_pos, ship_radius) = (ship.pos, ship.radius);
        let (collected, left): (Vec<Powerup>, Vec<Powerup>) = std::mem::take(&mut self.powerups)
            .into_iter()
            .partition(|p| circles_overlap(p.pos, p.radius, ship_pos, ship_radius));
        self.powerups = left;
        for powerup in collected {
            self.apply_powerup(powerup.kind);
        }
    }

    fn mark_score(&mut self, kind: BubbleKind) {
        self.score += self.tuning.bubble(kind).score;
        self.high_score = self.high_score.max(self.score);
    }

    fn apply_powerup(&mut self, kind: PowerupKind) {
        let secs = self.tuning.powerup_secs;
        if let Some(ship) = self.ship.as_mut() {
            ship.timers.add(kind, secs);
        }
        self.score += u64::from(self.level) * self.tuning.powerup_score_per_level;
        self.high_score = self.high_score.max(self.score);
        self.push_event(ShooterEvent::PowerupCollected(kind));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn world() -> ShooterWorld {
        ShooterWorld::new(7, ShooterTuning::default())
    }

    #[test]
    fn test_big_bubble_splits_into_two_medium() {
        let mut w = world();
        let tuning = w.tuning.clone();
        let big = Bubble::at(BubbleKind::Big, Vec2::new(0.3, 0.4), &tuning, &mut w.rng);
        let (children, powerup) = big.pop(&tuning, &mut w.rng);
        assert_eq!(children.len(), 2);
        assert!(powerup.is_none());
        for child in &children {
            assert_eq!(child.kind, BubbleKind::Medium);
            assert_eq!(child.pos, big.pos);
            assert!(child.vel.x.abs() <= tuning.medium.speed);
        }
    }

    #[test]
    fn test_small_bubble_never_splits() {
        let mut w = world();
        let tuning = ShooterTuning {
            powerup_drop_chance: 1.0,
            ..ShooterTuning::default()
        };
        let small = Bubble::at(BubbleKind::Small, Vec2::splat(0.5), &tuning, &mut w.rng);
        let (children, powerup) = small.pop(&tuning, &mut w.rng);
        assert!(children.is_empty());
        let powerup = powerup.expect("drop chance is 1");
        assert_eq!(powerup.pos, small.pos);
        assert_eq!(powerup.age, 0.0);
    }

    #[test]
    fn test_timers_clamp_at_zero() {
        let mut timers = PowerupTimers::default();
        timers.add(PowerupKind::Freeze, 1.0);
        timers.decay(0.4);
        assert!((timers.remaining(PowerupKind::Freeze) - 0.6).abs() < 1e-6);
        timers.decay(5.0);
        assert_eq!(timers.remaining(PowerupKind::Freeze), 0.0);
        assert!(!timers.is_active(PowerupKind::Freeze));
        assert_eq!(timers.remaining(PowerupKind::Shield), 0.0);
    }

    #[test]
    fn test_single_shot_without_shotgun() {
        let mut w = world();
        let tuning = w.tuning.clone();
        let ship = Ship::new(&tuning);
        let bullets = ship.shoot_at(Vec2::new(0.9, 0.5), &tuning, &mut w.rng);
        assert_eq!(bullets.len(), 1);
        assert!((bullets[0].vel.x - 1.2).abs() < 1e-5);
        assert_eq!(bullets[0].vel.y, 0.0);
    }

    #[test]
    fn test_shot_at_own_ship_is_boosted() {
        let mut w = world();
        let tuning = w.tuning.clone();
        let ship = Ship::new(&tuning);
        let bullets = ship.shoot_at(Vec2::new(0.55, 0.5), &tuning, &mut w.rng);
        // 0.05 * 3 * 30
        assert!((bullets[0].vel.x - 4.5).abs() < 1e-4);
    }

    #[test]
    fn test_shotgun_fires_spread() {
        let mut w = world();
        let tuning = w.tuning.clone();
        let mut ship = Ship::new(&tuning);
        ship.timers.add(PowerupKind::Shotgun, 6.0);
        let bullets = ship.shoot_at(Vec2::new(0.9, 0.5), &tuning, &mut w.rng);
        assert_eq!(bullets.len(), 5);
        for b in &bullets {
            assert!((b.vel.x - 1.2).abs() <= 0.15 + 1e-5);
            assert!(b.vel.y.abs() <= 0.15 + 1e-5);
        }
    }

    #[test]
    fn test_thrust_and_stop() {
        let tuning = ShooterTuning::default();
        let mut ship = Ship::new(&tuning);
        ship.thrust_at(Vec2::new(1.0, 0.5), &tuning);
        assert!((ship.accel.x - 0.015).abs() < 1e-6);
        ship.update(1.0 / 60.0, &tuning);
        assert!(ship.vel.x > 0.0);
        ship.stop_thrust();
        assert_eq!(ship.accel, Vec2::ZERO);
        let before = ship.vel.x;
        ship.update(1.0 / 60.0, &tuning);
        assert!(ship.vel.x < before, "deceleration slows the ship");
    }

    #[test]
    fn test_init_level_spawns_level_many_big_bubbles() {
        let mut w = world();
        w.init_level(3);
        assert_eq!(w.bubbles.len(), 3);
        assert!(w.bubbles.iter().all(|b| b.kind == BubbleKind::Big));
        assert_eq!(w.max_level, 3);
        let ship = w.ship.as_ref().unwrap();
        assert!(ship.has(PowerupKind::Shield));
    }

    #[test]
    fn test_bullet_pops_bubble_and_scores() {
        let mut w = world();
        w.start_game();
        let pos = Vec2::new(0.2, 0.2);
        w.bubbles[0].pos = pos;
        w.bubbles[0].vel = Vec2::ZERO;
        w.bullets.push(Bullet::new(pos, Vec2::ZERO, &w.tuning.clone()));

        w.handle_collisions(1.0 / 60.0);

        assert!(w.bullets.is_empty(), "normal bullets are spent");
        assert_eq!(w.bubbles.len(), 2);
        assert!(w.bubbles.iter().all(|b| b.kind == BubbleKind::Medium));
        assert_eq!(w.score, 1);
        assert_eq!(w.high_score, 1);
        assert_eq!(w.explosions.len(), 1);
    }

    #[test]
    fn test_super_bullet_survives_pop() {
        let mut w = world();
        w.start_game();
        let pos = Vec2::new(0.2, 0.2);
        w.bubbles[0].pos = pos;
        let tuning = w.tuning.clone();
        w.bullets.push(Bullet::new(pos, Vec2::new(0.6, 0.0), &tuning));
        w.ship
            .as_mut()
            .unwrap()
            .timers
            .add(PowerupKind::SuperBullets, 6.0);

        w.handle_collisions(0.1);

        assert_eq!(w.bullets.len(), 1);
        assert!((w.bullets[0].pos.x - 0.5).abs() < 1e-5, "pushed along 5 ticks");
    }

    #[test]
    fn test_clearing_last_bubble_starts_timer_then_next_level() {
        let mut w = world();
        w.start_game();
        w.bubbles = vec![Bubble::at(
            BubbleKind::Small,
            Vec2::new(0.2, 0.2),
            &w.tuning.clone(),
            &mut w.rng,
        )];
        w.tuning.powerup_drop_chance = 0.0;
        let tuning = w.tuning.clone();
        w.bullets.push(Bullet::new(Vec2::new(0.2, 0.2), Vec2::ZERO, &tuning));

        w.update(0.5);
        assert!(w.bubbles.is_empty());
        assert_eq!(w.level, 1);
        assert!(w.afterfinish_timer > 0.0);

        for _ in 0..10 {
            w.update(0.5);
        }
        assert_eq!(w.level, 2);
        assert_eq!(w.lives, 2, "clearing a level grants a life");
        assert_eq!(w.bubbles.len(), 2);
    }

    #[test]
    fn test_unshielded_ship_dies_and_respawns() {
        let mut w = world();
        w.start_game();
        w.lives = 2;
        let ship_pos = w.ship.as_ref().unwrap().pos;
        w.ship.as_mut().unwrap().timers = PowerupTimers::default();
        w.bubbles[0].pos = ship_pos;

        w.handle_collisions(1.0 / 60.0);
        assert!(w.ship.is_none());
        assert_eq!(w.lives, 1);
        assert_eq!(w.afterdeath_timer, 3.0);
        assert_eq!(w.bubbles.len(), 1, "ramming does not pop the bubble");

        // Move the bubble away so the new ship survives
        w.bubbles[0].pos = Vec2::new(0.05, 0.05);
        w.bubbles[0].vel = Vec2::ZERO;
        for _ in 0..7 {
            w.update(0.5);
        }
        assert!(w.ship.is_some());
        assert!(w.ship.as_ref().unwrap().has(PowerupKind::Shield));
    }

    #[test]
    fn test_shield_protects_ship() {
        let mut w = world();
        w.start_game();
        let ship_pos = w.ship.as_ref().unwrap().pos;
        w.bubbles[0].pos = ship_pos;
        w.handle_collisions(1.0 / 60.0);
        assert!(w.ship.is_some());
    }

    #[test]
    fn test_popping_a_bubble_on_the_ship_still_destroys_it() {
        let mut w = world();
        w.start_game();
        w.lives = 2;
        let ship_pos = w.ship.as_ref().unwrap().pos;
        w.ship.as_mut().unwrap().timers = PowerupTimers::default();
        w.bubbles[0].pos = ship_pos;
        let tuning = w.tuning.clone();
        w.bullets.push(Bullet::new(ship_pos, Vec2::ZERO, &tuning));

        w.handle_collisions(1.0 / 60.0);

        assert!(w.ship.is_none());
        assert_eq!(w.lives, 1);
        assert_eq!(w.afterdeath_timer, 3.0);
        assert_eq!(w.score, 1, "the pop still scores");
        assert_eq!(w.bubbles.len(), 2);
        let events = w.drain_events();
        assert!(events.contains(&ShooterEvent::BubblePopped(BubbleKind::Big)));
        assert!(events.contains(&ShooterEvent::ShipDestroyed));
    }

    #[test]
    fn test_children_wait_a_tick_before_colliding() {
        let mut w = world();
        w.start_game();
        let pos = Vec2::new(0.2, 0.2);
        w.bubbles[0].pos = pos;
        let tuning = w.tuning.clone();
        w.bullets.push(Bullet::new(pos, Vec2::ZERO, &tuning));
        w.bullets.push(Bullet::new(pos, Vec2::ZERO, &tuning));

        w.handle_collisions(1.0 / 60.0);
        assert_eq!(w.bubbles.len(), 2);
        assert_eq!(w.bullets.len(), 1, "fresh children are not hit this tick");

        for b in &mut w.bubbles {
            b.vel = Vec2::ZERO;
        }
        w.handle_collisions(1.0 / 60.0);
        assert!(w.bullets.is_empty());
        assert_eq!(w.bubbles.len(), 3);
        assert_eq!(w.score, 1 + 2);
    }

    #[test]
    fn test_bullets_pierce_while_no_ship() {
        let mut w = world();
        w.start_game();
        w.ship = None;
        let pos = Vec2::new(0.2, 0.2);
        w.bubbles[0].pos = pos;
        let tuning = w.tuning.clone();
        w.bullets.push(Bullet::new(pos, Vec2::new(0.6, 0.0), &tuning));

        w.handle_collisions(0.1);

        assert_eq!(w.bubbles.len(), 2);
        assert_eq!(w.bullets.len(), 1);
        assert!((w.bullets[0].pos.x - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_last_life_lost_returns_to_title() {
        let mut w = world();
        w.start_game();
        w.score = 12;
        w.ship = None;
        w.lives = 0;
        w.afterdeath_timer = 0.0;
        w.update(1.0 / 60.0);
        assert_eq!(w.level, 0);
        assert_eq!(w.phase, ShooterPhase::Title);
        let events = w.drain_events();
        assert!(events.contains(&ShooterEvent::GameOver {
            score: 12,
            level: 1
        }));
    }

    #[test]
    fn test_powerup_pickup_scores_by_level() {
        let mut w = world();
        w.init_level(4);
        let ship_pos = w.ship.as_ref().unwrap().pos;
        w.bubbles.clear();
        w.afterfinish_timer = 10.0;
        w.powerups.push(Powerup {
            kind: PowerupKind::Freeze,
            pos: ship_pos,
            radius: 0.03,
            age: 0.0,
        });
        w.handle_collisions(1.0 / 60.0);
        assert!(w.powerups.is_empty());
        assert_eq!(w.score, 40);
        assert!(w.ship.as_ref().unwrap().has(PowerupKind::Freeze));
    }

    #[test]
    fn test_freeze_stops_bubbles() {
        let mut w = world();
        w.start_game();
        w.ship.as_mut().unwrap().timers.add(PowerupKind::Freeze, 6.0);
        w.bubbles[0].pos = Vec2::new(0.1, 0.1);
        w.bubbles[0].vel = Vec2::new(0.1, 0.0);
        w.update(0.1);
        assert_eq!(w.bubbles[0].pos, Vec2::new(0.1, 0.1));
    }

    #[test]
    fn test_powerups_expire() {
        let mut w = world();
        w.start_game();
        w.powerups.push(Powerup {
            kind: PowerupKind::Shotgun,
            pos: Vec2::new(0.05, 0.95),
            radius: 0.03,
            age: 8.99,
        });
        w.update(0.02);
        assert!(w.powerups.is_empty());
    }

    #[test]
    fn test_bullets_removed_at_edge() {
        let mut w = world();
        w.start_game();
        let tuning = w.tuning.clone();
        w.bullets
            .push(Bullet::new(Vec2::new(0.99, 0.01), Vec2::new(1.0, 0.0), &tuning));
        w.update(0.05);
        assert!(w.bullets.is_empty());
    }

    #[test]
    fn test_explosions_grow_and_vanish() {
        let mut w = world();
        w.start_game();
        w.explosions.push(Explosion::new(Vec2::splat(0.5)));
        w.update(0.3);
        assert!((w.explosions[0].radius - 0.3).abs() < 1e-6);
        w.update(0.3);
        assert!(w.explosions.is_empty());
    }

    proptest! {
        #[test]
        fn timers_never_go_negative(adds in proptest::collection::vec(0.0f32..10.0, 0..5),
                                    steps in proptest::collection::vec(0.0f32..3.0, 0..20)) {
            let mut timers = PowerupTimers::default();
            for secs in adds {
                timers.add(PowerupKind::Shield, secs);
            }
            let mut last = timers.remaining(PowerupKind::Shield);
            for dt in steps {
                timers.decay(dt);
                let now = timers.remaining(PowerupKind::Shield);
                prop_assert!(now >= 0.0);
                prop_assert!(now <= last);
                last = now;
            }
        }
    }
}
