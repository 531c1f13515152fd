//! Entity records
//!
//! Plain data for everything that moves and collides. Every body embeds a
//! [`Kinematic`]; behaviour lives in `tick`, `boss` and `resolve` and
//! dispatches on the explicit kind tags below.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Shared movable box: position is the center, size the full extents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kinematic {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    /// Cleared to destroy; collections are swept once per frame
    pub active: bool,
}

impl Kinematic {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            active: true,
        }
    }

    pub fn square(pos: Vec2, side: f32) -> Self {
        Self::new(pos, Vec2::splat(side))
    }

    /// Radius of the collision circle (half the width)
    #[inline]
    pub fn radius(&self) -> f32 {
        self.size.x * 0.5
    }

    pub fn half_extents(&self) -> Vec2 {
        self.size * 0.5
    }

    pub fn integrate(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }
}

/// Bounded history of recent positions (newest first)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Trail {
    points: VecDeque<Vec2>,
    capacity: usize,
}

impl Trail {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push the newest point, evicting the oldest once full
    pub fn record(&mut self, pos: Vec2) {
        if self.capacity == 0 {
            return;
        }
        self.points.push_front(pos);
        self.points.truncate(self.capacity);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Newest to oldest
    pub fn iter(&self) -> impl Iterator<Item = &Vec2> {
        self.points.iter()
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Kinematic,
    pub health: i32,
    pub max_health: i32,
    pub bombs: u32,
    pub shielded: bool,
    /// Seconds of shield left
    pub shield_timer: f32,
    /// Seconds of damage immunity left
    pub invincible_timer: f32,
    /// Seconds until the next auto-fire shot
    pub fire_cooldown: f32,
    pub trail: Trail,
}

impl Player {
    /// Spawn at the bottom center of a `width` x `height` playfield
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            body: Kinematic::square(Vec2::new(width / 2.0, height - 80.0), PLAYER_SIZE),
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            bombs: 0,
            shielded: false,
            shield_timer: 0.0,
            invincible_timer: 0.0,
            fire_cooldown: 0.0,
            trail: Trail::new(PLAYER_TRAIL_LENGTH),
        }
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_timer > 0.0
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Apply damage and open the invincibility window
    ///
    /// Health may go negative here; the defeat check and the end-of-tick
    /// clamp deal with it.
    pub fn take_damage(&mut self, amount: i32) {
        self.health -= amount;
        self.invincible_timer = INVINCIBILITY_DURATION;
    }

    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    pub fn grant_shield(&mut self) {
        self.shielded = true;
        self.shield_timer = SHIELD_DURATION;
    }

    /// The shield soaks exactly one hit
    pub fn break_shield(&mut self) {
        self.shielded = false;
        self.shield_timer = 0.0;
    }

    /// Count down invincibility and shield
    pub fn tick_timers(&mut self, dt: f32) {
        if self.invincible_timer > 0.0 {
            self.invincible_timer = (self.invincible_timer - dt).max(0.0);
        }
        if self.shield_timer > 0.0 {
            self.shield_timer -= dt;
            if self.shield_timer <= 0.0 {
                self.break_shield();
            }
        }
    }

    /// Bottom-center of the ship, where the engine glow sits
    pub fn exhaust(&self) -> Vec2 {
        self.body.pos + Vec2::new(0.0, self.body.size.y / 2.0)
    }

    /// Top-center of the ship, where shots leave
    pub fn muzzle(&self) -> Vec2 {
        self.body.pos - Vec2::new(0.0, self.body.size.y / 2.0)
    }
}

/// Boss movement patterns, cycled in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BossPattern {
    #[default]
    SineSweep,
    TrackPlayer,
    Dash,
    Erratic,
}

impl BossPattern {
    pub fn next(self) -> Self {
        match self {
            BossPattern::SineSweep => BossPattern::TrackPlayer,
            BossPattern::TrackPlayer => BossPattern::Dash,
            BossPattern::Dash => BossPattern::Erratic,
            BossPattern::Erratic => BossPattern::SineSweep,
        }
    }
}

/// Aggression tier keyed to remaining boss health
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum RageTier {
    #[default]
    Calm,
    /// Below half health
    Angry,
    /// Below 30% health
    Furious,
}

impl RageTier {
    pub fn from_fraction(fraction: f32) -> Self {
        if fraction < 0.3 {
            RageTier::Furious
        } else if fraction < 0.5 {
            RageTier::Angry
        } else {
            RageTier::Calm
        }
    }

    /// Volley chance per reference frame
    pub fn fire_chance(self) -> f32 {
        match self {
            RageTier::Calm => 0.02,
            RageTier::Angry => 0.03,
            RageTier::Furious => 0.045,
        }
    }

    /// Bullets per spread volley
    pub fn volley_size(self) -> usize {
        match self {
            RageTier::Calm => 3,
            RageTier::Angry => 5,
            RageTier::Furious => 7,
        }
    }

    pub fn bullet_speed(self) -> f32 {
        match self {
            RageTier::Calm => 360.0,
            RageTier::Angry => 420.0,
            RageTier::Furious => 480.0,
        }
    }

    /// Chance a volley is aimed at the player instead of fanned downward
    pub fn aim_chance(self) -> f32 {
        match self {
            RageTier::Calm => 0.0,
            RageTier::Angry | RageTier::Furious => 0.35,
        }
    }
}

/// The boss
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub body: Kinematic,
    pub health: i32,
    pub max_health: i32,
    pub pattern: BossPattern,
    /// Seconds spent in the current pattern
    pub pattern_timer: f32,
    /// Seconds of hit flash left
    pub hit_flash: f32,
    /// 0..=1, collidable only once it reaches 1
    pub enter_progress: f32,
    pub rage: RageTier,
    /// Seconds since the boss became active (drives the sine sweep)
    pub clock: f32,
    /// X coordinate the current dash is heading for
    pub dash_target: Option<f32>,
    /// Seconds until the erratic pattern re-rolls its heading
    pub jitter_timer: f32,
}

impl Boss {
    /// A boss parked above the playfield, waiting for its entrance
    pub fn new(width: f32, max_health: i32) -> Self {
        let mut body = Kinematic::square(Vec2::new(width / 2.0, BOSS_START_Y), BOSS_SIZE);
        body.active = false;
        Self {
            body,
            health: max_health,
            max_health,
            pattern: BossPattern::default(),
            pattern_timer: 0.0,
            hit_flash: 0.0,
            enter_progress: 0.0,
            rage: RageTier::Calm,
            clock: 0.0,
            dash_target: None,
            jitter_timer: 0.0,
        }
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0 {
            return 0.0;
        }
        (self.health.max(0) as f32 / self.max_health as f32).clamp(0.0, 1.0)
    }

    pub fn is_entering(&self) -> bool {
        self.enter_progress < 1.0
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }
}

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Worker,
    Shooter,
    Carrier,
}

impl EnemyKind {
    pub fn size(self) -> f32 {
        match self {
            EnemyKind::Carrier => CARRIER_SIZE,
            _ => ENEMY_SIZE,
        }
    }

    pub fn max_health(self) -> i32 {
        match self {
            EnemyKind::Carrier => 3,
            _ => 1,
        }
    }

    /// Base score before the combo multiplier
    pub fn score(self) -> u64 {
        match self {
            EnemyKind::Carrier => CARRIER_SCORE,
            _ => WORKER_SCORE,
        }
    }

    pub fn always_drops(self) -> bool {
        self == EnemyKind::Carrier
    }
}

/// A wave enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub body: Kinematic,
    pub kind: EnemyKind,
    pub health: i32,
    /// Seconds until a shooter fires again
    pub shot_cooldown: f32,
    pub hit_flash: f32,
}

impl Enemy {
    pub fn new(kind: EnemyKind, pos: Vec2, fall_speed: f32) -> Self {
        let mut body = Kinematic::square(pos, kind.size());
        body.vel = Vec2::new(0.0, fall_speed);
        Self {
            body,
            kind,
            health: kind.max_health(),
            shot_cooldown: SHOOTER_FIRE_INTERVAL,
            hit_flash: 0.0,
        }
    }
}

/// Who fired a bullet (and so what it can hit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletOwner {
    /// Auto-fire shot, hits enemies
    Player,
    /// Player bomb, hits the boss
    Bomb,
    /// Enemy or boss shot, hits the player
    Hostile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub body: Kinematic,
    pub owner: BulletOwner,
    pub damage: i32,
    pub trail: Trail,
}

impl Bullet {
    pub fn shot(pos: Vec2, speed: f32) -> Self {
        let mut body = Kinematic::new(pos, Vec2::new(SHOT_WIDTH, SHOT_HEIGHT));
        body.vel = Vec2::new(0.0, -speed);
        Self {
            body,
            owner: BulletOwner::Player,
            damage: SHOT_DAMAGE,
            trail: Trail::new(0),
        }
    }

    pub fn bomb(pos: Vec2, damage: i32) -> Self {
        let mut body = Kinematic::square(pos, BOMB_SIZE);
        body.vel = Vec2::new(0.0, -BOMB_SPEED);
        Self {
            body,
            owner: BulletOwner::Bomb,
            damage,
            trail: Trail::new(BOMB_TRAIL_LENGTH),
        }
    }

    pub fn hostile(pos: Vec2, vel: Vec2, damage: i32) -> Self {
        let mut body = Kinematic::square(pos, ENEMY_BULLET_SIZE);
        body.vel = vel;
        Self {
            body,
            owner: BulletOwner::Hostile,
            damage,
            trail: Trail::new(HOSTILE_TRAIL_LENGTH),
        }
    }

    pub fn is_hostile(&self) -> bool {
        self.owner == BulletOwner::Hostile
    }
}

/// Pickup variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropKind {
    Bomb,
    Health,
    Shield,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Drop {
    pub body: Kinematic,
    pub kind: DropKind,
    /// Animation phase only
    pub pulse: f32,
    /// Set once close to the player; never cleared
    pub magnetized: bool,
}

impl Drop {
    pub fn new(kind: DropKind, pos: Vec2) -> Self {
        let mut body = Kinematic::square(pos, DROP_SIZE);
        body.vel = Vec2::new(0.0, DROP_FALL_SPEED);
        Self {
            body,
            kind,
            pulse: 0.0,
            magnetized: false,
        }
    }
}
