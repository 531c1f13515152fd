//! Decorative particles
//!
//! Particles never feed back into gameplay and can be dropped at any time.
//! The system owns its own RNG so cosmetic randomness does not perturb the
//! gameplay stream (loot rolls, spawns) in `GameState`.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::MAX_PARTICLES;
use crate::per_frame;

/// Render style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    Spark,
    Explosion,
    Trail,
    Pickup,
    Star,
    Smoke,
}

/// Palette key, resolved to a color by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tint {
    White,
    Gold,
    Orange,
    Red,
    Green,
    Cyan,
    Purple,
    Smoke,
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    /// Pixels per second
    pub vel: Vec2,
    /// Seconds remaining
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
    pub tint: Tint,
    pub kind: ParticleKind,
    /// Pixels per second squared, positive is down
    pub gravity: f32,
    /// Velocity kept per reference frame
    pub friction: f32,
}

impl Particle {
    /// 1.0 when fresh, 0.0 when expired
    pub fn life_ratio(&self) -> f32 {
        if self.max_life <= 0.0 {
            return 0.0;
        }
        (self.life / self.max_life).clamp(0.0, 1.0)
    }

    /// Fade curve: opaque for the first half of life
    pub fn alpha(&self) -> f32 {
        (self.life_ratio() * 2.0).min(1.0)
    }

    /// Shrinks to half size as it dies
    pub fn render_size(&self) -> f32 {
        self.size * (0.5 + self.life_ratio() * 0.5)
    }
}

/// Capped particle pool
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    capacity: usize,
    rng: Pcg32,
}

impl ParticleSystem {
    pub fn new(seed: u64) -> Self {
        Self::with_capacity(seed, MAX_PARTICLES)
    }

    pub fn with_capacity(seed: u64, capacity: usize) -> Self {
        Self {
            particles: Vec::with_capacity(capacity.min(MAX_PARTICLES)),
            capacity,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Lower or raise the cap; excess particles are trimmed immediately
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.particles.truncate(capacity);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Cosmetic coin flip, drawn from this system's own stream
    pub fn roll(&mut self, chance: f32) -> bool {
        self.rng.random::<f32>() < chance
    }

    /// Push one particle unless the pool is full
    fn push(&mut self, particle: Particle) -> bool {
        if self.particles.len() >= self.capacity {
            return false;
        }
        self.particles.push(particle);
        true
    }

    /// Integrate and expire
    pub fn update(&mut self, dt: f32) {
        for p in self.particles.iter_mut() {
            p.pos += p.vel * dt;
            p.vel.y += p.gravity * dt;
            p.vel *= per_frame(p.friction, dt);
            p.life -= dt;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    /// Ring burst plus a white core flash; `power` scales speed and flash size
    pub fn spawn_explosion(&mut self, pos: Vec2, tint: Tint, count: usize, power: f32) {
        for i in 0..count {
            let angle = TAU * i as f32 / count as f32 + self.rng.random::<f32>() * 0.5;
            let speed = (120.0 + self.rng.random::<f32>() * 240.0) * power;
            let particle = Particle {
                pos,
                vel: Vec2::from_angle(angle) * speed,
                life: 0.3 + self.rng.random::<f32>() * 0.2,
                max_life: 0.5,
                size: 3.0 + self.rng.random::<f32>() * 4.0,
                tint,
                kind: ParticleKind::Explosion,
                gravity: 180.0,
                friction: 0.96,
            };
            if !self.push(particle) {
                return;
            }
        }

        self.push(Particle {
            pos,
            vel: Vec2::ZERO,
            life: 0.15,
            max_life: 0.15,
            size: 30.0 * power,
            tint: Tint::White,
            kind: ParticleKind::Explosion,
            gravity: 0.0,
            friction: 1.0,
        });
    }

    pub fn spawn_sparks(&mut self, pos: Vec2, tint: Tint, count: usize) {
        for _ in 0..count {
            let angle = self.rng.random::<f32>() * TAU;
            let speed = 60.0 + self.rng.random::<f32>() * 180.0;
            let particle = Particle {
                pos,
                vel: Vec2::from_angle(angle) * speed,
                life: 0.2 + self.rng.random::<f32>() * 0.2,
                max_life: 0.4,
                size: 2.0 + self.rng.random::<f32>() * 2.0,
                tint,
                kind: ParticleKind::Spark,
                gravity: 72.0,
                friction: 0.98,
            };
            if !self.push(particle) {
                return;
            }
        }
    }

    /// Engine exhaust puff
    pub fn spawn_trail(&mut self, pos: Vec2, tint: Tint) {
        let jitter = (self.rng.random::<f32>() - 0.5) * 4.0;
        let vel = Vec2::new(
            (self.rng.random::<f32>() - 0.5) * 30.0,
            60.0 + self.rng.random::<f32>() * 60.0,
        );
        let size = 3.0 + self.rng.random::<f32>() * 2.0;
        self.push(Particle {
            pos: pos + Vec2::new(jitter, 0.0),
            vel,
            life: 0.15,
            max_life: 0.15,
            size,
            tint,
            kind: ParticleKind::Trail,
            gravity: 0.0,
            friction: 0.95,
        });
    }

    /// Eight-point sparkle that drifts upward
    pub fn spawn_pickup(&mut self, pos: Vec2, tint: Tint) {
        for i in 0..8 {
            let angle = TAU * i as f32 / 8.0;
            let particle = Particle {
                pos,
                vel: Vec2::from_angle(angle) * 120.0 - Vec2::new(0.0, 60.0),
                life: 0.4,
                max_life: 0.4,
                size: 10.0,
                tint,
                kind: ParticleKind::Pickup,
                gravity: -72.0,
                friction: 0.95,
            };
            if !self.push(particle) {
                return;
            }
        }
    }

    /// Bomb exhaust
    pub fn spawn_smoke(&mut self, pos: Vec2) {
        let jitter = (self.rng.random::<f32>() - 0.5) * 10.0;
        let vel = Vec2::new(
            (self.rng.random::<f32>() - 0.5) * 18.0,
            -30.0 - self.rng.random::<f32>() * 30.0,
        );
        let size = 8.0 + self.rng.random::<f32>() * 8.0;
        self.push(Particle {
            pos: pos + Vec2::new(jitter, 0.0),
            vel,
            life: 0.5,
            max_life: 0.5,
            size,
            tint: Tint::Smoke,
            kind: ParticleKind::Smoke,
            gravity: -36.0,
            friction: 0.99,
        });
    }

    /// Twinkling star somewhere inside `bounds` (victory screen ambience)
    pub fn spawn_star(&mut self, bounds: Vec2, tint: Tint) {
        let pos = Vec2::new(
            self.rng.random::<f32>() * bounds.x,
            self.rng.random::<f32>() * bounds.y,
        );
        let size = 2.0 + self.rng.random::<f32>() * 3.0;
        self.push(Particle {
            pos,
            vel: Vec2::new(0.0, -20.0),
            life: 0.6,
            max_life: 0.6,
            size,
            tint,
            kind: ParticleKind::Star,
            gravity: 0.0,
            friction: 1.0,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cap_drops_excess_spawns() {
        let mut particles = ParticleSystem::with_capacity(1, 10);
        particles.spawn_explosion(Vec2::ZERO, Tint::Gold, 30, 1.0);
        assert_eq!(particles.len(), 10);

        particles.spawn_sparks(Vec2::ZERO, Tint::Cyan, 5);
        particles.spawn_smoke(Vec2::ZERO);
        assert_eq!(particles.len(), 10);
    }

    #[test]
    fn test_default_cap() {
        let mut particles = ParticleSystem::new(1);
        for _ in 0..40 {
            particles.spawn_explosion(Vec2::ZERO, Tint::Red, 30, 1.0);
        }
        assert_eq!(particles.len(), MAX_PARTICLES);
    }

    #[test]
    fn test_particles_expire() {
        let mut particles = ParticleSystem::new(7);
        particles.spawn_explosion(Vec2::new(100.0, 100.0), Tint::Orange, 12, 1.0);
        assert_eq!(particles.len(), 13);

        // Longest explosion life is 0.5 s
        for _ in 0..40 {
            particles.update(1.0 / 60.0);
        }
        assert!(particles.is_empty());
    }

    #[test]
    fn test_explosion_flies_outward() {
        let mut particles = ParticleSystem::new(3);
        particles.spawn_explosion(Vec2::ZERO, Tint::Gold, 8, 1.0);
        particles.update(1.0 / 60.0);
        let moved = particles
            .iter()
            .filter(|p| p.kind == ParticleKind::Explosion && p.size < 10.0)
            .all(|p| p.pos.length() > 0.0);
        assert!(moved);
    }

    #[test]
    fn test_shrinking_capacity_trims() {
        let mut particles = ParticleSystem::new(5);
        particles.spawn_sparks(Vec2::ZERO, Tint::White, 50);
        particles.set_capacity(20);
        assert_eq!(particles.len(), 20);
    }

    #[test]
    fn test_fade_curve() {
        let mut p = Particle {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            life: 1.0,
            max_life: 1.0,
            size: 10.0,
            tint: Tint::White,
            kind: ParticleKind::Spark,
            gravity: 0.0,
            friction: 1.0,
        };
        assert!((p.alpha() - 1.0).abs() < 0.001);
        assert!((p.render_size() - 10.0).abs() < 0.001);

        p.life = 0.25;
        assert!((p.alpha() - 0.5).abs() < 0.001);
        assert!((p.render_size() - 6.25).abs() < 0.001);
    }
}
