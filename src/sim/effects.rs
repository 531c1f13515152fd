//! Screen effects
//!
//! A handful of independent decaying scalars. Gameplay reads exactly two of
//! them: `time_scale` (slow motion) and the hit-pause countdown. Everything
//! else only feeds the renderer.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::particles::Tint;
use crate::per_frame;

/// Shake magnitudes below this snap to zero
const SHAKE_FLOOR: f32 = 0.1;
/// Chromatic offsets below this snap to zero
const CHROMATIC_FLOOR: f32 = 0.1;
/// Chromatic offset kept per reference frame
const CHROMATIC_DECAY: f32 = 0.95;
/// Flash alpha lost per second
const FLASH_FADE: f32 = 5.0;
/// Time scale regained per second
const SLOWMO_RECOVERY: f32 = 2.0;
/// Cap on accumulated freeze-frame time
const MAX_HIT_PAUSE: f32 = 0.12;

#[derive(Debug, Clone)]
pub struct ScreenEffects {
    /// Shake magnitude in pixels
    pub shake: f32,
    /// Shake kept per reference frame
    pub shake_decay: f32,
    /// Render offset for this frame
    pub offset: Vec2,
    /// Overlay alpha
    pub flash: f32,
    pub flash_tint: Tint,
    /// Channel split in pixels
    pub chromatic: f32,
    /// Multiplier on simulation delta (1.0 = real time)
    pub time_scale: f32,
    /// Seconds of full freeze left
    pub hit_pause: f32,
    /// Multiplier applied to shake and flash triggers (accessibility)
    pub intensity: f32,
    rng: Pcg32,
}

impl ScreenEffects {
    pub fn new(seed: u64) -> Self {
        Self {
            shake: 0.0,
            shake_decay: 0.9,
            offset: Vec2::ZERO,
            flash: 0.0,
            flash_tint: Tint::White,
            chromatic: 0.0,
            time_scale: 1.0,
            hit_pause: 0.0,
            intensity: 1.0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Advance every effect by `dt` real seconds
    pub fn update(&mut self, dt: f32) {
        if self.shake > SHAKE_FLOOR {
            self.offset = Vec2::new(
                (self.rng.random::<f32>() - 0.5) * self.shake,
                (self.rng.random::<f32>() - 0.5) * self.shake,
            );
            self.shake *= per_frame(self.shake_decay, dt);
        } else {
            self.shake = 0.0;
            self.offset = Vec2::ZERO;
        }

        if self.flash > 0.0 {
            self.flash = (self.flash - dt * FLASH_FADE).max(0.0);
        }

        if self.chromatic > 0.0 {
            self.chromatic *= per_frame(CHROMATIC_DECAY, dt);
            if self.chromatic < CHROMATIC_FLOOR {
                self.chromatic = 0.0;
            }
        }

        if self.time_scale < 1.0 {
            self.time_scale = (self.time_scale + dt * SLOWMO_RECOVERY).min(1.0);
        }
    }

    /// Count down the freeze frame; returns true while still frozen
    pub fn tick_hit_pause(&mut self, dt: f32) -> bool {
        if self.hit_pause <= 0.0 {
            return false;
        }
        self.hit_pause = (self.hit_pause - dt).max(0.0);
        true
    }

    pub fn is_hit_paused(&self) -> bool {
        self.hit_pause > 0.0
    }

    /// Start a shake unless a stronger one is already running
    pub fn shake(&mut self, magnitude: f32, decay: f32) {
        let magnitude = magnitude * self.intensity;
        if magnitude >= self.shake {
            self.shake = magnitude;
            self.shake_decay = decay;
        }
    }

    pub fn flash(&mut self, tint: Tint, alpha: f32) {
        self.flash = (alpha * self.intensity).clamp(0.0, 1.0);
        self.flash_tint = tint;
    }

    pub fn chromatic(&mut self, amount: f32) {
        self.chromatic = self.chromatic.max(amount * self.intensity);
    }

    pub fn slow_motion(&mut self, scale: f32) {
        self.time_scale = self.time_scale.min(scale.clamp(0.05, 1.0));
    }

    /// Freeze the simulation briefly; repeated hits stack up to a cap
    pub fn freeze(&mut self, seconds: f32) {
        self.hit_pause = (self.hit_pause + seconds).min(MAX_HIT_PAUSE);
    }

    /// Ordinary hit
    pub fn impact(&mut self, strength: f32) {
        self.shake(8.0 * strength, 0.85);
        self.flash(Tint::White, 0.3 * strength);
        self.chromatic(3.0 * strength);
    }

    /// Boss arrival, boss hit, player death
    pub fn big_impact(&mut self) {
        self.shake(20.0, 0.88);
        self.flash(Tint::Red, 0.5);
        self.chromatic(8.0);
        self.slow_motion(0.2);
    }

    pub fn victory(&mut self) {
        self.flash(Tint::Green, 0.6);
        self.shake(15.0, 0.92);
    }
}
