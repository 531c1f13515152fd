//! Glitch Arcade - a boss-rush bullet-hell easter egg
//!
//! Core modules:
//! - `sim`: Simulation (entities, collisions, phases, particles, screen effects)
//! - `audio`: Audio cue dispatch behind a platform port
//! - `engine`: Frame-driven facade the host page talks to
//! - `host`: Frame clock and session tickets
//! - `renderer`: Canvas-style draw list built from the game state
//! - `config`: Gameplay configuration and visual settings

pub mod audio;
pub mod config;
pub mod engine;
pub mod host;
pub mod renderer;
pub mod sim;

pub use config::{ConfigError, GameConfig, QualityPreset, Settings};
pub use engine::{Engine, Key};

/// Game configuration constants
///
/// Times are in seconds, speeds in pixels per second. Per-frame factors
/// (decays, probabilities) are expressed against a 60 Hz reference frame
/// and rescaled with [`per_frame`] / [`frame_chance`].
pub mod consts {
    /// Reference frame rate the feel was tuned at
    pub const REFERENCE_FPS: f32 = 60.0;
    /// Longest frame delta the simulation accepts (minimized tab, debugger)
    pub const MAX_FRAME_DT: f32 = 0.05;

    /// Scripted intro
    pub const GLITCH_DURATION: f32 = 7.0;
    pub const GLITCH_SCRAMBLE_END: f32 = 3.0;
    pub const GLITCH_WARNING_END: f32 = 5.0;

    /// Player
    pub const PLAYER_SIZE: f32 = 50.0;
    pub const PLAYER_MAX_HEALTH: i32 = 100;
    pub const PLAYER_TRAIL_LENGTH: usize = 10;
    /// Velocity kept per reference frame on a released axis
    pub const PLAYER_RELEASE_DECAY: f32 = 0.8;
    /// Fraction of the remaining distance covered per reference frame when steering by pointer
    pub const POINTER_FOLLOW: f32 = 0.2;
    pub const INVINCIBILITY_DURATION: f32 = 1.0;
    pub const SHIELD_DURATION: f32 = 10.0;

    /// Boss
    pub const BOSS_SIZE: f32 = 120.0;
    pub const BOSS_MAX_HEALTH: i32 = 200;
    pub const BOSS_START_Y: f32 = -150.0;
    pub const BOSS_ENTRANCE_TRAVEL: f32 = 230.0;
    pub const BOSS_ENTRANCE_DURATION: f32 = 1.0;
    pub const BOSS_PATTERN_DURATION: f32 = 2.0;
    pub const BOSS_BULLET_DAMAGE: i32 = 15;

    /// Bombs
    pub const BOMB_DAMAGE: i32 = 25;
    pub const BOMB_SPEED: f32 = 600.0;
    pub const BOMB_SIZE: f32 = 20.0;
    pub const BOMB_TRAIL_LENGTH: usize = 8;

    /// Player shots
    pub const SHOT_WIDTH: f32 = 4.0;
    pub const SHOT_HEIGHT: f32 = 12.0;
    pub const SHOT_DAMAGE: i32 = 1;

    /// Enemies
    pub const ENEMY_SIZE: f32 = 30.0;
    pub const CARRIER_SIZE: f32 = 40.0;
    pub const ENEMY_MIN_SPEED: f32 = 90.0;
    pub const ENEMY_MAX_SPEED: f32 = 180.0;
    pub const SHOOTER_FIRE_INTERVAL: f32 = 1.5;
    pub const ENEMY_BULLET_SPEED: f32 = 300.0;
    pub const ENEMY_BULLET_SIZE: f32 = 12.0;
    pub const ENEMY_BULLET_DAMAGE: i32 = 15;
    pub const HOSTILE_TRAIL_LENGTH: usize = 4;
    pub const CONTACT_DAMAGE: i32 = 15;
    pub const WORKER_SCORE: u64 = 10;
    pub const CARRIER_SCORE: u64 = 50;

    /// Drops
    pub const DROP_SIZE: f32 = 24.0;
    pub const DROP_FALL_SPEED: f32 = 120.0;
    pub const DROP_CHANCE: f32 = 0.2;
    pub const HEALTH_RESTORE: i32 = 25;
    pub const MAGNET_RADIUS: f32 = 80.0;
    /// Drops below this fraction of the playfield height home in regardless of distance
    pub const MAGNET_LINE: f32 = 0.85;
    /// Fraction of the remaining distance a magnetized drop covers per reference frame
    pub const MAGNET_PULL: f32 = 0.15;
    pub const PICKUP_RADIUS: f32 = 30.0;

    /// Combo
    pub const COMBO_WINDOW: f32 = 2.0;
    /// Kills per extra score multiplier step
    pub const COMBO_STEP: u32 = 5;

    /// Collision paddings (sprite art has transparent margins)
    pub const SHOT_ENEMY_PADDING: f32 = -3.0;
    pub const BOMB_BOSS_PADDING: f32 = -5.0;
    pub const HOSTILE_PLAYER_PADDING: f32 = 0.0;
    pub const CONTACT_PADDING: f32 = 10.0;

    /// Bullets further than this outside the playfield are dropped
    pub const BULLET_MARGIN: f32 = 20.0;
    pub const ENEMY_ESCAPE_MARGIN: f32 = 50.0;

    /// Freeze-frame after a bomb lands
    pub const HIT_PAUSE: f32 = 0.06;

    /// Particle cap
    pub const MAX_PARTICLES: usize = 500;
}

/// Rescale a per-reference-frame multiplicative factor to a frame of `dt` seconds
#[inline]
pub fn per_frame(factor: f32, dt: f32) -> f32 {
    factor.powf(dt * consts::REFERENCE_FPS)
}

/// Rescale a per-reference-frame probability to a frame of `dt` seconds
#[inline]
pub fn frame_chance(chance: f32, dt: f32) -> f32 {
    1.0 - per_frame(1.0 - chance, dt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_frame_matches_reference_rate() {
        let one_frame = 1.0 / consts::REFERENCE_FPS;
        assert!((per_frame(0.8, one_frame) - 0.8).abs() < 0.0001);
        assert!((per_frame(0.8, 2.0 * one_frame) - 0.64).abs() < 0.0001);
        assert!((per_frame(0.8, 0.0) - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_frame_chance() {
        let one_frame = 1.0 / consts::REFERENCE_FPS;
        assert!((frame_chance(0.02, one_frame) - 0.02).abs() < 0.0001);
        assert!(frame_chance(0.02, 2.0 * one_frame) < 0.04);
        assert!(frame_chance(0.02, 2.0 * one_frame) > 0.039);
    }
}
