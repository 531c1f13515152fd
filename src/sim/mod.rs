//! Simulation module
//!
//! All gameplay logic lives here. This module must stay platform-free:
//! - Seeded RNG only
//! - Every timer is a counter decremented inside `tick`
//! - Destruction by `active` flag, swept once per frame
//! - No rendering or audio dependencies (cues leave as `GameEvent`s)

pub mod boss;
pub mod collision;
pub mod effects;
pub mod entity;
pub mod particles;
pub mod phase;
pub mod resolve;
pub mod state;
pub mod tick;

pub use collision::{circles_overlap, clamp_to_bounds, distance};
pub use effects::ScreenEffects;
pub use entity::{
    Boss, BossPattern, Bullet, BulletOwner, Drop, DropKind, Enemy, EnemyKind, Kinematic, Player,
    RageTier, Trail,
};
pub use particles::{Particle, ParticleKind, ParticleSystem, Tint};
pub use phase::{GamePhase, GlitchStage};
pub use state::{GameEvent, GameState, GameStats};
pub use tick::{TickInput, tick};
