//! Sprite catalogue and load tracking
//!
//! The host loads images asynchronously and reports back here. Until a sprite
//! is `Ready` (and forever if it failed) the scene draws geometry instead.

use crate::sim::{DropKind, EnemyKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteId {
    Player,
    Boss,
    Background,
    Worker,
    Shooter,
    Carrier,
    BombDrop,
    HealthDrop,
    ShieldDrop,
}

impl SpriteId {
    pub const ALL: [SpriteId; 9] = [
        SpriteId::Player,
        SpriteId::Boss,
        SpriteId::Background,
        SpriteId::Worker,
        SpriteId::Shooter,
        SpriteId::Carrier,
        SpriteId::BombDrop,
        SpriteId::HealthDrop,
        SpriteId::ShieldDrop,
    ];

    /// URL relative to the site root
    pub fn asset_path(self) -> &'static str {
        match self {
            SpriteId::Player => "/images/game/player-ship.webp",
            SpriteId::Boss => "/images/game/boss-rodney.webp",
            SpriteId::Background => "/images/game/background.webp",
            SpriteId::Worker => "/images/game/enemy-worker.png",
            SpriteId::Shooter => "/images/game/enemy-shooter.png",
            SpriteId::Carrier => "/images/game/enemy-carrier.png",
            SpriteId::BombDrop => "/images/game/drop-bomb.png",
            SpriteId::HealthDrop => "/images/game/drop-health.png",
            SpriteId::ShieldDrop => "/images/game/drop-shield.png",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    pub fn for_enemy(kind: EnemyKind) -> Self {
        match kind {
            EnemyKind::Worker => SpriteId::Worker,
            EnemyKind::Shooter => SpriteId::Shooter,
            EnemyKind::Carrier => SpriteId::Carrier,
        }
    }

    pub fn for_drop(kind: DropKind) -> Self {
        match kind {
            DropKind::Bomb => SpriteId::BombDrop,
            DropKind::Health => SpriteId::HealthDrop,
            DropKind::Shield => SpriteId::ShieldDrop,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpriteStatus {
    #[default]
    Loading,
    Ready,
    Failed,
}

/// Load status of every sprite
#[derive(Debug, Clone, Default)]
pub struct SpriteSet {
    status: [SpriteStatus; SpriteId::ALL.len()],
}

impl SpriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything ready (tests, native runs with bundled art)
    pub fn all_ready() -> Self {
        Self {
            status: [SpriteStatus::Ready; SpriteId::ALL.len()],
        }
    }

    pub fn set_status(&mut self, id: SpriteId, status: SpriteStatus) {
        let slot = &mut self.status[id.index()];
        if *slot != status {
            if status == SpriteStatus::Failed {
                log::warn!("Sprite {} failed to load, drawing shapes", id.asset_path());
            }
            *slot = status;
        }
    }

    pub fn status(&self, id: SpriteId) -> SpriteStatus {
        self.status[id.index()]
    }

    pub fn is_ready(&self, id: SpriteId) -> bool {
        self.status(id) == SpriteStatus::Ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprites_start_loading() {
        let sprites = SpriteSet::new();
        assert!(SpriteId::ALL.iter().all(|id| sprites.status(*id) == SpriteStatus::Loading));
        assert!(SpriteId::ALL.iter().all(|id| SpriteSet::all_ready().is_ready(*id)));
    }

    #[test]
    fn test_status_is_per_sprite() {
        let mut sprites = SpriteSet::new();
        sprites.set_status(SpriteId::Boss, SpriteStatus::Ready);
        sprites.set_status(SpriteId::Player, SpriteStatus::Failed);
        assert!(sprites.is_ready(SpriteId::Boss));
        assert!(!sprites.is_ready(SpriteId::Player));
        assert_eq!(sprites.status(SpriteId::Worker), SpriteStatus::Loading);
    }

    #[test]
    fn test_asset_paths_are_unique() {
        let mut paths: Vec<_> = SpriteId::ALL.iter().map(|id| id.asset_path()).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), SpriteId::ALL.len());
    }
}
