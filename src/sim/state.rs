//! Game state and phase transitions
//!
//! One aggregate owns everything a match needs. Only `tick` (and the
//! transition helpers it calls) mutate it; hosts read it through the engine.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::clamp_to_bounds;
use super::effects::ScreenEffects;
use super::entity::{Boss, Bullet, Drop, Enemy, Player};
use super::particles::{ParticleSystem, Tint};
use super::phase::{GamePhase, GlitchStage};
use crate::audio::{SoundEffect, TauntPool, VoiceLine};
use crate::config::GameConfig;
use crate::consts::*;

/// Side effects produced during a tick, drained by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    PhaseChanged(GamePhase),
    Sound(SoundEffect),
    /// A specific voice line; `priority` lines ignore the cooldown
    Voice { line: VoiceLine, priority: bool },
    /// A random line from a pool, subject to the cooldown
    Taunt(TauntPool),
}

/// Numbers the HUD shows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    pub score: u64,
    /// Seconds left in the wave
    pub wave_timer: f32,
    pub enemies_killed: u32,
    pub bombs_used: u32,
    pub damage_taken: u32,
    pub current_combo: u32,
    pub max_combo: u32,
    /// Seconds left before the combo lapses
    pub combo_timer: f32,
}

impl GameStats {
    /// Score multiplier for the current combo
    pub fn combo_multiplier(&self) -> u64 {
        1 + (self.current_combo / COMBO_STEP) as u64
    }

    /// Count a kill: extend the combo and refresh its window
    pub fn register_kill(&mut self, base_score: u64) -> u64 {
        let awarded = base_score * self.combo_multiplier();
        self.score += awarded;
        self.enemies_killed += 1;
        self.current_combo += 1;
        self.combo_timer = COMBO_WINDOW;
        self.max_combo = self.max_combo.max(self.current_combo);
        awarded
    }

    pub fn break_combo(&mut self) {
        self.current_combo = 0;
        self.combo_timer = 0.0;
    }

    /// Let the combo window run down by `dt` unscaled seconds
    pub fn decay_combo(&mut self, dt: f32) {
        if self.combo_timer > 0.0 {
            self.combo_timer -= dt;
            if self.combo_timer <= 0.0 {
                self.break_combo();
            }
        }
    }
}

/// Complete state of one match
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub seed: u64,
    pub phase: GamePhase,
    /// Phase to resume when leaving `Paused`
    pub paused_from: Option<GamePhase>,
    /// Seconds since the intro started
    pub glitch_elapsed: f32,
    /// Seconds of unpaused simulation (animation clock)
    pub time: f32,
    pub player: Player,
    pub boss: Boss,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub drops: Vec<Drop>,
    /// Visual particles (not gameplay-affecting)
    pub particles: ParticleSystem,
    pub effects: ScreenEffects,
    pub stats: GameStats,
    /// Seconds accumulated toward the next enemy spawn
    pub spawn_timer: f32,
    /// Bomb button state last tick (edge detection)
    pub bomb_held: bool,
    /// Gameplay RNG (spawns, loot, boss decisions)
    pub rng: Pcg32,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh match in the intro phase
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let config = config.sanitized();
        Self {
            player: Player::new(config.width, config.height),
            boss: Boss::new(config.width, config.boss_max_health),
            seed,
            phase: GamePhase::Glitch,
            paused_from: None,
            glitch_elapsed: 0.0,
            time: 0.0,
            enemies: Vec::new(),
            bullets: Vec::new(),
            drops: Vec::new(),
            particles: ParticleSystem::new(seed ^ 0x9e37_79b9_7f4a_7c15),
            effects: ScreenEffects::new(seed.rotate_left(17)),
            stats: GameStats::default(),
            spawn_timer: 0.0,
            bomb_held: false,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            config,
        }
    }

    /// Playfield size in pixels
    pub fn bounds(&self) -> Vec2 {
        Vec2::new(self.config.width, self.config.height)
    }

    pub fn glitch_stage(&self) -> GlitchStage {
        GlitchStage::at(self.glitch_elapsed)
    }

    /// Queue a side effect for the engine
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn play(&mut self, sound: SoundEffect) {
        self.emit(GameEvent::Sound(sound));
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    /// Move to `to`, running its entry side effects
    ///
    /// Illegal requests are programmer errors: they assert in debug builds
    /// and are ignored otherwise. Returns whether the phase changed.
    pub fn set_phase(&mut self, to: GamePhase) -> bool {
        if !self.phase.can_transition(to) {
            debug_assert!(false, "illegal phase transition {:?} -> {:?}", self.phase, to);
            log::warn!("Ignoring illegal phase transition {:?} -> {:?}", self.phase, to);
            return false;
        }

        match to {
            GamePhase::Paused => {
                self.paused_from = Some(self.phase);
            }
            GamePhase::Wave | GamePhase::Boss if self.phase == GamePhase::Paused => {
                // Resume exactly what was interrupted
                if self.paused_from != Some(to) {
                    debug_assert!(false, "resuming {:?} but paused {:?}", to, self.paused_from);
                    return false;
                }
                self.paused_from = None;
            }
            GamePhase::Wave => self.enter_wave(),
            GamePhase::Boss => self.enter_boss(),
            GamePhase::Victory => self.enter_victory(),
            GamePhase::Defeat => self.enter_defeat(),
            GamePhase::Glitch => {}
        }

        log::info!("Phase {} -> {}", self.phase.as_str(), to.as_str());
        self.phase = to;
        self.emit(GameEvent::PhaseChanged(to));
        true
    }

    /// Freeze a combat phase; no-op elsewhere
    pub fn pause(&mut self) -> bool {
        self.phase.is_combat() && self.set_phase(GamePhase::Paused)
    }

    /// Return to the interrupted phase; no-op unless paused
    pub fn resume(&mut self) -> bool {
        match (self.phase, self.paused_from) {
            (GamePhase::Paused, Some(prior)) => self.set_phase(prior),
            _ => false,
        }
    }

    /// Collapse what is left of the intro; the next tick starts the wave
    pub fn skip_glitch(&mut self) {
        if self.phase == GamePhase::Glitch {
            self.glitch_elapsed = GLITCH_DURATION;
        }
    }

    fn enter_wave(&mut self) {
        self.stats.wave_timer = self.config.wave_duration;
        self.spawn_timer = 0.0;
        self.enemies.clear();
        self.bullets.clear();
        self.drops.clear();
        self.play(SoundEffect::Countdown);
    }

    fn enter_boss(&mut self) {
        self.enemies.clear();
        self.stats.wave_timer = 0.0;
        self.boss = Boss::new(self.config.width, self.config.boss_max_health);
        self.emit(GameEvent::Voice {
            line: VoiceLine::Beware,
            priority: true,
        });
        self.effects.big_impact();
    }

    fn enter_victory(&mut self) {
        let pos = self.boss.body.pos;
        self.boss.body.active = false;
        self.particles.spawn_explosion(pos, Tint::Gold, 50, 2.0);
        self.play(SoundEffect::Explosion);
        self.play(SoundEffect::Launch);
        self.effects.victory();
    }

    fn enter_defeat(&mut self) {
        let pos = self.player.body.pos;
        self.particles.spawn_explosion(pos, Tint::Red, 30, 1.5);
        self.emit(GameEvent::Voice {
            line: VoiceLine::Laugh,
            priority: true,
        });
        self.effects.big_impact();
    }

    /// Adopt a new playfield size, pulling everything back inside it
    pub fn resize(&mut self, width: f32, height: f32) {
        let mut config = self.config.clone();
        config.width = width;
        config.height = height;
        self.config = config.sanitized();
        let bounds = self.bounds();

        self.clamp_player();

        // Bodies still entering from above the top edge keep their y
        let pull_in = |pos: Vec2, half: Vec2| {
            let clamped = clamp_to_bounds(pos, half, Vec2::ZERO, bounds);
            Vec2::new(clamped.x, pos.y.min(clamped.y))
        };
        self.boss.body.pos = pull_in(self.boss.body.pos, self.boss.body.half_extents());
        for enemy in &mut self.enemies {
            enemy.body.pos = pull_in(enemy.body.pos, enemy.body.half_extents());
        }
        for drop in &mut self.drops {
            drop.body.pos = pull_in(drop.body.pos, drop.body.half_extents());
        }
        log::debug!("Playfield resized to {}x{}", bounds.x, bounds.y);
    }

    /// Keep the ship inside the lower half; its center may sit on the midline
    pub fn clamp_player(&mut self) {
        let bounds = self.bounds();
        let body = &mut self.player.body;
        let half = body.half_extents();
        body.pos = clamp_to_bounds(body.pos, half, Vec2::new(0.0, bounds.y * 0.5 - half.y), bounds);
    }

    /// Check the health/bomb invariants, clamping them back in release builds
    pub fn enforce_invariants(&mut self) {
        let player = &mut self.player;
        debug_assert!(
            player.health <= player.max_health,
            "player health {} above max {}",
            player.health,
            player.max_health
        );
        player.health = player.health.clamp(0, player.max_health);

        let boss = &mut self.boss;
        debug_assert!(boss.health <= boss.max_health, "boss health above max");
        boss.health = boss.health.clamp(0, boss.max_health);

        if !self.stats.wave_timer.is_finite() || self.stats.wave_timer < 0.0 {
            self.stats.wave_timer = 0.0;
        }
        if self.stats.combo_timer < 0.0 {
            self.stats.combo_timer = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(GameConfig::default(), 42)
    }

    #[test]
    fn test_new_match_starts_in_glitch() {
        let state = state();
        assert_eq!(state.phase, GamePhase::Glitch);
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH);
        assert_eq!(state.player.bombs, 0);
        assert_eq!(state.boss.health, BOSS_MAX_HEALTH);
        assert!(state.enemies.is_empty());
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_every_transition_emits_once() {
        let mut state = state();
        assert!(state.set_phase(GamePhase::Wave));
        assert!(state.set_phase(GamePhase::Boss));
        let changes: Vec<GamePhase> = state
            .drain_events()
            .filter_map(|e| match e {
                GameEvent::PhaseChanged(p) => Some(p),
                _ => None,
            })
            .collect();
        assert_eq!(changes, vec![GamePhase::Wave, GamePhase::Boss]);
    }

    #[test]
    fn test_wave_entry_resets_timer_and_collections() {
        let mut state = state();
        state.drops.push(Drop::new(crate::sim::DropKind::Bomb, Vec2::ZERO));
        state.set_phase(GamePhase::Wave);
        assert_eq!(state.stats.wave_timer, state.config.wave_duration);
        assert!(state.drops.is_empty());
        assert!(state.events().contains(&GameEvent::Sound(SoundEffect::Countdown)));
    }

    #[test]
    fn test_boss_entry_clears_enemies_and_warns() {
        let mut state = state();
        state.set_phase(GamePhase::Wave);
        state.enemies.push(Enemy::new(
            crate::sim::EnemyKind::Worker,
            Vec2::new(100.0, 100.0),
            100.0,
        ));
        state.boss.health = 3;
        state.set_phase(GamePhase::Boss);
        assert!(state.enemies.is_empty());
        assert_eq!(state.boss.health, state.boss.max_health);
        assert_eq!(state.boss.enter_progress, 0.0);
        assert!(state.events().contains(&GameEvent::Voice {
            line: VoiceLine::Beware,
            priority: true
        }));
    }

    #[test]
    fn test_pause_resumes_interrupted_phase() {
        let mut state = state();
        assert!(!state.pause());
        state.set_phase(GamePhase::Wave);
        state.set_phase(GamePhase::Boss);
        assert!(state.pause());
        assert_eq!(state.phase, GamePhase::Paused);
        assert_eq!(state.paused_from, Some(GamePhase::Boss));
        assert!(state.resume());
        assert_eq!(state.phase, GamePhase::Boss);
        assert_eq!(state.paused_from, None);
        assert!(!state.resume());
    }

    #[test]
    fn test_skip_glitch_only_in_intro() {
        let mut state = state();
        state.skip_glitch();
        assert_eq!(state.glitch_elapsed, GLITCH_DURATION);

        let mut state = GameState::new(GameConfig::default(), 1);
        state.set_phase(GamePhase::Wave);
        state.skip_glitch();
        assert_eq!(state.glitch_elapsed, 0.0);
    }

    #[test]
    fn test_resize_clamps_instead_of_deleting() {
        let mut state = state();
        state.set_phase(GamePhase::Wave);
        state.player.body.pos = Vec2::new(580.0, 680.0);
        state.enemies.push(Enemy::new(
            crate::sim::EnemyKind::Worker,
            Vec2::new(590.0, -30.0),
            100.0,
        ));
        state.resize(400.0, 500.0);

        assert_eq!(state.enemies.len(), 1);
        let enemy = &state.enemies[0].body;
        assert!(enemy.pos.x <= 400.0 - enemy.radius());
        assert_eq!(enemy.pos.y, -30.0);

        let player = &state.player.body;
        assert!(player.pos.x <= 375.0 + 0.001);
        assert!(player.pos.y <= 475.0 + 0.001);
        assert!(player.pos.y >= 250.0);
    }

    #[test]
    fn test_invariants_clamp_health() {
        let mut state = state();
        state.player.health = -20;
        state.enforce_invariants();
        assert_eq!(state.player.health, 0);
    }

    #[test]
    fn test_combo_multiplier_steps_every_five_kills() {
        let mut stats = GameStats::default();
        for _ in 0..5 {
            assert_eq!(stats.register_kill(WORKER_SCORE), WORKER_SCORE);
        }
        assert_eq!(stats.register_kill(WORKER_SCORE), 2 * WORKER_SCORE);
        assert_eq!(stats.max_combo, 6);
        assert_eq!(stats.enemies_killed, 6);
    }
}
