//! Variable timestep simulation tick
//!
//! One call advances the match by `dt` seconds. Everything is expressed in
//! seconds and pixels per second; per-frame factors from the 60 Hz tuning
//! are rescaled with `per_frame` / `frame_chance`.

use std::cmp::Ordering;

use glam::Vec2;
use rand::Rng;

use super::boss::update_boss;
use super::collision::distance;
use super::entity::{Bullet, BulletOwner, Enemy, EnemyKind};
use super::particles::Tint;
use super::phase::GamePhase;
use super::resolve::resolve_collisions;
use super::state::{GameEvent, GameState};
use crate::audio::{SoundEffect, TauntPool, VoiceLine};
use crate::consts::*;
use crate::{frame_chance, per_frame};

/// Chance per reference frame of a random taunt during the wave
const WAVE_TAUNT_CHANCE: f32 = 0.002;
/// Spawn interval shrinks by this fraction over the wave
const SPAWN_RAMP: f32 = 0.4;
const MAX_SPAWN_BURST: usize = 2;
/// Shake applied when a bomb leaves
const BOMB_LAUNCH_SHAKE: f32 = 5.0;
const THRUST_CHANCE: f32 = 0.5;
const BOMB_SMOKE_CHANCE: f32 = 0.3;
const VICTORY_STAR_CHANCE: f32 = 0.1;

// Autopilot tuning
const DODGE_RANGE: f32 = 160.0;
const DODGE_WIDTH: f32 = 40.0;
const DODGE_STEP: f32 = 90.0;
const CRUISE_HEIGHT: f32 = 80.0;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Bomb button held (fires on the press edge)
    pub bomb: bool,
    /// Drag/touch target; overrides the direction keys
    pub pointer: Option<Vec2>,
    /// Pause toggle
    pub pause: bool,
    /// Cut the glitch intro short
    pub skip_glitch: bool,
    /// Demo mode - AI flies the ship
    pub autopilot: bool,
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let dt = if dt.is_finite() {
        dt.clamp(0.0, MAX_FRAME_DT)
    } else {
        0.0
    };

    // Handle pause toggle
    if input.pause {
        if state.phase == GamePhase::Paused {
            state.resume();
        } else {
            state.pause();
        }
    }
    if input.skip_glitch {
        state.skip_glitch();
    }

    let mut input = input.clone();
    if input.autopilot && state.phase.is_combat() {
        autopilot(state, &mut input);
    }
    let input = &input;

    let bomb_pressed = input.bomb && !state.bomb_held;
    state.bomb_held = input.bomb;

    match state.phase {
        GamePhase::Glitch => {
            state.glitch_elapsed += dt;
            if state.glitch_elapsed >= GLITCH_DURATION {
                state.set_phase(GamePhase::Wave);
            }
        }
        GamePhase::Wave | GamePhase::Boss => update_combat(state, input, bomb_pressed, dt),
        GamePhase::Victory => {
            if state.particles.roll(frame_chance(VICTORY_STAR_CHANCE, dt)) {
                let bounds = state.bounds();
                state.particles.spawn_star(bounds, Tint::Gold);
            }
        }
        GamePhase::Paused | GamePhase::Defeat => {}
    }

    // Cosmetics keep animating in every phase, paused included
    state.particles.update(dt);
    state.effects.update(dt);

    state.enforce_invariants();
}

fn update_combat(state: &mut GameState, input: &TickInput, bomb_pressed: bool, dt: f32) {
    if state.effects.tick_hit_pause(dt) {
        return;
    }

    let scaled = dt * state.effects.time_scale;
    state.time += scaled;

    update_player(state, input, bomb_pressed, scaled);
    update_bullets(state, scaled);

    match state.phase {
        GamePhase::Wave => {
            update_enemies(state, scaled);
            spawn_enemies(state, scaled);
        }
        GamePhase::Boss => update_boss(state, scaled),
        _ => {}
    }

    update_drops(state, scaled);
    resolve_collisions(state);

    // Timers the player reads off the HUD run on wall time
    state.stats.decay_combo(dt);

    if state.phase == GamePhase::Wave {
        if state.rng.random::<f32>() < frame_chance(WAVE_TAUNT_CHANCE, dt) {
            state.emit(GameEvent::Taunt(TauntPool::Wave));
        }

        state.stats.wave_timer -= dt;
        if state.stats.wave_timer <= 0.0 {
            state.stats.wave_timer = 0.0;
            state.set_phase(GamePhase::Boss);
        }
    }
}

fn update_player(state: &mut GameState, input: &TickInput, bomb_pressed: bool, dt: f32) {
    let speed = state.config.player_speed;
    let player = &mut state.player;
    player.tick_timers(dt);

    if let Some(target) = input.pointer {
        let step = (target - player.body.pos) * frame_chance(POINTER_FOLLOW, dt);
        player.body.vel = if dt > 0.0 { step / dt } else { Vec2::ZERO };
        player.body.pos += step;
    } else {
        let axis = |neg: bool, pos: bool| (pos as i32 - neg as i32) as f32;
        let dir = Vec2::new(axis(input.left, input.right), axis(input.up, input.down));
        let decay = per_frame(PLAYER_RELEASE_DECAY, dt);
        let vel = &mut player.body.vel;
        vel.x = if dir.x != 0.0 { dir.x * speed } else { vel.x * decay };
        vel.y = if dir.y != 0.0 { dir.y * speed } else { vel.y * decay };
        player.body.integrate(dt);
    }

    state.clamp_player();
    let pos = state.player.body.pos;
    state.player.trail.record(pos);
    if state.particles.roll(frame_chance(THRUST_CHANCE, dt)) {
        let exhaust = state.player.exhaust();
        state.particles.spawn_trail(exhaust, Tint::Cyan);
    }

    // Auto-fire
    let player = &mut state.player;
    player.fire_cooldown -= dt;
    if player.fire_cooldown <= 0.0 {
        player.fire_cooldown = (player.fire_cooldown + state.config.player_fire_interval).max(0.0);
        let muzzle = player.muzzle();
        state
            .bullets
            .push(Bullet::shot(muzzle, state.config.bullet_speed));
        state.play(SoundEffect::Tick);
    }

    if bomb_pressed && state.phase == GamePhase::Boss && state.player.bombs > 0 {
        launch_bomb(state);
    }
}

fn launch_bomb(state: &mut GameState) {
    state.player.bombs -= 1;
    state.stats.bombs_used += 1;
    let muzzle = state.player.muzzle();
    state
        .bullets
        .push(Bullet::bomb(muzzle, state.config.bomb_damage));
    log::debug!("Bomb away ({} left)", state.player.bombs);

    state.play(SoundEffect::Launch);
    state.emit(GameEvent::Voice {
        line: VoiceLine::Coward,
        priority: false,
    });
    state.effects.shake(BOMB_LAUNCH_SHAKE, 0.9);
}

fn update_bullets(state: &mut GameState, dt: f32) {
    let height = state.config.height;
    for bullet in state.bullets.iter_mut().filter(|b| b.body.active) {
        bullet.body.integrate(dt);
        bullet.trail.record(bullet.body.pos);

        if bullet.owner == BulletOwner::Bomb
            && state.particles.roll(frame_chance(BOMB_SMOKE_CHANCE, dt))
        {
            state.particles.spawn_smoke(bullet.body.pos);
        }

        let y = bullet.body.pos.y;
        if y < -BULLET_MARGIN || y > height + BULLET_MARGIN {
            bullet.body.active = false;
        }
    }
}

fn update_enemies(state: &mut GameState, dt: f32) {
    let height = state.config.height;
    let mut shots = Vec::new();
    let mut escaped = 0;

    for enemy in state.enemies.iter_mut().filter(|e| e.body.active) {
        enemy.body.integrate(dt);
        enemy.hit_flash = (enemy.hit_flash - dt).max(0.0);

        if enemy.kind == EnemyKind::Shooter {
            enemy.shot_cooldown -= dt;
            if enemy.shot_cooldown <= 0.0 {
                enemy.shot_cooldown += SHOOTER_FIRE_INTERVAL;
                let muzzle = enemy.body.pos + Vec2::new(0.0, enemy.body.size.y / 2.0);
                shots.push(Bullet::hostile(
                    muzzle,
                    Vec2::new(0.0, ENEMY_BULLET_SPEED),
                    ENEMY_BULLET_DAMAGE,
                ));
            }
        }

        if enemy.body.pos.y > height + ENEMY_ESCAPE_MARGIN {
            enemy.body.active = false;
            escaped += 1;
        }
    }

    state.bullets.extend(shots);
    if escaped > 0 {
        log::trace!("{} enemies escaped, combo lost", escaped);
        state.stats.break_combo();
    }
}

/// How far through the wave we are, 0 at the start and 1 at the boss
fn wave_progress(state: &GameState) -> f32 {
    let duration = state.config.wave_duration;
    (1.0 - state.stats.wave_timer / duration).clamp(0.0, 1.0)
}

fn spawn_enemies(state: &mut GameState, dt: f32) {
    let progress = wave_progress(state);
    let interval = state.config.enemy_spawn_interval * (1.0 - SPAWN_RAMP * progress);

    state.spawn_timer += dt;
    if state.spawn_timer < interval {
        return;
    }
    state.spawn_timer = 0.0;

    let width = state.config.width;
    let burst = (1 + (progress * 2.0).floor() as usize).min(MAX_SPAWN_BURST);
    for _ in 0..burst {
        let kind = match state.rng.random_range(0..5) {
            0..=2 => EnemyKind::Worker,
            3 => EnemyKind::Shooter,
            _ => EnemyKind::Carrier,
        };
        let margin = ENEMY_SIZE;
        let x = state.rng.random_range(margin..=(width - margin).max(margin));
        let fall = state.rng.random_range(ENEMY_MIN_SPEED..=ENEMY_MAX_SPEED);
        state
            .enemies
            .push(Enemy::new(kind, Vec2::new(x, -kind.size()), fall));
    }
}

fn update_drops(state: &mut GameState, dt: f32) {
    let bounds = state.bounds();
    let target = state.player.body.pos;
    let pull = frame_chance(MAGNET_PULL, dt);

    for drop in state.drops.iter_mut().filter(|d| d.body.active) {
        drop.pulse += dt;

        if !drop.magnetized
            && (distance(drop.body.pos, target) < MAGNET_RADIUS
                || drop.body.pos.y > bounds.y * MAGNET_LINE)
        {
            drop.magnetized = true;
        }

        if drop.magnetized {
            drop.body.pos += (target - drop.body.pos) * pull;
        } else {
            drop.body.integrate(dt);
        }

        if drop.body.pos.y > bounds.y + BULLET_MARGIN {
            drop.body.active = false;
        }
    }
}

/// Fill in movement and bomb input for demo play
fn autopilot(state: &GameState, input: &mut TickInput) {
    let player = state.player.body.pos;
    let bounds = state.bounds();
    let half = state.player.body.radius();

    // Closest hostile bullet coming down on the ship
    let threat = state
        .bullets
        .iter()
        .filter(|b| b.body.active && b.is_hostile())
        .filter(|b| {
            let above = player.y - b.body.pos.y;
            above > 0.0 && above < DODGE_RANGE && (b.body.pos.x - player.x).abs() < DODGE_WIDTH
        })
        .max_by(|a, b| {
            a.body
                .pos
                .y
                .partial_cmp(&b.body.pos.y)
                .unwrap_or(Ordering::Equal)
        });

    let target_x = if let Some(bullet) = threat {
        let away = if bullet.body.pos.x > player.x { -1.0 } else { 1.0 };
        let x = player.x + away * DODGE_STEP;
        // Backed into a wall: break the other way
        if x < half || x > bounds.x - half {
            player.x - away * DODGE_STEP
        } else {
            x
        }
    } else if let Some(drop) = state
        .drops
        .iter()
        .filter(|d| d.body.active)
        .min_by(|a, b| {
            distance(a.body.pos, player)
                .partial_cmp(&distance(b.body.pos, player))
                .unwrap_or(Ordering::Equal)
        })
    {
        drop.body.pos.x
    } else if state.phase == GamePhase::Boss && state.boss.body.active {
        state.boss.body.pos.x
    } else if let Some(enemy) = state.enemies.iter().filter(|e| e.body.active).max_by(|a, b| {
        a.body
            .pos
            .y
            .partial_cmp(&b.body.pos.y)
            .unwrap_or(Ordering::Equal)
    }) {
        enemy.body.pos.x
    } else {
        // Idle sweep with some variety
        let t = state.time * 0.8;
        bounds.x * 0.5 + (t.sin() * 0.6 + (t * 0.7).sin() * 0.2) * bounds.x * 0.5
    };

    input.pointer = Some(Vec2::new(target_x, bounds.y - CRUISE_HEIGHT));

    let boss = &state.boss;
    let lined_up = (boss.body.pos.x - player.x).abs() < boss.body.radius() * 0.5;
    input.bomb = state.phase == GamePhase::Boss
        && boss.body.active
        && !boss.is_entering()
        && state.player.bombs > 0
        && lined_up
        && !state.bomb_held;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::entity::{Drop, DropKind};
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 32.0;

    /// Wave with spawning effectively off
    fn quiet_wave() -> GameState {
        let config = GameConfig {
            enemy_spawn_interval: 1.0e6,
            ..Default::default()
        };
        let mut state = GameState::new(config, 7);
        state.set_phase(GamePhase::Wave);
        state
    }

    fn settled_boss() -> GameState {
        let mut state = quiet_wave();
        state.set_phase(GamePhase::Boss);
        state.boss.enter_progress = 1.0;
        state.boss.body.active = true;
        state.boss.body.pos.y = crate::sim::boss::resting_y();
        state
    }

    fn press(bomb: bool) -> TickInput {
        TickInput {
            bomb,
            ..Default::default()
        }
    }

    #[test]
    fn test_glitch_lasts_seven_seconds() {
        let mut state = GameState::new(GameConfig::default(), 1);
        let input = TickInput::default();
        for _ in 0..223 {
            tick(&mut state, &input, DT);
        }
        assert_eq!(state.phase, GamePhase::Glitch);

        tick(&mut state, &input, DT);
        assert_eq!(state.phase, GamePhase::Wave);
    }

    #[test]
    fn test_skip_glitch() {
        let mut state = GameState::new(GameConfig::default(), 1);
        let input = TickInput {
            skip_glitch: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        assert_eq!(state.phase, GamePhase::Wave);

        // Ignored once the wave is running
        tick(&mut state, &input, DT);
        assert_eq!(state.phase, GamePhase::Wave);
    }

    #[test]
    fn test_wave_hands_over_to_boss_after_duration() {
        let mut state = quiet_wave();
        let input = TickInput::default();

        for _ in 0..1439 {
            tick(&mut state, &input, DT);
        }
        assert_eq!(state.phase, GamePhase::Wave);
        assert!(state.stats.wave_timer > 0.0);

        tick(&mut state, &input, DT);
        assert_eq!(state.phase, GamePhase::Boss);
        assert!(state.enemies.is_empty());
        assert_eq!(state.boss.health, BOSS_MAX_HEALTH);
        assert!(state.boss.is_entering());
    }

    #[test]
    fn test_wave_spawns_and_shooters_fire() {
        let mut state = GameState::new(GameConfig::default(), 3);
        state.set_phase(GamePhase::Wave);
        let input = TickInput::default();
        for _ in 0..64 {
            tick(&mut state, &input, DT);
        }
        assert!(state.enemies.len() as u32 + state.stats.enemies_killed > 0);
        assert!(state.enemies.iter().all(|e| e.body.vel.y >= ENEMY_MIN_SPEED));

        state.enemies.clear();
        state.enemies.push(Enemy::new(
            EnemyKind::Shooter,
            Vec2::new(100.0, 50.0),
            0.0,
        ));
        state.bullets.clear();
        for _ in 0..48 {
            tick(&mut state, &input, DT);
        }
        assert!(state.bullets.iter().any(|b| b.is_hostile()));
    }

    #[test]
    fn test_spawns_ramp_up_into_pairs() {
        let mut state = GameState::new(GameConfig::default(), 3);
        state.set_phase(GamePhase::Wave);
        let duration = state.config.wave_duration;

        // Start of the wave: one at a time, on the full interval
        spawn_enemies(&mut state, 0.6);
        assert!(state.enemies.is_empty());
        spawn_enemies(&mut state, 0.2);
        assert_eq!(state.enemies.len(), 1);

        // Later on the interval has shrunk and they come in pairs
        state.enemies.clear();
        state.spawn_timer = 0.0;
        state.stats.wave_timer = duration * 0.4;
        spawn_enemies(&mut state, 0.6);
        assert_eq!(state.enemies.len(), MAX_SPAWN_BURST);

        state.enemies.clear();
        state.stats.wave_timer = 0.0;
        spawn_enemies(&mut state, 0.6);
        assert_eq!(state.enemies.len(), MAX_SPAWN_BURST);
    }

    #[test]
    fn test_drops_home_in_on_player() {
        let mut state = quiet_wave();
        let bounds = state.bounds();
        let player = state.player.body.pos;
        let near = player + Vec2::new(50.0, -40.0);
        let low = Vec2::new(20.0, bounds.y * 0.9);
        let far = Vec2::new(20.0, 50.0);
        for pos in [near, low, far] {
            state.drops.push(Drop::new(DropKind::Bomb, pos));
        }

        update_drops(&mut state, DT);

        let [near_drop, low_drop, far_drop] = [&state.drops[0], &state.drops[1], &state.drops[2]];
        assert!(near_drop.magnetized);
        assert!(distance(near_drop.body.pos, player) < distance(near, player));
        assert!(low_drop.magnetized, "below the magnet line");
        assert!(distance(low_drop.body.pos, player) < distance(low, player));
        assert!(!far_drop.magnetized);
        assert!(far_drop.body.pos.y > far.y);
    }

    #[test]
    fn test_wave_clock_ignores_slow_motion() {
        let mut state = quiet_wave();
        state.effects.slow_motion(0.2);
        let timer = state.stats.wave_timer;
        let time = state.time;

        tick(&mut state, &TickInput::default(), DT);

        assert!((timer - state.stats.wave_timer - DT).abs() < 1e-4);
        // Gameplay itself did slow down
        assert!((state.time - time - 0.2 * DT).abs() < 1e-4);
    }

    #[test]
    fn test_eight_bombs_defeat_boss() {
        let mut state = settled_boss();
        state.player.invincible_timer = 1.0e9;
        let input = TickInput::default();

        for hit in 1..=8 {
            let pos = state.boss.body.pos;
            state.bullets.push(Bullet::bomb(pos, BOMB_DAMAGE));
            for _ in 0..200 {
                if !state.bullets.iter().any(|b| b.owner == BulletOwner::Bomb) {
                    break;
                }
                tick(&mut state, &input, DT);
            }
            assert_eq!(state.boss.health, BOSS_MAX_HEALTH - BOMB_DAMAGE * hit);
            if hit < 8 {
                assert_eq!(state.phase, GamePhase::Boss, "early victory after {}", hit);
            }
        }
        assert_eq!(state.phase, GamePhase::Victory);
        assert!(!state.boss.body.active);
    }

    #[test]
    fn test_bomb_fires_on_press_edge_in_boss_only() {
        let mut state = quiet_wave();
        state.player.bombs = 2;
        tick(&mut state, &press(true), DT);
        assert_eq!(state.player.bombs, 2);
        tick(&mut state, &press(false), DT);

        state.set_phase(GamePhase::Boss);
        tick(&mut state, &press(true), DT);
        assert_eq!(state.player.bombs, 1);
        assert!(state.events().contains(&GameEvent::Voice {
            line: VoiceLine::Coward,
            priority: false,
        }));

        // Holding does not repeat
        tick(&mut state, &press(true), DT);
        assert_eq!(state.player.bombs, 1);

        tick(&mut state, &press(false), DT);
        tick(&mut state, &press(true), DT);
        assert_eq!(state.player.bombs, 0);
        assert_eq!(state.stats.bombs_used, 2);

        // Empty: nothing happens
        tick(&mut state, &press(false), DT);
        tick(&mut state, &press(true), DT);
        assert_eq!(state.stats.bombs_used, 2);
    }

    #[test]
    fn test_contact_damage_respects_invincibility() {
        let mut state = quiet_wave();
        let input = TickInput::default();
        let spot = state.player.body.pos;

        state.enemies.push(Enemy::new(EnemyKind::Worker, spot, 0.0));
        tick(&mut state, &input, DT);
        assert_eq!(state.player.health, 85);

        state.enemies.push(Enemy::new(EnemyKind::Worker, spot, 0.0));
        tick(&mut state, &input, DT);
        assert_eq!(state.player.health, 85);
        assert_eq!(state.enemies.len(), 1);
        state.enemies.clear();

        // Wait out the window
        for _ in 0..40 {
            tick(&mut state, &input, DT);
        }
        assert!(!state.player.is_invincible());
        let spot = state.player.body.pos;
        state.enemies.push(Enemy::new(EnemyKind::Worker, spot, 0.0));
        tick(&mut state, &input, DT);
        assert_eq!(state.player.health, 70);
    }

    #[test]
    fn test_combo_expires_after_window() {
        let mut state = quiet_wave();
        state.stats.register_kill(WORKER_SCORE);
        let input = TickInput::default();

        for _ in 0..63 {
            tick(&mut state, &input, DT);
        }
        assert_eq!(state.stats.current_combo, 1);

        for _ in 0..2 {
            tick(&mut state, &input, DT);
        }
        assert_eq!(state.stats.current_combo, 0);
        assert_eq!(state.stats.max_combo, 1);
    }

    #[test]
    fn test_escaped_enemy_breaks_combo() {
        let mut state = quiet_wave();
        state.stats.register_kill(WORKER_SCORE);
        let below = Vec2::new(30.0, state.config.height + ENEMY_ESCAPE_MARGIN - 1.0);
        state.enemies.push(Enemy::new(EnemyKind::Worker, below, 120.0));

        tick(&mut state, &TickInput::default(), DT);
        assert!(state.enemies.is_empty());
        assert_eq!(state.stats.current_combo, 0);
    }

    #[test]
    fn test_pause_only_in_combat() {
        let toggle = TickInput {
            pause: true,
            ..Default::default()
        };
        let idle = TickInput::default();

        let mut state = GameState::new(GameConfig::default(), 9);
        tick(&mut state, &toggle, DT);
        assert_eq!(state.phase, GamePhase::Glitch);

        let mut state = quiet_wave();
        tick(&mut state, &toggle, DT);
        assert_eq!(state.phase, GamePhase::Paused);
        let timer = state.stats.wave_timer;
        for _ in 0..32 {
            tick(&mut state, &idle, DT);
        }
        assert_eq!(state.stats.wave_timer, timer);
        tick(&mut state, &toggle, DT);
        assert_eq!(state.phase, GamePhase::Wave);

        let mut state = settled_boss();
        tick(&mut state, &toggle, DT);
        assert_eq!(state.phase, GamePhase::Paused);
        tick(&mut state, &toggle, DT);
        assert_eq!(state.phase, GamePhase::Boss);
    }

    #[test]
    fn test_keys_move_and_release_decays() {
        let mut state = quiet_wave();
        let start = state.player.body.pos.x;
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        tick(&mut state, &right, DT);
        assert!(state.player.body.pos.x > start);
        assert_eq!(state.player.body.vel.x, state.config.player_speed);

        tick(&mut state, &TickInput::default(), DT);
        let expected = state.config.player_speed * per_frame(PLAYER_RELEASE_DECAY, DT);
        assert!((state.player.body.vel.x - expected).abs() < 0.01);
    }

    #[test]
    fn test_player_stays_in_lower_half() {
        let mut state = quiet_wave();
        let up_left = TickInput {
            up: true,
            left: true,
            ..Default::default()
        };
        for _ in 0..200 {
            tick(&mut state, &up_left, DT);
        }
        let body = &state.player.body;
        assert!((body.pos.x - body.radius()).abs() < 0.001);
        assert!((body.pos.y - state.config.height * 0.5).abs() < 0.001);
    }

    #[test]
    fn test_autopilot_dodges() {
        let mut state = quiet_wave();
        let above = state.player.body.pos - Vec2::new(5.0, 100.0);
        state.bullets.push(Bullet::hostile(
            above,
            Vec2::new(0.0, ENEMY_BULLET_SPEED),
            ENEMY_BULLET_DAMAGE,
        ));
        let start = state.player.body.pos.x;

        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        assert!(state.player.body.pos.x > start + 1.0);
    }

    #[test]
    fn test_determinism() {
        let input = TickInput {
            autopilot: true,
            skip_glitch: true,
            ..Default::default()
        };
        let run = || {
            let mut state = GameState::new(GameConfig::default(), 99999);
            for _ in 0..900 {
                tick(&mut state, &input, 1.0 / 60.0);
            }
            state
        };
        let (a, b) = (run(), run());

        assert_eq!(a.phase, b.phase);
        assert_eq!(a.stats, b.stats);
        assert_eq!(a.enemies.len(), b.enemies.len());
        assert_eq!(a.bullets.len(), b.bullets.len());
        assert!((a.player.body.pos - b.player.body.pos).length() < 0.0001);
    }

    #[test]
    fn test_bad_dt_is_harmless() {
        let mut state = quiet_wave();
        let timer = state.stats.wave_timer;
        tick(&mut state, &TickInput::default(), f32::NAN);
        tick(&mut state, &TickInput::default(), -1.0);
        assert_eq!(state.stats.wave_timer, timer);

        // Long stalls are capped to one max frame
        tick(&mut state, &TickInput::default(), 10.0);
        assert!((timer - state.stats.wave_timer - MAX_FRAME_DT).abs() < 0.0001);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn test_invariants_hold_under_random_input(
            frames in prop::collection::vec(
                (any::<[bool; 5]>(), prop::option::of((0.0f32..600.0, 0.0f32..700.0)), 0.0f32..0.1),
                1..300,
            )
        ) {
            let mut state = GameState::new(GameConfig::default(), 4);
            state.set_phase(GamePhase::Wave);
            state.player.bombs = 3;

            for ([left, right, up, down, bomb], pointer, dt) in frames {
                let input = TickInput {
                    left,
                    right,
                    up,
                    down,
                    bomb,
                    pointer: pointer.map(|(x, y)| Vec2::new(x, y)),
                    ..Default::default()
                };
                tick(&mut state, &input, dt);

                prop_assert!(state.player.health >= 0);
                prop_assert!(state.player.health <= state.player.max_health);
                prop_assert!(state.boss.health >= 0);
                prop_assert!(state.boss.health <= state.boss.max_health);
                prop_assert!(state.stats.wave_timer >= 0.0);
                prop_assert!(state.player.body.pos.y >= state.config.height * 0.5 - 0.001);
                prop_assert!(state.particles.len() <= state.particles.capacity());
            }
        }
    }
}
