//! Boss behaviour
//!
//! Entrance slide, movement patterns, rage escalation and volleys.

use glam::Vec2;
use rand::Rng;

use super::entity::{BossPattern, Bullet, RageTier};
use super::particles::Tint;
use super::state::{GameEvent, GameState};
use crate::audio::TauntPool;
use crate::consts::*;
use crate::frame_chance;

/// Sine sweep amplitude in pixels per second
const SWEEP_SPEED: f32 = 180.0;
/// Sine sweep angular rate (radians per second)
const SWEEP_RATE: f32 = 2.0;
/// Fraction of the horizontal gap to the player closed per reference frame
const TRACK_FOLLOW: f32 = 0.02;
const DASH_SPEED: f32 = 540.0;
const ERRATIC_SPEED: f32 = 240.0;
/// Seconds between erratic heading changes
const ERRATIC_INTERVAL: f32 = 0.25;
/// Horizontal spacing of a fanned volley at the muzzle
const VOLLEY_SPACING: f32 = 30.0;
/// Angle between bullets of an aimed volley (radians)
const AIMED_SPREAD: f32 = 0.12;
/// Chance of a taunt when the pattern changes
const PATTERN_TAUNT_CHANCE: f32 = 0.4;

/// Resting height once the entrance is over
pub fn resting_y() -> f32 {
    BOSS_START_Y + BOSS_ENTRANCE_TRAVEL
}

/// Advance the boss by `dt` (time-scaled) seconds
pub fn update_boss(state: &mut GameState, dt: f32) {
    if state.boss.is_entering() {
        update_entrance(state, dt);
        return;
    }

    let boss = &mut state.boss;
    boss.clock += dt;
    boss.hit_flash = (boss.hit_flash - dt).max(0.0);

    boss.pattern_timer += dt;
    if boss.pattern_timer >= BOSS_PATTERN_DURATION {
        boss.pattern_timer -= BOSS_PATTERN_DURATION;
        boss.pattern = boss.pattern.next();
        boss.dash_target = None;
        boss.jitter_timer = 0.0;
        log::debug!("Boss pattern -> {:?}", boss.pattern);
        if state.rng.random::<f32>() < PATTERN_TAUNT_CHANCE {
            state.emit(GameEvent::Taunt(TauntPool::Boss));
        }
    }

    move_boss(state, dt);
    update_rage(state);

    let tier = state.boss.rage;
    if state.rng.random::<f32>() < frame_chance(tier.fire_chance(), dt) {
        fire_volley(state, tier);
    }
}

fn update_entrance(state: &mut GameState, dt: f32) {
    let boss = &mut state.boss;
    boss.enter_progress = (boss.enter_progress + dt / BOSS_ENTRANCE_DURATION).min(1.0);
    boss.body.pos.y = BOSS_START_Y + boss.enter_progress * BOSS_ENTRANCE_TRAVEL;

    if boss.enter_progress >= 1.0 {
        boss.body.pos.y = resting_y();
        boss.body.active = true;
        log::info!("Boss arrived ({} hp)", boss.health);
    }
}

fn move_boss(state: &mut GameState, dt: f32) {
    let width = state.config.width;
    let player_x = state.player.body.pos.x;
    let boss = &mut state.boss;
    let half = boss.body.radius();
    let (min_x, max_x) = (half, (width - half).max(half));

    match boss.pattern {
        BossPattern::SineSweep => {
            boss.body.pos.x += (boss.clock * SWEEP_RATE).sin() * SWEEP_SPEED * dt;
        }
        BossPattern::TrackPlayer => {
            boss.body.pos.x += (player_x - boss.body.pos.x) * frame_chance(TRACK_FOLLOW, dt);
        }
        BossPattern::Dash => {
            let target = match boss.dash_target {
                Some(x) => x,
                None => {
                    let x = state.rng.random_range(min_x..=max_x);
                    boss.dash_target = Some(x);
                    x
                }
            };
            let gap = target - boss.body.pos.x;
            let step = DASH_SPEED * dt;
            if gap.abs() <= step {
                boss.body.pos.x = target;
                boss.dash_target = None;
            } else {
                boss.body.pos.x += step * gap.signum();
            }
        }
        BossPattern::Erratic => {
            boss.jitter_timer -= dt;
            if boss.jitter_timer <= 0.0 {
                boss.jitter_timer = ERRATIC_INTERVAL;
                boss.body.vel.x = state.rng.random_range(-ERRATIC_SPEED..=ERRATIC_SPEED);
            }
            boss.body.pos.x += boss.body.vel.x * dt;
        }
    }

    boss.body.pos.x = boss.body.pos.x.clamp(min_x, max_x);
    boss.body.pos.y = resting_y();
}

/// Escalate when health crosses a threshold; tiers never go back down
fn update_rage(state: &mut GameState) {
    let tier = RageTier::from_fraction(state.boss.health_fraction());
    if tier <= state.boss.rage {
        return;
    }
    state.boss.rage = tier;
    log::info!("Boss rage -> {:?}", tier);
    state.effects.impact(1.5);
    let pos = state.boss.body.pos;
    state.particles.spawn_sparks(pos, Tint::Red, 20);
    state.emit(GameEvent::Taunt(TauntPool::Boss));
}

/// Fire one volley: fanned straight down, or aimed at the player when enraged
pub fn fire_volley(state: &mut GameState, tier: RageTier) {
    let count = tier.volley_size();
    let speed = tier.bullet_speed();
    let muzzle = state.boss.body.pos + Vec2::new(0.0, state.boss.body.size.y / 2.0);
    let aimed = state.rng.random::<f32>() < tier.aim_chance();
    let to_player = (state.player.body.pos - muzzle).normalize_or(Vec2::Y);

    let half = (count / 2) as i32;
    for i in -half..=half {
        let offset = i as f32;
        let (pos, vel) = if aimed {
            let dir = Vec2::from_angle(offset * AIMED_SPREAD).rotate(to_player);
            (muzzle, dir * speed)
        } else {
            (
                muzzle + Vec2::new(offset * VOLLEY_SPACING, 0.0),
                Vec2::new(offset * VOLLEY_SPACING, speed),
            )
        };
        state.bullets.push(Bullet::hostile(pos, vel, BOSS_BULLET_DAMAGE));
    }
    log::trace!("Boss volley: {} bullets, aimed={}", count, aimed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::GamePhase;
    use crate::sim::entity::BulletOwner;

    fn boss_state() -> GameState {
        let mut state = GameState::new(GameConfig::default(), 11);
        state.set_phase(GamePhase::Wave);
        state.set_phase(GamePhase::Boss);
        state
    }

    #[test]
    fn test_entrance_takes_one_second() {
        let mut state = boss_state();
        assert!(!state.boss.body.active);

        for _ in 0..31 {
            update_boss(&mut state, 1.0 / 32.0);
        }
        assert!(state.boss.is_entering());
        assert!(!state.boss.body.active);

        update_boss(&mut state, 1.0 / 32.0);
        assert!(!state.boss.is_entering());
        assert!(state.boss.body.active);
        assert!((state.boss.body.pos.y - resting_y()).abs() < 0.001);
    }

    #[test]
    fn test_patterns_rotate_every_two_seconds() {
        let mut state = boss_state();
        state.boss.enter_progress = 1.0;
        state.boss.body.active = true;
        assert_eq!(state.boss.pattern, BossPattern::SineSweep);

        for _ in 0..64 {
            update_boss(&mut state, 1.0 / 32.0);
        }
        assert_eq!(state.boss.pattern, BossPattern::TrackPlayer);
    }

    #[test]
    fn test_boss_stays_on_screen() {
        let mut state = boss_state();
        state.boss.enter_progress = 1.0;
        state.boss.body.active = true;
        for _ in 0..2000 {
            update_boss(&mut state, 1.0 / 60.0);
            let x = state.boss.body.pos.x;
            assert!(x >= BOSS_SIZE / 2.0 - 0.001);
            assert!(x <= state.config.width - BOSS_SIZE / 2.0 + 0.001);
        }
    }

    #[test]
    fn test_rage_escalates_once_per_tier() {
        let mut state = boss_state();
        state.boss.enter_progress = 1.0;
        state.boss.body.active = true;
        state.boss.health = 90;
        state.drain_events().for_each(drop);

        update_rage(&mut state);
        assert_eq!(state.boss.rage, RageTier::Angry);
        assert!(state.events().contains(&GameEvent::Taunt(TauntPool::Boss)));

        state.drain_events().for_each(drop);
        update_rage(&mut state);
        assert!(state.events().is_empty());

        state.boss.health = 40;
        update_rage(&mut state);
        assert_eq!(state.boss.rage, RageTier::Furious);
    }

    #[test]
    fn test_volley_size_scales_with_rage() {
        let mut state = boss_state();
        fire_volley(&mut state, RageTier::Calm);
        assert_eq!(state.bullets.len(), 3);

        state.bullets.clear();
        fire_volley(&mut state, RageTier::Furious);
        assert_eq!(state.bullets.len(), 7);
        assert!(state.bullets.iter().all(|b| b.owner == BulletOwner::Hostile));
        assert!(
            state
                .bullets
                .iter()
                .all(|b| (b.body.vel.length() - RageTier::Furious.bullet_speed()).abs() < 100.0)
        );
    }
}
