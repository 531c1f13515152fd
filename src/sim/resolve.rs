//! Collision and damage resolution
//!
//! Runs once per combat frame after everything has moved. Hits only clear
//! `active` flags; one sweep at the end removes the dead, so every pair is
//! tested against the same snapshot of the collections.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::{circles_overlap, point_in_radius};
use super::entity::{BulletOwner, Drop, DropKind, EnemyKind};
use super::particles::Tint;
use super::phase::GamePhase;
use super::state::GameState;
use crate::audio::SoundEffect;
use crate::consts::*;

/// What happened when something reached the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strike {
    /// Passed through an invincible player
    Ignored,
    /// Eaten by the shield
    Absorbed,
    /// Health lost
    Damaged,
}

/// Resolve every collision for this frame and sweep destroyed entities
pub fn resolve_collisions(state: &mut GameState) {
    if state.phase.is_combat() {
        shots_vs_enemies(state);
    }
    if state.phase == GamePhase::Boss {
        bombs_vs_boss(state);
    }
    if state.phase.is_combat() {
        hostiles_vs_player(state);
    }
    if state.phase.is_combat() {
        enemies_vs_player(state);
    }
    if state.phase.is_combat() {
        collect_drops(state);
    }
    sweep(state);
}

/// Remove everything flagged inactive this frame
pub fn sweep(state: &mut GameState) {
    state.bullets.retain(|b| b.body.active);
    state.enemies.retain(|e| e.body.active);
    state.drops.retain(|d| d.body.active);
}

/// Spark color for an enemy kind
pub fn enemy_tint(kind: EnemyKind) -> Tint {
    match kind {
        EnemyKind::Worker => Tint::Purple,
        EnemyKind::Shooter => Tint::Red,
        EnemyKind::Carrier => Tint::Orange,
    }
}

fn shots_vs_enemies(state: &mut GameState) {
    let mut kills: Vec<(EnemyKind, Vec2)> = Vec::new();

    for bullet in state.bullets.iter_mut() {
        if !bullet.body.active || bullet.owner != BulletOwner::Player {
            continue;
        }
        for enemy in state.enemies.iter_mut() {
            if !enemy.body.active
                || !circles_overlap(&bullet.body, &enemy.body, SHOT_ENEMY_PADDING)
            {
                continue;
            }
            // Shots are always consumed
            bullet.body.active = false;
            enemy.health -= bullet.damage;
            enemy.hit_flash = 0.1;
            state
                .particles
                .spawn_sparks(enemy.body.pos, enemy_tint(enemy.kind), 5);
            if enemy.health <= 0 {
                enemy.body.active = false;
                kills.push((enemy.kind, enemy.body.pos));
            }
            break;
        }
    }

    for (kind, pos) in kills {
        kill_enemy(state, kind, pos);
    }
}

/// Score, combo, explosion and loot for a shot-down enemy
pub fn kill_enemy(state: &mut GameState, kind: EnemyKind, pos: Vec2) {
    let awarded = state.stats.register_kill(kind.score());
    log::trace!(
        "{:?} down: +{} (combo {})",
        kind,
        awarded,
        state.stats.current_combo
    );
    state.particles.spawn_explosion(pos, enemy_tint(kind), 15, 1.0);
    state.play(SoundEffect::Hit);

    if let Some(drop_kind) = roll_loot(&mut state.rng, kind) {
        state.drops.push(Drop::new(drop_kind, pos));
    }
}

/// Carriers always drop; everything else drops with `DROP_CHANCE`
///
/// Kind weights: bomb 2, health 1, shield 1.
pub fn roll_loot(rng: &mut Pcg32, kind: EnemyKind) -> Option<DropKind> {
    if !kind.always_drops() && rng.random::<f32>() >= DROP_CHANCE {
        return None;
    }
    Some(match rng.random_range(0..4) {
        0 | 1 => DropKind::Bomb,
        2 => DropKind::Health,
        _ => DropKind::Shield,
    })
}

fn bombs_vs_boss(state: &mut GameState) {
    if !state.boss.body.active || state.boss.is_entering() {
        return;
    }

    let mut hits = 0;
    let mut defeated = false;
    for bullet in state.bullets.iter_mut() {
        if !bullet.body.active
            || bullet.owner != BulletOwner::Bomb
            || !circles_overlap(&bullet.body, &state.boss.body, BOMB_BOSS_PADDING)
        {
            continue;
        }
        bullet.body.active = false;
        hits += 1;

        let before = state.boss.health;
        state.boss.health -= bullet.damage;
        debug_assert_eq!(state.boss.health, before - bullet.damage);
        state.boss.hit_flash = 0.2;
        log::info!("Bomb hit: boss {} -> {}", before, state.boss.health);

        state
            .particles
            .spawn_explosion(bullet.body.pos, Tint::Orange, 30, 1.5);
        state.effects.big_impact();
        state.effects.freeze(HIT_PAUSE);

        if state.boss.is_dead() {
            defeated = true;
            break;
        }
    }

    // `play` needs the whole state, so sounds go out after the loop
    for _ in 0..hits {
        state.play(SoundEffect::Explosion);
    }

    if defeated {
        state.set_phase(GamePhase::Victory);
    }
}

/// Apply a hit from a hostile source to the player
pub fn strike_player(state: &mut GameState, damage: i32) -> Strike {
    let player = &mut state.player;
    if player.is_invincible() {
        return Strike::Ignored;
    }

    let pos = player.body.pos;
    if player.shielded {
        player.break_shield();
        state.particles.spawn_explosion(pos, Tint::Cyan, 10, 0.5);
        state.play(SoundEffect::Hit);
        return Strike::Absorbed;
    }

    player.take_damage(damage);
    state.stats.damage_taken += damage.max(0) as u32;
    state.stats.break_combo();
    state.particles.spawn_explosion(pos, Tint::Red, 15, 1.0);
    state.play(SoundEffect::Damage);
    state.effects.impact(1.0);

    if state.player.is_dead() && state.phase.is_combat() {
        state.set_phase(GamePhase::Defeat);
    }
    Strike::Damaged
}

fn hostiles_vs_player(state: &mut GameState) {
    let touching: Vec<usize> = state
        .bullets
        .iter()
        .enumerate()
        .filter(|(_, b)| {
            b.body.active
                && b.owner == BulletOwner::Hostile
                && circles_overlap(&b.body, &state.player.body, HOSTILE_PLAYER_PADDING)
        })
        .map(|(i, _)| i)
        .collect();

    for i in touching {
        if !state.phase.is_combat() || state.player.is_invincible() {
            break;
        }
        state.bullets[i].body.active = false;
        let damage = state.bullets[i].damage;
        strike_player(state, damage);
    }
}

fn enemies_vs_player(state: &mut GameState) {
    let touching: Vec<usize> = state
        .enemies
        .iter()
        .enumerate()
        .filter(|(_, e)| {
            e.body.active && circles_overlap(&e.body, &state.player.body, CONTACT_PADDING)
        })
        .map(|(i, _)| i)
        .collect();

    for i in touching {
        if !state.phase.is_combat() || state.player.is_invincible() {
            break;
        }
        // Destroyed on contact whatever its health
        let enemy = &mut state.enemies[i];
        enemy.body.active = false;
        let (pos, kind) = (enemy.body.pos, enemy.kind);
        state.particles.spawn_explosion(pos, enemy_tint(kind), 10, 0.8);
        strike_player(state, CONTACT_DAMAGE);
    }
}

fn collect_drops(state: &mut GameState) {
    let player_pos = state.player.body.pos;
    let mut collected: Vec<(DropKind, Vec2)> = Vec::new();
    for drop in state.drops.iter_mut() {
        if drop.body.active && point_in_radius(drop.body.pos, player_pos, PICKUP_RADIUS) {
            drop.body.active = false;
            collected.push((drop.kind, drop.body.pos));
        }
    }

    for (kind, pos) in collected {
        apply_drop(state, kind, pos);
    }
}

/// Apply a pickup's effect to the player
pub fn apply_drop(state: &mut GameState, kind: DropKind, pos: Vec2) {
    let tint = match kind {
        DropKind::Bomb => {
            state.player.bombs += 1;
            Tint::Orange
        }
        DropKind::Health => {
            state.player.heal(HEALTH_RESTORE);
            state.effects.flash(Tint::Green, 0.2);
            Tint::Red
        }
        DropKind::Shield => {
            state.player.grant_shield();
            state.effects.flash(Tint::Cyan, 0.2);
            Tint::Cyan
        }
    };
    state.particles.spawn_pickup(pos, tint);
    state.play(SoundEffect::Pickup);
}
