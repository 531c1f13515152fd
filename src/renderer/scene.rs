//! Scene builder
//!
//! Reads a `GameState` and produces a `Frame`. Nothing here feeds back into
//! the simulation; the renderer keeps its own RNG for star placement and
//! glitch noise.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::frame::{DrawCmd, Frame};
use super::shapes;
use super::sprites::{SpriteId, SpriteSet};
use super::vertex::{Vertex, colors, tint, with_alpha};
use crate::config::QualityPreset;
use crate::consts::GLITCH_WARNING_END;
use crate::sim::{
    Boss, Bullet, BulletOwner, Drop, DropKind, Enemy, EnemyKind, GamePhase, GameState,
    GlitchStage, ParticleKind, Player,
};

const STAR_COUNT: usize = 60;
const GRID_SPACING: f32 = 40.0;
const BLINK_PERIOD: f32 = 0.08;
const SCANLINE_SPACING: f32 = 3.0;
const GLITCH_SYMBOL_COUNT: usize = 15;
const RGB_SPLIT: f32 = 3.0;
const BOSS_BAR_HEIGHT: f32 = 10.0;
const VIGNETTE_STRENGTH: f32 = 0.6;
/// Chromatic offsets below this many pixels are not drawn
const CHROMATIC_MIN: f32 = 0.1;
const CHROMATIC_ALPHA: f32 = 0.3;

const GLITCH_SYMBOLS: &[&str] = &[
    "▓", "▒", "░", "█", "▄", "▀", "■", "□", "●", "○", "◐", "◑", "★", "☆", "✦", "⚡", "⚠", "⬡",
    "⬢",
];

pub const WARNING_TEXT: &str = "⚠ WARNING ⚠";
pub const REVEAL_TEXT: &str = "BEWARE, I BUILD!";
pub const SKIP_PROMPT: &str = "Press ESC to skip";
pub const BOSS_LABEL: &str = "RODNEY";
pub const PAUSED_TEXT: &str = "PAUSED";

#[derive(Debug, Clone)]
struct Star {
    pos: Vec2,
    /// Pixels per second
    speed: f32,
    size: f32,
    twinkle: f32,
}

/// Builds frames from game state
pub struct Renderer {
    size: Vec2,
    stars: Vec<Star>,
    show_stars: bool,
    /// Seconds of animation, independent of the simulation clock
    time: f32,
    rng: Pcg32,
}

impl Renderer {
    pub fn new(width: f32, height: f32, seed: u64) -> Self {
        let mut renderer = Self {
            size: Vec2::new(width, height),
            stars: Vec::with_capacity(STAR_COUNT),
            show_stars: true,
            time: 0.0,
            rng: Pcg32::seed_from_u64(seed),
        };
        renderer.scatter_stars();
        renderer
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.size = Vec2::new(width, height);
        self.scatter_stars();
    }

    pub fn set_quality(&mut self, quality: QualityPreset) {
        self.show_stars = quality.starfield_enabled();
    }

    fn scatter_stars(&mut self) {
        self.stars.clear();
        for _ in 0..STAR_COUNT {
            let pos = Vec2::new(
                self.rng.random::<f32>() * self.size.x,
                self.rng.random::<f32>() * self.size.y,
            );
            self.stars.push(Star {
                pos,
                speed: self.rng.random_range(10.0..40.0),
                size: self.rng.random_range(0.5..2.0),
                twinkle: self.rng.random::<f32>() * std::f32::consts::TAU,
            });
        }
    }

    /// Build the frame for `state`, advancing decorative animation by `dt`
    pub fn render(&mut self, state: &GameState, sprites: &SpriteSet, dt: f32) -> Frame {
        let bounds = state.bounds();
        if bounds != self.size {
            self.resize(bounds.x, bounds.y);
        }
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.time += dt;

        let mut frame = Frame::new(colors::BACKGROUND, state.effects.offset);

        if sprites.is_ready(SpriteId::Background) {
            frame.sprite(SpriteId::Background, bounds * 0.5, bounds, 1.0);
        }
        if self.show_stars {
            self.draw_stars(&mut frame, dt);
        }
        frame.geometry(grid(bounds));

        let entities_start = frame.world.len();
        for drop in &state.drops {
            draw_drop(&mut frame, drop, sprites);
        }
        for enemy in &state.enemies {
            draw_enemy(&mut frame, enemy, sprites);
        }
        draw_bullets(&mut frame, &state.bullets);

        let show_boss = boss_visible(state);
        if show_boss {
            self.draw_boss(&mut frame, &state.boss, sprites);
        }
        if state.phase != GamePhase::Defeat {
            self.draw_player(&mut frame, &state.player, sprites);
        }
        draw_particles(&mut frame, state);

        // Red and cyan copies of every entity, under the real ones
        let chromatic = state.effects.chromatic;
        if chromatic > CHROMATIC_MIN {
            let entities = frame.world.split_off(entities_start);
            for cmd in &entities {
                frame.world.push(chromatic_copy(cmd, -chromatic, colors::CHROMA_RED));
            }
            for cmd in &entities {
                frame.world.push(chromatic_copy(cmd, chromatic, colors::CHROMA_CYAN));
            }
            frame.world.extend(entities);
        }

        // Overlay layer: unaffected by shake
        if state.effects.flash > 0.0 {
            let color = with_alpha(tint(state.effects.flash_tint), state.effects.flash);
            frame.overlay_geometry(shapes::rect(Vec2::ZERO, bounds, color));
        }
        frame.overlay_geometry(shapes::vignette(bounds, VIGNETTE_STRENGTH));

        if show_boss {
            draw_boss_bar(&mut frame, &state.boss, bounds);
        }
        match state.phase {
            GamePhase::Glitch => self.draw_glitch(&mut frame, state),
            GamePhase::Paused => draw_paused(&mut frame, bounds),
            _ => {}
        }

        frame
    }

    fn draw_stars(&mut self, frame: &mut Frame, dt: f32) {
        let mut vertices = Vec::with_capacity(self.stars.len() * 6);
        for star in &mut self.stars {
            star.pos.y += star.speed * dt;
            if star.pos.y > self.size.y {
                star.pos.y -= self.size.y;
            }
            let alpha = 0.5 + 0.5 * (self.time * 2.0 + star.twinkle).sin();
            vertices.extend(shapes::centered_rect(
                star.pos,
                Vec2::splat(star.size),
                with_alpha(colors::STAR, alpha),
            ));
        }
        frame.geometry(vertices);
    }

    fn draw_boss(&mut self, frame: &mut Frame, boss: &Boss, sprites: &SpriteSet) {
        let pos = boss.body.pos;
        let size = boss.body.size.x;
        let alpha = boss.enter_progress.clamp(0.0, 1.0);

        // Aura
        let pulse = 1.0 + (self.time * 3.0).sin() * 0.05;
        frame.geometry(shapes::polygon_ring(
            pos,
            size * 0.7 * pulse,
            4.0,
            6,
            with_alpha(colors::BOSS, 0.4 * alpha),
        ));

        if sprites.is_ready(SpriteId::Boss) {
            frame.sprite(SpriteId::Boss, pos, boss.body.size, alpha);
        } else {
            let mut body = shapes::circle(pos, size * 0.45, with_alpha(colors::BOSS, alpha), 32);
            body.extend(shapes::circle(
                pos + Vec2::new(0.0, -size * 0.05),
                size * 0.12,
                with_alpha(colors::GOLD, alpha),
                16,
            ));
            frame.geometry(body);
        }

        if boss.hit_flash > 0.0 {
            frame.geometry(shapes::circle(
                pos,
                size * 0.45,
                with_alpha(colors::WHITE, (boss.hit_flash / 0.2).min(1.0) * 0.6),
                32,
            ));
        }
    }

    fn draw_player(&mut self, frame: &mut Frame, player: &Player, sprites: &SpriteSet) {
        let pos = player.body.pos;
        let size = player.body.size.x;

        let points: Vec<Vec2> = player.trail.iter().copied().collect();
        frame.geometry(shapes::trail(
            &points,
            size * 0.15,
            with_alpha(colors::PLAYER, 0.4),
        ));

        let alpha = if is_blink_off(player) { 0.5 } else { 1.0 };
        if sprites.is_ready(SpriteId::Player) {
            frame.sprite(SpriteId::Player, pos, player.body.size, alpha);
        } else {
            frame.geometry(shapes::ship(pos, size, with_alpha(colors::PLAYER, alpha)));
        }

        // Exhaust flicker
        let flicker = 3.0 + self.rng.random::<f32>() * 3.0;
        frame.geometry(shapes::circle(
            player.exhaust(),
            flicker,
            with_alpha(colors::CARRIER, 0.8 * alpha),
            8,
        ));

        if player.shielded {
            let radius = size * 0.8;
            let shimmer = 0.5 + 0.2 * (self.time * 6.0).sin();
            frame.geometry(shapes::ring(
                pos,
                radius - 3.0,
                radius,
                with_alpha(colors::SHIELD, shimmer),
                32,
            ));
        }
    }

    fn draw_glitch(&mut self, frame: &mut Frame, state: &GameState) {
        let bounds = state.bounds();
        let center = bounds * 0.5;

        frame.overlay_geometry(shapes::rect(
            Vec2::ZERO,
            bounds,
            with_alpha(colors::BLACK, 0.9),
        ));

        let mut scanlines = Vec::new();
        let mut y = 0.0;
        while y < bounds.y {
            scanlines.extend(shapes::rect(
                Vec2::new(0.0, y),
                Vec2::new(bounds.x, 1.0),
                with_alpha(colors::BLACK, 0.3),
            ));
            y += SCANLINE_SPACING;
        }
        frame.overlay_geometry(scanlines);

        match state.glitch_stage() {
            GlitchStage::Scramble => {
                for _ in 0..GLITCH_SYMBOL_COUNT {
                    let symbol = GLITCH_SYMBOLS[self.rng.random_range(0..GLITCH_SYMBOLS.len())];
                    let pos = Vec2::new(
                        self.rng.random::<f32>() * bounds.x,
                        self.rng.random::<f32>() * bounds.y,
                    );
                    let color = match self.rng.random_range(0..3) {
                        0 => colors::CHROMA_RED,
                        1 => colors::CHROMA_CYAN,
                        _ => colors::WHITE,
                    };
                    let size = self.rng.random_range(16.0..40.0);
                    frame.text(symbol, pos, size, with_alpha(color, 0.8));
                }
            }
            GlitchStage::Warning => {
                if (state.glitch_elapsed * 8.0).floor() as i64 % 2 == 0 {
                    frame.overlay_geometry(shapes::rect(
                        Vec2::ZERO,
                        bounds,
                        with_alpha(colors::SHOOTER, 0.2),
                    ));
                }
                split_text(frame, WARNING_TEXT, center, 40.0, colors::SHOOTER, state.glitch_elapsed);
            }
            GlitchStage::Reveal => {
                split_text(frame, REVEAL_TEXT, center, 36.0, colors::GOLD, state.glitch_elapsed);
            }
        }

        frame.text(
            SKIP_PROMPT,
            Vec2::new(center.x, bounds.y - 40.0),
            14.0,
            with_alpha(colors::WHITE, 0.5),
        );
    }
}

/// The boss shows from its entrance until it is destroyed
fn boss_visible(state: &GameState) -> bool {
    state.boss.body.active
        || state.phase == GamePhase::Boss
        || state.paused_from == Some(GamePhase::Boss)
}

/// Invincibility blink: dimmed on every other 80 ms slot
fn is_blink_off(player: &Player) -> bool {
    player.is_invincible() && (player.invincible_timer / BLINK_PERIOD).floor() as i64 % 2 == 0
}

/// Text with a red/cyan channel split while the intro is still glitching
fn split_text(frame: &mut Frame, text: &str, pos: Vec2, size: f32, color: [f32; 4], elapsed: f32) {
    if elapsed < GLITCH_WARNING_END {
        frame.text(
            text,
            pos - Vec2::new(RGB_SPLIT, 0.0),
            size,
            with_alpha(colors::CHROMA_RED, 0.7),
        );
        frame.text(
            text,
            pos + Vec2::new(RGB_SPLIT, 0.0),
            size,
            with_alpha(colors::CHROMA_CYAN, 0.7),
        );
    }
    frame.text(text, pos, size, color);
}

/// `cmd` shifted sideways by `dx`, geometry recolored to `color`
///
/// Sprites cannot be tinted, so they only get the shift and a faint alpha.
fn chromatic_copy(cmd: &DrawCmd, dx: f32, color: [f32; 4]) -> DrawCmd {
    match cmd {
        DrawCmd::Triangles(vertices) => DrawCmd::Triangles(
            vertices
                .iter()
                .map(|v| {
                    Vertex::new(
                        v.position[0] + dx,
                        v.position[1],
                        with_alpha(color, v.color[3] * CHROMATIC_ALPHA),
                    )
                })
                .collect(),
        ),
        DrawCmd::Sprite {
            id,
            center,
            size,
            alpha,
        } => DrawCmd::Sprite {
            id: *id,
            center: *center + Vec2::new(dx, 0.0),
            size: *size,
            alpha: alpha * CHROMATIC_ALPHA,
        },
        DrawCmd::Text {
            text,
            pos,
            size,
            ..
        } => DrawCmd::Text {
            text: text.clone(),
            pos: *pos + Vec2::new(dx, 0.0),
            size: *size,
            color: with_alpha(color, CHROMATIC_ALPHA),
        },
    }
}

fn grid(bounds: Vec2) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    let mut x = 0.0;
    while x <= bounds.x {
        vertices.extend(shapes::rect(Vec2::new(x, 0.0), Vec2::new(1.0, bounds.y), colors::GRID));
        x += GRID_SPACING;
    }
    let mut y = 0.0;
    while y <= bounds.y {
        vertices.extend(shapes::rect(Vec2::new(0.0, y), Vec2::new(bounds.x, 1.0), colors::GRID));
        y += GRID_SPACING;
    }
    vertices
}

fn draw_drop(frame: &mut Frame, drop: &Drop, sprites: &SpriteSet) {
    let bob = (drop.pulse * 2.0).sin() * 3.0;
    let pos = drop.body.pos + Vec2::new(0.0, bob);
    let size = drop.body.size.x;
    let color = match drop.kind {
        DropKind::Bomb => colors::BOMB,
        DropKind::Health => colors::DROP_HEALTH,
        DropKind::Shield => colors::SHIELD,
    };

    // Glow
    let glow = 0.25 + 0.15 * (drop.pulse * 4.0).sin();
    frame.geometry(shapes::circle(pos, size * 0.75, with_alpha(color, glow), 16));

    let id = SpriteId::for_drop(drop.kind);
    if sprites.is_ready(id) {
        frame.sprite(id, pos, drop.body.size, 1.0);
        return;
    }

    let vertices = match drop.kind {
        DropKind::Bomb => {
            let mut v = shapes::circle(pos, size * 0.4, color, 16);
            v.extend(shapes::circle(pos + Vec2::new(0.0, -size * 0.45), 2.5, colors::GOLD, 6));
            v
        }
        DropKind::Health => {
            let mut v = shapes::centered_rect(pos, Vec2::new(size * 0.7, size * 0.25), color);
            v.extend(shapes::centered_rect(pos, Vec2::new(size * 0.25, size * 0.7), color));
            v
        }
        DropKind::Shield => shapes::ring(pos, size * 0.3, size * 0.45, color, 16),
    };
    frame.geometry(vertices);
}

fn draw_enemy(frame: &mut Frame, enemy: &Enemy, sprites: &SpriteSet) {
    let pos = enemy.body.pos;
    let size = enemy.body.size.x;

    let id = SpriteId::for_enemy(enemy.kind);
    if sprites.is_ready(id) {
        frame.sprite(id, pos, enemy.body.size, 1.0);
    } else {
        let vertices = match enemy.kind {
            EnemyKind::Worker => shapes::diamond(pos, size, colors::WORKER),
            EnemyKind::Shooter => shapes::down_triangle(pos, size, colors::SHOOTER),
            EnemyKind::Carrier => shapes::centered_rect(pos, enemy.body.size, colors::CARRIER),
        };
        frame.geometry(vertices);
    }

    if enemy.hit_flash > 0.0 {
        frame.geometry(shapes::circle(
            pos,
            size * 0.5,
            with_alpha(colors::WHITE, 0.6),
            12,
        ));
    }
}

fn draw_bullets(frame: &mut Frame, bullets: &[Bullet]) {
    let mut vertices = Vec::new();
    for bullet in bullets {
        let pos = bullet.body.pos;
        let points: Vec<Vec2> = bullet.trail.iter().copied().collect();
        match bullet.owner {
            BulletOwner::Player => {
                vertices.extend(shapes::centered_rect(pos, bullet.body.size, colors::SHOT));
            }
            BulletOwner::Bomb => {
                vertices.extend(shapes::trail(&points, 6.0, colors::BOMB));
                vertices.extend(shapes::circle(pos, bullet.body.radius(), colors::BOMB, 16));
                vertices.extend(shapes::circle(pos, bullet.body.radius() * 0.4, colors::WHITE, 8));
            }
            BulletOwner::Hostile => {
                vertices.extend(shapes::trail(&points, 4.0, colors::HOSTILE));
                vertices.extend(shapes::circle(pos, bullet.body.radius(), colors::HOSTILE, 12));
            }
        }
    }
    frame.geometry(vertices);
}

fn draw_particles(frame: &mut Frame, state: &GameState) {
    let mut vertices = Vec::with_capacity(state.particles.len() * 24);
    for p in state.particles.iter() {
        let color = with_alpha(tint(p.tint), p.alpha());
        let size = p.render_size();
        match p.kind {
            ParticleKind::Spark | ParticleKind::Star => {
                vertices.extend(shapes::diamond(p.pos, size * 2.0, color));
            }
            ParticleKind::Pickup => {
                vertices.extend(shapes::ring(p.pos, size * 0.5, size, color, 8));
            }
            ParticleKind::Explosion | ParticleKind::Trail | ParticleKind::Smoke => {
                vertices.extend(shapes::circle(p.pos, size, color, 8));
            }
        }
    }
    frame.geometry(vertices);
}

fn draw_boss_bar(frame: &mut Frame, boss: &Boss, bounds: Vec2) {
    let min = Vec2::new(bounds.x * 0.1, 28.0);
    let size = Vec2::new(bounds.x * 0.8, BOSS_BAR_HEIGHT);
    let mut bar = shapes::rect(min, size, colors::BOSS_BAR_EMPTY);
    bar.extend(shapes::rect(
        min,
        Vec2::new(size.x * boss.health_fraction(), size.y),
        colors::BOSS_BAR,
    ));
    frame.overlay_geometry(bar);
    frame.text(BOSS_LABEL, Vec2::new(bounds.x * 0.5, 18.0), 12.0, colors::BOSS_BAR);
}

fn draw_paused(frame: &mut Frame, bounds: Vec2) {
    frame.overlay_geometry(shapes::rect(
        Vec2::ZERO,
        bounds,
        with_alpha(colors::BLACK, 0.5),
    ));
    frame.text(PAUSED_TEXT, bounds * 0.5, 32.0, colors::WHITE);
    frame.text(
        "Press ESC to resume",
        bounds * 0.5 + Vec2::new(0.0, 36.0),
        14.0,
        with_alpha(colors::WHITE, 0.6),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    const DT: f32 = 1.0 / 60.0;

    fn state() -> GameState {
        GameState::new(GameConfig::default(), 5)
    }

    fn boss_state() -> GameState {
        let mut state = state();
        assert!(state.set_phase(GamePhase::Wave));
        assert!(state.set_phase(GamePhase::Boss));
        state.boss.body.active = true;
        state.boss.enter_progress = 1.0;
        // Entry impact has settled
        state.effects.chromatic = 0.0;
        state
    }

    fn texts(frame: &Frame) -> Vec<String> {
        frame
            .commands()
            .filter_map(|cmd| match cmd {
                DrawCmd::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_missing_sprites_fall_back_to_shapes() {
        let mut state = boss_state();
        state
            .enemies
            .push(Enemy::new(EnemyKind::Shooter, Vec2::new(100.0, 100.0), 100.0));
        state.drops.push(Drop::new(DropKind::Shield, Vec2::new(200.0, 200.0)));
        let mut renderer = Renderer::new(600.0, 700.0, 1);

        let frame = renderer.render(&state, &SpriteSet::new(), DT);
        assert!(!frame.commands().any(|cmd| matches!(cmd, DrawCmd::Sprite { .. })));

        let frame = renderer.render(&state, &SpriteSet::all_ready(), DT);
        for id in [SpriteId::Boss, SpriteId::Player, SpriteId::Shooter, SpriteId::ShieldDrop] {
            assert!(frame.has_sprite(id), "{:?} should be drawn as a sprite", id);
        }
        assert!(!frame.has_sprite(SpriteId::Worker));
    }

    #[test]
    fn test_glitch_overlay_follows_stage() {
        let mut state = state();
        let mut renderer = Renderer::new(600.0, 700.0, 1);
        let sprites = SpriteSet::new();

        state.glitch_elapsed = 1.0;
        let frame = renderer.render(&state, &sprites, DT);
        let scramble = texts(&frame);
        assert!(scramble.iter().any(|t| t == SKIP_PROMPT));
        let symbols = scramble
            .iter()
            .filter(|t| GLITCH_SYMBOLS.contains(&t.as_str()))
            .count();
        assert_eq!(symbols, GLITCH_SYMBOL_COUNT);

        state.glitch_elapsed = 4.0;
        let frame = renderer.render(&state, &sprites, DT);
        // Main line plus the two split copies
        assert_eq!(texts(&frame).iter().filter(|t| *t == WARNING_TEXT).count(), 3);

        state.glitch_elapsed = 6.0;
        let frame = renderer.render(&state, &sprites, DT);
        assert_eq!(texts(&frame).iter().filter(|t| *t == REVEAL_TEXT).count(), 1);
        assert!(!frame.has_text(WARNING_TEXT));
    }

    #[test]
    fn test_boss_bar_only_with_boss() {
        let mut renderer = Renderer::new(600.0, 700.0, 1);
        let sprites = SpriteSet::new();

        let mut wave = state();
        wave.set_phase(GamePhase::Wave);
        let frame = renderer.render(&wave, &sprites, DT);
        assert!(!frame.has_text(BOSS_LABEL));
        assert!(!frame.has_text(SKIP_PROMPT));

        let frame = renderer.render(&boss_state(), &sprites, DT);
        assert!(frame.has_text(BOSS_LABEL));
    }

    #[test]
    fn test_boss_fades_in_during_entrance() {
        let mut state = boss_state();
        state.boss.body.active = false;
        state.boss.enter_progress = 0.25;
        let mut renderer = Renderer::new(600.0, 700.0, 1);
        let frame = renderer.render(&state, &SpriteSet::all_ready(), DT);
        let alpha = frame.commands().find_map(|cmd| match cmd {
            DrawCmd::Sprite {
                id: SpriteId::Boss,
                alpha,
                ..
            } => Some(*alpha),
            _ => None,
        });
        assert_eq!(alpha, Some(0.25));
    }

    #[test]
    fn test_paused_overlay() {
        let mut state = boss_state();
        assert!(state.pause());
        let mut renderer = Renderer::new(600.0, 700.0, 1);
        let frame = renderer.render(&state, &SpriteSet::all_ready(), DT);
        assert!(frame.has_text(PAUSED_TEXT));
        // Frozen scene still drawn underneath
        assert!(frame.has_sprite(SpriteId::Boss));
    }

    #[test]
    fn test_player_hidden_after_defeat() {
        let mut state = state();
        state.set_phase(GamePhase::Wave);
        state.set_phase(GamePhase::Defeat);
        let mut renderer = Renderer::new(600.0, 700.0, 1);
        let frame = renderer.render(&state, &SpriteSet::all_ready(), DT);
        assert!(!frame.has_sprite(SpriteId::Player));
    }

    #[test]
    fn test_invincibility_blink() {
        let mut player = Player::new(600.0, 700.0);
        assert!(!is_blink_off(&player));
        player.invincible_timer = 0.05;
        assert!(is_blink_off(&player));
        player.invincible_timer = 0.1;
        assert!(!is_blink_off(&player));
        player.invincible_timer = 0.17;
        assert!(is_blink_off(&player));
    }

    #[test]
    fn test_shake_offset_applies_to_world_only() {
        let mut state = state();
        state.set_phase(GamePhase::Wave);
        state.effects.offset = Vec2::new(4.0, -1.0);
        let mut renderer = Renderer::new(600.0, 700.0, 1);
        let frame = renderer.render(&state, &SpriteSet::new(), DT);
        assert_eq!(frame.offset, Vec2::new(4.0, -1.0));
        assert!(!frame.overlay.is_empty());
    }

    fn world_vertices(frame: &Frame) -> Vec<Vertex> {
        frame
            .world
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCmd::Triangles(v) => Some(v.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    #[test]
    fn test_chromatic_split_copies_every_entity() {
        let mut state = state();
        state.set_phase(GamePhase::Wave);
        state
            .enemies
            .push(Enemy::new(EnemyKind::Worker, Vec2::new(100.0, 100.0), 0.0));
        let sprites = SpriteSet::new();
        let plain = world_vertices(&Renderer::new(600.0, 700.0, 1).render(&state, &sprites, DT));

        // Below the threshold nothing changes
        state.effects.chromatic = 0.05;
        let faint = world_vertices(&Renderer::new(600.0, 700.0, 1).render(&state, &sprites, DT));
        assert_eq!(faint.len(), plain.len());

        state.effects.chromatic = 8.0;
        let split = world_vertices(&Renderer::new(600.0, 700.0, 1).render(&state, &sprites, DT));
        assert!(split.len() > plain.len());
        let red_enemy = split.iter().any(|v| {
            v.color[..3] == colors::CHROMA_RED[..3] && (v.position[0] - 92.0).abs() < 20.0
        });
        assert!(red_enemy, "enemy should have a red copy shifted left");
        assert!(split.iter().any(|v| v.color[..3] == colors::CHROMA_CYAN[..3]));
    }

    #[test]
    fn test_chromatic_split_shifts_sprites() {
        let mut state = boss_state();
        state.effects.chromatic = 5.0;
        let mut renderer = Renderer::new(600.0, 700.0, 1);
        let frame = renderer.render(&state, &SpriteSet::all_ready(), DT);
        let centers: Vec<f32> = frame
            .world
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCmd::Sprite {
                    id: SpriteId::Boss,
                    center,
                    ..
                } => Some((center.x - state.boss.body.pos.x).round()),
                _ => None,
            })
            .collect();
        assert_eq!(centers, vec![-5.0, 5.0, 0.0]);
    }

    #[test]
    fn test_follows_playfield_resize() {
        let mut state = state();
        state.resize(800.0, 900.0);
        let mut renderer = Renderer::new(600.0, 700.0, 1);
        renderer.render(&state, &SpriteSet::new(), DT);
        assert_eq!(renderer.size, Vec2::new(800.0, 900.0));
        assert!(renderer.stars.iter().all(|s| s.pos.x <= 800.0 && s.pos.y <= 900.0));
    }
}
