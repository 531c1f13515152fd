//! Vertex type and palette for 2D rendering

use crate::sim::Tint;

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.063, 1.0];
    pub const GRID: [f32; 4] = [0.0, 0.83, 1.0, 0.03];
    pub const STAR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const PLAYER: [f32; 4] = [0.0, 1.0, 0.533, 1.0];
    pub const SHIELD: [f32; 4] = [0.0, 0.78, 1.0, 1.0];
    pub const BOSS: [f32; 4] = [1.0, 0.4, 0.2, 1.0];
    pub const BOSS_BAR: [f32; 4] = [1.0, 0.267, 0.267, 1.0];
    pub const BOSS_BAR_EMPTY: [f32; 4] = [0.2, 0.0, 0.0, 0.6];
    pub const WORKER: [f32; 4] = [0.667, 0.267, 1.0, 1.0];
    pub const SHOOTER: [f32; 4] = [1.0, 0.267, 0.267, 1.0];
    pub const CARRIER: [f32; 4] = [1.0, 0.667, 0.0, 1.0];
    pub const SHOT: [f32; 4] = [0.0, 1.0, 0.8, 1.0];
    pub const BOMB: [f32; 4] = [1.0, 0.4, 0.0, 1.0];
    pub const HOSTILE: [f32; 4] = [1.0, 0.0, 0.4, 1.0];
    pub const DROP_HEALTH: [f32; 4] = [1.0, 0.267, 0.267, 1.0];
    pub const GOLD: [f32; 4] = [1.0, 0.843, 0.0, 1.0];
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const CHROMA_RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const CHROMA_CYAN: [f32; 4] = [0.0, 1.0, 1.0, 1.0];
}

/// Palette entry for a particle/flash tint
pub fn tint(tint: Tint) -> [f32; 4] {
    match tint {
        Tint::White => colors::WHITE,
        Tint::Gold => colors::GOLD,
        Tint::Orange => colors::BOMB,
        Tint::Red => colors::SHOOTER,
        Tint::Green => colors::PLAYER,
        Tint::Cyan => colors::SHIELD,
        Tint::Purple => colors::WORKER,
        Tint::Smoke => [0.4, 0.4, 0.45, 1.0],
    }
}

/// Same color with its alpha multiplied
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha.clamp(0.0, 1.0)]
}

/// CSS `rgba()` string for canvas fill styles
pub fn to_css(color: [f32; 4]) -> String {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "rgba({}, {}, {}, {:.3})",
        channel(color[0]),
        channel(color[1]),
        channel(color[2]),
        color[3].clamp(0.0, 1.0)
    )
}
