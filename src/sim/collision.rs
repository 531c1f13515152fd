//! Collision and bounds helpers
//!
//! Everything is approximated by circles: two bodies touch when their centers
//! are closer than the sum of their half-widths minus a padding. The padding
//! soaks up the transparent margins around the sprite art.

use glam::Vec2;

use super::entity::Kinematic;

/// Distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Circle overlap between two bodies
///
/// Positive `padding` shrinks the hit circles, negative grows them.
pub fn circles_overlap(a: &Kinematic, b: &Kinematic, padding: f32) -> bool {
    distance(a.pos, b.pos) < a.radius() + b.radius() - padding
}

/// Whether `point` lies strictly within `radius` of `center`
#[inline]
pub fn point_in_radius(point: Vec2, center: Vec2, radius: f32) -> bool {
    distance(point, center) < radius
}

/// Clamp a center so the body's box stays inside `[min, max]`
///
/// A box larger than the region is centered in it rather than panicking.
pub fn clamp_to_bounds(pos: Vec2, half_extents: Vec2, min: Vec2, max: Vec2) -> Vec2 {
    let lo = min + half_extents;
    let hi = max - half_extents;
    Vec2::new(clamp_axis(pos.x, lo.x, hi.x), clamp_axis(pos.y, lo.y, hi.y))
}

fn clamp_axis(v: f32, lo: f32, hi: f32) -> f32 {
    if lo > hi {
        (lo + hi) * 0.5
    } else {
        v.clamp(lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(x: f32, y: f32, side: f32) -> Kinematic {
        Kinematic::square(Vec2::new(x, y), side)
    }

    #[test]
    fn test_distance() {
        assert!((distance(Vec2::ZERO, Vec2::new(3.0, 4.0)) - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_overlap_touching_is_a_miss() {
        // Radii 10 + 10, centers 20 apart: not strictly inside
        let a = body(0.0, 0.0, 20.0);
        let b = body(20.0, 0.0, 20.0);
        assert!(!circles_overlap(&a, &b, 0.0));
        assert!(circles_overlap(&a, &b, -1.0));
    }

    #[test]
    fn test_padding_shrinks_hit_circle() {
        // Player 50 wide vs enemy 30 wide, contact padding 10: reach is 30
        let player = body(0.0, 0.0, 50.0);
        let enemy = body(29.0, 0.0, 30.0);
        assert!(circles_overlap(&player, &enemy, 10.0));
        let enemy = body(31.0, 0.0, 30.0);
        assert!(!circles_overlap(&player, &enemy, 10.0));
        // Without padding the same pair touches
        assert!(circles_overlap(&player, &enemy, 0.0));
    }

    #[test]
    fn test_point_in_radius() {
        assert!(point_in_radius(Vec2::new(29.0, 0.0), Vec2::ZERO, 30.0));
        assert!(!point_in_radius(Vec2::new(30.0, 0.0), Vec2::ZERO, 30.0));
    }

    #[test]
    fn test_clamp_to_bounds() {
        let half = Vec2::splat(25.0);
        let clamped = clamp_to_bounds(
            Vec2::new(-40.0, 900.0),
            half,
            Vec2::new(0.0, 350.0),
            Vec2::new(600.0, 700.0),
        );
        assert!((clamped.x - 25.0).abs() < 0.001);
        assert!((clamped.y - 675.0).abs() < 0.001);
    }

    #[test]
    fn test_clamp_oversized_box_centers() {
        let clamped = clamp_to_bounds(
            Vec2::new(5.0, 5.0),
            Vec2::splat(60.0),
            Vec2::ZERO,
            Vec2::new(100.0, 100.0),
        );
        assert!((clamped.x - 50.0).abs() < 0.001);
        assert!((clamped.y - 50.0).abs() < 0.001);
    }
}
