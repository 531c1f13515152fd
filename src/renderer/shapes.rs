//! Shape generation for 2D primitives
//!
//! Everything comes out as a flat triangle list in playfield pixels.

use glam::Vec2;
use std::f32::consts::{PI, TAU};

use super::vertex::{Vertex, with_alpha};

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 6) as usize);
    let at = |radius: f32, theta: f32| center + Vec2::from_angle(theta) * radius;

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;

        let inner1 = at(inner_radius, theta1);
        let outer1 = at(outer_radius, theta1);
        let inner2 = at(inner_radius, theta2);
        let outer2 = at(outer_radius, theta2);

        // Two triangles per segment
        push_quad(&mut vertices, [inner1, outer1, outer2, inner2], color);
    }

    vertices
}

/// Axis-aligned rectangle from its top-left corner
pub fn rect(min: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(6);
    let max = min + size;
    push_quad(
        &mut vertices,
        [min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)],
        color,
    );
    vertices
}

/// Rectangle centered on `center`
pub fn centered_rect(center: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    rect(center - size * 0.5, size, color)
}

/// Diamond (rotated square) fitting a `size` box
pub fn diamond(center: Vec2, size: f32, color: [f32; 4]) -> Vec<Vertex> {
    let h = size * 0.5;
    let mut vertices = Vec::with_capacity(6);
    push_quad(
        &mut vertices,
        [
            center + Vec2::new(0.0, -h),
            center + Vec2::new(h, 0.0),
            center + Vec2::new(0.0, h),
            center + Vec2::new(-h, 0.0),
        ],
        color,
    );
    vertices
}

/// Arrowhead ship pointing up, scaled to a `size` box
pub fn ship(center: Vec2, size: f32, color: [f32; 4]) -> Vec<Vertex> {
    let s = size / 50.0;
    let nose = center + Vec2::new(0.0, -22.0 * s);
    let right = center + Vec2::new(18.0 * s, 18.0 * s);
    let notch = center + Vec2::new(0.0, 10.0 * s);
    let left = center + Vec2::new(-18.0 * s, 18.0 * s);

    vec![
        Vertex::new(nose.x, nose.y, color),
        Vertex::new(right.x, right.y, color),
        Vertex::new(notch.x, notch.y, color),
        Vertex::new(nose.x, nose.y, color),
        Vertex::new(notch.x, notch.y, color),
        Vertex::new(left.x, left.y, color),
    ]
}

/// Downward-pointing triangle (shooter enemies)
pub fn down_triangle(center: Vec2, size: f32, color: [f32; 4]) -> Vec<Vertex> {
    let h = size * 0.5;
    vec![
        Vertex::new(center.x - h, center.y - h, color),
        Vertex::new(center.x + h, center.y - h, color),
        Vertex::new(center.x, center.y + h, color),
    ]
}

/// Tapered ribbon through `points` (newest first), fading toward the tail
pub fn trail(points: &[Vec2], width: f32, color: [f32; 4]) -> Vec<Vertex> {
    if points.len() < 2 {
        return Vec::new();
    }

    let mut vertices = Vec::with_capacity((points.len() - 1) * 6);
    let len = points.len() as f32;

    for (i, pair) in points.windows(2).enumerate() {
        let (p1, p2) = (pair[0], pair[1]);

        // Fade alpha and size along trail
        let t1 = i as f32 / len;
        let t2 = (i + 1) as f32 / len;
        let color1 = with_alpha(color, (1.0 - t1) * 0.8);
        let color2 = with_alpha(color, (1.0 - t2) * 0.8);
        let width1 = width * (1.0 - t1 * 0.7);
        let width2 = width * (1.0 - t2 * 0.7);

        // Perpendicular for width
        let dir = (p2 - p1).normalize_or_zero();
        let perp = Vec2::new(-dir.y, dir.x);

        let v1a = p1 + perp * width1;
        let v1b = p1 - perp * width1;
        let v2a = p2 + perp * width2;
        let v2b = p2 - perp * width2;

        vertices.push(Vertex::new(v1a.x, v1a.y, color1));
        vertices.push(Vertex::new(v1b.x, v1b.y, color1));
        vertices.push(Vertex::new(v2a.x, v2a.y, color2));

        vertices.push(Vertex::new(v2a.x, v2a.y, color2));
        vertices.push(Vertex::new(v1b.x, v1b.y, color1));
        vertices.push(Vertex::new(v2b.x, v2b.y, color2));
    }

    vertices
}

/// Dark frame around the edges, stacked from translucent rings
pub fn vignette(size: Vec2, strength: f32) -> Vec<Vertex> {
    let center = size * 0.5;
    let outer = center.length() + 2.0;
    let inner = size.min_element() * 0.45;
    let steps = 4;
    let mut vertices = Vec::new();

    for i in 0..steps {
        let t = i as f32 / steps as f32;
        let r = inner + (outer - inner) * t;
        let alpha = strength * (t + 1.0 / steps as f32) / 2.0;
        vertices.extend(ring(
            center,
            r,
            outer,
            [0.0, 0.0, 0.0, alpha],
            32,
        ));
    }

    vertices
}

/// Regular polygon outline, handy for auras
pub fn polygon_ring(center: Vec2, radius: f32, thickness: f32, sides: u32, color: [f32; 4]) -> Vec<Vertex> {
    let sides = sides.max(3);
    let mut vertices = Vec::with_capacity((sides * 6) as usize);
    let offset = PI / sides as f32;
    for i in 0..sides {
        let a1 = offset + i as f32 / sides as f32 * TAU;
        let a2 = offset + (i + 1) as f32 / sides as f32 * TAU;
        push_quad(
            &mut vertices,
            [
                center + Vec2::from_angle(a1) * (radius - thickness),
                center + Vec2::from_angle(a1) * radius,
                center + Vec2::from_angle(a2) * radius,
                center + Vec2::from_angle(a2) * (radius - thickness),
            ],
            color,
        );
    }
    vertices
}

fn push_quad(vertices: &mut Vec<Vertex>, corners: [Vec2; 4], color: [f32; 4]) {
    let [a, b, c, d] = corners;
    for p in [a, b, c, a, c, d] {
        vertices.push(Vertex::new(p.x, p.y, color));
    }
}
