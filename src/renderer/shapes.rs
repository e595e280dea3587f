//! Shape generation for 2D primitives
//!
//! Everything is plain triangles in pixel space (origin top-left, y down).

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Push one triangle
#[inline]
fn tri(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
    out.push(Vertex::new(a.x, a.y, color));
    out.push(Vertex::new(b.x, b.y, color));
    out.push(Vertex::new(c.x, c.y, color));
}

/// Axis-aligned rectangle
pub fn rect(out: &mut Vec<Vertex>, min: Vec2, max: Vec2, color: [f32; 4]) {
    let tr = Vec2::new(max.x, min.y);
    let bl = Vec2::new(min.x, max.y);
    tri(out, min, tr, bl, color);
    tri(out, bl, tr, max, color);
}

/// Rectangle with a top-to-bottom color gradient
pub fn vertical_gradient(
    out: &mut Vec<Vertex>,
    min: Vec2,
    max: Vec2,
    top: [f32; 4],
    bottom: [f32; 4],
) {
    out.push(Vertex::new(min.x, min.y, top));
    out.push(Vertex::new(max.x, min.y, top));
    out.push(Vertex::new(min.x, max.y, bottom));

    out.push(Vertex::new(min.x, max.y, bottom));
    out.push(Vertex::new(max.x, min.y, top));
    out.push(Vertex::new(max.x, max.y, bottom));
}

/// Filled circle
pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: [f32; 4], segments: u32) {
    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        tri(
            out,
            center,
            center + Vec2::new(theta1.cos(), theta1.sin()) * radius,
            center + Vec2::new(theta2.cos(), theta2.sin()) * radius,
            color,
        );
    }
}

/// Ring (hollow circle)
pub fn ring(
    out: &mut Vec<Vertex>,
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) {
    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
        let d1 = Vec2::new(theta1.cos(), theta1.sin());
        let d2 = Vec2::new(theta2.cos(), theta2.sin());

        let inner1 = center + d1 * inner_radius;
        let outer1 = center + d1 * outer_radius;
        let inner2 = center + d2 * inner_radius;
        let outer2 = center + d2 * outer_radius;

        // Two triangles per segment
        tri(out, inner1, outer1, inner2, color);
        tri(out, inner2, outer1, outer2, color);
    }
}

/// Arrowhead ship centered on `center`, nose rotated by `facing`
/// (0 = pointing up, positive = clockwise on screen)
pub fn ship(out: &mut Vec<Vertex>, center: Vec2, radius: f32, facing: f32, color: [f32; 4]) {
    let rot = Vec2::from_angle(facing);
    let local = |x: f32, y: f32| center + rot.rotate(Vec2::new(x, y) * radius);

    let nose = local(0.0, -1.0);
    let left = local(-0.85, 0.8);
    let right = local(0.85, 0.8);
    let notch = local(0.0, 0.35);

    tri(out, nose, left, notch, color);
    tri(out, nose, notch, right, color);
}

/// Filled star with `points` tips, first tip straight up
pub fn star(
    out: &mut Vec<Vertex>,
    center: Vec2,
    outer_radius: f32,
    inner_radius: f32,
    points: u32,
    color: [f32; 4],
) {
    let corners = points * 2;
    let corner = |i: u32| {
        let theta = i as f32 / corners as f32 * 2.0 * PI - PI / 2.0;
        let r = if i % 2 == 0 { outer_radius } else { inner_radius };
        center + Vec2::new(theta.cos(), theta.sin()) * r
    };
    for i in 0..corners {
        tri(out, center, corner(i), corner((i + 1) % corners), color);
    }
}

/// Segment layout per digit: a (top), b, c, d (bottom), e, f, g (middle)
const SEGMENTS: [u8; 10] = [
    0b0111111, // 0
    0b0000110, // 1
    0b1011011, // 2
    0b1001111, // 3
    0b1100110, // 4
    0b1101101, // 5
    0b1111101, // 6
    0b0000111, // 7
    0b1111111, // 8
    0b1101111, // 9
];

/// Width of one digit cell (including spacing) for a given glyph height
pub fn digit_advance(height: f32) -> f32 {
    height * 0.7
}

/// Seven-segment rendering of `value` with its top-left at `origin`
pub fn number(out: &mut Vec<Vertex>, value: u64, origin: Vec2, height: f32, color: [f32; 4]) {
    let text = value.to_string();
    let advance = digit_advance(height);
    for (i, ch) in text.bytes().enumerate() {
        let digit = (ch - b'0') as usize;
        digit_glyph(out, digit, origin + Vec2::new(i as f32 * advance, 0.0), height, color);
    }
}

/// Total width `number` will occupy
pub fn number_width(value: u64, height: f32) -> f32 {
    value.to_string().len() as f32 * digit_advance(height)
}

fn digit_glyph(out: &mut Vec<Vertex>, digit: usize, origin: Vec2, height: f32, color: [f32; 4]) {
    let w = height * 0.5;
    let half = height / 2.0;
    let t = (height * 0.12).max(1.0);
    let mask = SEGMENTS[digit % 10];

    let horizontal = |y: f32| (origin + Vec2::new(0.0, y), origin + Vec2::new(w, y + t));
    let vertical = |x: f32, y: f32| (origin + Vec2::new(x, y), origin + Vec2::new(x + t, y + half));

    let segs = [
        horizontal(0.0),                 // a
        vertical(w - t, 0.0),            // b
        vertical(w - t, half),           // c
        horizontal(height - t),          // d
        vertical(0.0, half),             // e
        vertical(0.0, 0.0),              // f
        horizontal(half - t / 2.0),      // g
    ];

    for (bit, (min, max)) in segs.into_iter().enumerate() {
        if mask & (1 << bit) != 0 {
            rect(out, min, max, color);
        }
    }
}
