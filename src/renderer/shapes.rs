//! Shape generation for 2D primitives
//!
//! Everything is emitted as triangle lists in logical pixels.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

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
    let mut vertices = Vec::with_capacity((segments * 6) as usize);
    let inner_radius = inner_radius.max(0.0);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
        let (dir1, dir2) = (Vec2::from_angle(theta1), Vec2::from_angle(theta2));

        let inner1 = center + dir1 * inner_radius;
        let outer1 = center + dir1 * outer_radius;
        let inner2 = center + dir2 * inner_radius;
        let outer2 = center + dir2 * outer_radius;

        quad_into(&mut vertices, [inner1, outer1, outer2, inner2], color);
    }

    vertices
}

/// Filled axis-aligned rectangle
pub fn rect(top_left: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(6);
    rect_into(&mut vertices, top_left, size, color);
    vertices
}

/// Append a filled rectangle to `out`
pub fn rect_into(out: &mut Vec<Vertex>, top_left: Vec2, size: Vec2, color: [f32; 4]) {
    let br = top_left + size;
    quad_into(
        out,
        [
            top_left,
            Vec2::new(br.x, top_left.y),
            br,
            Vec2::new(top_left.x, br.y),
        ],
        color,
    );
}

/// Rectangle border of the given thickness (drawn inside the bounds)
pub fn rect_outline(top_left: Vec2, size: Vec2, thickness: f32, color: [f32; 4]) -> Vec<Vertex> {
    let t = thickness.min(size.x / 2.0).min(size.y / 2.0);
    let mut vertices = Vec::with_capacity(24);
    rect_into(&mut vertices, top_left, Vec2::new(size.x, t), color);
    rect_into(
        &mut vertices,
        top_left + Vec2::new(0.0, size.y - t),
        Vec2::new(size.x, t),
        color,
    );
    rect_into(
        &mut vertices,
        top_left + Vec2::new(0.0, t),
        Vec2::new(t, size.y - 2.0 * t),
        color,
    );
    rect_into(
        &mut vertices,
        top_left + Vec2::new(size.x - t, t),
        Vec2::new(t, size.y - 2.0 * t),
        color,
    );
    vertices
}

/// Thick line segment
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);
    let mut vertices = Vec::with_capacity(6);
    quad_into(
        &mut vertices,
        [from + perp, to + perp, to - perp, from - perp],
        color,
    );
    vertices
}

/// Two triangles over corners given in winding order
fn quad_into(out: &mut Vec<Vertex>, corners: [Vec2; 4], color: [f32; 4]) {
    let [a, b, c, d] = corners;
    for p in [a, b, c, a, c, d] {
        out.push(Vertex::new(p.x, p.y, color));
    }
}
