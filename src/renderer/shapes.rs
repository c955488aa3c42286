//! Shape generation for 2D primitives
//!
//! All shapes are emitted as triangle lists in field coordinates
//! (origin top-left, y down).

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Axis-aligned filled rectangle from its top-left corner
pub fn rect(pos: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let (x0, y0) = (pos.x, pos.y);
    let (x1, y1) = (pos.x + size.x, pos.y + size.y);
    vec![
        Vertex::new(x0, y0, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x1, y1, color),
    ]
}

/// Filled convex polygon (fan from the first point)
pub fn polygon(points: &[Vec2], color: [f32; 4]) -> Vec<Vertex> {
    if points.len() < 3 {
        return Vec::new();
    }
    let mut vertices = Vec::with_capacity((points.len() - 2) * 3);
    let first = points[0];
    for pair in points[1..].windows(2) {
        vertices.push(Vertex::new(first.x, first.y, color));
        vertices.push(Vertex::new(pair[0].x, pair[0].y, color));
        vertices.push(Vertex::new(pair[1].x, pair[1].y, color));
    }
    vertices
}

/// Filled circle
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

/// Ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
        let (dir1, dir2) = (Vec2::from_angle(theta1), Vec2::from_angle(theta2));

        let inner1 = center + dir1 * inner_radius;
        let outer1 = center + dir1 * outer_radius;
        let inner2 = center + dir2 * inner_radius;
        let outer2 = center + dir2 * outer_radius;

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

/// Rectangle outline of the given line width, drawn inside the bounds
pub fn rect_outline(pos: Vec2, size: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(24);
    vertices.extend(rect(pos, Vec2::new(size.x, width), color));
    vertices.extend(rect(
        Vec2::new(pos.x, pos.y + size.y - width),
        Vec2::new(size.x, width),
        color,
    ));
    vertices.extend(rect(
        Vec2::new(pos.x, pos.y + width),
        Vec2::new(width, size.y - 2.0 * width),
        color,
    ));
    vertices.extend(rect(
        Vec2::new(pos.x + size.x - width, pos.y + width),
        Vec2::new(width, size.y - 2.0 * width),
        color,
    ));
    vertices
}

/// Two-tone bar: `empty` across the full width, `full` over `fraction` of it
pub fn bar(pos: Vec2, size: Vec2, fraction: f32, empty: [f32; 4], full: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = rect(pos, size, empty);
    let filled = size.x * fraction.clamp(0.0, 1.0);
    if filled > 0.0 {
        vertices.extend(rect(pos, Vec2::new(filled, size.y), full));
    }
    vertices
}

/// Map points given in a sprite's local box onto `pos`/`size`
pub fn scale_points(local: &[Vec2], local_size: Vec2, pos: Vec2, size: Vec2) -> Vec<Vec2> {
    local
        .iter()
        .map(|p| pos + *p / local_size * size)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_covers_bounds() {
        let v = rect(Vec2::new(10.0, 20.0), Vec2::new(5.0, 4.0), [1.0; 4]);
        assert_eq!(v.len(), 6);
        let xs: Vec<f32> = v.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = v.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 10.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 15.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 20.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 24.0);
    }

    #[test]
    fn test_polygon_fan() {
        let quad = [
            Vec2::ZERO,
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];
        assert_eq!(polygon(&quad, [1.0; 4]).len(), 6);
        assert!(polygon(&quad[..2], [1.0; 4]).is_empty());
    }

    #[test]
    fn test_bar_fill() {
        assert_eq!(bar(Vec2::ZERO, Vec2::new(10.0, 2.0), 0.0, [0.0; 4], [1.0; 4]).len(), 6);
        let v = bar(Vec2::ZERO, Vec2::new(10.0, 2.0), 0.5, [0.0; 4], [1.0; 4]);
        assert_eq!(v.len(), 12);
        let max_full_x = v[6..]
            .iter()
            .map(|v| v.position[0])
            .fold(f32::MIN, f32::max);
        assert_eq!(max_full_x, 5.0);
    }

    #[test]
    fn test_circle_and_ring_counts() {
        assert_eq!(circle(Vec2::ZERO, 1.0, [1.0; 4], 16).len(), 48);
        assert_eq!(ring(Vec2::ZERO, 1.0, 2.0, [1.0; 4], 16).len(), 96);
    }

    #[test]
    fn test_scale_points() {
        let pts = scale_points(
            &[Vec2::new(20.0, 5.0)],
            Vec2::splat(40.0),
            Vec2::new(100.0, 100.0),
            Vec2::splat(40.0),
        );
        assert_eq!(pts[0], Vec2::new(120.0, 105.0));
    }
}
