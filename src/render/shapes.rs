//! Rasterization for 2D primitives
//!
//! Coverage is tested at pixel centers (x + 0.5, y + 0.5), without
//! anti-aliasing, which keeps recorded frames byte-reproducible.

use glam::Vec2;

use super::canvas::Canvas;
use crate::sim::{Rgb, closest_point_on_segment};

/// Pixel range covering [min, max] along one axis, clipped to the canvas
fn pixel_span(min: f32, max: f32, limit: u32) -> std::ops::Range<u32> {
    let lo = (min - 0.5).floor().max(0.0);
    let hi = (max + 0.5).ceil().min(limit as f32);
    if hi <= lo {
        return 0..0;
    }
    lo as u32..hi as u32
}

#[inline]
fn pixel_center(x: u32, y: u32) -> Vec2 {
    Vec2::new(x as f32 + 0.5, y as f32 + 0.5)
}

/// Filled circle
pub fn fill_circle(canvas: &mut Canvas, center: Vec2, radius: f32, color: Rgb) {
    if !center.is_finite() || !(radius > 0.0) {
        return;
    }
    let r_sq = radius * radius;
    for y in pixel_span(center.y - radius, center.y + radius, canvas.height()) {
        for x in pixel_span(center.x - radius, center.x + radius, canvas.width()) {
            if (pixel_center(x, y) - center).length_squared() <= r_sq {
                canvas.set_pixel(x, y, color);
            }
        }
    }
}

/// Line segment with the given stroke width
pub fn stroke_segment(canvas: &mut Canvas, a: Vec2, b: Vec2, width: f32, color: Rgb) {
    if !a.is_finite() || !b.is_finite() || !(width > 0.0) {
        return;
    }
    let half = width / 2.0;
    let min = a.min(b) - Vec2::splat(half);
    let max = a.max(b) + Vec2::splat(half);
    for y in pixel_span(min.y, max.y, canvas.height()) {
        for x in pixel_span(min.x, max.x, canvas.width()) {
            let p = pixel_center(x, y);
            if (p - closest_point_on_segment(p, a, b)).length() <= half {
                canvas.set_pixel(x, y, color);
            }
        }
    }
}

/// Closed outline through `vertices` (last vertex joins the first)
pub fn stroke_polygon(canvas: &mut Canvas, vertices: &[Vec2], width: f32, color: Rgb) {
    let n = vertices.len();
    if n < 2 {
        return;
    }
    for i in 0..n {
        stroke_segment(canvas, vertices[i], vertices[(i + 1) % n], width, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_circle_covers_center_not_corners() {
        let mut canvas = Canvas::new(40, 40);
        fill_circle(&mut canvas, Vec2::new(20.0, 20.0), 10.0, Rgb::RED);
        assert_eq!(canvas.pixel(20, 20), Some(Rgb::RED));
        assert_eq!(canvas.pixel(12, 20), Some(Rgb::RED));
        assert_eq!(canvas.pixel(11, 11), Some(Rgb::BLACK));
        assert_eq!(canvas.pixel(35, 20), Some(Rgb::BLACK));
    }

    #[test]
    fn test_fill_circle_clips_at_edges() {
        let mut canvas = Canvas::new(10, 10);
        fill_circle(&mut canvas, Vec2::new(-2.0, 5.0), 4.0, Rgb::WHITE);
        assert_eq!(canvas.pixel(0, 5), Some(Rgb::WHITE));
        assert_eq!(canvas.pixel(3, 5), Some(Rgb::BLACK));
    }

    #[test]
    fn test_stroke_segment_two_pixels_thick() {
        let mut canvas = Canvas::new(20, 20);
        stroke_segment(&mut canvas, Vec2::new(2.0, 10.0), Vec2::new(18.0, 10.0), 2.0, Rgb::WHITE);
        assert_eq!(canvas.pixel(10, 9), Some(Rgb::WHITE));
        assert_eq!(canvas.pixel(10, 10), Some(Rgb::WHITE));
        assert_eq!(canvas.pixel(10, 8), Some(Rgb::BLACK));
        assert_eq!(canvas.pixel(10, 11), Some(Rgb::BLACK));
    }

    #[test]
    fn test_stroke_polygon_closes_outline() {
        let mut canvas = Canvas::new(30, 30);
        let square = [
            Vec2::new(5.0, 5.0),
            Vec2::new(25.0, 5.0),
            Vec2::new(25.0, 25.0),
            Vec2::new(5.0, 25.0),
        ];
        stroke_polygon(&mut canvas, &square, 2.0, Rgb::WHITE);
        // Closing edge from the last vertex back to the first
        assert_eq!(canvas.pixel(4, 15), Some(Rgb::WHITE));
        assert_eq!(canvas.pixel(15, 15), Some(Rgb::BLACK));
    }

    #[test]
    fn test_non_finite_shapes_draw_nothing() {
        let mut canvas = Canvas::new(8, 8);
        fill_circle(&mut canvas, Vec2::new(f32::NAN, 4.0), 3.0, Rgb::WHITE);
        stroke_segment(&mut canvas, Vec2::ZERO, Vec2::splat(f32::INFINITY), 2.0, Rgb::WHITE);
        assert!(canvas.pixels().iter().all(|p| *p == Rgb::BLACK));
    }
}
