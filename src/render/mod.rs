//! Software rendering
//!
//! Draws the scene into an RGB `Canvas` on the CPU. The simulation never calls
//! into this module; hosts pass a `SceneView` each frame.

pub mod canvas;
pub mod shapes;

pub use canvas::Canvas;

use crate::sim::{Rgb, SceneView};

/// Colors and stroke widths for a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub background: Rgb,
    pub outline: Rgb,
    /// Polygon outline width in pixels
    pub outline_width: f32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            background: Rgb::BLACK,
            outline: Rgb::WHITE,
            outline_width: 2.0,
        }
    }
}

/// Render one frame: background, polygon outline, then the filled ball
pub fn draw_scene(view: &SceneView<'_>, canvas: &mut Canvas, style: &Style) {
    canvas.clear(style.background);
    shapes::stroke_polygon(canvas, view.vertices, style.outline_width, style.outline);
    shapes::fill_circle(canvas, view.ball_pos, view.ball_radius, view.ball_color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::sim::Simulator;

    #[test]
    fn test_draw_initial_scene() {
        let sim = Simulator::new(SimConfig::default()).unwrap();
        let mut canvas = Canvas::new(800, 600);
        draw_scene(&sim.view(), &mut canvas, &Style::default());

        // Ball at the center, red at spawn
        assert_eq!(canvas.pixel(400, 300), Some(Rgb::RED));
        // Square outline: top edge at y = 200
        assert_eq!(canvas.pixel(400, 200), Some(Rgb::WHITE));
        // Between ball and outline
        assert_eq!(canvas.pixel(400, 250), Some(Rgb::BLACK));
        // Outside the square
        assert_eq!(canvas.pixel(50, 50), Some(Rgb::BLACK));
    }

    #[test]
    fn test_redraw_clears_previous_frame() {
        let mut sim = Simulator::new(SimConfig::default()).unwrap();
        let mut canvas = Canvas::new(800, 600);
        draw_scene(&sim.view(), &mut canvas, &Style::default());
        for _ in 0..20 {
            sim.advance(1.0 / 60.0);
        }
        draw_scene(&sim.view(), &mut canvas, &Style::default());
        // Ball has fallen, so its spawn position is background again
        assert_eq!(canvas.pixel(400, 295), Some(Rgb::BLACK));
    }
}
