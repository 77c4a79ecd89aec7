//! RGB pixel buffer

use crate::sim::Rgb;

/// A width x height grid of packed RGB pixels, row-major from the top-left
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb::BLACK; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Fill every pixel with one color
    pub fn clear(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Write a pixel; out-of-bounds writes are ignored
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgb) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Raw `rgb24` bytes, as an encoder expects them
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Size of one frame in bytes
    pub fn frame_len(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<Rgb>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_canvas_is_black() {
        let canvas = Canvas::new(4, 3);
        assert_eq!(canvas.pixels().len(), 12);
        assert!(canvas.pixels().iter().all(|p| *p == Rgb::BLACK));
        assert_eq!(canvas.as_bytes().len(), 36);
        assert_eq!(canvas.frame_len(), 36);
    }

    #[test]
    fn test_set_pixel_row_major() {
        let mut canvas = Canvas::new(4, 3);
        canvas.set_pixel(1, 2, Rgb::new(10, 20, 30));
        let offset = (2 * 4 + 1) * 3;
        assert_eq!(&canvas.as_bytes()[offset..offset + 3], &[10, 20, 30]);
        assert_eq!(canvas.pixel(1, 2), Some(Rgb::new(10, 20, 30)));
    }

    #[test]
    fn test_out_of_bounds_ignored() {
        let mut canvas = Canvas::new(2, 2);
        canvas.set_pixel(2, 0, Rgb::WHITE);
        canvas.set_pixel(0, 7, Rgb::WHITE);
        assert!(canvas.pixels().iter().all(|p| *p == Rgb::BLACK));
        assert_eq!(canvas.pixel(5, 5), None);
    }
}
