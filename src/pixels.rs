//! Software RGBA8 surface backend.
//!
//! [`PixelSurface`] implements [`Surface`] entirely in memory: a back buffer
//! that draw calls mutate and a front buffer that [`present`](Surface::present)
//! flips to. It is the reference backend for headless runtimes and for tests;
//! a windowed embedding would upload the front buffer to its display each
//! frame.

use glam::Vec2;

use crate::draw::{Color, Image, Rect, Surface};

/// An owned RGBA8 pixel image.
#[derive(Clone, Debug)]
pub struct PixelImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelImage {
    /// Create an image filled with a solid color.
    pub fn solid(width: u32, height: u32, color: Color) -> Self {
        let rgba = color.to_rgba8();
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..width * height {
            pixels.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Wrap raw RGBA8 bytes. `pixels.len()` must equal `width * height * 4`.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        assert_eq!(pixels.len(), (width * height * 4) as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at (x, y), or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }
}

impl Image for PixelImage {
    fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

/// Blend one channel of `src` over `dst` at `alpha`.
///
/// Uses the `(x + 1 + (x >> 8)) >> 8` approximation of `x / 255`, which is
/// exact at alpha 0 and 255.
#[inline]
fn blend_channel(src: u8, dst: u8, alpha: u16) -> u8 {
    let x = src as u16 * alpha + dst as u16 * (255 - alpha);
    ((x + 1 + (x >> 8)) >> 8) as u8
}

/// Software implementation of [`Surface`] over an RGBA8 back/front buffer
/// pair.
pub struct PixelSurface {
    width: u32,
    height: u32,
    back: Vec<u8>,
    front: Vec<u8>,
    presented: u64,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width * height * 4) as usize;
        Self {
            width,
            height,
            back: vec![0; len],
            front: vec![0; len],
            presented: 0,
        }
    }

    /// Number of frames flipped to the front buffer so far.
    pub fn presented_frames(&self) -> u64 {
        self.presented
    }

    /// Pixel of the back buffer (the frame being drawn).
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.read_pixel(&self.back, x, y)
    }

    /// Pixel of the front buffer (the last presented frame).
    pub fn front_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.read_pixel(&self.front, x, y)
    }

    fn read_pixel(&self, buffer: &[u8], x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        Some([buffer[i], buffer[i + 1], buffer[i + 2], buffer[i + 3]])
    }

    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    /// Blend a single pixel into the back buffer, bounds checked.
    #[inline]
    fn plot(&mut self, x: i32, y: i32, rgba: [u8; 4]) {
        if !self.in_bounds(x, y) {
            return;
        }
        let i = ((y as u32 * self.width + x as u32) * 4) as usize;
        let alpha = rgba[3] as u16;
        for c in 0..3 {
            self.back[i + c] = blend_channel(rgba[c], self.back[i + c], alpha);
        }
        self.back[i + 3] = self.back[i + 3].max(rgba[3]);
    }

    fn blit_modulated(&mut self, image: &PixelImage, position: Vec2, modulate: u16) {
        if modulate == 0 {
            return;
        }
        let ox = position.x.round() as i32;
        let oy = position.y.round() as i32;
        for sy in 0..image.height() {
            let dy = oy + sy as i32;
            if dy < 0 || dy >= self.height as i32 {
                continue;
            }
            for sx in 0..image.width() {
                let dx = ox + sx as i32;
                if dx < 0 || dx >= self.width as i32 {
                    continue;
                }
                let Some(mut rgba) = image.pixel(sx, sy) else {
                    continue;
                };
                rgba[3] = ((rgba[3] as u16 * modulate) / 255) as u8;
                self.plot(dx, dy, rgba);
            }
        }
    }

    /// Stamp a `width`-wide square brush centered on (x, y).
    fn stamp(&mut self, x: i32, y: i32, rgba: [u8; 4], width: u32) {
        let reach = (width.max(1) / 2) as i32;
        for dy in -reach..=(width.max(1) as i32 - 1 - reach) {
            for dx in -reach..=(width.max(1) as i32 - 1 - reach) {
                self.plot(x + dx, y + dy, rgba);
            }
        }
    }
}

impl Surface for PixelSurface {
    type Image = PixelImage;

    fn blit(&mut self, image: &PixelImage, position: Vec2) {
        self.blit_modulated(image, position, 255);
    }

    fn blit_alpha(&mut self, image: &PixelImage, position: Vec2, alpha: u8) {
        self.blit_modulated(image, position, alpha as u16);
    }

    fn fill(&mut self, color: Color) {
        let rgba = color.to_rgba8();
        for px in self.back.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    fn rect(&mut self, color: Color, rect: Rect, width: u32) {
        let rgba = color.to_rgba8();
        let x0 = rect.x.round() as i32;
        let y0 = rect.y.round() as i32;
        let x1 = x0 + rect.width.round() as i32;
        let y1 = y0 + rect.height.round() as i32;
        for y in y0..y1 {
            for x in x0..x1 {
                let on_border = x - x0 < width as i32
                    || x1 - 1 - x < width as i32
                    || y - y0 < width as i32
                    || y1 - 1 - y < width as i32;
                if width == 0 || on_border {
                    self.plot(x, y, rgba);
                }
            }
        }
    }

    fn line(&mut self, color: Color, p1: Vec2, p2: Vec2, width: u32) {
        // Bresenham over the rounded endpoints.
        let rgba = color.to_rgba8();
        let (mut x, mut y) = (p1.x.round() as i32, p1.y.round() as i32);
        let (x1, y1) = (p2.x.round() as i32, p2.y.round() as i32);
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.stamp(x, y, rgba, width);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn present(&mut self) {
        self.front.copy_from_slice(&self.back);
        self.presented += 1;
    }

    fn snapshot(&self) -> PixelImage {
        PixelImage::from_rgba8(self.width, self.height, self.back.clone())
    }

    fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_and_snapshot() {
        let mut surface = PixelSurface::new(4, 4);
        surface.fill(Color::RED);
        assert_eq!(surface.pixel(2, 2), Some([255, 0, 0, 255]));

        let shot = surface.snapshot();
        assert_eq!(shot.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(shot.size(), Vec2::new(4.0, 4.0));
    }

    #[test]
    fn blit_clips_at_edges() {
        let mut surface = PixelSurface::new(4, 4);
        let sprite = PixelImage::solid(3, 3, Color::GREEN);
        surface.blit(&sprite, Vec2::new(-1.0, 2.0));
        assert_eq!(surface.pixel(0, 2), Some([0, 255, 0, 255]));
        assert_eq!(surface.pixel(1, 3), Some([0, 255, 0, 255]));
        assert_eq!(surface.pixel(2, 2), Some([0, 0, 0, 0]));
    }

    #[test]
    fn blit_alpha_is_exact_at_the_extremes() {
        let mut surface = PixelSurface::new(2, 1);
        surface.fill(Color::BLACK);
        let sprite = PixelImage::solid(2, 1, Color::rgb(0.5, 0.25, 1.0));

        surface.blit_alpha(&sprite, Vec2::ZERO, 255);
        assert_eq!(surface.pixel(0, 0), Some(Color::rgb(0.5, 0.25, 1.0).to_rgba8()));

        surface.fill(Color::RED);
        surface.blit_alpha(&sprite, Vec2::ZERO, 0);
        assert_eq!(surface.pixel(0, 0), Some([255, 0, 0, 255]));
    }

    #[test]
    fn present_flips_back_to_front() {
        let mut surface = PixelSurface::new(2, 2);
        surface.fill(Color::BLUE);
        assert_eq!(surface.front_pixel(0, 0), Some([0, 0, 0, 0]));
        surface.present();
        assert_eq!(surface.front_pixel(0, 0), Some([0, 0, 255, 255]));
        assert_eq!(surface.presented_frames(), 1);
    }

    #[test]
    fn stroked_rect_leaves_interior_untouched() {
        let mut surface = PixelSurface::new(8, 8);
        surface.rect(Color::WHITE, Rect::new(1.0, 1.0, 6.0, 6.0), 1);
        assert_eq!(surface.pixel(1, 1), Some([255, 255, 255, 255]));
        assert_eq!(surface.pixel(3, 3), Some([0, 0, 0, 0]));
    }

    #[test]
    fn line_covers_both_endpoints() {
        let mut surface = PixelSurface::new(8, 8);
        surface.line(Color::WHITE, Vec2::new(0.0, 0.0), Vec2::new(5.0, 3.0), 1);
        assert_eq!(surface.pixel(0, 0), Some([255, 255, 255, 255]));
        assert_eq!(surface.pixel(5, 3), Some([255, 255, 255, 255]));
    }
}
