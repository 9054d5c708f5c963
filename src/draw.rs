//! Drawing types and the drawable-surface contract.
//!
//! The crate never talks to a window or GPU directly. Everything that ends up
//! on screen goes through [`Surface`], a narrow trait the embedding runtime
//! implements over its real display. [`PixelSurface`](crate::PixelSurface)
//! is a software implementation suitable for headless use and tests.

use glam::Vec2;

/// A rectangle in pixel coordinates (world-space or screen-space depending
/// on context).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle from a top-left position and an extent.
    pub fn from_pos_size(position: Vec2, size: Vec2) -> Self {
        Self::new(position.x, position.y, size.x, size.y)
    }

    /// Top-left corner.
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Returns a copy moved by `delta`.
    pub fn translated(&self, delta: Vec2) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y, self.width, self.height)
    }

    /// Returns true if the two rectangles overlap.
    ///
    /// Touching edges do not count as an overlap, matching the half-open
    /// `[position, position + size)` convention used for culling.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }

    /// Smallest rectangle containing both points.
    pub fn spanning(a: Vec2, b: Vec2) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }
}

/// RGBA color with components in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const RED: Color = Color::rgba(1.0, 0.0, 0.0, 1.0);
    pub const GREEN: Color = Color::rgba(0.0, 1.0, 0.0, 1.0);
    pub const BLUE: Color = Color::rgba(0.0, 0.0, 1.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    /// Convert to 8-bit RGBA, clamping each component.
    pub fn to_rgba8(&self) -> [u8; 4] {
        let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [
            quantize(self.r),
            quantize(self.g),
            quantize(self.b),
            quantize(self.a),
        ]
    }
}

/// Something that can be blitted onto a [`Surface`].
///
/// Surfaces produce these from [`Surface::snapshot`]; scenes may also hold
/// them as sprites.
pub trait Image {
    /// Extent in pixels.
    fn size(&self) -> Vec2;
}

/// The drawable screen buffer the viewport and transition controller render
/// into.
///
/// Implementations must make [`snapshot`](Surface::snapshot) cheap enough to
/// call once per scene transition; the crossfade holds two snapshots alive
/// while it plays.
pub trait Surface {
    type Image: Image;

    /// Copy `image` onto the surface with its top-left at `position`.
    fn blit(&mut self, image: &Self::Image, position: Vec2);

    /// Like [`blit`](Surface::blit), but modulates the image's alpha by
    /// `alpha` (0 = invisible, 255 = unchanged).
    fn blit_alpha(&mut self, image: &Self::Image, position: Vec2, alpha: u8);

    /// Fill the whole surface with a color.
    fn fill(&mut self, color: Color);

    /// Draw a rectangle. `width` is the stroke width in pixels; 0 means
    /// filled.
    fn rect(&mut self, color: Color, rect: Rect, width: u32);

    /// Draw a line segment `width` pixels wide.
    fn line(&mut self, color: Color, p1: Vec2, p2: Vec2, width: u32);

    /// Flip the finished frame to the display.
    fn present(&mut self);

    /// Copy the surface's current contents into an image.
    fn snapshot(&self) -> Self::Image;

    /// Surface extent in pixels.
    fn size(&self) -> Vec2;
}
