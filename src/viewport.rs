//! The camera: world-to-screen projection, culling, and screen shake.

use glam::Vec2;
use rand::Rng;

use crate::draw::{Color, Rect, Surface};

/// Default resample interval for [`Viewport::shake`], in seconds.
pub const DEFAULT_SHAKE_INTERVAL: f64 = 0.1;

/// Timed, randomized, decaying jitter applied to the screen projection.
#[derive(Clone, Copy, Debug, Default)]
struct Shake {
    active: bool,
    end_time: f64,
    intensity: f32,
    resample_interval: f64,
    next_resample: f64,
    total_length: f64,
}

/// A movable, shakeable camera over a fixed-size view.
///
/// The viewport owns the world-space `position` of the visible region's
/// top-left corner and maps world coordinates to screen coordinates through
/// [`project`](Viewport::project). Every draw primitive applies that
/// projection and culls against [`bounds`](Viewport::bounds) before touching
/// the surface.
///
/// Timestamps (`now`) are seconds from the runtime's [`Clock`](crate::Clock);
/// the viewport never reads a clock itself.
#[derive(Clone, Debug)]
pub struct Viewport {
    /// World-space top-left of the visible region.
    pub position: Vec2,
    size: Vec2,
    bounds: Rect,
    /// Transient shake displacement added to every projection.
    pub offset: Vec2,
    shake: Shake,
}

impl Viewport {
    /// Create a viewport covering `size` pixels, positioned at the world
    /// origin.
    pub fn new(size: Vec2) -> Self {
        Self {
            position: Vec2::ZERO,
            size,
            bounds: Rect::from_pos_size(Vec2::ZERO, size),
            offset: Vec2::ZERO,
            shake: Shake::default(),
        }
    }

    /// View extent in pixels, fixed at construction.
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// The world-space rectangle currently visible, as of the last
    /// [`update`](Viewport::update).
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Per-frame update: recompute the view bounds from `position` and, if a
    /// shake is running, resample the offset on its interval.
    ///
    /// Offset components are drawn uniformly from `[-intensity, intensity]`
    /// and scaled by the fraction of shake time remaining, so the amplitude
    /// decays linearly to zero. Once the shake's end time has passed this is
    /// a no-op: the offset keeps its last sampled value until the next
    /// [`shake`](Viewport::shake) or [`reset_shake`](Viewport::reset_shake).
    pub fn update(&mut self, now: f64) {
        self.bounds = Rect::from_pos_size(self.position, self.size);

        if self.shake.active && now < self.shake.end_time && now >= self.shake.next_resample {
            let remaining = (self.shake.end_time - now) / self.shake.total_length;
            let amplitude = self.shake.intensity * remaining as f32;
            let mut rng = rand::rng();
            self.offset = Vec2::new(
                rng.random_range(-amplitude..=amplitude),
                rng.random_range(-amplitude..=amplitude),
            );
            self.shake.next_resample = now + self.shake.resample_interval;
        }
    }

    /// Smooth the camera toward centering `target` in the view.
    ///
    /// Moves `position` by `factor * dt * 60` of the remaining distance to
    /// `target - size / 2`, i.e. exponential smoothing normalized to a 60 fps
    /// baseline. Overshoot-free for `factor * dt * 60 < 2`.
    pub fn lerp(&mut self, target: Vec2, factor: f32, dt: f32) {
        let goal = target - self.size / 2.0;
        self.position += (goal - self.position) * factor * dt * 60.0;
    }

    /// Map a world-space point to screen space.
    pub fn project(&self, world: Vec2) -> Vec2 {
        world - self.position + self.offset
    }

    /// Returns true if any part of `world_rect` is inside the view bounds.
    pub fn visible(&self, world_rect: &Rect) -> bool {
        world_rect.intersects(&self.bounds)
    }

    /// Start (or restart) a shake with the default resample interval.
    pub fn shake(&mut self, intensity: f32, length: f64, now: f64) {
        self.shake_with_interval(intensity, length, DEFAULT_SHAKE_INTERVAL, now);
    }

    /// Start (or restart) a shake, resampling the offset every `interval`
    /// seconds for `length` seconds.
    ///
    /// Calling this while a shake is running replaces it; shakes do not
    /// queue or stack. A `length` of zero or less never activates — the
    /// offset stays wherever it was.
    pub fn shake_with_interval(&mut self, intensity: f32, length: f64, interval: f64, now: f64) {
        if length <= 0.0 {
            return;
        }
        log::debug!("viewport shake: intensity {intensity} for {length}s");
        self.shake = Shake {
            active: true,
            end_time: now + length,
            intensity: intensity.abs(),
            resample_interval: interval,
            next_resample: now + interval,
            total_length: length,
        };
    }

    /// Whether a shake is still running at `now`.
    pub fn is_shaking(&self, now: f64) -> bool {
        self.shake.active && now < self.shake.end_time
    }

    /// Stop any shake and zero the offset.
    ///
    /// A finished shake leaves its last sampled offset applied to every
    /// subsequent draw; call this to snap the projection back.
    pub fn reset_shake(&mut self) {
        self.shake = Shake::default();
        self.offset = Vec2::ZERO;
    }

    /// Blit `image` at a world position, culled against the view bounds.
    pub fn draw_sprite<S: Surface>(&self, surface: &mut S, image: &S::Image, world: Vec2) {
        use crate::draw::Image;
        let rect = Rect::from_pos_size(world, image.size());
        if self.visible(&rect) {
            surface.blit(image, self.project(world));
        }
    }

    /// Draw a world-space rectangle, culled against the view bounds.
    /// `width` 0 fills, otherwise strokes.
    pub fn draw_rect<S: Surface>(&self, surface: &mut S, color: Color, rect: Rect, width: u32) {
        if !self.visible(&rect) {
            return;
        }
        let projected = Rect::from_pos_size(self.project(rect.position()), rect.size());
        surface.rect(color, projected, width);
    }

    /// Draw a world-space line segment, culled via its bounding rectangle.
    pub fn draw_line<S: Surface>(&self, surface: &mut S, color: Color, p1: Vec2, p2: Vec2, width: u32) {
        if !self.visible(&Rect::spanning(p1, p2)) {
            return;
        }
        surface.line(color, self.project(p1), self.project(p2), width);
    }
}
