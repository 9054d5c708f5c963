//! Scene trait, session identifiers, and the per-frame scene context.

use std::fmt;

use crate::cache::ImageCache;
use crate::draw::Surface;
use crate::input::Input;
use crate::scene::TransitionController;
use crate::viewport::Viewport;

/// Token identifying one tenure of an active scene.
///
/// Regenerated on every scene swap. Collaborators that cache state against a
/// scene hold the id they saw at cache time and compare it against
/// [`SceneContext::session`] to detect that their state belongs to a
/// since-replaced scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl SessionId {
    /// Draw a fresh random id.
    pub fn generate() -> Self {
        Self(rand::random())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Errors raised while constructing a scene.
///
/// A failed scene factory is fatal: the transition cannot proceed without its
/// target, so the error propagates out of the frame loop.
#[derive(Debug)]
pub enum SceneError {
    /// The factory rejected its arguments.
    Config(String),
    /// A file the scene needs could not be read.
    Io(std::io::Error),
    /// Some other resource (image, font handle) was missing or invalid.
    Resource(String),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::Config(msg) => write!(f, "scene configuration error: {}", msg),
            SceneError::Io(e) => write!(f, "IO error: {}", e),
            SceneError::Resource(msg) => write!(f, "missing scene resource: {}", msg),
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SceneError {
    fn from(e: std::io::Error) -> Self {
        SceneError::Io(e)
    }
}

/// Everything a scene may touch during one frame.
///
/// Handed to [`Scene::update`] and [`Scene::render`] by the runtime; scenes
/// never reach for a process-wide instance.
pub struct SceneContext<'a, S: Surface> {
    /// The camera. Render through it so draws are projected and culled.
    pub viewport: &'a mut Viewport,
    /// The raw screen buffer, for screen-space draws that bypass the camera.
    pub surface: &'a mut S,
    /// Input state for this frame.
    pub input: &'a Input,
    /// Images derived for this scene; cleared automatically on scene swap.
    pub images: &'a mut ImageCache<S::Image>,
    /// Request scene transitions here.
    pub transitions: &'a mut TransitionController<S>,
    /// Seconds since the previous frame, capped.
    pub dt: f32,
    /// Seconds since the runtime's clock started.
    pub now: f64,
    /// The current scene session.
    pub session: SessionId,
}

/// The active content the runtime drives each frame.
pub trait Scene<S: Surface> {
    /// Advance the scene's state by `ctx.dt`.
    fn update(&mut self, ctx: &mut SceneContext<'_, S>);

    /// Draw the scene. Called once per frame, and extra times by the
    /// transition controller when capturing crossfade snapshots.
    fn render(&mut self, ctx: &mut SceneContext<'_, S>);

    /// Called exactly once when the scene is about to be replaced or the
    /// runtime shuts down.
    fn on_close(&mut self) {}
}
