//! Transition requests: what to switch to and how.

use crate::draw::Surface;
use crate::scene::scene::{Scene, SceneError};

/// Builds the target scene when the transition is applied.
///
/// Scene arguments are captured by the closure. Errors propagate out of the
/// frame loop and terminate the runtime; a transition cannot proceed without
/// its target scene.
pub type SceneFactory<S> = Box<dyn FnOnce() -> Result<Box<dyn Scene<S>>, SceneError>>;

/// Polled once per pumped frame to decide when a deferred fade may swap
/// scenes.
pub type ReadyCheck = Box<dyn FnMut() -> bool>;

/// How the swap is presented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransitionKind {
    /// Swap immediately, no animation.
    Instant,
    /// Alpha crossfade from the old frame to the new one.
    #[default]
    Fade,
    /// Not implemented; currently behaves like [`Instant`](TransitionKind::Instant).
    SlideLeft,
    /// Not implemented; currently behaves like [`Instant`](TransitionKind::Instant).
    SlideRight,
}

/// A request to replace the active scene.
///
/// Build one with [`fade`](Transition::fade) or
/// [`instant`](Transition::instant) and hand it to
/// [`TransitionController::request`](crate::scene::TransitionController::request)
/// (or [`SceneContext::transitions`](crate::scene::SceneContext)). The
/// request is consumed at the end of the next frame's render pass.
///
/// # Example
///
/// ```ignore
/// ctx.transitions.request(
///     Transition::fade(|| Ok(Box::new(GameScene::load("level-2")?)))
///         .when_ready(move || assets.finished_loading()),
/// );
/// ```
pub struct Transition<S: Surface> {
    pub(crate) factory: SceneFactory<S>,
    pub(crate) kind: TransitionKind,
    pub(crate) ready: Option<ReadyCheck>,
}

impl<S: Surface> Transition<S> {
    /// A transition of the given kind.
    pub fn new(
        kind: TransitionKind,
        factory: impl FnOnce() -> Result<Box<dyn Scene<S>>, SceneError> + 'static,
    ) -> Self {
        Self {
            factory: Box::new(factory),
            kind,
            ready: None,
        }
    }

    /// Crossfade to the scene the factory builds.
    pub fn fade(
        factory: impl FnOnce() -> Result<Box<dyn Scene<S>>, SceneError> + 'static,
    ) -> Self {
        Self::new(TransitionKind::Fade, factory)
    }

    /// Cut to the scene the factory builds with no animation.
    pub fn instant(
        factory: impl FnOnce() -> Result<Box<dyn Scene<S>>, SceneError> + 'static,
    ) -> Self {
        Self::new(TransitionKind::Instant, factory)
    }

    /// Defer a fade's scene swap until `ready` returns true.
    ///
    /// While the predicate is false the runtime keeps pumping full frames of
    /// the outgoing scene, one predicate poll per frame. Nothing bounds the
    /// wait; a predicate that never flips keeps the old scene on screen
    /// forever. Ignored by instant transitions.
    pub fn when_ready(mut self, ready: impl FnMut() -> bool + 'static) -> Self {
        self.ready = Some(Box::new(ready));
        self
    }

    pub fn kind(&self) -> TransitionKind {
        self.kind
    }
}
