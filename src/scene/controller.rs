//! The transition controller: pending requests and the applying state
//! machine.
//!
//! The controller never blocks. Where the classic formulation busy-loops
//! (waiting on a readiness predicate, playing the crossfade), this one holds
//! an explicit [`Applying`] state and is advanced one step per external frame
//! tick by the runtime, so every intermediate frame still goes through the
//! normal pump.

use glam::Vec2;

use crate::draw::{Color, Surface};
use crate::scene::scene::Scene;
use crate::scene::transition::{ReadyCheck, Transition};

/// Number of discrete crossfade steps (and presented crossfade frames).
pub const CROSSFADE_STEPS: u32 = 255;

/// Blend weights for crossfade step `step`, as `(old_alpha, new_alpha)`.
///
/// Weights always sum to 255; step 0 is pure old frame, the final step is
/// one weight short of pure new (the post-fade render supplies the rest).
pub fn crossfade_weights(step: u32) -> (u8, u8) {
    let step = step.min(CROSSFADE_STEPS - 1);
    ((CROSSFADE_STEPS - step) as u8, step as u8)
}

/// An in-flight transition, between request consumption and completion.
pub(crate) enum Applying<S: Surface> {
    /// Fade with a readiness predicate that hasn't flipped yet. The old
    /// scene is still active and keeps pumping full frames; `next` waits
    /// here until `ready` returns true.
    WaitingForReady {
        next: Box<dyn Scene<S>>,
        ready: ReadyCheck,
        old_frame: S::Image,
    },
    /// Crossfading between two frame snapshots, one step per frame tick.
    Crossfading {
        old_frame: S::Image,
        new_frame: S::Image,
        step: u32,
    },
}

/// Holds the pending transition request and drives it through
/// `Idle → Requested → Applying → Idle`.
pub struct TransitionController<S: Surface> {
    pending: Option<Transition<S>>,
    applying: Option<Applying<S>>,
}

impl<S: Surface> TransitionController<S> {
    pub fn new() -> Self {
        Self {
            pending: None,
            applying: None,
        }
    }

    /// Queue a transition for the end of the current frame's render pass.
    ///
    /// Strictly last-write-wins: a request made before the previous one was
    /// consumed silently replaces it. There is no queue, and a transition
    /// that has started applying can no longer be displaced.
    pub fn request(&mut self, transition: Transition<S>) {
        if self.pending.is_some() {
            log::debug!("transition request replaced before it was applied");
        }
        self.pending = Some(transition);
    }

    /// True when no request is pending and nothing is applying.
    pub fn is_idle(&self) -> bool {
        self.pending.is_none() && self.applying.is_none()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// True from request consumption until the transition completes.
    pub fn is_applying(&self) -> bool {
        self.applying.is_some()
    }

    /// True while the crossfade animation is playing.
    pub fn is_crossfading(&self) -> bool {
        matches!(self.applying, Some(Applying::Crossfading { .. }))
    }

    /// True while a fade is parked on an unsatisfied readiness predicate.
    pub fn is_waiting(&self) -> bool {
        matches!(self.applying, Some(Applying::WaitingForReady { .. }))
    }

    /// Consume the pending request. Refused while a transition is already
    /// applying; the pending request stays queued for the next apply point.
    pub(crate) fn take_pending(&mut self) -> Option<Transition<S>> {
        if self.applying.is_some() {
            return None;
        }
        self.pending.take()
    }

    pub(crate) fn set_applying(&mut self, state: Applying<S>) {
        self.applying = Some(state);
    }

    pub(crate) fn take_applying(&mut self) -> Option<Applying<S>> {
        self.applying.take()
    }

    /// Render and present one crossfade frame, advancing the step counter.
    ///
    /// Returns true when the crossfade just finished (the caller then
    /// renders the new scene once more to settle the surface).
    pub(crate) fn crossfade_step(&mut self, surface: &mut S) -> bool {
        let Some(Applying::Crossfading {
            old_frame,
            new_frame,
            step,
        }) = &mut self.applying
        else {
            return false;
        };

        let (old_alpha, new_alpha) = crossfade_weights(*step);
        surface.fill(Color::BLACK);
        surface.blit_alpha(old_frame, Vec2::ZERO, old_alpha);
        surface.blit_alpha(new_frame, Vec2::ZERO, new_alpha);
        surface.present();

        *step += 1;
        if *step >= CROSSFADE_STEPS {
            self.applying = None;
            log::debug!("crossfade complete");
            true
        } else {
            false
        }
    }
}

impl<S: Surface> Default for TransitionController<S> {
    fn default() -> Self {
        Self::new()
    }
}
