//! Scenes and the transitions between them.
//!
//! A [`Scene`] is the active content the runtime drives each frame:
//! `update`, `render`, and an `on_close` hook fired exactly once when the
//! scene is replaced. Scenes are swapped through [`Transition`] requests —
//! an instant cut or a 255-step alpha crossfade between frame snapshots,
//! optionally deferred behind a readiness predicate.
//!
//! Requests are strictly last-write-wins and are consumed at the end of the
//! frame's render pass. Once a crossfade starts it always plays to
//! completion; there is no cancellation.
//!
//! # Example
//!
//! ```ignore
//! impl Scene<PixelSurface> for TitleScreen {
//!     fn update(&mut self, ctx: &mut SceneContext<'_, PixelSurface>) {
//!         if ctx.input.key_pressed(KeyCode::Enter) {
//!             ctx.transitions
//!                 .request(Transition::fade(|| Ok(Box::new(GameScene::new()))));
//!         }
//!     }
//!
//!     fn render(&mut self, ctx: &mut SceneContext<'_, PixelSurface>) {
//!         ctx.viewport.draw_rect(ctx.surface, Color::WHITE, LOGO_RECT, 0);
//!     }
//! }
//! ```

mod controller;
pub mod scene;
mod transition;

pub(crate) use controller::Applying;
pub use controller::{CROSSFADE_STEPS, TransitionController, crossfade_weights};
pub use scene::{Scene, SceneContext, SceneError, SessionId};
pub use transition::{ReadyCheck, SceneFactory, Transition, TransitionKind};
