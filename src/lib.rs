//! # Scrim
//!
//! **A 2D viewport and scene-transition layer that gets out of your way.**
//!
//! Scrim is the camera and scene-swap core of a 2D game runtime: it maps
//! world-space draws into screen space through a movable, shakeable
//! [`Viewport`], culls anything off screen, and swaps scenes through an
//! instant cut or a 255-step alpha crossfade driven by a resumable state
//! machine.
//!
//! ## Quick start
//!
//! ```no_run
//! use scrim::*;
//!
//! struct Title;
//!
//! impl Scene<PixelSurface> for Title {
//!     fn update(&mut self, ctx: &mut SceneContext<'_, PixelSurface>) {
//!         ctx.viewport.lerp(Vec2::new(400.0, 300.0), 0.1, ctx.dt);
//!         if ctx.input.key_pressed(KeyCode::Enter) {
//!             ctx.transitions
//!                 .request(Transition::fade(|| Ok(Box::new(Title))));
//!         }
//!     }
//!
//!     fn render(&mut self, ctx: &mut SceneContext<'_, PixelSurface>) {
//!         let logo = Rect::new(350.0, 250.0, 100.0, 100.0);
//!         ctx.viewport.draw_rect(ctx.surface, Color::WHITE, logo, 0);
//!     }
//! }
//!
//! fn main() -> Result<(), SceneError> {
//!     let mut runtime = Runtime::new(
//!         PixelSurface::new(800, 600),
//!         SystemClock::new(),
//!         MyInput::default(),   // your InputSource
//!         NullCursor,
//!     );
//!     runtime.set_scene(Box::new(Title));
//!     runtime.run()
//! }
//! # #[derive(Default)] struct MyInput;
//! # impl InputSource for MyInput {
//! #     fn poll(&mut self) -> Vec<scrim::Event> { vec![scrim::Event::CloseRequested] }
//! #     fn mouse_position(&self) -> Vec2 { Vec2::ZERO }
//! #     fn mouse_down(&self, _: MouseButton) -> bool { false }
//! #     fn key_down(&self, _: KeyCode) -> bool { false }
//! # }
//! ```
//!
//! ## Philosophy
//!
//! - **The platform stays outside** — windows, GPUs, and OS input arrive
//!   through four narrow traits ([`Surface`], [`Clock`], [`InputSource`],
//!   [`CursorHost`]); the core runs headless under test.
//! - **No globals** — everything a scene may touch is handed to it in a
//!   [`SceneContext`], never reached through a process-wide instance.
//! - **Cooperative, not concurrent** — one thread, one frame at a time;
//!   even the crossfade is just a state machine advanced once per tick.

mod cache;
mod clock;
mod cursor;
mod draw;
mod input;
mod pixels;
mod runtime;
pub mod scene;
mod viewport;

pub use cache::{DEFAULT_CACHE_CAPACITY, ImageCache, ImageKey, ResourceCache};
pub use clock::{Clock, MAX_DELTA, SystemClock};
pub use cursor::{CursorGlyph, CursorHost, NullCursor};
pub use draw::{Color, Image, Rect, Surface};
pub use input::{Event, Input, InputSource};
pub use pixels::{PixelImage, PixelSurface};
pub use runtime::{DEFAULT_TARGET_FPS, Runtime};
pub use scene::{
    CROSSFADE_STEPS, Scene, SceneContext, SceneError, SessionId, Transition,
    TransitionController, TransitionKind,
};
pub use viewport::{DEFAULT_SHAKE_INTERVAL, Viewport};

// Re-export glam math types for convenience
pub use glam::Vec2;

// Re-export commonly used winit types for convenience
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;
