//! The frame pump: input, viewport, scene, render, transitions.
//!
//! [`Runtime`] is deliberately thin. Each frame it polls the input source,
//! updates the viewport and active scene, renders the scene through the
//! viewport, and finally asks the transition controller whether a scene swap
//! should begin or advance. Everything platform-specific arrives through the
//! four collaborator traits, so a runtime can be wired to a real window or
//! run fully headless.

use crate::cache::ImageCache;
use crate::clock::Clock;
use crate::cursor::{CursorGlyph, CursorHost};
use crate::draw::{Color, Surface};
use crate::input::{Event, Input, InputSource};
use crate::scene::{
    Applying, Scene, SceneContext, SceneError, SessionId, Transition, TransitionController,
    TransitionKind,
};
use crate::viewport::Viewport;

pub const DEFAULT_TARGET_FPS: u32 = 60;

/// Owns the active scene and drives it at a capped frame rate.
///
/// Generic over the platform collaborators: the drawable [`Surface`], the
/// [`Clock`], the [`InputSource`], and the [`CursorHost`]. The runtime is the
/// sole owner of the scene; scenes reach back only through the
/// [`SceneContext`] handed to them each frame.
pub struct Runtime<S, C, I, H>
where
    S: Surface,
    C: Clock,
    I: InputSource,
    H: CursorHost,
{
    surface: S,
    clock: C,
    input_source: I,
    cursor: H,
    input: Input,
    viewport: Viewport,
    images: ImageCache<S::Image>,
    transitions: TransitionController<S>,
    scene: Option<Box<dyn Scene<S>>>,
    session: SessionId,
    target_fps: u32,
    dt: f32,
    now: f64,
    running: bool,
}

impl<S, C, I, H> Runtime<S, C, I, H>
where
    S: Surface,
    C: Clock,
    I: InputSource,
    H: CursorHost,
{
    pub fn new(surface: S, clock: C, input_source: I, cursor: H) -> Self {
        let viewport = Viewport::new(surface.size());
        Self {
            surface,
            clock,
            input_source,
            cursor,
            input: Input::new(),
            viewport,
            images: ImageCache::new(),
            transitions: TransitionController::new(),
            scene: None,
            session: SessionId::generate(),
            target_fps: DEFAULT_TARGET_FPS,
            dt: 0.1,
            now: 0.0,
            running: true,
        }
    }

    pub fn target_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps;
        self
    }

    /// Install the initial scene without a transition.
    pub fn set_scene(&mut self, scene: Box<dyn Scene<S>>) {
        self.scene = Some(scene);
    }

    /// Request a scene transition; applied at the end of the next frame's
    /// render pass. Last-write-wins, see
    /// [`TransitionController::request`].
    pub fn transition_scene(&mut self, transition: Transition<S>) {
        self.transitions.request(transition);
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn input(&self) -> &Input {
        &self.input
    }

    pub fn transitions(&self) -> &TransitionController<S> {
        &self.transitions
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Ask the loop to stop after the current frame.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Run frames until stopped, then close the scene.
    ///
    /// A scene factory failure is fatal and propagates out of here with the
    /// frame loop terminated.
    pub fn run(&mut self) -> Result<(), SceneError> {
        while self.running {
            self.frame()?;
        }
        self.close_scene();
        Ok(())
    }

    /// Advance one frame.
    ///
    /// While a crossfade is playing this presents exactly one blend step and
    /// nothing else: no input, no scene logic. Otherwise it runs the full
    /// pump and applies any pending transition at the end of the render pass.
    pub fn frame(&mut self) -> Result<(), SceneError> {
        self.dt = self.clock.tick(self.target_fps);
        self.now = self.clock.now();

        if self.transitions.is_crossfading() {
            if self.transitions.crossfade_step(&mut self.surface) {
                // Settle the surface with an ordinary (unpresented) frame of
                // the new scene; the next pump presents it.
                self.render_pass(false);
            }
            return Ok(());
        }

        self.pump_input();
        if !self.running {
            return Ok(());
        }

        self.viewport.update(self.now);
        self.update_scene();
        self.render_pass(true);
        self.apply_transitions()
    }

    fn pump_input(&mut self) {
        self.input.begin_frame();
        for event in self.input_source.poll() {
            if event == Event::CloseRequested {
                log::debug!("close requested, stopping frame loop");
                self.running = false;
            }
            self.input.handle_event(&event);
        }
        self.input.sync_pointer(self.input_source.mouse_position());
    }

    fn update_scene(&mut self) {
        let Some(mut scene) = self.scene.take() else {
            return;
        };
        let mut ctx = SceneContext {
            viewport: &mut self.viewport,
            surface: &mut self.surface,
            input: &self.input,
            images: &mut self.images,
            transitions: &mut self.transitions,
            dt: self.dt,
            now: self.now,
            session: self.session,
        };
        scene.update(&mut ctx);
        self.scene = Some(scene);
    }

    /// Clear to black and render the active scene; optionally present.
    fn render_pass(&mut self, present: bool) {
        self.surface.fill(Color::BLACK);
        if let Some(mut scene) = self.scene.take() {
            let mut ctx = SceneContext {
                viewport: &mut self.viewport,
                surface: &mut self.surface,
                input: &self.input,
                images: &mut self.images,
                transitions: &mut self.transitions,
                dt: self.dt,
                now: self.now,
                session: self.session,
            };
            scene.render(&mut ctx);
            self.scene = Some(scene);
        }
        if present {
            self.surface.present();
        }
    }

    /// The apply point at the end of the render pass.
    fn apply_transitions(&mut self) -> Result<(), SceneError> {
        // A deferred fade polls its predicate once per pumped frame.
        if self.transitions.is_waiting() {
            if let Some(Applying::WaitingForReady {
                next,
                mut ready,
                old_frame,
            }) = self.transitions.take_applying()
            {
                if ready() {
                    self.begin_crossfade(next, old_frame);
                } else {
                    self.transitions.set_applying(Applying::WaitingForReady {
                        next,
                        ready,
                        old_frame,
                    });
                }
            }
            return Ok(());
        }

        let Some(transition) = self.transitions.take_pending() else {
            return Ok(());
        };
        let Transition {
            factory,
            kind,
            ready,
        } = transition;

        // The session changes before anything else so collaborators keyed on
        // the old id see it invalidated even if the factory fails.
        self.session = SessionId::generate();
        if let Some(scene) = self.scene.as_mut() {
            scene.on_close();
        }
        let next = factory()?;
        self.cursor.set_cursor(CursorGlyph::Arrow);
        self.images.clear();

        match kind {
            TransitionKind::Instant => {
                self.scene = Some(next);
            }
            TransitionKind::SlideLeft | TransitionKind::SlideRight => {
                log::warn!("slide transitions are not implemented, cutting instantly");
                self.scene = Some(next);
            }
            TransitionKind::Fade => {
                let old_frame = self.surface.snapshot();
                match ready {
                    Some(mut ready_fn) => {
                        if ready_fn() {
                            self.begin_crossfade(next, old_frame);
                        } else {
                            self.transitions.set_applying(Applying::WaitingForReady {
                                next,
                                ready: ready_fn,
                                old_frame,
                            });
                        }
                    }
                    None => self.begin_crossfade(next, old_frame),
                }
            }
        }
        Ok(())
    }

    /// Swap in the new scene, capture its first frame, and start blending.
    fn begin_crossfade(&mut self, next: Box<dyn Scene<S>>, old_frame: S::Image) {
        self.scene = Some(next);
        self.render_pass(false);
        let new_frame = self.surface.snapshot();
        self.transitions.set_applying(Applying::Crossfading {
            old_frame,
            new_frame,
            step: 0,
        });
    }

    fn close_scene(&mut self) {
        if let Some(mut scene) = self.scene.take() {
            scene.on_close();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use glam::Vec2;

    use super::*;
    use crate::pixels::PixelSurface;
    use crate::scene::CROSSFADE_STEPS;

    struct ManualClock {
        t: f64,
        step: f64,
    }

    impl ManualClock {
        fn new(step: f64) -> Self {
            Self { t: 0.0, step }
        }
    }

    impl Clock for ManualClock {
        fn tick(&mut self, _target_fps: u32) -> f32 {
            self.t += self.step;
            self.step as f32
        }

        fn now(&self) -> f64 {
            self.t
        }
    }

    #[derive(Default)]
    struct ScriptedInput {
        frames: VecDeque<Vec<Event>>,
    }

    impl InputSource for ScriptedInput {
        fn poll(&mut self) -> Vec<Event> {
            self.frames.pop_front().unwrap_or_default()
        }

        fn mouse_position(&self) -> Vec2 {
            Vec2::ZERO
        }

        fn mouse_down(&self, _button: winit::event::MouseButton) -> bool {
            false
        }

        fn key_down(&self, _key: winit::keyboard::KeyCode) -> bool {
            false
        }
    }

    #[derive(Default)]
    struct RecordingCursor {
        set: Rc<RefCell<Vec<CursorGlyph>>>,
    }

    impl CursorHost for RecordingCursor {
        fn set_cursor(&mut self, glyph: CursorGlyph) {
            self.set.borrow_mut().push(glyph);
        }
    }

    #[derive(Default)]
    struct SceneStats {
        updates: u32,
        renders: u32,
        closes: u32,
    }

    /// Paints the whole view a solid color and counts lifecycle calls.
    struct SolidScene {
        color: Color,
        stats: Rc<RefCell<SceneStats>>,
    }

    impl SolidScene {
        fn new(color: Color) -> (Self, Rc<RefCell<SceneStats>>) {
            let stats = Rc::new(RefCell::new(SceneStats::default()));
            (
                Self {
                    color,
                    stats: stats.clone(),
                },
                stats,
            )
        }
    }

    impl Scene<PixelSurface> for SolidScene {
        fn update(&mut self, _ctx: &mut SceneContext<'_, PixelSurface>) {
            self.stats.borrow_mut().updates += 1;
        }

        fn render(&mut self, ctx: &mut SceneContext<'_, PixelSurface>) {
            ctx.surface.fill(self.color);
            self.stats.borrow_mut().renders += 1;
        }

        fn on_close(&mut self) {
            self.stats.borrow_mut().closes += 1;
        }
    }

    type TestRuntime = Runtime<PixelSurface, ManualClock, ScriptedInput, RecordingCursor>;

    fn runtime() -> TestRuntime {
        Runtime::new(
            PixelSurface::new(4, 4),
            ManualClock::new(1.0 / 60.0),
            ScriptedInput::default(),
            RecordingCursor::default(),
        )
    }

    fn run_frames(rt: &mut TestRuntime, n: u32) {
        for _ in 0..n {
            rt.frame().unwrap();
        }
    }

    #[test]
    fn instant_transition_swaps_at_the_apply_point() {
        let mut rt = runtime();
        let (old, old_stats) = SolidScene::new(Color::RED);
        rt.set_scene(Box::new(old));
        let session_before = rt.session();

        let (new, new_stats) = SolidScene::new(Color::BLUE);
        rt.transition_scene(Transition::instant(move || {
            Ok(Box::new(new) as Box<dyn Scene<PixelSurface>>)
        }));

        run_frames(&mut rt, 1);
        assert_eq!(old_stats.borrow().closes, 1);
        assert_ne!(rt.session(), session_before);
        assert!(rt.transitions().is_idle());

        // The swapped-in scene runs from the next frame on; the old one is
        // gone.
        run_frames(&mut rt, 1);
        assert_eq!(new_stats.borrow().updates, 1);
        assert_eq!(old_stats.borrow().updates, 1);
        assert_eq!(rt.surface().front_pixel(0, 0), Some([0, 0, 255, 255]));
    }

    #[test]
    fn transition_resets_the_cursor() {
        let mut rt = runtime();
        let glyphs = Rc::new(RefCell::new(Vec::new()));
        rt.cursor = RecordingCursor {
            set: glyphs.clone(),
        };
        let (old, _) = SolidScene::new(Color::RED);
        rt.set_scene(Box::new(old));

        rt.transition_scene(Transition::instant(|| {
            Ok(Box::new(SolidScene::new(Color::BLUE).0))
        }));
        run_frames(&mut rt, 1);
        assert_eq!(*glyphs.borrow(), vec![CursorGlyph::Arrow]);
    }

    #[test]
    fn only_the_last_request_before_the_apply_point_wins() {
        let mut rt = runtime();
        let (old, _) = SolidScene::new(Color::RED);
        rt.set_scene(Box::new(old));

        let (a, a_stats) = SolidScene::new(Color::GREEN);
        rt.transition_scene(Transition::instant(move || {
            Ok(Box::new(a) as Box<dyn Scene<PixelSurface>>)
        }));
        let (b, b_stats) = SolidScene::new(Color::BLUE);
        rt.transition_scene(Transition::instant(move || {
            Ok(Box::new(b) as Box<dyn Scene<PixelSurface>>)
        }));

        run_frames(&mut rt, 2);
        assert_eq!(a_stats.borrow().renders, 0);
        assert!(b_stats.borrow().renders > 0);
    }

    #[test]
    fn fade_presents_exactly_255_blend_steps() {
        let mut rt = runtime();
        let (old, old_stats) = SolidScene::new(Color::RED);
        rt.set_scene(Box::new(old));
        run_frames(&mut rt, 1);

        let (new, new_stats) = SolidScene::new(Color::BLUE);
        rt.transition_scene(Transition::fade(move || {
            Ok(Box::new(new) as Box<dyn Scene<PixelSurface>>)
        }));

        // This frame renders the old scene, snapshots both frames, and arms
        // the crossfade. The new scene renders once for its snapshot.
        run_frames(&mut rt, 1);
        assert!(rt.transitions().is_crossfading());
        assert_eq!(new_stats.borrow().renders, 1);
        let presented_before = rt.surface().presented_frames();

        // First blend step is weighted 255:0, i.e. pure old frame.
        run_frames(&mut rt, 1);
        assert_eq!(rt.surface().front_pixel(0, 0), Some([255, 0, 0, 255]));

        let mut crossfade_frames = 1;
        while rt.transitions().is_crossfading() {
            run_frames(&mut rt, 1);
            crossfade_frames += 1;
            assert!(crossfade_frames <= CROSSFADE_STEPS, "crossfade never ended");
        }
        assert_eq!(crossfade_frames, CROSSFADE_STEPS);
        assert_eq!(
            rt.surface().presented_frames() - presented_before,
            CROSSFADE_STEPS as u64
        );

        // No scene logic ran while the fade played.
        assert_eq!(old_stats.borrow().updates, 2);
        assert_eq!(new_stats.borrow().updates, 0);

        // Back to the normal pump: the new scene is on screen.
        run_frames(&mut rt, 1);
        assert_eq!(new_stats.borrow().updates, 1);
        assert_eq!(rt.surface().front_pixel(0, 0), Some([0, 0, 255, 255]));
    }

    #[test]
    fn ready_predicate_keeps_pumping_the_old_scene() {
        let mut rt = runtime();
        let (old, old_stats) = SolidScene::new(Color::RED);
        rt.set_scene(Box::new(old));

        let ready = Rc::new(RefCell::new(false));
        let ready_check = ready.clone();
        let (new, new_stats) = SolidScene::new(Color::BLUE);
        rt.transition_scene(
            Transition::fade(move || Ok(Box::new(new) as Box<dyn Scene<PixelSurface>>))
                .when_ready(move || *ready_check.borrow()),
        );

        // Request frame plus three deferred frames: the old scene keeps
        // updating and rendering, the new one stays dormant.
        run_frames(&mut rt, 4);
        assert!(rt.transitions().is_waiting());
        assert_eq!(old_stats.borrow().updates, 4);
        assert_eq!(old_stats.borrow().closes, 1);
        assert_eq!(new_stats.borrow().renders, 0);

        *ready.borrow_mut() = true;
        run_frames(&mut rt, 1);
        assert!(rt.transitions().is_crossfading());
        assert_eq!(new_stats.borrow().renders, 1);
    }

    #[test]
    fn already_satisfied_predicate_starts_the_fade_at_once() {
        let mut rt = runtime();
        let (old, _) = SolidScene::new(Color::RED);
        rt.set_scene(Box::new(old));

        let (new, new_stats) = SolidScene::new(Color::BLUE);
        rt.transition_scene(
            Transition::fade(move || Ok(Box::new(new) as Box<dyn Scene<PixelSurface>>))
                .when_ready(|| true),
        );

        run_frames(&mut rt, 1);
        assert!(!rt.transitions().is_waiting());
        assert!(rt.transitions().is_crossfading());
        assert_eq!(new_stats.borrow().renders, 1);
    }

    #[test]
    fn factory_failure_terminates_the_loop() {
        let mut rt = runtime();
        let (old, _) = SolidScene::new(Color::RED);
        rt.set_scene(Box::new(old));
        rt.transition_scene(Transition::instant(|| {
            Err(SceneError::Config("missing level".into()))
        }));
        assert!(rt.run().is_err());
    }

    #[test]
    fn close_request_stops_the_loop_and_closes_the_scene() {
        let mut rt = runtime();
        let (scene, stats) = SolidScene::new(Color::RED);
        rt.set_scene(Box::new(scene));
        rt.input_source
            .frames
            .push_back(vec![Event::CloseRequested]);

        rt.run().unwrap();
        assert!(!rt.is_running());
        assert_eq!(stats.borrow().closes, 1);
    }

    #[test]
    fn frames_without_a_scene_still_present() {
        let mut rt = runtime();
        run_frames(&mut rt, 2);
        assert_eq!(rt.surface().presented_frames(), 2);
        assert_eq!(rt.surface().front_pixel(0, 0), Some([0, 0, 0, 255]));
    }
}
