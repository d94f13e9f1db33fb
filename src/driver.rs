//! Frame driver: the per-frame state machine shared by every scene.
//!
//! ```text
//!            start()             pause()
//!   Idle ──────────────▶ Running ──────▶ Paused
//!    ▲                    ▲  │             │
//!    │      stop()        │  └─── start() ─┘
//!    └────────────────────┴──────────────────
//! ```
//!
//! Each tick while running performs, in order: advance the clock, let the
//! scene integrate, detect collisions and update its effects (all inside
//! [`Scene::step`]), then rebuild the [`DrawList`] from the post-step state.
//! A tick leaves a frame scheduled; [`FrameDriver::stop`] cancels it so no
//! further ticks touch the scene.

use glam::Vec2;

use crate::draw::DrawList;
use crate::effects::EnergyLedger;
use crate::species::Species;
use crate::time::{FrameStep, Time, TimeScale};

/// A host input a scene may react to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Control {
    SetHeatmap(bool),
    ToggleHeatmap,
    SelectSpecies(Species),
    /// Last known pointer position in surface pixels, or `None` when it left.
    Pointer(Option<Vec2>),
}

/// A self-contained simulation driven one frame at a time.
pub trait Scene {
    fn name(&self) -> &'static str;

    /// Advance the simulation by one frame. Only called with non-idle steps.
    fn step(&mut self, step: &FrameStep);

    /// Append everything currently visible to `out`.
    fn draw(&self, out: &mut DrawList);

    /// Whether frames keep being drawn while physics is paused.
    fn draws_while_paused(&self) -> bool {
        false
    }

    /// Whether a reset (including one caused by a species change) also
    /// stops playback, leaving the initial scene on screen until started.
    fn stops_on_reset(&self) -> bool {
        false
    }

    /// Return to the initial scene: fresh particles, no effects, zero counters.
    fn reset(&mut self);

    /// The drawing surface changed size, in pixels.
    fn resize(&mut self, _width: f32, _height: f32) {}

    /// React to `control`. Returns `false` when the scene ignores it.
    fn apply(&mut self, _control: Control) -> bool {
        false
    }

    fn ledger(&self) -> Option<&EnergyLedger> {
        None
    }
}

impl<S: Scene + ?Sized> Scene for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn step(&mut self, step: &FrameStep) {
        (**self).step(step)
    }

    fn draw(&self, out: &mut DrawList) {
        (**self).draw(out)
    }

    fn draws_while_paused(&self) -> bool {
        (**self).draws_while_paused()
    }

    fn stops_on_reset(&self) -> bool {
        (**self).stops_on_reset()
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn resize(&mut self, width: f32, height: f32) {
        (**self).resize(width, height)
    }

    fn apply(&mut self, control: Control) -> bool {
        (**self).apply(control)
    }

    fn ledger(&self) -> Option<&EnergyLedger> {
        (**self).ledger()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Running,
    Paused,
}

pub struct FrameDriver<S> {
    scene: S,
    state: DriverState,
    time: Time,
    /// A frame is pending; cleared when the loop is cancelled.
    scheduled: bool,
    frame: DrawList,
}

impl<S: Scene> FrameDriver<S> {
    /// Wrap `scene` in an idle driver.
    pub fn new(scene: S) -> Self {
        let mut driver = Self {
            scene,
            state: DriverState::Idle,
            time: Time::new(),
            scheduled: false,
            frame: DrawList::new(),
        };
        driver.redraw();
        driver
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn time(&self) -> &Time {
        &self.time
    }

    /// Whether the host should request another frame.
    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    /// The most recently built frame.
    pub fn frame(&self) -> &DrawList {
        &self.frame
    }

    /// Idle/Paused → Running. No-op when already running.
    pub fn start(&mut self) {
        if self.state == DriverState::Running {
            return;
        }
        if self.state == DriverState::Idle {
            self.time.reset();
        }
        self.time.resume();
        self.state = DriverState::Running;
        self.scheduled = true;
        log::debug!("{}: running", self.scene.name());
    }

    /// Running → Paused. Physics halts; the last frame stays on screen.
    pub fn pause(&mut self) {
        if self.state != DriverState::Running {
            return;
        }
        self.time.pause();
        self.state = DriverState::Paused;
        self.scheduled = self.scene.draws_while_paused();
        log::debug!("{}: paused", self.scene.name());
    }

    /// Flip between running and paused; starts an idle driver.
    pub fn toggle(&mut self) {
        match self.state {
            DriverState::Running => self.pause(),
            DriverState::Idle | DriverState::Paused => self.start(),
        }
    }

    /// Running/Paused → Idle, cancelling the pending frame.
    pub fn stop(&mut self) {
        if self.state == DriverState::Idle {
            return;
        }
        self.state = DriverState::Idle;
        self.scheduled = false;
        log::debug!("{}: stopped", self.scene.name());
    }

    /// Reset the scene and redraw its initial frame.
    ///
    /// The run state is kept unless the scene stops on reset, in which case
    /// the driver goes back to idle.
    pub fn reset(&mut self) {
        self.scene.reset();
        if self.scene.stops_on_reset() {
            self.stop();
        }
        self.redraw();
        log::info!("{}: reset", self.scene.name());
    }

    pub fn set_time_scale(&mut self, preset: TimeScale) {
        self.time.set_preset(preset);
    }

    /// Forward `control` to the scene, redrawing if it changed anything.
    pub fn apply(&mut self, control: Control) -> bool {
        let changed = self.scene.apply(control);
        if changed {
            if matches!(control, Control::SelectSpecies(_)) && self.scene.stops_on_reset() {
                self.stop();
            }
            self.redraw();
        }
        changed
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.scene.resize(width, height);
        self.redraw();
    }

    /// Run one scheduled frame against the wall clock.
    pub fn tick(&mut self) -> Option<&DrawList> {
        if !self.scheduled {
            return None;
        }
        let step = self.time.update();
        Some(self.run_frame(step))
    }

    /// Run one scheduled frame with an explicit elapsed time in seconds.
    pub fn tick_with(&mut self, raw: f32) -> Option<&DrawList> {
        if !self.scheduled {
            return None;
        }
        let step = self.time.advance(raw);
        Some(self.run_frame(step))
    }

    /// Rebuild the frame from the current state without stepping.
    pub fn redraw(&mut self) -> &DrawList {
        self.frame.clear();
        self.scene.draw(&mut self.frame);
        &self.frame
    }

    fn run_frame(&mut self, step: FrameStep) -> &DrawList {
        if self.state == DriverState::Running && !step.is_idle() {
            self.scene.step(&step);
        }
        self.redraw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec3, Vec4};

    #[derive(Default)]
    struct Counter {
        steps: u32,
        elapsed: f32,
        keep_drawing: bool,
        stop_on_reset: bool,
    }

    impl Scene for Counter {
        fn name(&self) -> &'static str {
            "counter"
        }

        fn step(&mut self, step: &FrameStep) {
            self.steps += 1;
            self.elapsed += step.scaled;
        }

        fn draw(&self, out: &mut DrawList) {
            out.sprite(Vec3::new(self.elapsed, 0.0, 0.0), 1.0, Vec4::ONE);
        }

        fn draws_while_paused(&self) -> bool {
            self.keep_drawing
        }

        fn stops_on_reset(&self) -> bool {
            self.stop_on_reset
        }

        fn reset(&mut self) {
            self.steps = 0;
            self.elapsed = 0.0;
        }
    }

    #[test]
    fn idle_driver_does_not_tick() {
        let mut driver = FrameDriver::new(Counter::default());
        assert_eq!(driver.state(), DriverState::Idle);
        assert!(driver.tick_with(0.1).is_none());
        assert_eq!(driver.scene().steps, 0);
        // The initial scene is drawn even before starting.
        assert_eq!(driver.frame().sprites.len(), 1);
    }

    #[test]
    fn running_ticks_step_then_draw() {
        let mut driver = FrameDriver::new(Counter::default());
        driver.start();
        let frame = driver.tick_with(0.5).expect("running driver ticks");
        assert_eq!(frame.sprites[0].position.x, 0.5);
        assert!(driver.is_scheduled());
    }

    #[test]
    fn pause_halts_physics_and_resume_continues() {
        let mut driver = FrameDriver::new(Counter::default());
        driver.start();
        driver.tick_with(0.25);
        driver.pause();
        assert!(!driver.is_scheduled());
        assert!(driver.tick_with(10.0).is_none());
        driver.toggle();
        driver.tick_with(0.25);
        assert_eq!(driver.scene().steps, 2);
        assert_eq!(driver.scene().elapsed, 0.5);
    }

    #[test]
    fn paused_scene_may_keep_drawing_without_stepping() {
        let mut driver = FrameDriver::new(Counter {
            keep_drawing: true,
            ..Counter::default()
        });
        driver.start();
        driver.pause();
        assert!(driver.is_scheduled());
        assert!(driver.tick_with(1.0).is_some());
        assert_eq!(driver.scene().steps, 0);
    }

    #[test]
    fn stop_cancels_pending_frame() {
        let mut driver = FrameDriver::new(Counter::default());
        driver.start();
        driver.stop();
        assert_eq!(driver.state(), DriverState::Idle);
        assert!(!driver.is_scheduled());
        assert!(driver.tick_with(0.1).is_none());
    }

    #[test]
    fn time_scale_applies_to_scene_steps() {
        let mut driver = FrameDriver::new(Counter::default());
        driver.set_time_scale(TimeScale::Fast);
        driver.start();
        driver.tick_with(0.5);
        assert_eq!(driver.scene().elapsed, 1.5);
    }

    #[test]
    fn reset_keeps_running_unless_scene_stops() {
        let mut driver = FrameDriver::new(Counter::default());
        driver.start();
        driver.reset();
        assert_eq!(driver.state(), DriverState::Running);

        let mut driver = FrameDriver::new(Counter {
            stop_on_reset: true,
            ..Counter::default()
        });
        driver.start();
        driver.tick_with(0.5);
        driver.reset();
        assert_eq!(driver.state(), DriverState::Idle);
        assert!(driver.tick_with(0.5).is_none());
        assert_eq!(driver.scene().steps, 0);
    }

    #[test]
    fn boxed_scenes_drive_like_concrete_ones() {
        let scene: Box<dyn Scene> = Box::new(Counter::default());
        let mut driver = FrameDriver::new(scene);
        driver.start();
        driver.tick_with(0.1);
        driver.reset();
        assert_eq!(driver.frame().sprites[0].position.x, 0.0);
    }
}
