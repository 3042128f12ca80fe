//! Cancellable frame loop: one state update, then one render, per tick
//!
//! The host owns the clock. [`AnimationLoop::start`] hands back the first
//! [`ScheduledTick`]; each delivered tick yields the next one. Stopping bumps
//! the loop's generation, which turns every outstanding tick into a no-op.

use std::time::Instant;

use cgmath::Vector3;

use super::frame_stats::{FrameMetrics, FrameStats};
use crate::{
    error::{LoopError, TickError},
    gfx::{
        camera::PerspectiveCamera,
        context::{RenderContext, ViewportSize},
        scene::Scene,
    },
};

/// Per-tick state update, receiving the seconds elapsed since the previous tick
pub type TickFn = Box<dyn FnMut(&mut TickContext<'_>, f32) -> anyhow::Result<()>>;

/// What a tick callback may touch
///
/// Rendering and disposal are not reachable from here; the loop renders once
/// after the callback returns.
pub struct TickContext<'a> {
    context: &'a mut RenderContext,
}

impl<'a> TickContext<'a> {
    pub fn scene(&self) -> &Scene {
        self.context.scene()
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        self.context.scene_mut()
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        self.context.camera()
    }

    pub fn camera_mut(&mut self) -> &mut PerspectiveCamera {
        self.context.camera_mut()
    }

    pub fn viewport(&self) -> ViewportSize {
        self.context.viewport()
    }

    pub fn controls_target(&self) -> Option<Vector3<f32>> {
        self.context.controls().map(|controls| controls.target())
    }

    /// Applies pending camera-control input
    pub fn update_controls(&mut self) {
        self.context.update_controls();
    }
}

/// Token for one pending tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTick {
    generation: u64,
}

#[derive(Debug)]
pub enum TickOutcome {
    /// Update and render both ran; deliver the returned tick next
    Rendered(ScheduledTick),
    /// The tick was stale or the loop is idle; nothing ran
    Skipped,
    /// Update or render failed and the loop has stopped
    Failed(TickError),
}

impl TickOutcome {
    pub fn next(&self) -> Option<ScheduledTick> {
        match self {
            TickOutcome::Rendered(next) => Some(*next),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
}

pub struct AnimationLoop {
    state: LoopState,
    generation: u64,
    last_tick: Option<Instant>,
    on_tick: Option<TickFn>,
    stats: FrameStats,
}

impl Default for AnimationLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Idle,
            generation: 0,
            last_tick: None,
            on_tick: None,
            stats: FrameStats::new(),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn metrics(&self) -> &FrameMetrics {
        self.stats.metrics()
    }

    /// Begins running `on_tick`; fails if the loop is already running
    pub fn start(&mut self, on_tick: TickFn) -> Result<ScheduledTick, LoopError> {
        if self.is_running() {
            return Err(LoopError::AlreadyRunning);
        }
        self.generation += 1;
        self.state = LoopState::Running;
        self.last_tick = None;
        self.on_tick = Some(on_tick);
        self.stats.reset();
        log::info!("Animation loop started (generation {})", self.generation);
        Ok(ScheduledTick {
            generation: self.generation,
        })
    }

    /// Runs one update-then-render pass if `scheduled` is still current
    pub fn tick(
        &mut self,
        scheduled: ScheduledTick,
        context: &mut RenderContext,
        now: Instant,
    ) -> TickOutcome {
        if !self.is_running() || scheduled.generation != self.generation {
            log::trace!("Skipping stale tick (generation {})", scheduled.generation);
            return TickOutcome::Skipped;
        }
        let Some(on_tick) = self.on_tick.as_mut() else {
            return TickOutcome::Skipped;
        };

        let delta = self
            .last_tick
            .map_or(0.0, |last| now.saturating_duration_since(last).as_secs_f32());
        self.last_tick = Some(now);

        let updated = on_tick(&mut TickContext { context: &mut *context }, delta);
        if let Err(err) = updated {
            log::error!("Tick callback failed, stopping animation loop: {err:#}");
            self.stop();
            return TickOutcome::Failed(TickError::Update(err));
        }

        if let Err(err) = context.render_frame() {
            log::error!("Render failed, stopping animation loop: {err}");
            self.stop();
            return TickOutcome::Failed(TickError::Render(err));
        }

        self.stats.record(delta);
        TickOutcome::Rendered(ScheduledTick {
            generation: self.generation,
        })
    }

    /// Returns to idle and invalidates every outstanding tick
    pub fn stop(&mut self) {
        if !self.is_running() {
            return;
        }
        self.state = LoopState::Idle;
        self.generation += 1;
        self.on_tick = None;
        self.last_tick = None;
        log::info!(
            "Animation loop stopped after {} frames",
            self.stats.metrics().frame_count
        );
    }

    /// Forwards a viewport change to the context, whether or not the loop runs
    pub fn on_resize(&mut self, context: &mut RenderContext, size: ViewportSize) {
        context.resize(size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::RenderError, gfx::rendering::HeadlessBackend};
    use std::{cell::Cell, rc::Rc, time::Duration};

    fn context() -> (RenderContext, HeadlessBackend) {
        let mut backend = HeadlessBackend::new();
        let ctx = RenderContext::create(ViewportSize::new(800, 600), &mut backend).unwrap();
        (ctx, backend)
    }

    fn counting(counter: &Rc<Cell<usize>>) -> TickFn {
        let counter = Rc::clone(counter);
        Box::new(move |_, _| {
            counter.set(counter.get() + 1);
            Ok(())
        })
    }

    #[test]
    fn test_start_stop_start() {
        let mut animation = AnimationLoop::new();
        let calls = Rc::new(Cell::new(0));
        assert!(animation.start(counting(&calls)).is_ok());
        animation.stop();
        assert_eq!(animation.state(), LoopState::Idle);
        assert!(animation.start(counting(&calls)).is_ok());
    }

    #[test]
    fn test_start_twice_fails() {
        let mut animation = AnimationLoop::new();
        let calls = Rc::new(Cell::new(0));
        animation.start(counting(&calls)).unwrap();
        assert_eq!(
            animation.start(counting(&calls)).unwrap_err(),
            LoopError::AlreadyRunning
        );
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut animation = AnimationLoop::new();
        animation.stop();
        let calls = Rc::new(Cell::new(0));
        animation.start(counting(&calls)).unwrap();
        animation.stop();
        animation.stop();
        assert!(!animation.is_running());
    }

    #[test]
    fn test_tick_updates_then_renders() {
        let (mut ctx, backend) = context();
        let log = backend.log();
        let order = Rc::new(Cell::new(0usize));
        let seen = Rc::clone(&order);
        let frames_at_update = Rc::clone(&log);

        let mut animation = AnimationLoop::new();
        let first = animation
            .start(Box::new(move |_, _| {
                // The frame for this tick has not been drawn yet
                seen.set(frames_at_update.borrow().frames);
                Ok(())
            }))
            .unwrap();

        let now = Instant::now();
        let next = animation.tick(first, &mut ctx, now).next().unwrap();
        assert_eq!(order.get(), 0);
        animation.tick(next, &mut ctx, now).next().unwrap();
        assert_eq!(order.get(), 1);
        assert_eq!(log.borrow().frames, 2);
    }

    #[test]
    fn test_first_delta_is_zero() {
        let (mut ctx, _backend) = context();
        let deltas = Rc::new(std::cell::RefCell::new(Vec::new()));
        let sink = Rc::clone(&deltas);
        let mut animation = AnimationLoop::new();
        let mut tick = animation
            .start(Box::new(move |_, delta| {
                sink.borrow_mut().push(delta);
                Ok(())
            }))
            .unwrap();

        let start = Instant::now();
        for step in 0..3u64 {
            let now = start + Duration::from_millis(250 * step);
            tick = animation.tick(tick, &mut ctx, now).next().unwrap();
        }
        let deltas = deltas.borrow();
        assert_eq!(deltas[0], 0.0);
        assert!((deltas[1] - 0.25).abs() < 1e-6);
        assert!((deltas[2] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_stale_tick_after_stop_does_nothing() {
        let (mut ctx, backend) = context();
        let calls = Rc::new(Cell::new(0));
        let mut animation = AnimationLoop::new();
        let scheduled = animation.start(counting(&calls)).unwrap();
        animation.stop();

        let outcome = animation.tick(scheduled, &mut ctx, Instant::now());
        assert!(matches!(outcome, TickOutcome::Skipped));
        assert_eq!(calls.get(), 0);
        assert_eq!(backend.log().borrow().frames, 0);
    }

    #[test]
    fn test_tick_from_previous_run_is_stale() {
        let (mut ctx, backend) = context();
        let calls = Rc::new(Cell::new(0));
        let mut animation = AnimationLoop::new();
        let old = animation.start(counting(&calls)).unwrap();
        animation.stop();
        let current = animation.start(counting(&calls)).unwrap();

        assert!(matches!(
            animation.tick(old, &mut ctx, Instant::now()),
            TickOutcome::Skipped
        ));
        assert!(animation.tick(current, &mut ctx, Instant::now()).next().is_some());
        assert_eq!(calls.get(), 1);
        assert_eq!(backend.log().borrow().frames, 1);
    }

    #[test]
    fn test_callback_failure_stops_loop() {
        let (mut ctx, backend) = context();
        let mut animation = AnimationLoop::new();
        let scheduled = animation
            .start(Box::new(|_, _| Err(anyhow::anyhow!("bad update"))))
            .unwrap();

        let outcome = animation.tick(scheduled, &mut ctx, Instant::now());
        assert!(matches!(outcome, TickOutcome::Failed(TickError::Update(_))));
        assert!(!animation.is_running());
        assert_eq!(backend.log().borrow().frames, 0);
        assert!(matches!(
            animation.tick(scheduled, &mut ctx, Instant::now()),
            TickOutcome::Skipped
        ));
    }

    #[test]
    fn test_render_failure_stops_loop() {
        let mut backend = HeadlessBackend::failing_after(1);
        let mut ctx = RenderContext::create(ViewportSize::new(64, 64), &mut backend).unwrap();
        let calls = Rc::new(Cell::new(0));
        let mut animation = AnimationLoop::new();
        let first = animation.start(counting(&calls)).unwrap();

        let second = animation.tick(first, &mut ctx, Instant::now()).next().unwrap();
        let outcome = animation.tick(second, &mut ctx, Instant::now());
        assert!(matches!(
            outcome,
            TickOutcome::Failed(TickError::Render(RenderError::Surface(_)))
        ));
        assert!(!animation.is_running());
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_resize_forwarded_while_idle() {
        let (mut ctx, _backend) = context();
        let mut animation = AnimationLoop::new();
        animation.on_resize(&mut ctx, ViewportSize::new(400, 100));
        assert_eq!(ctx.camera().aspect, 4.0);
    }
}
