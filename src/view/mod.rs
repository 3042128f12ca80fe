//! # View Lifecycle
//!
//! Binds one render context and one animation loop to a host container that
//! appears (attach), changes size (resize) and goes away (detach).
//!
//! ```rust
//! use std::time::Instant;
//! use diorama::{
//!     gfx::{context::ViewportSize, rendering::HeadlessBackend},
//!     view::{RobotShowcase, ViewLifecycle},
//! };
//!
//! let mut backend = HeadlessBackend::new();
//! let mut view = ViewLifecycle::new(RobotShowcase::default());
//! view.attach(ViewportSize::new(800, 600), &mut backend).unwrap();
//! view.frame(Instant::now());
//! view.detach();
//! assert_eq!(backend.log().borrow().frames, 1);
//! ```

use std::time::Instant;

use winit::event::{DeviceEvent, WindowEvent};

use crate::{
    animation::{AnimationLoop, ScheduledTick, TickFn, TickOutcome},
    error::InitError,
    gfx::{
        context::{RenderContext, ViewportSize},
        rendering::RenderBackend,
    },
};

pub mod scenes;

pub use scenes::{ModelShowcase, RobotShowcase, ROBOT_SPIN_PER_TICK, STAR_SPIN_PER_TICK};

/// Populates a fresh render context and returns the per-tick update
pub trait SceneSetup {
    fn compose(&mut self, context: &mut RenderContext) -> anyhow::Result<TickFn>;
}

impl<S: SceneSetup + ?Sized> SceneSetup for Box<S> {
    fn compose(&mut self, context: &mut RenderContext) -> anyhow::Result<TickFn> {
        (**self).compose(context)
    }
}

pub struct ViewLifecycle<S: SceneSetup> {
    setup: S,
    context: Option<RenderContext>,
    animation: AnimationLoop,
    pending: Option<ScheduledTick>,
    subscribed: bool,
}

impl<S: SceneSetup> ViewLifecycle<S> {
    pub fn new(setup: S) -> Self {
        Self {
            setup,
            context: None,
            animation: AnimationLoop::new(),
            pending: None,
            subscribed: false,
        }
    }

    /// Creates the context, composes the scene and starts the loop
    ///
    /// Attaching an already attached view only logs a warning.
    pub fn attach(
        &mut self,
        viewport: ViewportSize,
        backend: &mut dyn RenderBackend,
    ) -> Result<(), InitError> {
        if self.context.is_some() {
            log::warn!("View is already attached; ignoring attach");
            return Ok(());
        }

        let mut context = RenderContext::create(viewport, backend)?;
        let on_tick = self.setup.compose(&mut context).map_err(InitError::Compose)?;
        let first = self
            .animation
            .start(on_tick)
            .map_err(|err| InitError::Compose(err.into()))?;

        self.context = Some(context);
        self.pending = Some(first);
        self.subscribed = true;
        log::info!("View attached at {}x{}", viewport.width, viewport.height);
        Ok(())
    }

    /// Stops the loop, disposes the context and stops listening for resizes
    pub fn detach(&mut self) {
        self.animation.stop();
        self.pending = None;
        self.subscribed = false;
        if let Some(mut context) = self.context.take() {
            context.dispose();
            log::info!("View detached");
        }
    }

    pub fn on_resize(&mut self, size: ViewportSize) {
        if !self.subscribed {
            log::trace!("Resize while detached ignored");
            return;
        }
        if let Some(context) = self.context.as_mut() {
            self.animation.on_resize(context, size);
        }
    }

    /// Delivers the pending tick, if any
    pub fn frame(&mut self, now: Instant) -> Option<TickOutcome> {
        let context = self.context.as_mut()?;
        let scheduled = self.pending.take()?;
        let outcome = self.animation.tick(scheduled, context, now);
        self.pending = outcome.next();
        Some(outcome)
    }

    pub fn handle_device_event(&mut self, event: &DeviceEvent) -> bool {
        self.context
            .as_mut()
            .is_some_and(|context| context.handle_device_event(event))
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        self.context
            .as_mut()
            .is_some_and(|context| context.handle_window_event(event))
    }

    pub fn is_attached(&self) -> bool {
        self.context.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.animation.is_running()
    }

    pub fn has_pending_tick(&self) -> bool {
        self.pending.is_some()
    }

    pub fn animation(&self) -> &AnimationLoop {
        &self.animation
    }

    pub fn context(&self) -> Option<&RenderContext> {
        self.context.as_ref()
    }

    pub fn context_mut(&mut self) -> Option<&mut RenderContext> {
        self.context.as_mut()
    }

    pub fn setup(&self) -> &S {
        &self.setup
    }
}

impl<S: SceneSetup> Drop for ViewLifecycle<S> {
    fn drop(&mut self) {
        self.detach();
    }
}
