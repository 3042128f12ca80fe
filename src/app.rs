//! Desktop host: one winit window driving one view

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::Context;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    animation::TickOutcome,
    config::{SceneChoice, StageConfig},
    gfx::{
        context::ViewportSize,
        rendering::{FrameLog, HeadlessBackend, WgpuBackend},
    },
    view::{ModelShowcase, RobotShowcase, SceneSetup, ViewLifecycle},
};

/// Simulated clock rate for headless runs
const HEADLESS_FRAME_RATE: f64 = 60.0;

pub fn scene_setup(choice: &SceneChoice) -> Box<dyn SceneSetup> {
    match choice {
        SceneChoice::Robot(config) => Box::new(RobotShowcase::new(config.clone())),
        SceneChoice::Model(config) => Box::new(ModelShowcase::new(config.clone())),
    }
}

pub struct DioramaApp {
    config: StageConfig,
    window: Option<Arc<Window>>,
    view: ViewLifecycle<Box<dyn SceneSetup>>,
    error: Option<anyhow::Error>,
    /// Set once a tick fails; the window stays open on the last drawn frame
    halted: bool,
}

impl DioramaApp {
    pub fn new(config: StageConfig) -> Self {
        let view = ViewLifecycle::new(scene_setup(&config.scene));
        Self {
            config,
            window: None,
            view,
            error: None,
            halted: false,
        }
    }

    /// Runs the event loop until the window closes
    ///
    /// Setup failures close the window at once. A failed tick only halts the
    /// animation; the error is returned after the user closes the window.
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = EventLoop::new().context("creating event loop")?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop
            .run_app(&mut self)
            .context("running event loop")?;

        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.error = Some(err);
        self.shutdown(event_loop);
    }

    fn halt(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("Animation halted: {err:#}");
        self.error = Some(err);
        self.halted = true;
        event_loop.set_control_flow(ControlFlow::Wait);
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.view.detach();
        event_loop.exit();
    }
}

impl ApplicationHandler for DioramaApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                self.fail(event_loop, anyhow::Error::new(err).context("creating window"));
                return;
            }
        };
        self.window = Some(Arc::clone(&window));

        let mut backend = WgpuBackend::new(Arc::clone(&window), self.config.vsync);
        if let Err(err) = self.view.attach(window.inner_size().into(), &mut backend) {
            self.fail(event_loop, anyhow::Error::new(err).context("attaching view"));
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => self.shutdown(event_loop),
            WindowEvent::Resized(size) => self.view.on_resize(size.into()),
            WindowEvent::RedrawRequested => {
                if let Some(TickOutcome::Failed(err)) = self.view.frame(Instant::now()) {
                    self.halt(event_loop, err.into());
                }
            }
            other => {
                self.view.handle_window_event(&other);
            }
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        self.view.handle_device_event(&event);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if self.halted {
            return;
        }
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.view.detach();
    }
}

/// Drives `frames` ticks against a renderer that draws nothing
///
/// The clock advances at a fixed 60 Hz, so runs are reproducible for a
/// seeded scene.
pub fn run_headless(config: &StageConfig, frames: usize) -> anyhow::Result<FrameLog> {
    let mut backend = HeadlessBackend::new();
    let mut view = ViewLifecycle::new(scene_setup(&config.scene));
    view.attach(ViewportSize::new(config.width, config.height), &mut backend)
        .context("attaching headless view")?;

    let start = Instant::now();
    for index in 0..frames {
        let now = start + Duration::from_secs_f64(index as f64 / HEADLESS_FRAME_RATE);
        match view.frame(now) {
            Some(TickOutcome::Rendered(_)) => {}
            Some(TickOutcome::Failed(err)) => {
                return Err(anyhow::Error::new(err).context(format!("frame {index}")));
            }
            Some(TickOutcome::Skipped) | None => break,
        }
    }

    let metrics = *view.animation().metrics();
    view.detach();
    log::info!(
        "Headless run finished: {} frames, {:.1} fps simulated",
        metrics.frame_count,
        metrics.fps
    );

    let log = backend.log().borrow().clone();
    Ok(log)
}
