//! Renderer that draws nothing and records what it was asked to do
//!
//! Used by `--headless` runs and by tests to observe the frame loop.

use std::{cell::RefCell, rc::Rc};

use super::renderer::{RenderBackend, Renderer};
use crate::{
    error::{InitError, RenderError},
    gfx::{camera::PerspectiveCamera, context::ViewportSize, scene::Scene},
};

/// Everything a headless renderer observed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameLog {
    pub frames: usize,
    /// Draw items in the most recent frame
    pub last_draw_count: usize,
    pub last_triangle_count: usize,
    pub size: ViewportSize,
    pub resizes: Vec<ViewportSize>,
    pub renderers_created: usize,
    pub disposed: bool,
}

/// Shared handle to a [`FrameLog`]
pub type FrameLogHandle = Rc<RefCell<FrameLog>>;

/// Backend producing [`HeadlessRenderer`]s that share one log
#[derive(Debug, Clone, Default)]
pub struct HeadlessBackend {
    log: FrameLogHandle,
    fail_after: Option<usize>,
    unavailable: bool,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renderers from this backend fail every frame after the first `frames`
    pub fn failing_after(frames: usize) -> Self {
        Self {
            fail_after: Some(frames),
            ..Self::default()
        }
    }

    /// A backend whose renderer can never be created, like a missing adapter
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn log(&self) -> FrameLogHandle {
        Rc::clone(&self.log)
    }
}

impl RenderBackend for HeadlessBackend {
    fn create_renderer(&mut self, size: ViewportSize) -> Result<Box<dyn Renderer>, InitError> {
        if self.unavailable {
            return Err(InitError::Adapter("no headless adapter available".to_string()));
        }
        {
            let mut log = self.log.borrow_mut();
            log.size = size;
            log.renderers_created += 1;
            log.disposed = false;
        }
        log::debug!(
            "Created headless renderer at {}x{}",
            size.width,
            size.height
        );
        Ok(Box::new(HeadlessRenderer {
            log: Rc::clone(&self.log),
            fail_after: self.fail_after,
            disposed: false,
        }))
    }
}

pub struct HeadlessRenderer {
    log: FrameLogHandle,
    fail_after: Option<usize>,
    disposed: bool,
}

impl Renderer for HeadlessRenderer {
    fn render(&mut self, scene: &Scene, _camera: &PerspectiveCamera) -> Result<(), RenderError> {
        if self.disposed {
            return Err(RenderError::Disposed);
        }
        let mut log = self.log.borrow_mut();
        if self.fail_after.is_some_and(|limit| log.frames >= limit) {
            return Err(RenderError::Surface("headless surface lost".to_string()));
        }
        let items = scene.draw_items();
        log.frames += 1;
        log.last_draw_count = items.len();
        log.last_triangle_count = items
            .iter()
            .map(|item| item.shape.geometry().triangle_count())
            .sum();
        log::trace!("Headless frame {} ({} draws)", log.frames, log.last_draw_count);
        Ok(())
    }

    fn resize(&mut self, size: ViewportSize) {
        let mut log = self.log.borrow_mut();
        log.size = size;
        log.resizes.push(size);
    }

    fn dispose(&mut self) {
        if !self.disposed {
            self.disposed = true;
            self.log.borrow_mut().disposed = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_frames_and_resizes() {
        let mut backend = HeadlessBackend::new();
        let log = backend.log();
        let mut renderer = backend.create_renderer(ViewportSize::new(800, 600)).unwrap();
        let scene = Scene::new();
        let camera = PerspectiveCamera::default();

        renderer.render(&scene, &camera).unwrap();
        renderer.render(&scene, &camera).unwrap();
        renderer.resize(ViewportSize::new(1024, 768));

        let log = log.borrow();
        assert_eq!(log.frames, 2);
        assert_eq!(log.size, ViewportSize::new(1024, 768));
        assert_eq!(log.resizes.len(), 1);
    }

    #[test]
    fn test_render_after_dispose_fails() {
        let mut backend = HeadlessBackend::new();
        let mut renderer = backend.create_renderer(ViewportSize::new(10, 10)).unwrap();
        renderer.dispose();
        renderer.dispose();
        let result = renderer.render(&Scene::new(), &PerspectiveCamera::default());
        assert!(matches!(result, Err(RenderError::Disposed)));
        assert!(backend.log().borrow().disposed);
    }

    #[test]
    fn test_failing_after() {
        let mut backend = HeadlessBackend::failing_after(1);
        let mut renderer = backend.create_renderer(ViewportSize::new(10, 10)).unwrap();
        let scene = Scene::new();
        let camera = PerspectiveCamera::default();
        assert!(renderer.render(&scene, &camera).is_ok());
        assert!(matches!(
            renderer.render(&scene, &camera),
            Err(RenderError::Surface(_))
        ));
    }
}
