//! Camera, scene, renderer and controls bundled as one unit per view

use winit::{
    dpi::PhysicalSize,
    event::{DeviceEvent, WindowEvent},
};

use super::{
    camera::{CameraControls, PerspectiveCamera},
    rendering::{RenderBackend, Renderer},
    scene::Scene,
};
use crate::error::{InitError, RenderError};

/// Pixel dimensions of a render surface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl ViewportSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

impl From<PhysicalSize<u32>> for ViewportSize {
    fn from(size: PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}

pub struct RenderContext {
    scene: Scene,
    camera: PerspectiveCamera,
    renderer: Box<dyn Renderer>,
    controls: Option<Box<dyn CameraControls>>,
    viewport: ViewportSize,
    disposed: bool,
}

impl RenderContext {
    /// Builds a renderer sized to `viewport` and a default camera over an empty scene
    pub fn create(
        viewport: ViewportSize,
        backend: &mut dyn RenderBackend,
    ) -> Result<Self, InitError> {
        if viewport.is_empty() {
            return Err(InitError::EmptyViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        let renderer = backend.create_renderer(viewport)?;
        let camera = PerspectiveCamera::with_aspect(viewport.aspect());
        log::info!(
            "Render context created at {}x{}",
            viewport.width,
            viewport.height
        );

        Ok(Self {
            scene: Scene::new(),
            camera,
            renderer,
            controls: None,
            viewport,
            disposed: false,
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut PerspectiveCamera {
        &mut self.camera
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Binds `controls`, dropping whichever adapter was bound before
    pub fn attach_controls(&mut self, controls: Box<dyn CameraControls>) {
        if self.controls.replace(controls).is_some() {
            log::debug!("Replaced camera controls");
        }
    }

    pub fn controls(&self) -> Option<&dyn CameraControls> {
        self.controls.as_deref()
    }

    pub fn controls_mut(&mut self) -> Option<&mut (dyn CameraControls + 'static)> {
        self.controls.as_deref_mut()
    }

    pub fn has_controls(&self) -> bool {
        self.controls.is_some()
    }

    /// Lets the bound controls move the camera
    pub fn update_controls(&mut self) {
        if let Some(controls) = self.controls.as_deref_mut() {
            controls.update(&mut self.camera);
        }
    }

    pub fn handle_device_event(&mut self, event: &DeviceEvent) -> bool {
        self.controls
            .as_deref_mut()
            .is_some_and(|controls| controls.handle_device_event(event))
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        self.controls
            .as_deref_mut()
            .is_some_and(|controls| controls.handle_window_event(event))
    }

    /// Matches camera aspect and renderer surface to `size`
    pub fn resize(&mut self, size: ViewportSize) {
        if size.is_empty() {
            log::debug!("Ignoring resize to {}x{}", size.width, size.height);
            return;
        }
        if size == self.viewport {
            return;
        }

        self.viewport = size;
        self.camera.aspect = size.aspect();
        self.camera.update_projection_matrix();
        if !self.disposed {
            self.renderer.resize(size);
        }
        log::debug!("Resized render context to {}x{}", size.width, size.height);
    }

    /// Draws the scene once from the camera
    pub fn render_frame(&mut self) -> Result<(), RenderError> {
        if self.disposed {
            return Err(RenderError::Disposed);
        }
        self.renderer.render(&self.scene, &self.camera)
    }

    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.controls = None;
        self.renderer.dispose();
        log::info!("Render context disposed");
    }
}

impl Drop for RenderContext {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{camera::OrbitControls, rendering::HeadlessBackend};
    use cgmath::Vector3;

    fn context(width: u32, height: u32) -> (RenderContext, HeadlessBackend) {
        let mut backend = HeadlessBackend::new();
        let ctx = RenderContext::create(ViewportSize::new(width, height), &mut backend).unwrap();
        (ctx, backend)
    }

    #[test]
    fn test_create_sets_camera_lens() {
        let (ctx, _) = context(800, 600);
        assert_eq!(ctx.camera().aspect, 800.0 / 600.0);
        assert_eq!(ctx.camera().fov, cgmath::Deg(75.0));
        assert!(ctx.scene().graph.is_empty());
        assert!(!ctx.has_controls());
    }

    #[test]
    fn test_create_rejects_empty_viewport() {
        let mut backend = HeadlessBackend::new();
        let result = RenderContext::create(ViewportSize::new(0, 600), &mut backend);
        assert!(matches!(
            result,
            Err(InitError::EmptyViewport { width: 0, height: 600 })
        ));
        assert_eq!(backend.log().borrow().renderers_created, 0);
    }

    #[test]
    fn test_create_propagates_backend_failure() {
        let mut backend = HeadlessBackend::unavailable();
        let result = RenderContext::create(ViewportSize::new(800, 600), &mut backend);
        assert!(matches!(result, Err(InitError::Adapter(_))));
    }

    #[test]
    fn test_resize_sets_exact_aspect() {
        let (mut ctx, backend) = context(800, 600);
        ctx.resize(ViewportSize::new(1024, 768));
        assert_eq!(ctx.camera().aspect, 1024.0 / 768.0);
        assert_eq!(ctx.viewport(), ViewportSize::new(1024, 768));
        assert_eq!(backend.log().borrow().size, ViewportSize::new(1024, 768));
    }

    #[test]
    fn test_resize_is_idempotent() {
        let (mut ctx, backend) = context(800, 600);
        ctx.resize(ViewportSize::new(1280, 720));
        let projection = ctx.camera().projection_matrix();
        ctx.resize(ViewportSize::new(1280, 720));
        assert_eq!(ctx.camera().projection_matrix(), projection);
        assert_eq!(ctx.camera().aspect, 1280.0 / 720.0);
        assert_eq!(backend.log().borrow().resizes.len(), 1);
    }

    #[test]
    fn test_resize_ignores_zero_area() {
        let (mut ctx, backend) = context(800, 600);
        ctx.resize(ViewportSize::new(0, 0));
        assert_eq!(ctx.camera().aspect, 800.0 / 600.0);
        assert!(backend.log().borrow().resizes.is_empty());
    }

    #[test]
    fn test_attach_controls_replaces_previous() {
        let (mut ctx, _) = context(800, 600);
        ctx.attach_controls(Box::new(OrbitControls::new(Vector3::new(1.0, 0.0, 0.0))));
        ctx.attach_controls(Box::new(OrbitControls::new(Vector3::new(0.0, 0.5, 0.0))));
        assert_eq!(
            ctx.controls().map(|c| c.target()),
            Some(Vector3::new(0.0, 0.5, 0.0))
        );
        ctx.update_controls();
        assert_eq!(ctx.camera().target, Vector3::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let (mut ctx, backend) = context(800, 600);
        ctx.render_frame().unwrap();
        ctx.dispose();
        ctx.dispose();
        assert!(ctx.is_disposed());
        assert!(backend.log().borrow().disposed);
        assert!(matches!(ctx.render_frame(), Err(RenderError::Disposed)));
        assert_eq!(backend.log().borrow().frames, 1);
    }
}
