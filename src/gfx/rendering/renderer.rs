//! Graphics provider seam
//!
//! The render context only talks to the GPU through these two traits, so the
//! frame loop runs the same way on a window surface and in headless tests.

use crate::{
    error::{InitError, RenderError},
    gfx::{camera::PerspectiveCamera, context::ViewportSize, scene::Scene},
};

/// Draws a scene to one surface
pub trait Renderer {
    /// Draws exactly one frame of `scene` as seen from `camera`
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), RenderError>;

    /// Resizes the output surface; never called with a zero area
    fn resize(&mut self, size: ViewportSize);

    /// Releases GPU resources; later renders fail with [`RenderError::Disposed`]
    fn dispose(&mut self);
}

/// Creates renderers for a host surface
pub trait RenderBackend {
    fn create_renderer(&mut self, size: ViewportSize) -> Result<Box<dyn Renderer>, InitError>;
}
