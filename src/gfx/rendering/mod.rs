//! Core rendering functionality
//!
//! The [`Renderer`]/[`RenderBackend`] seam, the wgpu implementation that
//! draws to a window, and a headless implementation for tests and batch runs.

pub mod depth_texture;
pub mod headless;
pub mod instance;
pub mod renderer;
pub mod wgpu_renderer;

// Re-export main types
pub use headless::{FrameLog, FrameLogHandle, HeadlessBackend, HeadlessRenderer};
pub use instance::{batch_draw_items, Batch, InstanceData};
pub use renderer::{RenderBackend, Renderer};
pub use wgpu_renderer::{GlobalUniform, WgpuBackend, WgpuRenderer};
