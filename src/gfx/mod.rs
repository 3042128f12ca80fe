//! # Graphics Module
//!
//! Everything between a scene description and pixels on screen.
//!
//! ## Architecture Overview
//!
//! - **Camera System** ([`camera`]) - Perspective camera and orbit controls
//! - **Geometry** ([`geometry`]) - Tessellators for sphere, capsule and cylinder
//! - **Shapes** ([`shape`]) - Shared geometry plus a standard material
//! - **Scene Management** ([`scene`]) - Node trees, arena graph and lights
//! - **Rendering Pipeline** ([`rendering`]) - Renderer seam with wgpu and headless backends
//! - **Render Context** ([`context`]) - Camera, scene, renderer and controls for one view
//!
//! ## Usage
//!
//! ```rust
//! use diorama::gfx::{context::{RenderContext, ViewportSize}, rendering::HeadlessBackend};
//!
//! let mut backend = HeadlessBackend::new();
//! let mut context = RenderContext::create(ViewportSize::new(800, 600), &mut backend).unwrap();
//! context.render_frame().unwrap();
//! assert_eq!(backend.log().borrow().frames, 1);
//! ```

pub mod camera;
pub mod context;
pub mod geometry;
pub mod rendering;
pub mod scene;
pub mod shape;

// Re-export commonly used types
pub use camera::{CameraControls, OrbitControls, PerspectiveCamera};
pub use context::{RenderContext, ViewportSize};
pub use shape::{Color, Shape, ShapeKind, StandardMaterial};
