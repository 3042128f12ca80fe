// src/lib.rs
//! Diorama 3D Engine
//!
//! Composes small 3D scenes from primitive shapes and drives them with a
//! cancellable frame loop, built on wgpu and winit.
//!
//! ```rust
//! use std::time::Instant;
//! use diorama::prelude::*;
//!
//! let mut backend = HeadlessBackend::new();
//! let mut view = ViewLifecycle::new(RobotShowcase::default());
//! view.attach(ViewportSize::new(800, 600), &mut backend).unwrap();
//! for _ in 0..3 {
//!     view.frame(Instant::now());
//! }
//! assert_eq!(backend.log().borrow().frames, 3);
//! ```

pub mod animation;
pub mod app;
pub mod assets;
pub mod composer;
pub mod config;
pub mod error;
pub mod gfx;
pub mod logging;
pub mod prelude;
pub mod view;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::{run_headless, DioramaApp};
pub use config::StageConfig;

/// Opens a window on the default robot scene and runs until it closes
pub fn run_default() -> anyhow::Result<()> {
    DioramaApp::new(StageConfig::default()).run()
}
