//! # Diorama Prelude
//!
//! Commonly used types in one import:
//!
//! ```rust
//! use diorama::prelude::*;
//! ```

// Application and configuration
pub use crate::app::{run_headless, DioramaApp};
pub use crate::config::{ModelShowcaseConfig, RobotShowcaseConfig, SceneChoice, StageConfig};
pub use crate::logging::{init_logging, LoggingConfig};

// Scene composition
pub use crate::composer::{
    build_axes_helper, build_composite, build_directional_light, build_particle_field,
};
pub use crate::gfx::scene::{DirectionalLight, Environment, Node, NodeId, Scene, Transform};
pub use crate::gfx::shape::{Color, Shape, ShapeKind, StandardMaterial};

// Rendering and camera
pub use crate::gfx::camera::{CameraControls, OrbitControls, PerspectiveCamera};
pub use crate::gfx::context::{RenderContext, ViewportSize};
pub use crate::gfx::rendering::{HeadlessBackend, RenderBackend, Renderer, WgpuBackend};

// Frame loop and lifecycle
pub use crate::animation::{AnimationLoop, TickContext, TickFn, TickOutcome};
pub use crate::view::{ModelShowcase, RobotShowcase, SceneSetup, ViewLifecycle};

// Assets
pub use crate::assets::{AssetLoader, AssetRequest, ObjLoader};

// Errors
pub use crate::error::{InitError, RenderError, TickError};

// Common external dependencies
pub use cgmath::{Deg, Vector3};
