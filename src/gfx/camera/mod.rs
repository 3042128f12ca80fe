pub mod controls;
pub mod orbit_controls;
pub mod perspective;

// Re-export main types
pub use controls::CameraControls;
pub use orbit_controls::OrbitControls;
pub use perspective::{PerspectiveCamera, OPENGL_TO_WGPU_MATRIX};
