//! WGPU buffer helpers

pub mod uniform_buffer;

// Re-export main types
pub use uniform_buffer::{InstanceBuffer, UniformBuffer};
