//! Error types for the Diorama engine
//!
//! Each concern gets its own error enum so callers can tell a fatal setup failure
//! apart from a recoverable asset problem or a programmer error on the loop.

use std::path::PathBuf;

use thiserror::Error;

use crate::gfx::scene::NodeId;

/// Failure to acquire a renderable output surface.
#[derive(Error, Debug)]
pub enum InitError {
    /// The host reported a viewport with no area
    #[error("viewport has zero area ({width}x{height})")]
    EmptyViewport { width: u32, height: u32 },

    /// The window could not be turned into a render surface
    #[error("failed to create render surface: {0}")]
    Surface(String),

    /// No graphics adapter is compatible with the surface
    #[error("no compatible graphics adapter: {0}")]
    Adapter(String),

    /// The adapter refused to hand out a device
    #[error("failed to acquire graphics device: {0}")]
    Device(String),

    /// The scene setup could not populate the new context
    #[error("scene setup failed: {0:#}")]
    Compose(anyhow::Error),
}

/// Rejected builder parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComposeError {
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f32,
        reason: &'static str,
    },
}

/// Misuse of the animation loop state machine.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopError {
    #[error("animation loop is already running")]
    AlreadyRunning,
}

/// Scene graph structure violations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneError {
    #[error("node {0:?} does not exist in this scene")]
    UnknownNode(NodeId),

    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },

    #[error("the scene root cannot be re-parented or removed")]
    RootIsFixed,
}

/// Malformed keyframe data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    #[error("track for `{target}` has {times} times but {values} values")]
    MismatchedKeyframes {
        target: String,
        times: usize,
        values: usize,
    },

    #[error("track for `{0}` has no keyframes")]
    EmptyTrack(String),

    #[error("track for `{0}` has decreasing keyframe times")]
    UnsortedTimes(String),

    #[error("track for `{0}` has a non-finite keyframe time")]
    NonFiniteTime(String),
}

/// Failure while loading an external asset. Always recoverable.
#[derive(Error, Debug)]
pub enum AssetLoadError {
    #[error("failed to read asset {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("unsupported asset format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("asset {0} contains no meshes")]
    Empty(PathBuf),

    #[error("asset worker dropped before delivering a result")]
    Canceled,
}

/// Failure while drawing a frame.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("render context has been disposed")]
    Disposed,

    #[error("surface became unavailable: {0}")]
    Surface(String),

    #[error("graphics device ran out of memory")]
    OutOfMemory,
}

/// Failure inside one animation tick. Stops the loop.
#[derive(Error, Debug)]
pub enum TickError {
    #[error("tick callback failed: {0:#}")]
    Update(anyhow::Error),

    #[error("frame render failed: {0}")]
    Render(#[from] RenderError),
}

/// Result alias used by scene graph operations.
pub type SceneResult<T> = std::result::Result<T, SceneError>;
