//! # Animation
//!
//! The frame loop that drives a render context, keyframe clips for animated
//! models, and the frame statistics the loop reports.

pub mod animation_loop;
pub mod clip;
pub mod frame_stats;

pub use animation_loop::{AnimationLoop, LoopState, ScheduledTick, TickContext, TickFn, TickOutcome};
pub use clip::{AnimationClip, AnimationMixer, KeyframeTrack, TrackProperty};
pub use frame_stats::{FrameMetrics, FrameStats};
