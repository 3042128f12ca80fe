//! # Asset Loading
//!
//! Loaders turn files into detached node trees plus animation clips. Loading
//! runs off the frame loop on a worker thread; the result is picked up by
//! polling an [`AssetRequest`] at the start of a tick.

pub mod loader;

pub use loader::{Asset, AssetLoader, AssetRequest, ObjLoader};
