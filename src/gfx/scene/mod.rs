//! # Scene Management Module
//!
//! Scene graph, node trees and lighting for the Diorama engine.
//!
//! ## Key Components
//!
//! - [`Node`] - An owned, detached node tree, as returned by the composer
//! - [`SceneGraph`] - Arena holding attached nodes with parent back-references
//! - [`Scene`] - Graph root plus background and environment settings
//! - [`Vertex3D`] - GPU vertex format
//!
//! ## Usage
//!
//! ```rust
//! use diorama::gfx::scene::{Node, Scene};
//!
//! let mut scene = Scene::new();
//! let group = scene.add(Node::group("figure"));
//! let arm = scene.graph.insert(group, Node::group("arm")).unwrap();
//! assert_eq!(scene.graph.parent(arm), Some(group));
//! ```

pub mod graph;
pub mod light;
pub mod node;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use graph::{NodeId, SceneGraph, SceneNode};
pub use light::{DirectionalLight, Environment};
pub use node::{Node, NodeKind, Transform};
pub use scene::{DrawItem, Scene, SceneStatistics, WorldLight};
pub use vertex::Vertex3D;
