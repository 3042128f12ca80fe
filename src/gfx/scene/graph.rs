//! Arena-backed scene graph
//!
//! Nodes live in a slot vector and are addressed by [`NodeId`]. The owning
//! relation is each node's ordered `children` list; `parent` is a plain index
//! back-reference, so the graph holds no reference cycles.

use cgmath::{Matrix4, SquareMatrix};

use super::node::{Node, NodeKind, Transform};
use crate::error::{SceneError, SceneResult};

/// Handle to a node inside one [`SceneGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A node while it is stored in a graph
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub transform: Transform,
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl SceneNode {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Hierarchy of nodes under a single fixed root
///
/// Slots are never recycled: a [`NodeId`] names at most one node for the
/// lifetime of the graph, so a stale id can never alias a later insert.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    slots: Vec<Option<SceneNode>>,
    root: NodeId,
    live: usize,
}

impl SceneGraph {
    pub fn new() -> Self {
        let root = SceneNode {
            name: "root".to_string(),
            transform: Transform::default(),
            kind: NodeKind::Group,
            parent: None,
            children: Vec::new(),
        };

        Self {
            slots: vec![Some(root)],
            root: NodeId(0),
            live: 1,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, attached or not, including the root
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.children(self.root).is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn transform(&self, id: NodeId) -> Option<&Transform> {
        self.get(id).map(|node| &node.transform)
    }

    pub fn transform_mut(&mut self, id: NodeId) -> Option<&mut Transform> {
        self.get_mut(id).map(|node| &mut node.transform)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|node| node.children.as_slice()).unwrap_or(&[])
    }

    /// Moves an owned tree into the graph without attaching it anywhere
    pub fn spawn(&mut self, node: Node) -> NodeId {
        let Node {
            name,
            transform,
            kind,
            children,
        } = node;

        let id = NodeId(self.slots.len());
        self.slots.push(Some(SceneNode {
            name,
            transform,
            kind,
            parent: None,
            children: Vec::with_capacity(children.len()),
        }));
        self.live += 1;

        for child in children {
            let child_id = self.spawn(child);
            self.link(id, child_id);
        }

        id
    }

    /// Moves an owned tree into the graph as the last child of `parent`
    pub fn insert(&mut self, parent: NodeId, node: Node) -> SceneResult<NodeId> {
        self.require(parent)?;
        let id = self.spawn(node);
        self.link(parent, id);
        Ok(id)
    }

    /// Moves an owned tree into the graph as the last child of the root
    pub fn add(&mut self, node: Node) -> NodeId {
        let id = self.spawn(node);
        self.link(self.root, id);
        id
    }

    /// Appends `child` to `parent`'s children, detaching it from its previous
    /// parent first
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> SceneResult<()> {
        self.require(parent)?;
        self.require(child)?;
        if child == self.root {
            return Err(SceneError::RootIsFixed);
        }
        if child == parent || self.is_ancestor(child, parent) {
            return Err(SceneError::Cycle { parent, child });
        }

        self.unlink(child);
        self.link(parent, child);
        Ok(())
    }

    /// Cuts `child` loose from its parent. The subtree stays in the graph but
    /// is no longer reachable from the root.
    pub fn detach(&mut self, child: NodeId) -> SceneResult<()> {
        self.require(child)?;
        if child == self.root {
            return Err(SceneError::RootIsFixed);
        }
        self.unlink(child);
        Ok(())
    }

    /// Takes a subtree out of the graph, returning it as an owned tree.
    ///
    /// Ids of the removed nodes stay invalid; their slots are not reused.
    pub fn remove(&mut self, id: NodeId) -> SceneResult<Node> {
        self.require(id)?;
        if id == self.root {
            return Err(SceneError::RootIsFixed);
        }
        self.unlink(id);
        self.take_subtree(id).ok_or(SceneError::UnknownNode(id))
    }

    /// True when `ancestor` lies on the parent chain of `node`
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.parent(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// First live node with `name`, in slot order
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.slots.iter().enumerate().find_map(|(index, slot)| {
            slot.as_ref()
                .filter(|node| node.name == name)
                .map(|_| NodeId(index))
        })
    }

    /// First node named `name` inside the subtree rooted at `start`
    pub fn find_in(&self, start: NodeId, name: &str) -> Option<NodeId> {
        let node = self.get(start)?;
        if node.name == name {
            return Some(start);
        }
        node.children
            .iter()
            .find_map(|&child| self.find_in(child, name))
    }

    /// Composed transform from the top of `id`'s parent chain down to `id`
    pub fn world_matrix(&self, id: NodeId) -> Option<Matrix4<f32>> {
        let node = self.get(id)?;
        let local = node.transform.matrix();
        Some(match node.parent {
            Some(parent) => self.world_matrix(parent)? * local,
            None => local,
        })
    }

    /// Visits every node reachable from the root, depth-first in child order,
    /// with its world matrix
    pub fn walk<'a, F>(&'a self, mut visit: F)
    where
        F: FnMut(NodeId, &'a SceneNode, &Matrix4<f32>),
    {
        self.walk_from(self.root, &Matrix4::identity(), &mut visit);
    }

    fn walk_from<'a, F>(&'a self, id: NodeId, parent_world: &Matrix4<f32>, visit: &mut F)
    where
        F: FnMut(NodeId, &'a SceneNode, &Matrix4<f32>),
    {
        let Some(node) = self.get(id) else {
            return;
        };
        let world = *parent_world * node.transform.matrix();
        visit(id, node, &world);
        for &child in &node.children {
            self.walk_from(child, &world, visit);
        }
    }

    fn require(&self, id: NodeId) -> SceneResult<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(SceneError::UnknownNode(id))
        }
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.get_mut(parent) {
            node.children.push(child);
        }
    }

    fn unlink(&mut self, child: NodeId) {
        let Some(parent) = self.parent(child) else {
            return;
        };
        if let Some(node) = self.get_mut(parent) {
            node.children.retain(|&id| id != child);
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = None;
        }
    }

    fn take_subtree(&mut self, id: NodeId) -> Option<Node> {
        let scene_node = self.slots.get_mut(id.0)?.take()?;
        self.live -= 1;

        let children = scene_node
            .children
            .iter()
            .filter_map(|&child| self.take_subtree(child))
            .collect();

        Some(Node {
            name: scene_node.name,
            transform: scene_node.transform,
            kind: scene_node.kind,
            children,
        })
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
