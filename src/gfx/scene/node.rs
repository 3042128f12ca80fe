use cgmath::{Matrix4, Rad, Vector3};

use super::light::DirectionalLight;
use crate::gfx::shape::Shape;

/// Position, Euler rotation and scale of a node relative to its parent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    /// Euler angles in radians, applied in XYZ order
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn from_position(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vector3::new(x, y, z),
            ..Self::default()
        }
    }

    /// Local matrix: translate, then rotate X·Y·Z, then scale
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z))
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

/// What a node contributes to the scene
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Pure grouping node, only carries a transform
    Group,
    /// Leaf with drawable content
    Mesh(Shape),
    Light(DirectionalLight),
}

/// An owned, detached node tree
///
/// Builders return these; a tree becomes part of a scene once it is inserted
/// into a [`SceneGraph`](super::SceneGraph). Each child is owned by exactly one
/// parent, so two trees never share nodes.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub kind: NodeKind,
    pub children: Vec<Node>,
}

impl Node {
    pub fn group(name: impl Into<String>) -> Self {
        Self::with_kind(name, NodeKind::Group)
    }

    pub fn mesh(name: impl Into<String>, shape: Shape) -> Self {
        Self::with_kind(name, NodeKind::Mesh(shape))
    }

    pub fn light(name: impl Into<String>, light: DirectionalLight) -> Self {
        Self::with_kind(name, NodeKind::Light(light))
    }

    fn with_kind(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            kind,
            children: Vec::new(),
        }
    }

    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.position = Vector3::new(x, y, z);
        self
    }

    pub fn with_rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.rotation = Vector3::new(x, y, z);
        self
    }

    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.transform.scale = Vector3::new(scale, scale, scale);
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Appends `child` after the existing children
    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn shape(&self) -> Option<&Shape> {
        match &self.kind {
            NodeKind::Mesh(shape) => Some(shape),
            _ => None,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group)
    }

    /// Number of mesh leaves in this subtree, including self
    pub fn mesh_count(&self) -> usize {
        let own = usize::from(self.shape().is_some());
        own + self.children.iter().map(Node::mesh_count).sum::<usize>()
    }

    /// Number of nodes in this subtree, including self
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Node::node_count).sum::<usize>()
    }

    /// Depth-first search by name, self first
    pub fn find(&self, name: &str) -> Option<&Node> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector4};

    #[test]
    fn test_transform_default() {
        let t = Transform::default();
        assert_eq!(t.position, Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(t.rotation, Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(t.scale, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_translate_then_rotate() {
        let mut t = Transform::from_position(0.0, 11.0, 1.0);
        t.rotation.x = std::f32::consts::FRAC_PI_2;
        // A point on the local +Y axis tilts onto +Z around the node's position
        let p = t.matrix() * Vector4::new(0.0, 1.0, 0.0, 1.0);
        let expected = Vector3::new(0.0, 11.0, 2.0);
        assert!((p.truncate() - expected).magnitude() < 1e-5);
    }

    #[test]
    fn test_counts_and_find() {
        let tree = Node::group("root")
            .with_child(Node::group("a").with_child(Node::group("leaf")))
            .with_child(Node::group("b"));
        assert_eq!(tree.node_count(), 4);
        assert_eq!(tree.mesh_count(), 0);
        assert!(tree.find("leaf").is_some());
        assert!(tree.find("missing").is_none());
    }
}
