use cgmath::{InnerSpace, Matrix4, Vector3, Vector4};

use super::{
    graph::{NodeId, SceneGraph},
    light::{DirectionalLight, Environment},
    node::{Node, NodeKind},
};
use crate::gfx::shape::{Color, Shape};

/// One mesh to draw, in world space
#[derive(Debug, Clone, Copy)]
pub struct DrawItem<'a> {
    pub node: NodeId,
    pub world: Matrix4<f32>,
    pub shape: &'a Shape,
}

/// A directional light resolved to world space
#[derive(Debug, Clone, Copy)]
pub struct WorldLight {
    /// Unit vector pointing from the light toward its target
    pub direction: Vector3<f32>,
    pub light: DirectionalLight,
}

/// Root of everything that gets rendered, plus scene-wide settings
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub graph: SceneGraph,
    /// Clear color; the renderer's default when `None`
    pub background: Option<Color>,
    pub environment: Option<Environment>,
}

impl Scene {
    /// Creates an empty scene with a fresh root
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> NodeId {
        self.graph.root()
    }

    /// Inserts `node` as the last child of the root
    pub fn add(&mut self, node: Node) -> NodeId {
        self.graph.add(node)
    }

    /// Meshes reachable from the root, in traversal order
    pub fn draw_items(&self) -> Vec<DrawItem<'_>> {
        let mut items = Vec::new();
        self.graph.walk(|id, node, world| {
            if let NodeKind::Mesh(shape) = &node.kind {
                items.push(DrawItem {
                    node: id,
                    world: *world,
                    shape,
                });
            }
        });
        items
    }

    /// Directional lights reachable from the root
    pub fn lights(&self) -> Vec<WorldLight> {
        let mut lights = Vec::new();
        self.graph.walk(|_, node, world| {
            if let NodeKind::Light(light) = &node.kind {
                let position = (world * Vector4::new(0.0, 0.0, 0.0, 1.0)).truncate();
                let offset = light.target - position;
                let direction = if offset.magnitude2() > f32::EPSILON {
                    offset.normalize()
                } else {
                    -Vector3::unit_y()
                };
                lights.push(WorldLight {
                    direction,
                    light: *light,
                });
            }
        });
        lights
    }

    /// Simple statistics for logging
    pub fn statistics(&self) -> SceneStatistics {
        let mut statistics = SceneStatistics::default();
        self.graph.walk(|_, node, _| {
            statistics.node_count += 1;
            if let NodeKind::Mesh(shape) = &node.kind {
                statistics.mesh_count += 1;
                statistics.total_triangles += shape.geometry().triangle_count();
            }
        });
        statistics
    }
}

/// Scene statistics for debugging
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SceneStatistics {
    pub node_count: usize,
    pub mesh_count: usize,
    pub total_triangles: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::shape::{ShapeKind, StandardMaterial};

    #[test]
    fn test_draw_items_follow_traversal_order() {
        let mut scene = Scene::new();
        let ball = Shape::create(ShapeKind::sphere(1.0, 8, 6), StandardMaterial::default());
        scene.add(
            Node::group("g")
                .with_position(0.0, 1.0, 0.0)
                .with_child(Node::mesh("first", ball.clone()))
                .with_child(Node::mesh("second", ball).with_position(2.0, 0.0, 0.0)),
        );

        let items = scene.draw_items();
        assert_eq!(items.len(), 2);
        assert_eq!(scene.graph.get(items[0].node).unwrap().name, "first");
        assert_eq!(items[1].world.w.truncate(), Vector3::new(2.0, 1.0, 0.0));

        let stats = scene.statistics();
        assert_eq!(stats.node_count, 4);
        assert_eq!(stats.mesh_count, 2);
    }

    #[test]
    fn test_light_direction_points_at_target() {
        let mut scene = Scene::new();
        let sun = DirectionalLight::new(Color::WHITE, 5.0);
        scene.add(Node::light("sun", sun).with_position(0.0, 10.0, 0.0));
        let lights = scene.lights();
        assert_eq!(lights.len(), 1);
        assert!((lights[0].direction - Vector3::new(0.0, -1.0, 0.0)).magnitude() < 1e-6);
        assert_eq!(lights[0].light.intensity, 5.0);
    }
}
