//! Per-instance data for batched mesh draws

use bytemuck::{Pod, Zeroable};

use crate::gfx::scene::DrawItem;

/// Instance data for a single rendered mesh
///
/// Locations 2..=7 follow the vertex position(0) and normal(1).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceData {
    /// World transform, column major
    pub model: [[f32; 4]; 4],
    /// Base color (RGBA)
    pub color: [f32; 4],
    /// x = roughness, y = metalness
    pub params: [f32; 4],
}

impl InstanceData {
    const ATTRIBUTES: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x4,
        7 => Float32x4
    ];

    pub fn from_draw_item(item: &DrawItem<'_>) -> Self {
        let material = &item.shape.material;
        let [r, g, b] = material.color.to_array();
        Self {
            model: item.world.into(),
            color: [r, g, b, 1.0],
            params: [material.roughness, material.metalness, 0.0, 0.0],
        }
    }

    pub fn vertex_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceData>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Draws sharing one geometry
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub geometry_key: usize,
    /// Index of the first draw item using this geometry
    pub first_item: usize,
    pub instances: Vec<InstanceData>,
}

/// Groups draw items by geometry, keeping first-appearance order
pub fn batch_draw_items(items: &[DrawItem<'_>]) -> Vec<Batch> {
    let mut batches: Vec<Batch> = Vec::new();
    for (index, item) in items.iter().enumerate() {
        let key = item.shape.geometry_key();
        let instance = InstanceData::from_draw_item(item);
        match batches.iter_mut().find(|batch| batch.geometry_key == key) {
            Some(batch) => batch.instances.push(instance),
            None => batches.push(Batch {
                geometry_key: key,
                first_item: index,
                instances: vec![instance],
            }),
        }
    }
    batches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        scene::{Node, Scene},
        shape::{Color, Shape, ShapeKind, StandardMaterial},
    };

    #[test]
    fn test_instance_layout_size() {
        assert_eq!(std::mem::size_of::<InstanceData>(), 96);
        assert_eq!(InstanceData::vertex_buffer_layout().attributes.len(), 6);
    }

    #[test]
    fn test_clones_share_one_batch() {
        let star = Shape::create(ShapeKind::sphere(0.2, 3, 3), StandardMaterial::default());
        let eye = Shape::create(
            ShapeKind::sphere(0.5, 32, 16),
            StandardMaterial::new(Color::from_hex(0x212121), 0.5, 0.0),
        );
        let mut scene = Scene::new();
        scene.add(Node::mesh("star-a", star.clone()));
        scene.add(Node::mesh("eye", eye));
        scene.add(Node::mesh("star-b", star).with_position(1.0, 2.0, 3.0));

        let items = scene.draw_items();
        let batches = batch_draw_items(&items);
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].instances.len(), 2);
        assert_eq!(batches[0].first_item, 0);
        assert_eq!(batches[1].first_item, 1);
        assert_eq!(batches[0].instances[1].model[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(batches[1].instances[0].params[0], 0.5);
    }
}
