//! Shapes: tessellated geometry paired with a surface material
//!
//! A [`Shape`] is the leaf content of a mesh node. Its geometry is generated
//! once at creation and shared immutably between copies, so cloning a shape
//! (or the node that holds it) is cheap and never aliases any transform state.

use std::sync::Arc;

use crate::gfx::geometry::{
    generate_capsule, generate_cylinder, generate_sphere, GeometryData, SphereSweep,
};

/// Linear RGB color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from a `0xRRGGBB` literal
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::rgb(channel(16), channel(8), channel(0))
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

/// Metal/roughness surface description
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardMaterial {
    pub color: Color,
    /// Surface roughness (0.0 = mirror, 1.0 = rough)
    pub roughness: f32,
    /// Metallic factor (0.0 = dielectric, 1.0 = metallic)
    pub metalness: f32,
}

impl Default for StandardMaterial {
    fn default() -> Self {
        Self {
            color: Color::rgb(0.8, 0.8, 0.8),
            roughness: 0.5,
            metalness: 0.0,
        }
    }
}

impl StandardMaterial {
    /// Creates a material, clamping the PBR factors into `[0, 1]`
    pub fn new(color: Color, roughness: f32, metalness: f32) -> Self {
        Self {
            color,
            roughness: roughness.clamp(0.0, 1.0),
            metalness: metalness.clamp(0.0, 1.0),
        }
    }
}

/// Parametric description of a primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeKind {
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
        sweep: SphereSweep,
    },
    Capsule {
        radius: f32,
        length: f32,
        cap_segments: u32,
        radial_segments: u32,
    },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
    },
    /// Arbitrary triangle mesh, e.g. from a loaded asset
    Mesh,
}

impl ShapeKind {
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        ShapeKind::Sphere {
            radius,
            width_segments,
            height_segments,
            sweep: SphereSweep::full(),
        }
    }

    /// Capsule with the default 4 cap rings and 8 radial segments
    pub fn capsule(radius: f32, length: f32) -> Self {
        ShapeKind::Capsule {
            radius,
            length,
            cap_segments: 4,
            radial_segments: 8,
        }
    }

    /// Cylinder with 32 radial segments
    pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32) -> Self {
        ShapeKind::Cylinder {
            radius_top,
            radius_bottom,
            height,
            radial_segments: 32,
        }
    }

    fn tessellate(&self) -> GeometryData {
        match *self {
            ShapeKind::Sphere {
                radius,
                width_segments,
                height_segments,
                sweep,
            } => generate_sphere(radius, width_segments, height_segments, sweep),
            ShapeKind::Capsule {
                radius,
                length,
                cap_segments,
                radial_segments,
            } => generate_capsule(radius, length, cap_segments, radial_segments),
            ShapeKind::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
            } => generate_cylinder(radius_top, radius_bottom, height, radial_segments),
            ShapeKind::Mesh => GeometryData::new(),
        }
    }
}

/// Geometry plus material, attached to a mesh node
#[derive(Debug, Clone)]
pub struct Shape {
    kind: ShapeKind,
    geometry: Arc<GeometryData>,
    pub material: StandardMaterial,
}

impl Shape {
    /// Tessellates `kind` and pairs it with `material`
    pub fn create(kind: ShapeKind, material: StandardMaterial) -> Self {
        Self {
            kind,
            geometry: Arc::new(kind.tessellate()),
            material,
        }
    }

    /// Wraps pre-built geometry, e.g. from a loaded asset
    pub fn from_geometry(geometry: GeometryData, material: StandardMaterial) -> Self {
        Self {
            kind: ShapeKind::Mesh,
            geometry: Arc::new(geometry),
            material,
        }
    }

    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    pub fn geometry(&self) -> &Arc<GeometryData> {
        &self.geometry
    }

    /// Address of the shared geometry, stable for the geometry's lifetime.
    ///
    /// Renderers use it to cache one GPU mesh per distinct geometry.
    pub fn geometry_key(&self) -> usize {
        Arc::as_ptr(&self.geometry) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color() {
        let c = Color::from_hex(0xff8000);
        assert_eq!(c.r, 1.0);
        assert!((c.g - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.b, 0.0);
    }

    #[test]
    fn test_material_clamps_factors() {
        let m = StandardMaterial::new(Color::WHITE, 0.5, 5.0);
        assert_eq!(m.metalness, 1.0);
        assert_eq!(m.roughness, 0.5);
    }

    #[test]
    fn test_cloned_shape_shares_geometry() {
        let shape = Shape::create(ShapeKind::sphere(0.2, 3, 3), StandardMaterial::default());
        let copy = shape.clone();
        assert_eq!(shape.geometry_key(), copy.geometry_key());
        assert!(shape.geometry().triangle_count() > 0);
    }
}
