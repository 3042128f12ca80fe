//! The multi-part robot figure
//!
//! All offsets are in the figure's local space, before the uniform scale of
//! the root group is applied.

use std::f32::consts::PI;

use super::{positive_finite, ROBOT_GREEN};
use crate::{
    error::ComposeError,
    gfx::{
        geometry::SphereSweep,
        scene::Node,
        shape::{Color, Shape, ShapeKind, StandardMaterial},
    },
};

/// Uniform scale of a composed robot
pub const ROBOT_SCALE: f32 = 0.3;

const HEAD_Y: f32 = 6.5;
const BODY_Y: f32 = 4.0;
const HORN_TILT: f32 = PI * 30.0 / 180.0;

fn robot_material() -> StandardMaterial {
    StandardMaterial::new(ROBOT_GREEN, 0.5, 1.0)
}

/// Hemispherical dome, flat side down
pub fn build_head() -> Node {
    let kind = ShapeKind::Sphere {
        radius: 4.0,
        width_segments: 32,
        height_segments: 16,
        sweep: SphereSweep::upper_hemisphere(),
    };
    Node::mesh("head", Shape::create(kind, robot_material()))
}

/// Thin antenna at (0, y, z), tilted by `tilt` radians around X
pub fn build_horn(y: f32, z: f32, tilt: f32) -> Node {
    Node::mesh(
        "horn",
        Shape::create(ShapeKind::capsule(0.1, 2.0), robot_material()),
    )
    .with_position(0.0, y, z)
    .with_rotation(tilt, 0.0, 0.0)
}

pub fn build_eye(x: f32, y: f32, z: f32) -> Node {
    let material = StandardMaterial::new(Color::from_hex(0x212121), 0.5, 1.0);
    Node::mesh(
        "eye",
        Shape::create(ShapeKind::sphere(0.5, 32, 16), material),
    )
    .with_position(x, y, z)
}

pub fn build_body() -> Node {
    Node::mesh(
        "body",
        Shape::create(ShapeKind::cylinder(4.0, 4.0, 6.0), robot_material()),
    )
}

/// Leg or arm: a capsule at (0, y, z)
pub fn build_limb(y: f32, z: f32) -> Node {
    Node::mesh(
        "limb",
        Shape::create(ShapeKind::capsule(1.0, 4.0), robot_material()),
    )
    .with_position(0.0, y, z)
}

fn named(mut node: Node, name: &str) -> Node {
    node.name = name.to_string();
    node
}

/// Assembles the robot at the standard [`ROBOT_SCALE`]
///
/// Every call builds a fresh tree; two robots never share transforms.
pub fn build_composite() -> Node {
    assemble(ROBOT_SCALE)
}

/// Assembles the robot at a custom uniform scale
pub fn build_composite_scaled(scale: f32) -> Result<Node, ComposeError> {
    positive_finite("scale", scale)?;
    Ok(assemble(scale))
}

fn assemble(scale: f32) -> Node {
    let mut head = build_head();
    head.transform.position.y = HEAD_Y;
    let mut body = build_body();
    body.transform.position.y = BODY_Y;

    Node::group("robot")
        .with_child(head)
        .with_child(named(build_eye(3.0, 8.0, -2.0), "eye-left"))
        .with_child(named(build_eye(3.0, 8.0, 2.0), "eye-right"))
        .with_child(named(build_horn(11.0, -1.0, -HORN_TILT), "horn-left"))
        .with_child(named(build_horn(11.0, 1.0, HORN_TILT), "horn-right"))
        .with_child(body)
        .with_child(named(build_limb(0.0, -2.0), "leg-left"))
        .with_child(named(build_limb(0.0, 2.0), "leg-right"))
        .with_child(named(build_limb(3.0, 5.0), "arm-right"))
        .with_child(named(build_limb(3.0, -5.0), "arm-left"))
        .with_uniform_scale(scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::NodeKind;
    use cgmath::Vector3;

    fn structure(node: &Node) -> Vec<(String, Vector3<f32>, Vector3<f32>, usize)> {
        let mut out = vec![(
            node.name.clone(),
            node.transform.position,
            node.transform.rotation,
            node.children.len(),
        )];
        for child in &node.children {
            out.extend(structure(child));
        }
        out
    }

    #[test]
    fn test_composite_layout() {
        let robot = build_composite();
        assert_eq!(robot.children.len(), 10);
        assert_eq!(robot.mesh_count(), 10);
        assert_eq!(robot.transform.scale, Vector3::new(0.3, 0.3, 0.3));

        let head = robot.find("head").unwrap();
        assert_eq!(head.transform.position, Vector3::new(0.0, 6.5, 0.0));
        assert!(head.children.is_empty());

        let horn = robot.find("horn-left").unwrap();
        assert_eq!(horn.transform.position, Vector3::new(0.0, 11.0, -1.0));
        assert!((horn.transform.rotation.x + PI / 6.0).abs() < 1e-6);

        let arm = robot.find("arm-left").unwrap();
        assert_eq!(arm.transform.position, Vector3::new(0.0, 3.0, -5.0));
    }

    #[test]
    fn test_two_composites_are_identical_and_independent() {
        let mut first = build_composite();
        let second = build_composite();
        assert_eq!(structure(&first), structure(&second));

        first.transform.rotation.y = 1.0;
        first.children[0].transform.position.y = 100.0;
        assert_eq!(second.transform.rotation.y, 0.0);
        assert_eq!(second.children[0].transform.position.y, 6.5);
    }

    #[test]
    fn test_head_material() {
        let head = build_head();
        let NodeKind::Mesh(shape) = &head.kind else {
            panic!("head should be a mesh");
        };
        assert_eq!(shape.material.color, Color::from_hex(0x43b988));
        assert_eq!(shape.material.roughness, 0.5);
        assert_eq!(shape.material.metalness, 1.0);
        assert!(matches!(
            shape.kind(),
            ShapeKind::Sphere { radius, .. } if *radius == 4.0
        ));
    }

    #[test]
    fn test_limb_parameters_taken_as_given() {
        let limb = build_limb(-3.5, 100.0);
        assert_eq!(limb.transform.position, Vector3::new(0.0, -3.5, 100.0));
    }

    #[test]
    fn test_scaled_rejects_non_positive() {
        assert!(build_composite_scaled(0.0).is_err());
        assert!(build_composite_scaled(-1.0).is_err());
        assert!(build_composite_scaled(f32::NAN).is_err());
        let robot = build_composite_scaled(2.0).unwrap();
        assert_eq!(robot.transform.scale, Vector3::new(2.0, 2.0, 2.0));
    }
}
