//! # Scene Composer
//!
//! Pure builders that assemble detached [`Node`] trees from primitive shapes.
//! Nothing here touches a render context; callers insert the returned trees
//! into a [`Scene`](crate::gfx::scene::Scene) themselves.
//!
//! ```rust
//! use diorama::composer::build_composite;
//!
//! let robot = build_composite();
//! assert_eq!(robot.mesh_count(), 10);
//! ```

use std::f32::consts::FRAC_PI_2;

use cgmath::Vector3;

use crate::{
    error::ComposeError,
    gfx::{
        scene::{DirectionalLight, Node},
        shape::{Color, Shape, ShapeKind, StandardMaterial},
    },
};

pub mod particles;
pub mod robot;

pub use particles::build_particle_field;
pub use robot::{
    build_body, build_composite, build_composite_scaled, build_eye, build_head, build_horn,
    build_limb, ROBOT_SCALE,
};

/// Body color shared by the robot and its star field
pub const ROBOT_GREEN: Color = Color::rgb(
    0x43 as f32 / 255.0,
    0xb9 as f32 / 255.0,
    0x88 as f32 / 255.0,
);

pub(crate) fn positive_finite(name: &'static str, value: f32) -> Result<(), ComposeError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ComposeError::InvalidParameter {
            name,
            value,
            reason: "must be finite and greater than zero",
        })
    }
}

/// Light node at `position` shining toward the origin
pub fn build_directional_light(color: Color, intensity: f32, position: Vector3<f32>) -> Node {
    Node::light("directional-light", DirectionalLight::new(color, intensity))
        .with_position(position.x, position.y, position.z)
}

/// Three thin colored rods along +X (red), +Y (green) and +Z (blue)
pub fn build_axes_helper(length: f32) -> Result<Node, ComposeError> {
    positive_finite("length", length)?;

    let half = length / 2.0;
    let rod = |color: Color| {
        Shape::create(
            ShapeKind::Cylinder {
                radius_top: length * 0.01,
                radius_bottom: length * 0.01,
                height: length,
                radial_segments: 8,
            },
            StandardMaterial::new(color, 1.0, 0.0),
        )
    };

    Ok(Node::group("axes")
        .with_child(
            Node::mesh("axis-x", rod(Color::rgb(1.0, 0.0, 0.0)))
                .with_position(half, 0.0, 0.0)
                .with_rotation(0.0, 0.0, -FRAC_PI_2),
        )
        .with_child(
            Node::mesh("axis-y", rod(Color::rgb(0.0, 1.0, 0.0))).with_position(0.0, half, 0.0),
        )
        .with_child(
            Node::mesh("axis-z", rod(Color::rgb(0.0, 0.0, 1.0)))
                .with_position(0.0, 0.0, half)
                .with_rotation(FRAC_PI_2, 0.0, 0.0),
        ))
}
