//! # Primitive Shape Generation
//!
//! This module contains functions to generate the primitive shapes used by the
//! scene composer. All shapes are Y-up and carry normals and texture coordinates.

use super::GeometryData;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

/// Angular extent of a sphere.
///
/// `phi` sweeps around the Y axis, `theta` sweeps from the north pole (0)
/// to the south pole (PI).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereSweep {
    pub phi_start: f32,
    pub phi_length: f32,
    pub theta_start: f32,
    pub theta_length: f32,
}

impl SphereSweep {
    /// The closed sphere
    pub fn full() -> Self {
        Self {
            phi_start: 0.0,
            phi_length: TAU,
            theta_start: 0.0,
            theta_length: PI,
        }
    }

    /// The dome above the equator
    pub fn upper_hemisphere() -> Self {
        Self {
            theta_length: FRAC_PI_2,
            ..Self::full()
        }
    }
}

impl Default for SphereSweep {
    fn default() -> Self {
        Self::full()
    }
}

/// Generate a UV sphere, or a partial sweep of one
///
/// # Arguments
/// * `radius` - Sphere radius
/// * `width_segments` - Segments around the Y axis (min 3)
/// * `height_segments` - Segments from pole to pole (min 2)
/// * `sweep` - Angular extent, see [`SphereSweep`]
pub fn generate_sphere(
    radius: f32,
    width_segments: u32,
    height_segments: u32,
    sweep: SphereSweep,
) -> GeometryData {
    let mut data = GeometryData::new();

    let w_segs = width_segments.max(3);
    let h_segs = height_segments.max(2);
    let theta_end = (sweep.theta_start + sweep.theta_length).min(PI);

    for iy in 0..=h_segs {
        let v = iy as f32 / h_segs as f32;
        let theta = sweep.theta_start + v * sweep.theta_length;

        for ix in 0..=w_segs {
            let u = ix as f32 / w_segs as f32;
            let phi = sweep.phi_start + u * sweep.phi_length;

            let direction = [-phi.cos() * theta.sin(), theta.cos(), phi.sin() * theta.sin()];
            data.vertices.push([
                radius * direction[0],
                radius * direction[1],
                radius * direction[2],
            ]);
            data.normals.push(direction);
            data.tex_coords.push([u, 1.0 - v]);
        }
    }

    let row = w_segs + 1;
    for iy in 0..h_segs {
        for ix in 0..w_segs {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;

            // Degenerate triangles collapse at the poles
            if iy != 0 || sweep.theta_start > 0.0 {
                data.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != h_segs - 1 || theta_end < PI {
                data.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    data
}

/// Generate a capsule: a cylinder of `length` capped by two hemispheres
///
/// # Arguments
/// * `radius` - Radius of the cylinder and caps
/// * `length` - Length of the straight middle section (along Y)
/// * `cap_segments` - Latitude rings per hemisphere (min 1)
/// * `radial_segments` - Segments around the Y axis (min 3)
///
/// Total height is `length + 2 * radius`.
pub fn generate_capsule(
    radius: f32,
    length: f32,
    cap_segments: u32,
    radial_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let cap_segs = cap_segments.max(1);
    let radial_segs = radial_segments.max(3);
    let half_length = length * 0.5;
    let total_height = length + 2.0 * radius;

    // Ring profile from the south pole to the north pole: (latitude, center y)
    let mut rings = Vec::with_capacity(2 * (cap_segs as usize + 1));
    for i in 0..=cap_segs {
        rings.push((-FRAC_PI_2 + FRAC_PI_2 * i as f32 / cap_segs as f32, -half_length));
    }
    for i in 0..=cap_segs {
        rings.push((FRAC_PI_2 * i as f32 / cap_segs as f32, half_length));
    }

    for &(latitude, center_y) in &rings {
        let ring_radius = radius * latitude.cos();
        let y = center_y + radius * latitude.sin();
        let v = if total_height > 0.0 {
            (y + total_height * 0.5) / total_height
        } else {
            0.5
        };

        for ix in 0..=radial_segs {
            let u = ix as f32 / radial_segs as f32;
            let phi = u * TAU;
            let (sin_phi, cos_phi) = phi.sin_cos();

            data.vertices.push([ring_radius * sin_phi, y, ring_radius * cos_phi]);
            data.normals.push([
                latitude.cos() * sin_phi,
                latitude.sin(),
                latitude.cos() * cos_phi,
            ]);
            data.tex_coords.push([u, v]);
        }
    }

    let row = radial_segs + 1;
    for ring in 0..(rings.len() as u32 - 1) {
        for ix in 0..radial_segs {
            let a = ring * row + ix;
            let b = a + 1;
            let c = a + row;
            let d = c + 1;
            data.indices.extend_from_slice(&[a, b, d]);
            data.indices.extend_from_slice(&[a, d, c]);
        }
    }

    data
}

/// Generate a cylinder (or truncated cone) along the Y axis
///
/// # Arguments
/// * `radius_top` - Radius at `+height/2`
/// * `radius_bottom` - Radius at `-height/2`
/// * `height` - Height of the cylinder
/// * `radial_segments` - Segments around the Y axis (min 3)
///
/// Caps are generated for every end with a positive radius.
pub fn generate_cylinder(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let segs = radial_segments.max(3);
    let half_height = height * 0.5;
    let slope = if height != 0.0 {
        (radius_bottom - radius_top) / height
    } else {
        0.0
    };

    // Side: bottom ring then top ring
    for (radius, y, v) in [(radius_bottom, -half_height, 0.0), (radius_top, half_height, 1.0)] {
        for i in 0..=segs {
            let u = i as f32 / segs as f32;
            let (sin_a, cos_a) = (u * TAU).sin_cos();

            data.vertices.push([radius * sin_a, y, radius * cos_a]);
            let length = (1.0 + slope * slope).sqrt();
            data.normals.push([sin_a / length, slope / length, cos_a / length]);
            data.tex_coords.push([u, v]);
        }
    }

    let row = segs + 1;
    for i in 0..segs {
        let bottom_current = i;
        let bottom_next = i + 1;
        let top_current = i + row;
        let top_next = i + 1 + row;

        data.indices.extend_from_slice(&[bottom_current, bottom_next, top_next]);
        data.indices.extend_from_slice(&[bottom_current, top_next, top_current]);
    }

    let caps = [
        (radius_top, half_height, 1.0f32),
        (radius_bottom, -half_height, -1.0),
    ];
    for (radius, y, sign) in caps {
        if radius <= 0.0 {
            continue;
        }

        let center_idx = data.vertices.len() as u32;
        data.vertices.push([0.0, y, 0.0]);
        data.normals.push([0.0, sign, 0.0]);
        data.tex_coords.push([0.5, 0.5]);

        let rim_start = data.vertices.len() as u32;
        for i in 0..=segs {
            let (sin_a, cos_a) = (i as f32 / segs as f32 * TAU).sin_cos();
            data.vertices.push([radius * sin_a, y, radius * cos_a]);
            data.normals.push([0.0, sign, 0.0]);
            data.tex_coords.push([0.5 + 0.5 * sin_a, 0.5 + 0.5 * cos_a * sign]);
        }

        for i in 0..segs {
            let current = rim_start + i;
            let next = current + 1;
            if sign > 0.0 {
                data.indices.extend_from_slice(&[center_idx, current, next]);
            } else {
                data.indices.extend_from_slice(&[center_idx, next, current]);
            }
        }
    }

    data
}
