//! Randomly scattered star field

use rand::Rng;

use super::ROBOT_GREEN;
use crate::{
    error::ComposeError,
    gfx::{
        scene::Node,
        shape::{Shape, ShapeKind, StandardMaterial},
    },
};

/// Group of `count` copies of one star, each uniformly placed in `[-spread, spread]³`
///
/// All stars share the template's tessellated geometry. Randomness comes only
/// from `rng`, so a seeded generator reproduces the same field.
pub fn build_particle_field(
    count: usize,
    spread: f32,
    rng: &mut impl Rng,
) -> Result<Node, ComposeError> {
    // The sampled range spans 2 * spread, which must stay finite
    if !spread.is_finite() || spread < 0.0 || spread > f32::MAX / 2.0 {
        return Err(ComposeError::InvalidParameter {
            name: "spread",
            value: spread,
            reason: "must be non-negative and at most f32::MAX / 2",
        });
    }

    let star = Shape::create(
        ShapeKind::sphere(0.2, 3, 3),
        StandardMaterial::new(ROBOT_GREEN, 0.5, 1.0),
    );

    let mut field = Node::group("stars");
    field.children.reserve(count);
    for index in 0..count {
        let x = rng.random_range(-spread..=spread);
        let y = rng.random_range(-spread..=spread);
        let z = rng.random_range(-spread..=spread);
        field.add_child(Node::mesh(format!("star-{index}"), star.clone()).with_position(x, y, z));
    }

    log::debug!("Built particle field with {count} stars (spread {spread})");
    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_empty_field() {
        let mut rng = StdRng::seed_from_u64(7);
        let field = build_particle_field(0, 18.0, &mut rng).unwrap();
        assert!(field.is_group());
        assert!(field.children.is_empty());
    }

    #[test]
    fn test_positions_within_spread() {
        let mut rng = StdRng::seed_from_u64(42);
        let field = build_particle_field(200, 18.0, &mut rng).unwrap();
        assert_eq!(field.children.len(), 200);
        for star in &field.children {
            let p = star.transform.position;
            for coord in [p.x, p.y, p.z] {
                assert!((-18.0..=18.0).contains(&coord), "{coord} out of range");
            }
        }
    }

    #[test]
    fn test_stars_share_geometry() {
        let mut rng = StdRng::seed_from_u64(1);
        let field = build_particle_field(3, 5.0, &mut rng).unwrap();
        let keys: Vec<usize> = field
            .children
            .iter()
            .filter_map(|star| star.shape().map(|s| s.geometry_key()))
            .collect();
        assert_eq!(keys.len(), 3);
        assert!(keys.iter().all(|key| *key == keys[0]));
    }

    #[test]
    fn test_same_seed_same_field() {
        let a = build_particle_field(10, 18.0, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = build_particle_field(10, 18.0, &mut StdRng::seed_from_u64(9)).unwrap();
        let positions =
            |n: &Node| -> Vec<_> { n.children.iter().map(|c| c.transform.position).collect() };
        assert_eq!(positions(&a), positions(&b));
    }

    #[test]
    fn test_zero_spread_collapses_to_origin() {
        let mut rng = StdRng::seed_from_u64(3);
        let field = build_particle_field(4, 0.0, &mut rng).unwrap();
        assert!(field
            .children
            .iter()
            .all(|star| star.transform.position == cgmath::Vector3::new(0.0, 0.0, 0.0)));
    }

    #[test]
    fn test_negative_spread_rejected() {
        let mut rng = StdRng::seed_from_u64(3);
        let err = build_particle_field(4, -1.0, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            ComposeError::InvalidParameter { name: "spread", .. }
        ));
    }

    #[test]
    fn test_huge_spread_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = build_particle_field(1, f32::MAX, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            ComposeError::InvalidParameter { name: "spread", .. }
        ));

        let widest = f32::MAX / 2.0;
        let field = build_particle_field(2, widest, &mut rng).unwrap();
        assert_eq!(field.children.len(), 2);
    }
}
