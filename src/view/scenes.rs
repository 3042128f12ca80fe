//! Stock scene setups: the robot showcase and the loaded-model showcase

use std::sync::Arc;

use anyhow::Context;
use cgmath::Vector3;
use rand::{rngs::StdRng, SeedableRng};

use super::SceneSetup;
use crate::{
    animation::{AnimationClip, AnimationMixer, TickFn},
    assets::{Asset, AssetLoader, AssetRequest, ObjLoader},
    composer::{
        build_axes_helper, build_composite, build_directional_light, build_particle_field,
        positive_finite,
    },
    config::{ModelShowcaseConfig, RobotShowcaseConfig},
    gfx::{
        camera::OrbitControls,
        context::RenderContext,
        scene::{Environment, Scene},
        shape::Color,
    },
};

/// Radians each robot turns about Y per tick
pub const ROBOT_SPIN_PER_TICK: f32 = 0.005;
/// Radians the star field drifts about each axis per tick
pub const STAR_SPIN_PER_TICK: f32 = 0.001;

const AXES_LENGTH: f32 = 20.0;

/// Two robots in a drifting star field, lit from one side
#[derive(Debug, Clone, Default)]
pub struct RobotShowcase {
    config: RobotShowcaseConfig,
}

impl RobotShowcase {
    pub fn new(config: RobotShowcaseConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RobotShowcaseConfig {
        &self.config
    }
}

impl SceneSetup for RobotShowcase {
    fn compose(&mut self, context: &mut RenderContext) -> anyhow::Result<TickFn> {
        let camera = context.camera_mut();
        camera.set_position(15.0, 12.0, 8.0);
        camera.look_at(0.0, 0.0, 0.0);

        let stars = match self.config.seed {
            Some(seed) => build_particle_field(
                self.config.star_count,
                self.config.star_spread,
                &mut StdRng::seed_from_u64(seed),
            ),
            None => build_particle_field(
                self.config.star_count,
                self.config.star_spread,
                &mut rand::rng(),
            ),
        }
        .context("building star field")?;
        let axes = if self.config.show_axes {
            Some(build_axes_helper(AXES_LENGTH).context("building axes helper")?)
        } else {
            None
        };

        let scene = context.scene_mut();
        let robots = [
            scene.add(build_composite()),
            scene.add(build_composite().with_position(6.0, 0.0, 6.0)),
        ];
        scene.add(build_directional_light(
            Color::WHITE,
            5.0,
            Vector3::new(5.0, 5.0, 10.0),
        ));
        let stars = scene.add(stars);
        if let Some(axes) = axes {
            scene.add(axes);
        }
        log::info!(
            "Robot showcase composed: {} nodes",
            scene.statistics().node_count
        );

        context.attach_controls(Box::new(OrbitControls::new(Vector3::new(0.0, 0.0, 0.0))));

        Ok(Box::new(move |tick, _delta| {
            let graph = &mut tick.scene_mut().graph;
            for robot in robots {
                let transform = graph
                    .transform_mut(robot)
                    .context("robot left the scene")?;
                transform.rotation.y -= ROBOT_SPIN_PER_TICK;
            }
            let field = graph.transform_mut(stars).context("star field left the scene")?;
            field.rotation.y -= STAR_SPIN_PER_TICK;
            field.rotation.z += STAR_SPIN_PER_TICK;
            field.rotation.x += STAR_SPIN_PER_TICK;

            tick.update_controls();
            Ok(())
        }))
    }
}

/// A model loaded in the background, shown in a softly lit room
pub struct ModelShowcase {
    config: ModelShowcaseConfig,
    loader: Arc<dyn AssetLoader>,
}

impl ModelShowcase {
    pub fn new(config: ModelShowcaseConfig) -> Self {
        Self::with_loader(config, Arc::new(ObjLoader))
    }

    pub fn with_loader(config: ModelShowcaseConfig, loader: Arc<dyn AssetLoader>) -> Self {
        Self { config, loader }
    }

    pub fn config(&self) -> &ModelShowcaseConfig {
        &self.config
    }
}

impl std::fmt::Debug for ModelShowcase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelShowcase")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Places a freshly loaded asset and picks the clip to play on it
fn place_asset(scene: &mut Scene, asset: Asset, config: &ModelShowcaseConfig) -> AnimationMixer {
    let Asset { root, mut clips } = asset;
    let name = root.name.clone();
    let root = root
        .with_position(1.0, 1.0, 0.0)
        .with_uniform_scale(config.scale);
    let id = scene.add(root);

    let clip = if clips.is_empty() {
        if config.turntable {
            AnimationClip::turntable(name.as_str(), config.turntable_period).unwrap_or_else(|err| {
                log::warn!("No turntable for `{name}`: {err}");
                AnimationClip::new("still", Vec::new())
            })
        } else {
            AnimationClip::new("still", Vec::new())
        }
    } else {
        clips.swap_remove(0)
    };
    log::info!("Playing clip `{}` on `{name}`", clip.name);
    AnimationMixer::new(clip, &scene.graph, id)
}

impl SceneSetup for ModelShowcase {
    fn compose(&mut self, context: &mut RenderContext) -> anyhow::Result<TickFn> {
        positive_finite("scale", self.config.scale)?;
        positive_finite("turntable_period", self.config.turntable_period)?;

        let scene = context.scene_mut();
        scene.background = Some(Color::from_hex(0xbfe3dd));
        scene.environment = Some(Environment::room());

        let camera = context.camera_mut();
        camera.fov = cgmath::Deg(40.0);
        camera.near = 1.0;
        camera.far = 100.0;
        camera.set_position(5.0, 2.0, 10.0);
        camera.update_projection_matrix();

        let mut controls = OrbitControls::new(Vector3::new(0.0, 0.5, 0.0));
        controls.enable_pan = false;
        controls.enable_damping = true;
        context.attach_controls(Box::new(controls));

        let config = self.config.clone();
        let mut request = Some(AssetRequest::spawn(
            Arc::clone(&self.loader),
            config.path.clone(),
        ));
        let mut mixer: Option<AnimationMixer> = None;

        Ok(Box::new(move |tick, delta| {
            if let Some(result) = request.as_mut().and_then(AssetRequest::poll) {
                request = None;
                match result {
                    Ok(asset) => mixer = Some(place_asset(tick.scene_mut(), asset, &config)),
                    Err(err) => log::warn!("Could not load {}: {err}", config.path.display()),
                }
            }

            if let Some(mixer) = mixer.as_mut() {
                mixer.update(&mut tick.scene_mut().graph, delta);
            }
            tick.update_controls();
            Ok(())
        }))
    }
}
