//! Runtime configuration
//!
//! Plain structs with defaults matching the stock scenes. The binary fills
//! them from command line arguments.

use std::path::PathBuf;

use crate::logging::LoggingConfig;

/// Settings for the robot scene
#[derive(Debug, Clone, PartialEq)]
pub struct RobotShowcaseConfig {
    pub star_count: usize,
    /// Stars are scattered in `[-star_spread, star_spread]` on each axis
    pub star_spread: f32,
    pub show_axes: bool,
    /// Fixed seed for the star field; random when `None`
    pub seed: Option<u64>,
}

impl Default for RobotShowcaseConfig {
    fn default() -> Self {
        Self {
            star_count: 200,
            star_spread: 18.0,
            show_axes: false,
            seed: None,
        }
    }
}

/// Settings for the loaded-model scene
#[derive(Debug, Clone, PartialEq)]
pub struct ModelShowcaseConfig {
    pub path: PathBuf,
    pub scale: f32,
    /// Spin models that ship without clips
    pub turntable: bool,
    /// Seconds per turntable revolution
    pub turntable_period: f32,
}

impl Default for ModelShowcaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("assets/model.obj"),
            scale: 0.01,
            turntable: true,
            turntable_period: 8.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SceneChoice {
    Robot(RobotShowcaseConfig),
    Model(ModelShowcaseConfig),
}

impl Default for SceneChoice {
    fn default() -> Self {
        SceneChoice::Robot(RobotShowcaseConfig::default())
    }
}

/// Window and scene selection for one run
#[derive(Debug, Clone)]
pub struct StageConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    pub scene: SceneChoice,
    pub logging: LoggingConfig,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            title: "Diorama".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
            scene: SceneChoice::default(),
            logging: LoggingConfig::default(),
        }
    }
}
