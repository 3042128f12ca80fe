use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use diorama::{
    config::{ModelShowcaseConfig, RobotShowcaseConfig, SceneChoice, StageConfig},
    logging::{init_logging, LoggingConfig},
    DioramaApp,
};

#[derive(Parser, Debug)]
#[command(name = "diorama", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,

    #[command(flatten)]
    stage: StageArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Two robots in a drifting star field.
    Robot(RobotArgs),
    /// A model file on a turntable.
    Model(ModelArgs),
}

#[derive(Args, Debug)]
struct StageArgs {
    /// Window width in logical pixels.
    #[arg(long, global = true, default_value_t = 1280)]
    width: u32,

    /// Window height in logical pixels.
    #[arg(long, global = true, default_value_t = 720)]
    height: u32,

    /// Present with vsync.
    #[arg(long, global = true, default_value_t = true, action = clap::ArgAction::Set)]
    vsync: bool,

    /// Run without a window for a fixed number of frames.
    #[arg(long, global = true)]
    headless: bool,

    /// Frames to run in headless mode.
    #[arg(long, global = true, default_value_t = 120)]
    frames: usize,

    /// Log filter, e.g. "debug" or "diorama=trace,wgpu=warn" (overrides RUST_LOG).
    #[arg(long, global = true)]
    log: Option<String>,
}

#[derive(Args, Debug)]
struct RobotArgs {
    /// Number of stars in the background field.
    #[arg(long, default_value_t = 200)]
    stars: usize,

    /// Half-extent of the star field cube.
    #[arg(long, default_value_t = 18.0)]
    spread: f32,

    /// Show the XYZ axes helper.
    #[arg(long)]
    axes: bool,

    /// Seed for the star field.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct ModelArgs {
    /// Wavefront OBJ file to load.
    path: PathBuf,

    /// Uniform scale applied to the model.
    #[arg(long, default_value_t = 0.01)]
    scale: f32,

    /// Keep models without clips still instead of spinning them.
    #[arg(long)]
    no_turntable: bool,
}

fn stage_config(cli: Cli) -> StageConfig {
    let scene = match cli.cmd {
        Command::Robot(args) => SceneChoice::Robot(RobotShowcaseConfig {
            star_count: args.stars,
            star_spread: args.spread,
            show_axes: args.axes,
            seed: args.seed,
        }),
        Command::Model(args) => SceneChoice::Model(ModelShowcaseConfig {
            path: args.path,
            scale: args.scale,
            turntable: !args.no_turntable,
            ..ModelShowcaseConfig::default()
        }),
    };

    StageConfig {
        width: cli.stage.width,
        height: cli.stage.height,
        vsync: cli.stage.vsync,
        scene,
        logging: LoggingConfig {
            env_filter: cli.stage.log,
            ..LoggingConfig::default()
        },
        ..StageConfig::default()
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let headless = cli.stage.headless.then_some(cli.stage.frames);
    let config = stage_config(cli);
    init_logging(config.logging.clone());

    match headless {
        Some(frames) => {
            let log = diorama::run_headless(&config, frames).context("headless run")?;
            eprintln!(
                "rendered {} frames, {} draws and {} triangles in the last",
                log.frames, log.last_draw_count, log.last_triangle_count
            );
            Ok(())
        }
        None => DioramaApp::new(config).run(),
    }
}
