use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use winit::event_loop::{ControlFlow, EventLoop};

use antimatter::{App, AppError, Config, SceneKind};

/// Real-time antimatter visualizations.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// TOML file overriding the built-in defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scene shown at startup.
    #[arg(short, long, value_enum, default_value_t = SceneKind::Ring)]
    scene: SceneKind,

    /// Seed the random number generator for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,
}

fn run(args: Args) -> Result<(), AppError> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config, args.scene, args.seed);
    event_loop.run_app(&mut app)?;

    match app.take_error() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
