// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use viewfinder::EffectId;
use viewfinder::backends::virtual_camera::Faults;
use viewfinder::terminal::DeviceSimulation;

mod cli;

#[derive(Parser)]
#[command(name = "viewfinder")]
#[command(about = "Camera viewfinder with effect overlays")]
#[command(version = viewfinder::constants::app_info::version())]
#[command(subcommand_required = false)]
struct Cli {
    /// Config file (default: ~/.config/viewfinder/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the viewfinder in the terminal (default)
    Terminal {
        /// Simulate a device with no camera
        #[arg(long)]
        no_camera: bool,

        /// Make every photo capture fail
        #[arg(long)]
        fail_capture: bool,

        /// Make recordings fail to start
        #[arg(long)]
        fail_recording: bool,
    },

    /// List the effect catalog
    Effects,

    /// Render overlay frames on the virtual camera feed to PNG files
    Render {
        /// Effect to apply (e.g. "snow", "Sepia", "gold")
        #[arg(short, long, default_value = "glow")]
        effect: EffectId,

        /// Number of animation frames to advance before each saved frame
        #[arg(short, long, default_value = "30")]
        frames: u32,

        /// Number of PNG files to write
        #[arg(short, long, default_value = "1")]
        count: u32,

        /// Output directory (default: current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config_path = cli.config.or_else(viewfinder::Config::default_path);

    match cli.command {
        None => {
            init_file_logging()?;
            viewfinder::terminal::run(config_path, DeviceSimulation::default())
        }
        Some(Commands::Terminal {
            no_camera,
            fail_capture,
            fail_recording,
        }) => {
            // The terminal owns stdout; logs go to a file instead
            init_file_logging()?;
            let simulation = DeviceSimulation {
                unavailable: no_camera,
                faults: Faults {
                    capture: fail_capture,
                    start_recording: fail_recording,
                    ..Faults::default()
                },
            };
            viewfinder::terminal::run(config_path, simulation)
        }
        Some(Commands::Effects) => {
            init_logging();
            cli::list_effects()
        }
        Some(Commands::Render {
            effect,
            frames,
            count,
            output,
        }) => {
            init_logging();
            cli::render(config_path, effect, frames, count, output)
        }
    }
}

/// Set RUST_LOG to control the log level
/// Examples: RUST_LOG=debug, RUST_LOG=viewfinder=debug, RUST_LOG=info
fn env_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(true)
        .with_level(true)
        .init();
}

fn init_file_logging() -> Result<(), Box<dyn std::error::Error>> {
    let dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(viewfinder::constants::app_info::APP_ID);
    std::fs::create_dir_all(&dir)?;
    let file = std::fs::File::create(dir.join("terminal.log"))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .init();
    Ok(())
}
