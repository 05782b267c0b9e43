//! cxbxl - launch Xbox titles through Cxbx-Reloaded under Wine.
//!
//! # Usage
//!
//! ```bash
//! # Launch a packaged disk image
//! cxbxl --rom /userdata/roms/xbox/halo.iso
//!
//! # Loose executable, one pad, debug logging
//! cxbxl --rom /userdata/roms/xbox/demo.xbe \
//!       --controller "0:030000005e04...:Xbox Pad:/dev/input/event3:11:1:6" \
//!       --debug true
//!
//! # Unprivileged hosts cannot loop-mount; extract instead
//! cxbxl --rom halo.iso --strategy extract
//! ```
//!
//! The exit code is the emulator's own exit code; launch-construction
//! failures exit 1.

mod config;
mod launch;
mod runner;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use cxbxl_core::controller::Controller;
use cxbxl_core::options::Resolution;

/// Launch an Xbox title through Cxbx-Reloaded under Wine
#[derive(Parser)]
#[command(name = "cxbxl")]
#[command(about = "Launch Xbox titles through Cxbx-Reloaded under Wine")]
#[command(version)]
pub struct Cli {
    /// System name, used for labelling only
    #[arg(long, default_value = "xbox")]
    pub system: String,

    /// ROM to launch: a .iso disk image or a loose .xbe executable
    #[arg(long)]
    pub rom: PathBuf,

    /// Display resolution as WIDTHxHEIGHT
    #[arg(long, default_value = "1920x1080")]
    pub resolution: Resolution,

    /// Connected pad descriptor, repeatable:
    /// "index:guid:name:devicepath[:buttons[:hats[:axes]]]"
    #[arg(long = "controller")]
    pub controllers: Vec<Controller>,

    /// How packaged images are exposed (mount needs loop-mount privileges)
    #[arg(long, value_enum, default_value_t = Strategy::Mount)]
    pub strategy: Strategy,

    /// Launcher options file
    #[arg(long, default_value = "/userdata/system/configs/cxbxl/options.toml")]
    pub options: PathBuf,

    /// Override: run full-screen
    #[arg(long)]
    pub fullscreen: Option<bool>,

    /// Override: emulator window resolution (settings key, distinct from
    /// the display resolution above)
    #[arg(long)]
    pub video_resolution: Option<String>,

    /// Override: vertical sync
    #[arg(long)]
    pub vsync: Option<bool>,

    /// Override: keep the 4:3 aspect ratio
    #[arg(long)]
    pub maintain_aspect: Option<bool>,

    /// Override: internal render resolution multiplier
    #[arg(long)]
    pub render_scale: Option<String>,

    /// Override: LLE GPU emulation
    #[arg(long)]
    pub lle_gpu: Option<bool>,

    /// Override: debug logging (settings keys plus command-line flags)
    #[arg(long)]
    pub debug: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Strategy {
    /// Read-only loopback mount of the image
    Mount,
    /// Extraction into a scratch directory
    Extract,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match launch::execute(&cli) {
        Ok(code) => ExitCode::from(u8::try_from(code & 0xff).unwrap_or(1)),
        Err(err) => {
            tracing::error!("launch failed: {err:#}");
            ExitCode::FAILURE
        }
    }
}
