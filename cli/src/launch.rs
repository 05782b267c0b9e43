//! Launch construction: prerequisites, resolution, settings, environment,
//! argv -- in that order, each step blocking and fatal on failure.

use anyhow::Result;
use std::path::Path;

use cxbxl_core::cleanup::CleanupGuard;
use cxbxl_core::resolve::{ExtractResolver, MountResolver, ResolvedPayload, RomResolver};
use cxbxl_core::wine::Runner;
use cxbxl_core::{LaunchError, command, env as launch_env, paths, settings};

use crate::config::{LauncherConfig, merge_cli_overrides};
use crate::runner;
use crate::{Cli, Strategy};

/// Winetricks verbs Cxbx-Reloaded needs inside a fresh bottle.
const WINE_TRICKS: [&str; 4] = ["vcrun2015", "d3dx9", "d3dcompiler_43", "d3dcompiler_47"];

/// Build the launch and run it; returns the emulator's exit code.
pub fn execute(cli: &Cli) -> Result<i32> {
    println!("=== Launching {} ({}) ===", cli.rom.display(), cli.system);

    let wine = Runner::default_bottle("cxbx-r", Path::new(paths::BOTTLES_ROOT))?;
    wine.ensure_bottle()?;

    let cxbx_exe = paths::cxbx_exe();
    if !cxbx_exe.exists() {
        return Err(LaunchError::PrerequisiteMissing(format!(
            "Cxbx-Reloaded not found at {}. Run the install script first.",
            cxbx_exe.display()
        ))
        .into());
    }

    for verb in WINE_TRICKS {
        wine.install_trick(verb)?;
    }

    // Resolution runs first: it is the only step that creates filesystem
    // state, and the guard covers every later failure until the handoff.
    let resolver: Box<dyn RomResolver> = match cli.strategy {
        Strategy::Mount => Box::new(MountResolver::new(paths::scratch_root())),
        Strategy::Extract => Box::new(ExtractResolver::new(paths::scratch_root())?),
    };
    let ResolvedPayload { exe, resource } = resolver.resolve(&cli.rom)?;
    let guard = CleanupGuard::new(resource);
    println!("  Payload: {}", exe.display());

    let options = merge_cli_overrides(LauncherConfig::load(&cli.options)?.options, cli);

    settings::configure(
        &paths::settings_file(),
        &options,
        cli.resolution,
        Path::new(paths::LOG_DIR),
    )?;

    let env = launch_env::assemble(&wine, &cli.controllers, Path::new(paths::PRIME_MARKER));
    let cmd = command::synthesize(
        &wine,
        &cxbx_exe,
        &exe,
        &options,
        Path::new(paths::LOG_DIR),
        env,
    );

    runner::run(cmd, guard)
}
