//! Launcher options file.
//!
//! An optional TOML file carrying the persistent per-system options; CLI
//! flags override individual entries per launch.

use anyhow::{Context, Result};
use cxbxl_core::options::LaunchOptions;
use serde::Deserialize;
use std::path::Path;

use crate::Cli;

/// Options file structure.
///
/// ```toml
/// [options]
/// fullscreen = true
/// resolution = "1280x720"
/// debug = false
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    pub options: LaunchOptions,
}

impl LauncherConfig {
    /// Load from file; a missing file means defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read options file: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse from string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse options file")
    }
}

/// Merge CLI flag overrides into the file-sourced options. A flag that was
/// not given leaves the file value (or unset) in place.
pub fn merge_cli_overrides(mut options: LaunchOptions, cli: &Cli) -> LaunchOptions {
    if cli.fullscreen.is_some() {
        options.fullscreen = cli.fullscreen;
    }
    if cli.video_resolution.is_some() {
        options.resolution = cli.video_resolution.clone();
    }
    if cli.vsync.is_some() {
        options.vsync = cli.vsync;
    }
    if cli.maintain_aspect.is_some() {
        options.maintain_aspect = cli.maintain_aspect;
    }
    if cli.render_scale.is_some() {
        options.render_scale = cli.render_scale.clone();
    }
    if cli.lle_gpu.is_some() {
        options.lle_gpu = cli.lle_gpu;
    }
    if cli.debug.is_some() {
        options.debug = cli.debug;
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_means_everything_unset() {
        let config = LauncherConfig::parse("").unwrap();
        assert!(config.options.fullscreen.is_none());
        assert!(config.options.resolution.is_none());
        assert!(config.options.debug.is_none());
    }

    #[test]
    fn test_parses_options_section() {
        let config = LauncherConfig::parse(
            r#"
[options]
fullscreen = false
resolution = "1280x720"
render_scale = "2"
debug = true
"#,
        )
        .unwrap();

        assert_eq!(config.options.fullscreen, Some(false));
        assert_eq!(config.options.resolution.as_deref(), Some("1280x720"));
        assert_eq!(config.options.render_scale.as_deref(), Some("2"));
        assert_eq!(config.options.debug, Some(true));
        assert!(config.options.vsync.is_none());
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let config = LauncherConfig::load(Path::new("/no/such/options.toml")).unwrap();
        assert!(config.options.fullscreen.is_none());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(LauncherConfig::parse("[options\nbroken").is_err());
    }

    fn parse_cli(args: &[&str]) -> Cli {
        use clap::Parser;
        let mut argv = vec!["cxbxl", "--rom", "/roms/xbox/halo.iso"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_cli_flags_override_file_values() {
        let cli = parse_cli(&[
            "--video-resolution",
            "640x480",
            "--debug",
            "true",
            "--fullscreen",
            "false",
        ]);
        let file = LauncherConfig::parse(
            r#"
[options]
fullscreen = true
resolution = "1280x720"
vsync = true
"#,
        )
        .unwrap();

        let merged = merge_cli_overrides(file.options, &cli);

        assert_eq!(merged.resolution.as_deref(), Some("640x480"));
        assert_eq!(merged.debug, Some(true));
        assert_eq!(merged.fullscreen, Some(false));
        assert_eq!(merged.vsync, Some(true));
    }

    #[test]
    fn test_absent_flags_leave_file_values() {
        let cli = parse_cli(&[]);
        let file = LauncherConfig::parse(
            r#"
[options]
resolution = "1280x720"
lle_gpu = true
"#,
        )
        .unwrap();

        let merged = merge_cli_overrides(file.options, &cli);

        assert_eq!(merged.resolution.as_deref(), Some("1280x720"));
        assert_eq!(merged.lle_gpu, Some(true));
        assert!(merged.render_scale.is_none());
    }
}
