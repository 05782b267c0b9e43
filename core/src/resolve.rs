//! ROM-to-executable resolution.
//!
//! A ROM is either a loose `.xbe` (directly launchable, no side effects) or
//! a packaged `.iso` whose payload has to be exposed first. The two ways of
//! exposing an image -- loopback mount and extraction -- implement the same
//! [`RomResolver`] contract; a deployment picks exactly one at startup, it
//! is never a runtime branch inside the resolution path.
//!
//! Scratch locations are a pure function of the ROM path (see
//! [`crate::ident`]), so repeated launches of one ROM reuse the same spot.
//! Two *concurrent* launches of the same ROM therefore race on that spot;
//! there is no lock around mount or extraction.

use std::path::{Path, PathBuf};

use crate::error::LaunchError;

pub(crate) mod extract;
pub(crate) mod mount;

pub use extract::ExtractResolver;
pub use mount::MountResolver;

/// Extension of a directly launchable payload.
pub const DIRECT_EXTENSION: &str = "xbe";

/// Extension of a packaged disk image.
pub const IMAGE_EXTENSION: &str = "iso";

/// Conventional name of the bootable payload inside an image.
pub const DEFAULT_XBE: &str = "default.xbe";

/// Filesystem state created to expose an image's payload for one launch.
/// Owned by the launch lifecycle; released exactly once, after the emulator
/// terminates (or at resolution time when the launch never gets that far).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransientResource {
    Mounted { mount_point: PathBuf },
    Extracted { dir: PathBuf },
}

/// Result of resolution: a launchable executable plus whatever transient
/// state was created to expose it.
#[derive(Debug)]
pub struct ResolvedPayload {
    pub exe: PathBuf,
    pub resource: Option<TransientResource>,
}

pub trait RomResolver {
    fn resolve(&self, rom: &Path) -> Result<ResolvedPayload, LaunchError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RomKind {
    Direct,
    Image,
}

/// Extension dispatch, case-insensitive.
pub(crate) fn classify(rom: &Path) -> Result<RomKind, LaunchError> {
    let extension = rom
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        DIRECT_EXTENSION => Ok(RomKind::Direct),
        IMAGE_EXTENSION => Ok(RomKind::Image),
        _ => Err(LaunchError::UnsupportedFormat {
            path: rom.to_path_buf(),
            extension,
        }),
    }
}

/// Case-insensitive search for [`DEFAULT_XBE`] at the top level of `root`.
pub(crate) fn find_payload_top(root: &Path) -> Result<Option<PathBuf>, LaunchError> {
    let entries = std::fs::read_dir(root)
        .map_err(|err| LaunchError::io(format!("reading {}", root.display()), err))?;
    for entry in entries {
        let entry =
            entry.map_err(|err| LaunchError::io(format!("reading {}", root.display()), err))?;
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if is_file && entry.file_name().to_string_lossy().eq_ignore_ascii_case(DEFAULT_XBE) {
            return Ok(Some(entry.path()));
        }
    }
    Ok(None)
}
