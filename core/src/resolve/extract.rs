//! Extract strategy: unpack a packaged image into a deterministic scratch
//! directory with `extract-xiso`.
//!
//! Extraction re-runs on every launch. A ROM replaced in place at the same
//! path lands in the same directory and overwrites the previous contents;
//! nothing verifies that leftovers from an earlier image are gone first.

use std::path::{Path, PathBuf};
use std::process::Command;
use walkdir::WalkDir;

use crate::cleanup;
use crate::error::LaunchError;
use crate::ident::identifier_key;

use super::{
    DEFAULT_XBE, RomKind, RomResolver, ResolvedPayload, TransientResource, classify,
    find_payload_top,
};

/// External tool that unpacks Xbox disk images.
pub const EXTRACT_TOOL: &str = "extract-xiso";

pub struct ExtractResolver {
    tool: PathBuf,
    scratch_root: PathBuf,
}

impl ExtractResolver {
    /// Discovers `extract-xiso` on PATH.
    pub fn new(scratch_root: impl Into<PathBuf>) -> Result<Self, LaunchError> {
        let tool = which::which(EXTRACT_TOOL).map_err(|_| {
            LaunchError::PrerequisiteMissing(format!(
                "{EXTRACT_TOOL} not found on PATH. Run the install script first."
            ))
        })?;
        Ok(Self::with_tool(tool, scratch_root))
    }

    /// Uses a specific extraction tool (tests substitute a stub here).
    pub fn with_tool(tool: impl Into<PathBuf>, scratch_root: impl Into<PathBuf>) -> Self {
        Self {
            tool: tool.into(),
            scratch_root: scratch_root.into(),
        }
    }

    fn extract(&self, image: &Path, dir: &Path) -> Result<(), LaunchError> {
        tracing::info!("extracting {} into {}", image.display(), dir.display());
        let output = Command::new(&self.tool)
            .arg("-d")
            .arg(dir)
            .arg("-x")
            .arg(image)
            .output()
            .map_err(|err| {
                LaunchError::io(format!("invoking {}", self.tool.display()), err)
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(LaunchError::Extraction {
                image: image.to_path_buf(),
                dir: dir.to_path_buf(),
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

impl RomResolver for ExtractResolver {
    fn resolve(&self, rom: &Path) -> Result<ResolvedPayload, LaunchError> {
        if classify(rom)? == RomKind::Direct {
            return Ok(ResolvedPayload {
                exe: rom.to_path_buf(),
                resource: None,
            });
        }

        let dir = self.scratch_root.join(identifier_key(rom));
        std::fs::create_dir_all(&dir).map_err(|err| {
            LaunchError::io(format!("creating extraction directory {}", dir.display()), err)
        })?;

        let resource = TransientResource::Extracted { dir: dir.clone() };
        if let Err(err) = self.extract(rom, &dir) {
            cleanup::release(&resource);
            return Err(err);
        }

        let found = match find_payload_top(&dir) {
            Ok(top) => top.or_else(|| find_payload_recursive(&dir)),
            Err(err) => {
                cleanup::release(&resource);
                return Err(err);
            }
        };
        match found {
            Some(exe) => Ok(ResolvedPayload {
                exe,
                resource: Some(resource),
            }),
            None => {
                cleanup::release(&resource);
                Err(LaunchError::PayloadNotFound { root: dir })
            }
        }
    }
}

/// Some images bury the payload below the root; fall back to a full tree
/// walk once the top level came up empty.
fn find_payload_recursive(root: &Path) -> Option<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .find(|entry| {
            entry.file_type().is_file()
                && entry
                    .file_name()
                    .to_string_lossy()
                    .eq_ignore_ascii_case(DEFAULT_XBE)
        })
        .map(|entry| entry.path().to_path_buf())
}
