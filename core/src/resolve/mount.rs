//! Mount strategy: expose a packaged image through a read-only loopback
//! mount at a deterministic mount point.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::cleanup;
use crate::error::LaunchError;
use crate::ident::identifier_key;

use super::{RomKind, RomResolver, ResolvedPayload, TransientResource, classify, find_payload_top};

/// External tool that performs the loopback mount.
pub const MOUNT_TOOL: &str = "mount";

pub struct MountResolver {
    tool: PathBuf,
    scratch_root: PathBuf,
}

impl MountResolver {
    pub fn new(scratch_root: impl Into<PathBuf>) -> Self {
        Self::with_tool(MOUNT_TOOL, scratch_root)
    }

    /// Uses a specific mount tool (tests substitute a stub here).
    pub fn with_tool(tool: impl Into<PathBuf>, scratch_root: impl Into<PathBuf>) -> Self {
        Self {
            tool: tool.into(),
            scratch_root: scratch_root.into(),
        }
    }

    fn mount_image(&self, image: &Path, mount_point: &Path) -> Result<(), LaunchError> {
        tracing::info!("mounting {} at {}", image.display(), mount_point.display());
        let output = Command::new(&self.tool)
            .arg("-o")
            .arg("loop,ro")
            .arg(image)
            .arg(mount_point)
            .output()
            .map_err(|err| LaunchError::io(format!("invoking {}", self.tool.display()), err))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(LaunchError::Mount {
                image: image.to_path_buf(),
                mount_point: mount_point.to_path_buf(),
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

impl RomResolver for MountResolver {
    fn resolve(&self, rom: &Path) -> Result<ResolvedPayload, LaunchError> {
        if classify(rom)? == RomKind::Direct {
            return Ok(ResolvedPayload {
                exe: rom.to_path_buf(),
                resource: None,
            });
        }

        let mount_point = self.scratch_root.join(identifier_key(rom));
        if is_mount_point(&mount_point) {
            tracing::debug!("{} is already mounted, reusing", mount_point.display());
        } else {
            std::fs::create_dir_all(&mount_point).map_err(|err| {
                LaunchError::io(format!("creating mount point {}", mount_point.display()), err)
            })?;
            if let Err(err) = self.mount_image(rom, &mount_point) {
                // Nothing got mounted; don't leave the empty directory under
                // the scratch root
                if let Err(rm) = std::fs::remove_dir(&mount_point) {
                    tracing::warn!(
                        "could not remove mount point {}: {rm}",
                        mount_point.display()
                    );
                }
                return Err(err);
            }
        }

        let resource = TransientResource::Mounted {
            mount_point: mount_point.clone(),
        };
        // Image filesystems are flat: the payload sits at the root, so the
        // search stops at the top level.
        let found = match find_payload_top(&mount_point) {
            Ok(found) => found,
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
                Err(LaunchError::PayloadNotFound { root: mount_point })
            }
        }
    }
}

/// A path is an active mount point when it sits on a different device than
/// its parent.
pub(crate) fn is_mount_point(path: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    let Ok(meta) = path.symlink_metadata() else {
        return false;
    };
    let Some(parent) = path.parent() else {
        return false;
    };
    let Ok(parent_meta) = parent.metadata() else {
        return false;
    };
    meta.dev() != parent_meta.dev()
}
