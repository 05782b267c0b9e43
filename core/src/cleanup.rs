//! Teardown of transient resources.
//!
//! Release never propagates errors: it runs while unwinding a primary
//! failure or after the emulator already exited, and a secondary error
//! there would mask the one that matters. Failures are logged and
//! swallowed. Release is idempotent -- a second call finds nothing mounted
//! and no directory to remove.

use std::process::Command;

use crate::resolve::TransientResource;
use crate::resolve::mount::is_mount_point;

/// Best-effort teardown of a mount point or extraction directory.
pub fn release(resource: &TransientResource) {
    match resource {
        TransientResource::Mounted { mount_point } => {
            if !is_mount_point(mount_point) {
                tracing::debug!("{} is not mounted, nothing to release", mount_point.display());
                return;
            }
            match Command::new("umount").arg(mount_point).output() {
                Ok(output) if output.status.success() => {
                    tracing::debug!("unmounted {}", mount_point.display());
                }
                Ok(output) => {
                    tracing::warn!(
                        "umount {} failed: {}",
                        mount_point.display(),
                        String::from_utf8_lossy(&output.stderr).trim()
                    );
                }
                Err(err) => {
                    tracing::warn!("could not invoke umount for {}: {err}", mount_point.display());
                }
            }
        }
        TransientResource::Extracted { dir } => {
            if !dir.exists() {
                tracing::debug!("{} already removed, nothing to release", dir.display());
                return;
            }
            if let Err(err) = std::fs::remove_dir_all(dir) {
                tracing::warn!("could not remove extraction directory {}: {err}", dir.display());
            } else {
                tracing::debug!("removed extraction directory {}", dir.display());
            }
        }
    }
}

/// Holds a launch's transient resource and guarantees release: explicitly
/// via [`CleanupGuard::release`] once the emulator has exited, or on drop
/// when launch construction unwinds before the handoff.
#[derive(Debug)]
pub struct CleanupGuard {
    resource: Option<TransientResource>,
}

impl CleanupGuard {
    pub fn new(resource: Option<TransientResource>) -> Self {
        Self { resource }
    }

    /// Release now, on the normal path after the wrapped process terminated.
    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if let Some(resource) = self.resource.take() {
            release(&resource);
        }
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        self.release_inner();
    }
}
