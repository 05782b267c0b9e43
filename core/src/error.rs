//! Launch failure kinds.
//!
//! None of these are retried; each one aborts the launch and propagates to
//! the CLI as a single failure. Cleanup failures are deliberately *not*
//! represented here -- teardown logs and swallows its own errors (see
//! [`crate::cleanup`]).

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    /// ROM extension is neither `.iso` nor `.xbe`
    #[error("unsupported ROM format {extension:?}: {}", path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// A required external tool or runtime is not installed
    #[error("{0}")]
    PrerequisiteMissing(String),

    /// The loopback mount tool failed
    #[error("mounting {} at {} failed: {detail}", image.display(), mount_point.display())]
    Mount {
        image: PathBuf,
        mount_point: PathBuf,
        detail: String,
    },

    /// The image extraction tool failed
    #[error("extracting {} into {} failed: {detail}", image.display(), dir.display())]
    Extraction {
        image: PathBuf,
        dir: PathBuf,
        detail: String,
    },

    /// The mounted/extracted image contains no recognizable executable
    #[error("no {} found under {}", crate::resolve::DEFAULT_XBE, root.display())]
    PayloadNotFound { root: PathBuf },

    /// settings.ini exists but cannot be parsed. Regenerating defaults here
    /// would silently discard user customization of ungoverned keys, so the
    /// launch fails instead.
    #[error("settings file {} is corrupt: {detail}", path.display())]
    ConfigParse { path: PathBuf, detail: String },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl LaunchError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}
