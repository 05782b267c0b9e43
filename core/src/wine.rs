//! Wine runner boundary: a named bottle plus the process contract for
//! running Windows executables inside it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::LaunchError;

/// Per-bottle record of winetricks verbs that already completed, one per
/// line. Winetricks runs are slow, so a recorded verb is never re-run.
const TRICKS_LEDGER: &str = ".winetricks-installed";

pub struct Runner {
    pub wine: PathBuf,
    pub bottle_dir: PathBuf,
}

impl Runner {
    /// Locate the wine binary and derive the bottle directory for `name`.
    pub fn default_bottle(name: &str, bottles_root: &Path) -> Result<Self, LaunchError> {
        let wine = which::which("wine").map_err(|_| {
            LaunchError::PrerequisiteMissing(
                "wine not found on PATH. Run the install script first.".to_string(),
            )
        })?;
        Ok(Self {
            wine,
            bottle_dir: bottles_root.join(name),
        })
    }

    pub fn ensure_bottle(&self) -> Result<(), LaunchError> {
        std::fs::create_dir_all(&self.bottle_dir).map_err(|err| {
            LaunchError::io(format!("creating bottle {}", self.bottle_dir.display()), err)
        })
    }

    /// Environment contract for processes run inside this bottle. Cxbx is a
    /// 32-bit application, so the bottle is pinned to win32.
    pub fn environment(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (
                "WINEPREFIX".to_string(),
                self.bottle_dir.display().to_string(),
            ),
            ("WINEARCH".to_string(), "win32".to_string()),
            ("WINEDEBUG".to_string(), "-all".to_string()),
        ])
    }

    /// Install a winetricks verb into the bottle, unless the ledger already
    /// records it. A verb that fails to install is fatal: the emulator needs
    /// its runtimes in place before it starts.
    pub fn install_trick(&self, verb: &str) -> Result<(), LaunchError> {
        if self.trick_installed(verb)? {
            tracing::debug!("winetricks verb {verb} already installed, skipping");
            return Ok(());
        }
        let winetricks = which::which("winetricks").map_err(|_| {
            LaunchError::PrerequisiteMissing(
                "winetricks not found on PATH. Run the install script first.".to_string(),
            )
        })?;
        self.run_winetricks(&winetricks, verb)
    }

    fn trick_installed(&self, verb: &str) -> Result<bool, LaunchError> {
        let ledger = self.bottle_dir.join(TRICKS_LEDGER);
        match std::fs::read_to_string(&ledger) {
            Ok(recorded) => Ok(recorded.lines().any(|line| line == verb)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(LaunchError::io(format!("reading {}", ledger.display()), err)),
        }
    }

    fn run_winetricks(&self, winetricks: &Path, verb: &str) -> Result<(), LaunchError> {
        tracing::info!("installing winetricks verb {verb}");
        let output = Command::new(winetricks)
            .arg("--unattended")
            .arg(verb)
            .env("WINEPREFIX", &self.bottle_dir)
            .env("WINEARCH", "win32")
            .output()
            .map_err(|err| LaunchError::io("invoking winetricks", err))?;

        if !output.status.success() {
            return Err(LaunchError::PrerequisiteMissing(format!(
                "winetricks {verb} failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let ledger = self.bottle_dir.join(TRICKS_LEDGER);
        let mut recorded = match std::fs::read_to_string(&ledger) {
            Ok(recorded) => recorded,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(err) => {
                return Err(LaunchError::io(format!("reading {}", ledger.display()), err));
            }
        };
        recorded.push_str(verb);
        recorded.push('\n');
        std::fs::write(&ledger, recorded)
            .map_err(|err| LaunchError::io(format!("writing {}", ledger.display()), err))
    }
}
