//! Fixed filesystem locations for the batocera-style layout this launcher
//! runs inside. Components take paths as parameters; only the CLI wires
//! these constants in.

use std::path::{Path, PathBuf};

/// Root of the add-on Xbox data partition.
pub const XBOX_EXTRA: &str = "/userdata/system/xbox-extra";

/// Directory the emulator's log files are written to.
pub const LOG_DIR: &str = "/userdata/system/logs";

/// Parent directory of named Wine bottles.
pub const BOTTLES_ROOT: &str = "/userdata/system/wine-bottles";

/// Marker file whose existence signals an NVIDIA PRIME render-offload host.
pub const PRIME_MARKER: &str = "/var/tmp/nvidia.prime";

/// Cxbx-Reloaded application directory inside the Xbox data partition.
pub fn app_dir() -> PathBuf {
    Path::new(XBOX_EXTRA).join("cxbx-r/app")
}

pub fn cxbx_exe() -> PathBuf {
    app_dir().join("cxbx.exe")
}

pub fn settings_file() -> PathBuf {
    app_dir().join("settings.ini")
}

/// Root under which per-ROM mount points and extraction directories live.
pub fn scratch_root() -> PathBuf {
    Path::new(XBOX_EXTRA).join("scratch")
}
