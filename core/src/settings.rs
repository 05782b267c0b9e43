//! settings.ini merger.
//!
//! Cxbx-Reloaded reads a case-sensitive INI settings store. On every launch
//! the file is parsed, the governed keys are rewritten (override-or-default,
//! never "leave whatever was there"), and the whole document is written
//! back. Sections and keys this launcher does not govern survive the round
//! trip untouched -- users tune `[hack]` and `[overlay]` by hand.

use ini::{Ini, Properties};
use std::path::Path;

use crate::error::LaunchError;
use crate::options::{LaunchOptions, Resolution};

/// Sections guaranteed to exist after every `configure` call.
pub const GOVERNED_SECTIONS: [&str; 5] = ["gui", "core", "video", "audio", "input-general"];

/// GUI-facing debug log file name, relative to the log directory.
pub const GUI_DEBUG_LOG: &str = "cxbx-debug.log";

/// Kernel-facing debug log file name, relative to the log directory.
pub const KRNL_DEBUG_LOG: &str = "cxbx-kernel.log";

/// Default settings written when the store does not exist yet. Matches the
/// skeleton Cxbx-Reloaded itself generates on first run.
const DEFAULT_SETTINGS: &str = "\
[gui]
CxbxDebugMode = 0x0
CxbxDebugLogFile =
DataStorageToggle = 0x1
DataCustomLocation =
IgnoreInvalidXbeSig = false
IgnoreInvalidXbeSec = false
ConsoleTypeToggle = 0x0

[core]
Revision = 9
FlagsLLE = 0x0
KrnlDebugMode = 0x0
KrnlDebugLogFile =
AllowAdminPrivilege = false
LogLevel = 1
LogPopupTestCase = false

[video]
VideoResolution =
adapter = 0x0
Direct3DDevice = 0x0
VSync = false
FullScreen = true
MaintainAspect = true
RenderResolution = 1

[audio]
adapter = 00000000 0000 0000 0000 000000000000
PCM = true
XADPCM = true
UnknownCodec = true
MuteOnUnfocus = true

[input-general]
MouseAxisRange = 10
MouseWheelRange = 80
IgnoreKbMoUnfocus = true

[overlay]
Build Hash = false
FPS = false
HLE/LLE Stats = false
Title Name = false
File Name = false

[hack]
DisablePixelShaders = false
UseAllCores = false
SkipRdtscPatching = false
";

/// Merge the launch options into the settings store at `path`.
///
/// Idempotent: calling twice with the same inputs leaves byte-identical
/// file content. A present but unparsable file is fatal
/// ([`LaunchError::ConfigParse`]).
pub fn configure(
    path: &Path,
    options: &LaunchOptions,
    resolution: Resolution,
    log_dir: &Path,
) -> Result<(), LaunchError> {
    if !path.exists() {
        tracing::info!("creating default settings file at {}", path.display());
        write_default(path)?;
    }

    let mut doc = Ini::load_from_file(path).map_err(|err| match err {
        ini::Error::Io(source) => {
            LaunchError::io(format!("reading settings file {}", path.display()), source)
        }
        ini::Error::Parse(parse) => LaunchError::ConfigParse {
            path: path.to_path_buf(),
            detail: parse.to_string(),
        },
    })?;

    for section in GOVERNED_SECTIONS {
        doc.entry(Some(section.to_owned()))
            .or_insert_with(Properties::new);
    }

    let video_resolution = options
        .resolution
        .clone()
        .unwrap_or_else(|| resolution.to_string());

    doc.with_section(Some("video"))
        .set("FullScreen", bool_str(options.fullscreen.unwrap_or(true)))
        .set("VideoResolution", video_resolution)
        .set("VSync", bool_str(options.vsync.unwrap_or(false)))
        .set(
            "MaintainAspect",
            bool_str(options.maintain_aspect.unwrap_or(true)),
        );

    if let Some(scale) = &options.render_scale {
        doc.with_section(Some("video"))
            .set("RenderResolution", scale.clone());
    }

    if let Some(lle) = options.lle_gpu {
        doc.with_section(Some("core"))
            .set("FlagsLLE", if lle { "0x1" } else { "0x0" });
    }

    // Both the GUI-facing and the kernel-facing flag follow the one option,
    // and stale log paths from an earlier debug run are always cleared.
    let debug = options.debug_enabled();
    let flag = if debug { "0x1" } else { "0x0" };
    let (gui_log, krnl_log) = if debug {
        (
            log_dir.join(GUI_DEBUG_LOG).display().to_string(),
            log_dir.join(KRNL_DEBUG_LOG).display().to_string(),
        )
    } else {
        (String::new(), String::new())
    };

    doc.with_section(Some("gui"))
        .set("CxbxDebugMode", flag)
        .set("CxbxDebugLogFile", gui_log);
    doc.with_section(Some("core"))
        .set("KrnlDebugMode", flag)
        .set("KrnlDebugLogFile", krnl_log);

    doc.write_to_file(path)
        .map_err(|err| LaunchError::io(format!("writing settings file {}", path.display()), err))?;

    tracing::debug!("settings configured at {}", path.display());
    Ok(())
}

fn write_default(path: &Path) -> Result<(), LaunchError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|err| LaunchError::io(format!("creating {}", parent.display()), err))?;
    }
    std::fs::write(path, DEFAULT_SETTINGS)
        .map_err(|err| LaunchError::io(format!("writing {}", path.display()), err))
}

fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const RESOLUTION: Resolution = Resolution {
        width: 1920,
        height: 1080,
    };

    fn settings_path(dir: &TempDir) -> std::path::PathBuf {
        dir.path().join("app/settings.ini")
    }

    fn log_dir() -> &'static Path {
        Path::new("/userdata/system/logs")
    }

    #[test]
    fn test_creates_default_skeleton_when_missing() {
        let dir = TempDir::new().unwrap();
        let path = settings_path(&dir);

        configure(&path, &LaunchOptions::default(), RESOLUTION, log_dir()).unwrap();

        let doc = Ini::load_from_file(&path).unwrap();
        for section in GOVERNED_SECTIONS {
            assert!(doc.section(Some(section)).is_some(), "missing [{section}]");
        }
        // Template keys outside the governed set survive
        assert_eq!(doc.get_from(Some("core"), "Revision"), Some("9"));
        assert_eq!(doc.get_from(Some("overlay"), "FPS"), Some("false"));
        assert_eq!(
            doc.get_from(Some("hack"), "DisablePixelShaders"),
            Some("false")
        );
    }

    #[test]
    fn test_defaults_applied_when_options_unset() {
        let dir = TempDir::new().unwrap();
        let path = settings_path(&dir);

        configure(&path, &LaunchOptions::default(), RESOLUTION, log_dir()).unwrap();

        let doc = Ini::load_from_file(&path).unwrap();
        assert_eq!(doc.get_from(Some("video"), "FullScreen"), Some("true"));
        assert_eq!(
            doc.get_from(Some("video"), "VideoResolution"),
            Some("1920x1080")
        );
        assert_eq!(doc.get_from(Some("video"), "VSync"), Some("false"));
        assert_eq!(doc.get_from(Some("video"), "MaintainAspect"), Some("true"));
        assert_eq!(doc.get_from(Some("gui"), "CxbxDebugMode"), Some("0x0"));
        assert_eq!(doc.get_from(Some("core"), "KrnlDebugMode"), Some("0x0"));
        assert_eq!(doc.get_from(Some("gui"), "CxbxDebugLogFile"), Some(""));
        assert_eq!(doc.get_from(Some("core"), "KrnlDebugLogFile"), Some(""));
    }

    #[test]
    fn test_explicit_options_override_defaults() {
        let dir = TempDir::new().unwrap();
        let path = settings_path(&dir);

        let options = LaunchOptions {
            fullscreen: Some(false),
            resolution: Some("640x480".to_string()),
            vsync: Some(true),
            render_scale: Some("2".to_string()),
            lle_gpu: Some(true),
            ..LaunchOptions::default()
        };
        configure(&path, &options, RESOLUTION, log_dir()).unwrap();

        let doc = Ini::load_from_file(&path).unwrap();
        assert_eq!(doc.get_from(Some("video"), "FullScreen"), Some("false"));
        assert_eq!(
            doc.get_from(Some("video"), "VideoResolution"),
            Some("640x480")
        );
        assert_eq!(doc.get_from(Some("video"), "VSync"), Some("true"));
        assert_eq!(doc.get_from(Some("video"), "RenderResolution"), Some("2"));
        assert_eq!(doc.get_from(Some("core"), "FlagsLLE"), Some("0x1"));
    }

    #[test]
    fn test_configure_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = settings_path(&dir);
        let options = LaunchOptions {
            debug: Some(true),
            ..LaunchOptions::default()
        };

        configure(&path, &options, RESOLUTION, log_dir()).unwrap();
        let first = std::fs::read(&path).unwrap();
        configure(&path, &options, RESOLUTION, log_dir()).unwrap();
        let second = std::fs::read(&path).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_preserves_unmanaged_sections_and_keys() {
        let dir = TempDir::new().unwrap();
        let path = settings_path(&dir);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            "[video]\nadapter = 0x2\n\n[custom]\nkeep = me\n",
        )
        .unwrap();

        configure(&path, &LaunchOptions::default(), RESOLUTION, log_dir()).unwrap();

        let doc = Ini::load_from_file(&path).unwrap();
        assert_eq!(doc.get_from(Some("custom"), "keep"), Some("me"));
        assert_eq!(doc.get_from(Some("video"), "adapter"), Some("0x2"));
        // Governed sections were created around the pre-existing content
        for section in GOVERNED_SECTIONS {
            assert!(doc.section(Some(section)).is_some(), "missing [{section}]");
        }
    }

    #[test]
    fn test_debug_sets_both_flags_and_log_paths() {
        let dir = TempDir::new().unwrap();
        let path = settings_path(&dir);
        let options = LaunchOptions {
            debug: Some(true),
            ..LaunchOptions::default()
        };

        configure(&path, &options, RESOLUTION, log_dir()).unwrap();

        let doc = Ini::load_from_file(&path).unwrap();
        assert_eq!(doc.get_from(Some("gui"), "CxbxDebugMode"), Some("0x1"));
        assert_eq!(doc.get_from(Some("core"), "KrnlDebugMode"), Some("0x1"));
        assert_eq!(
            doc.get_from(Some("gui"), "CxbxDebugLogFile"),
            Some("/userdata/system/logs/cxbx-debug.log")
        );
        assert_eq!(
            doc.get_from(Some("core"), "KrnlDebugLogFile"),
            Some("/userdata/system/logs/cxbx-kernel.log")
        );
    }

    #[test]
    fn test_disabling_debug_clears_stale_log_paths() {
        let dir = TempDir::new().unwrap();
        let path = settings_path(&dir);

        let debug_on = LaunchOptions {
            debug: Some(true),
            ..LaunchOptions::default()
        };
        configure(&path, &debug_on, RESOLUTION, log_dir()).unwrap();

        configure(&path, &LaunchOptions::default(), RESOLUTION, log_dir()).unwrap();

        let doc = Ini::load_from_file(&path).unwrap();
        assert_eq!(doc.get_from(Some("gui"), "CxbxDebugMode"), Some("0x0"));
        assert_eq!(doc.get_from(Some("core"), "KrnlDebugMode"), Some("0x0"));
        assert_eq!(doc.get_from(Some("gui"), "CxbxDebugLogFile"), Some(""));
        assert_eq!(doc.get_from(Some("core"), "KrnlDebugLogFile"), Some(""));
    }

    #[test]
    fn test_corrupt_settings_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = settings_path(&dir);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[broken\nno section terminator").unwrap();

        let err =
            configure(&path, &LaunchOptions::default(), RESOLUTION, log_dir()).unwrap_err();
        assert!(matches!(err, LaunchError::ConfigParse { .. }));
    }
}
