//! Final process invocation: argv ordering and Wine path translation.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::Path;

use crate::options::LaunchOptions;
use crate::settings::GUI_DEBUG_LOG;
use crate::wine::Runner;

/// Everything the process runner needs: an ordered argument vector and the
/// explicit child environment. Immutable once synthesized.
#[derive(Debug)]
pub struct LaunchCommand {
    pub argv: Vec<OsString>,
    pub env: BTreeMap<String, String>,
}

/// Express a native path the way programs inside the bottle expect it: the
/// `Z:` virtual drive maps the filesystem root.
pub fn wine_path(path: &Path) -> String {
    format!("Z:{}", path.display())
}

/// Assemble the argv in its fixed order:
/// `wine cxbx.exe /load Z:<payload> [/debug /debuglogfile Z:<log>]`.
///
/// When debug is on the flags go on the command line *in addition to* the
/// matching settings keys -- the loader reads its flags before the settings
/// file is parsed, so neither alone is enough.
pub fn synthesize(
    runner: &Runner,
    cxbx_exe: &Path,
    payload_exe: &Path,
    options: &LaunchOptions,
    log_dir: &Path,
    env: BTreeMap<String, String>,
) -> LaunchCommand {
    let mut argv: Vec<OsString> = vec![
        runner.wine.clone().into_os_string(),
        cxbx_exe.as_os_str().to_os_string(),
        OsString::from("/load"),
        OsString::from(wine_path(payload_exe)),
    ];

    if options.debug_enabled() {
        argv.push(OsString::from("/debug"));
        argv.push(OsString::from("/debuglogfile"));
        argv.push(OsString::from(wine_path(&log_dir.join(GUI_DEBUG_LOG))));
    }

    LaunchCommand { argv, env }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn runner() -> Runner {
        Runner {
            wine: PathBuf::from("/usr/bin/wine"),
            bottle_dir: PathBuf::from("/userdata/system/wine-bottles/cxbx-r"),
        }
    }

    fn cxbx() -> PathBuf {
        PathBuf::from("/userdata/system/xbox-extra/cxbx-r/app/cxbx.exe")
    }

    #[test]
    fn test_wine_path_prefixes_virtual_drive() {
        assert_eq!(
            wine_path(Path::new("/roms/xbox/halo.xbe")),
            "Z:/roms/xbox/halo.xbe"
        );
    }

    #[test]
    fn test_argv_order_without_debug() {
        let cmd = synthesize(
            &runner(),
            &cxbx(),
            Path::new("/scratch/halo-0a1b2c3d/default.xbe"),
            &LaunchOptions::default(),
            Path::new("/userdata/system/logs"),
            BTreeMap::new(),
        );

        let argv: Vec<String> = cmd
            .argv
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            argv,
            vec![
                "/usr/bin/wine",
                "/userdata/system/xbox-extra/cxbx-r/app/cxbx.exe",
                "/load",
                "Z:/scratch/halo-0a1b2c3d/default.xbe",
            ]
        );
    }

    #[test]
    fn test_debug_appends_flags_in_wine_path_syntax() {
        let options = LaunchOptions {
            debug: Some(true),
            ..LaunchOptions::default()
        };
        let cmd = synthesize(
            &runner(),
            &cxbx(),
            Path::new("/scratch/halo-0a1b2c3d/default.xbe"),
            &options,
            Path::new("/userdata/system/logs"),
            BTreeMap::new(),
        );

        let argv: Vec<String> = cmd
            .argv
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(argv[4], "/debug");
        assert_eq!(argv[5], "/debuglogfile");
        assert_eq!(argv[6], "Z:/userdata/system/logs/cxbx-debug.log");
    }

    #[test]
    fn test_debug_off_leaves_no_debug_flags() {
        let options = LaunchOptions {
            debug: Some(false),
            ..LaunchOptions::default()
        };
        let cmd = synthesize(
            &runner(),
            &cxbx(),
            Path::new("/roms/xbox/halo.xbe"),
            &options,
            Path::new("/userdata/system/logs"),
            BTreeMap::new(),
        );

        assert_eq!(cmd.argv.len(), 4);
        assert!(!cmd.argv.iter().any(|a| a == "/debug"));
    }
}
