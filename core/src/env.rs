//! Child process environment assembly.
//!
//! The environment is an explicit map handed to the spawn call; the
//! launcher's own environment is never mutated. Layering order: inherited
//! process environment, then the Wine bottle contract, then the controller
//! overlay, then the PRIME remediation.

use std::collections::BTreeMap;
use std::path::Path;

use crate::controller::{Controller, sdl_game_controller_config};
use crate::wine::Runner;

/// Inherited variables that force GPU render-offload. Wine's Vulkan loader
/// cannot drive Cxbx-Reloaded's renderer down the offload path, so on PRIME
/// hosts these are stripped and the loader is pointed straight at the
/// NVIDIA driver manifest.
pub const PRIME_OFFLOAD_VARS: [&str; 3] = [
    "__NV_PRIME_RENDER_OFFLOAD",
    "__VK_LAYER_NV_optimus",
    "__GLX_VENDOR_LIBRARY_NAME",
];

pub const NVIDIA_ICD: &str = "/usr/share/vulkan/icd.d/nvidia_icd.x86_64.json";
pub const VULKAN_LAYER_DIR: &str = "/usr/share/vulkan/explicit_layer.d";

/// Build the full child environment for this launch.
pub fn assemble(
    runner: &Runner,
    controllers: &[Controller],
    prime_marker: &Path,
) -> BTreeMap<String, String> {
    let mut env: BTreeMap<String, String> = std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .collect();

    env.extend(runner.environment());

    env.insert(
        "SDL_GAMECONTROLLERCONFIG".to_string(),
        sdl_game_controller_config(controllers),
    );
    // The hidapi backend fights Wine's own HID handling over the pads
    env.insert("SDL_JOYSTICK_HIDAPI".to_string(), "0".to_string());

    apply_prime_workaround(&mut env, prime_marker);
    env
}

/// Strip the render-offload variables and pin the Vulkan loader to the
/// NVIDIA driver when the host marker file is present.
pub fn apply_prime_workaround(env: &mut BTreeMap<String, String>, marker: &Path) {
    if !marker.exists() {
        return;
    }
    tracing::debug!("PRIME marker {} present, remapping Vulkan loader", marker.display());
    for var in PRIME_OFFLOAD_VARS {
        env.remove(var);
    }
    env.insert("VK_ICD_FILENAMES".to_string(), NVIDIA_ICD.to_string());
    env.insert("VK_LAYER_PATH".to_string(), VULKAN_LAYER_DIR.to_string());
}
