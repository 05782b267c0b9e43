//! Per-launch option view.
//!
//! Every field is tri-state: `None` means "not set by the user", and the
//! settings merger substitutes its own default instead of leaving the key
//! untouched. The CLI merges the options file with flag overrides before
//! anything here is consumed.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LaunchOptions {
    /// Run full-screen (default true)
    pub fullscreen: Option<bool>,
    /// Output resolution as `WIDTHxHEIGHT` (default: the display resolution)
    pub resolution: Option<String>,
    /// Vertical sync (default false)
    pub vsync: Option<bool>,
    /// Keep the 4:3 aspect ratio (default true)
    pub maintain_aspect: Option<bool>,
    /// Internal render resolution multiplier (written only when set)
    pub render_scale: Option<String>,
    /// LLE GPU emulation (written only when set)
    pub lle_gpu: Option<bool>,
    /// Debug logging, both in settings.ini and on the command line
    pub debug: Option<bool>,
}

impl LaunchOptions {
    pub fn debug_enabled(&self) -> bool {
        self.debug.unwrap_or(false)
    }
}

/// Display resolution handed in by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
        let width = w.parse().map_err(|_| format!("invalid width {w:?}"))?;
        let height = h.parse().map_err(|_| format!("invalid height {h:?}"))?;
        Ok(Self { width, height })
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
