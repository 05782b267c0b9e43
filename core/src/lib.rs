//! Launch construction for Cxbx-Reloaded under Wine.
//!
//! This crate turns a requested ROM plus launch options into everything a
//! process runner needs to start the emulator:
//!
//! - [`resolve`] exposes a packaged `.iso` as a runnable `default.xbe`
//!   (loopback mount or extraction into a deterministic scratch directory),
//! - [`settings`] merges the per-launch options into Cxbx-Reloaded's
//!   `settings.ini` without disturbing keys it does not govern,
//! - [`env`] builds the explicit child environment (Wine bottle contract,
//!   controller mapping, PRIME render-offload remediation),
//! - [`command`] assembles the final argv in Wine path syntax,
//! - [`cleanup`] guarantees that any mount point or extraction directory is
//!   torn down once the emulator has exited.
//!
//! Everything here is synchronous and single-threaded; the launch is a
//! strict sequence of blocking steps. Linux only: mount handling relies on
//! device-number probing and the external `mount`/`umount` tools.

pub mod cleanup;
pub mod command;
pub mod controller;
pub mod env;
pub mod error;
pub mod ident;
pub mod options;
pub mod paths;
pub mod resolve;
pub mod settings;
pub mod wine;

pub use error::LaunchError;
pub use resolve::{ResolvedPayload, RomResolver, TransientResource};
