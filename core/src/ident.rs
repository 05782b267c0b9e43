//! Deterministic names for per-ROM scratch locations.

use std::path::Path;
use xxhash_rust::xxh3::xxh3_64;

/// Derive a stable, filesystem-safe name for a ROM's mount point or
/// extraction directory: the sanitized file stem plus eight hex characters
/// of the full path's hash.
///
/// Repeated launches of the same ROM land on the same location; ROMs with
/// the same stem at different paths get different names. Collisions within
/// the 32-bit hash suffix are accepted as negligible.
pub fn identifier_key(rom: &Path) -> String {
    let stem = rom
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("rom");

    let sanitized: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let hash = xxh3_64(rom.as_os_str().as_encoded_bytes());
    format!("{sanitized}-{:08x}", hash & 0xffff_ffff)
}
