// src/sensor/fingerprint.rs

use std::io::Read;
use std::path::Path;
use std::time::UNIX_EPOCH;

use anyhow::{Context, Result};
use blake3::Hasher;

use crate::fs::FileSystem;
use crate::sensor::item::Fingerprint;
use crate::types::FingerprintMode;

/// Compute the fingerprint of a single file according to `mode`.
pub fn compute_fingerprint(
    fs: &dyn FileSystem,
    path: &Path,
    mode: FingerprintMode,
) -> Result<Fingerprint> {
    match mode {
        FingerprintMode::Mtime => mtime_fingerprint(fs, path),
        FingerprintMode::Hash => compute_file_hash(fs, path).map(Fingerprint::new),
    }
}

/// Modification time as `<unix-seconds>.<nanoseconds>`, nanoseconds zero-padded.
///
/// The resolution is whatever the filesystem records; a second write inside
/// the same tick produces the same fingerprint.
fn mtime_fingerprint(fs: &dyn FileSystem, path: &Path) -> Result<Fingerprint> {
    let modified = fs.modified(path)?;
    let since_epoch = modified
        .duration_since(UNIX_EPOCH)
        .with_context(|| format!("modification time of {:?} predates the unix epoch", path))?;
    Ok(Fingerprint::new(format!(
        "{}.{:09}",
        since_epoch.as_secs(),
        since_epoch.subsec_nanos()
    )))
}

/// blake3 hex digest of a file's content.
pub fn compute_file_hash(fs: &dyn FileSystem, path: &Path) -> Result<String> {
    let mut hasher = Hasher::new();
    let mut file = fs
        .open_read(path)
        .with_context(|| format!("opening file for hashing: {:?}", path))?;
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize().to_hex().to_string())
}
