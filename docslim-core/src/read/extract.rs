use std::fs::{self, File};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{DocError, Result};

fn corrupt(archive: &Path, e: impl std::fmt::Display) -> DocError {
    DocError::CorruptArchive {
        path: archive.to_path_buf(),
        reason: e.to_string(),
    }
}

/// Extract every entry of a zip package into `dest`, preserving relative paths.
///
/// Returns the number of files written. Entries whose names would escape
/// `dest` are skipped.
pub fn unpack(archive: &Path, dest: &Path) -> Result<usize> {
    let f = File::open(archive)?;
    let mut zip = zip::ZipArchive::new(f).map_err(|e| corrupt(archive, e))?;

    let mut files = 0usize;
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).map_err(|e| corrupt(archive, e))?;

        let rel: PathBuf = match entry.enclosed_name() {
            Some(p) => p.to_path_buf(),
            None => {
                warn!(name = entry.name(), "skipping entry with unsafe path");
                continue;
            }
        };
        let outp = dest.join(&rel);

        if entry.is_dir() {
            fs::create_dir_all(&outp)?;
            continue;
        }
        if let Some(parent) = outp.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&outp)?;
        // A checksum or inflate failure surfaces as an io::Error from the entry reader.
        std::io::copy(&mut entry, &mut out).map_err(|e| corrupt(archive, e))?;
        files += 1;
    }

    debug!(archive = %archive.display(), files, "package unpacked");
    Ok(files)
}
