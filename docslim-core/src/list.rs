use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::domain::MediaRow;
use crate::error::{DocError, Result};
use crate::layout::MEDIA_ENTRY_PREFIX;
use crate::media::classify::classify_bytes;

/// Classify every media entry of a package without extracting it.
pub fn list_media(archive: &Path) -> Result<Vec<MediaRow>> {
    let corrupt = |e: zip::result::ZipError| DocError::CorruptArchive {
        path: archive.to_path_buf(),
        reason: e.to_string(),
    };
    let mut zip = zip::ZipArchive::new(File::open(archive)?).map_err(corrupt)?;

    let mut rows = Vec::new();
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).map_err(corrupt)?;
        if entry.is_dir() || !entry.name().starts_with(MEDIA_ENTRY_PREFIX) {
            continue;
        }
        let path = entry.name().to_string();
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut bytes)?;
        let (class, dimensions) = classify_bytes(&path, &bytes);
        rows.push(MediaRow {
            path,
            size: bytes.len() as u64,
            dimensions,
            class,
        });
    }
    rows.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(rows)
}
