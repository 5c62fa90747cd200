use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::write::FileOptions;

use crate::error::{DocError, Result};

/// Entry name for a file below `root`: relative, `/`-separated.
fn entry_name(path: &Path, root: &Path) -> Result<String> {
    let rel = path
        .strip_prefix(root)
        .map_err(|e| io::Error::other(format!("{}: {e}", path.display())))?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}

fn zip_err(e: zip::result::ZipError) -> DocError {
    match e {
        zip::result::ZipError::Io(io) => DocError::Io(io),
        other => DocError::Io(io::Error::other(other)),
    }
}

/// Write every file under `root` into a new deflated zip at `out`.
///
/// The archive is assembled in a temporary file next to `out` and moved into
/// place only once complete, so `out` is never left half-written.
pub fn repack(root: &Path, out: &Path) -> Result<usize> {
    let mut files: Vec<(String, PathBuf)> = Vec::new();
    for e in WalkDir::new(root).follow_links(false) {
        let e = e.map_err(io::Error::other)?;
        if e.file_type().is_file() {
            files.push((entry_name(e.path(), root)?, e.path().to_path_buf()));
        }
        // (symlinks are not part of a package)
    }
    files.sort();

    let parent = match out.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent)?;
    let mut builder = tempfile::Builder::new();
    builder.prefix(".docslim-").suffix(".tmp");
    // Created like a plain file: 0666 filtered by the process umask.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let tmp = builder.tempfile_in(&parent)?;

    let opts = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zw = zip::ZipWriter::new(tmp.reopen()?);
    for (name, path) in &files {
        zw.start_file(name.as_str(), opts).map_err(zip_err)?;
        let mut src = File::open(path)?;
        io::copy(&mut src, &mut zw)?;
    }
    let mut written = zw.finish().map_err(zip_err)?;
    written.flush()?;
    drop(written);

    tmp.persist(out).map_err(|e| DocError::Io(e.error))?;
    debug!(out = %out.display(), entries = files.len(), "package repacked");
    Ok(files.len())
}
