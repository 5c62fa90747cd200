use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::layout::RELS_EXT;

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
}

/// Replace every occurrence of `from` that stands as a whole path token.
///
/// The character before a match must not continue a file name, and the one
/// after must neither continue a name nor descend into a directory. This keeps
/// `media/1.png` from matching inside `media/1.png.bak` or `xmedia/1.png`.
pub fn replace_reference(text: &str, from: &str, to: &str) -> (String, usize) {
    if from.is_empty() {
        return (text.to_string(), 0);
    }
    let mut out = String::with_capacity(text.len());
    let mut copied = 0usize;
    let mut count = 0usize;
    for (idx, _) in text.match_indices(from) {
        let end = idx + from.len();
        let before_ok = text[..idx].chars().next_back().is_none_or(|c| !is_name_char(c));
        let after_ok = text[end..]
            .chars()
            .next()
            .is_none_or(|c| !is_name_char(c) && c != '/');
        if before_ok && after_ok {
            out.push_str(&text[copied..idx]);
            out.push_str(to);
            copied = end;
            count += 1;
        }
    }
    out.push_str(&text[copied..]);
    (out, count)
}

/// Descriptor files (`*.rels`) directly inside `rels_dir`, sorted.
pub fn descriptor_files(rels_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in fs::read_dir(rels_dir)? {
        let path = entry?.path();
        let is_rels = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == RELS_EXT);
        if is_rels && path.is_file() {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

/// Substitutions computed in memory, not yet written.
#[derive(Debug, Default)]
pub struct PendingRewrite {
    edits: Vec<(PathBuf, String)>,
    replaced: usize,
}

impl PendingRewrite {
    /// Number of references that will be replaced.
    pub fn replaced(&self) -> usize {
        self.replaced
    }

    pub fn files(&self) -> usize {
        self.edits.len()
    }

    pub fn commit(self) -> Result<usize> {
        for (path, text) in &self.edits {
            fs::write(path, text)?;
        }
        Ok(self.replaced)
    }
}

/// Read every descriptor and compute its rewritten text. Nothing is written,
/// so a descriptor that fails to read leaves the package untouched.
pub fn prepare(rels_dir: &Path, from: &str, to: &str) -> Result<PendingRewrite> {
    let mut pending = PendingRewrite::default();
    for path in descriptor_files(rels_dir)? {
        let text = fs::read_to_string(&path)?;
        let (updated, n) = replace_reference(&text, from, to);
        if n > 0 {
            debug!(file = %path.display(), from, to, n, "descriptor references rewritten");
            pending.replaced += n;
            pending.edits.push((path, updated));
        }
    }
    Ok(pending)
}

/// Rewrite `from` to `to` in every descriptor under `rels_dir`, in place.
pub fn rewrite_all(rels_dir: &Path, from: &str, to: &str) -> Result<usize> {
    prepare(rels_dir, from, to)?.commit()
}
