use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::Result;

/// `xml` with a `<Default>` declaration for `ext` added, or `None` when one
/// already exists or there is no `</Types>` to insert before.
pub fn with_default_extension(xml: &str, ext: &str, content_type: &str) -> Option<String> {
    let lower = xml.to_ascii_lowercase();
    let ext = ext.to_ascii_lowercase();
    let declared = lower.contains(&format!("extension=\"{ext}\""))
        || lower.contains(&format!("extension='{ext}'"));
    if declared {
        return None;
    }
    let close = xml.rfind("</Types>")?;
    let mut out = String::with_capacity(xml.len() + 64);
    out.push_str(&xml[..close]);
    out.push_str(&format!(
        "<Default Extension=\"{ext}\" ContentType=\"{content_type}\"/>"
    ));
    out.push_str(&xml[close..]);
    Some(out)
}

/// Make sure the package's content-type map declares `ext`.
/// Returns true when the file was changed.
pub fn ensure_default_extension(path: &Path, ext: &str, content_type: &str) -> Result<bool> {
    if !path.is_file() {
        warn!(path = %path.display(), "no content-type map; leaving package as is");
        return Ok(false);
    }
    let xml = fs::read_to_string(path)?;
    match with_default_extension(&xml, ext, content_type) {
        Some(updated) => {
            fs::write(path, updated)?;
            debug!(ext, content_type, "content type declared");
            Ok(true)
        }
        None => Ok(false),
    }
}
