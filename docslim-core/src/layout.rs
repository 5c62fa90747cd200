//! Fixed entry conventions of the `docx` package layout.

/// Relationship descriptors, relative to the package root.
pub const RELS_DIR: &str = "word/_rels";
/// Embedded media, relative to the package root.
pub const MEDIA_DIR: &str = "word/media";
/// Prefix used by descriptor references (`media/<filename>`).
pub const MEDIA_REF_PREFIX: &str = "media";
/// Archive entry prefix for media, with trailing separator.
pub const MEDIA_ENTRY_PREFIX: &str = "word/media/";
pub const RELS_EXT: &str = "rels";
pub const CONTENT_TYPES: &str = "[Content_Types].xml";

pub const RECOGNIZED_EXTS: [&str; 4] = ["png", "bmp", "tiff", "webp"];
pub const OUTPUT_EXT: &str = "jpg";
pub const OUTPUT_CONTENT_TYPE: &str = "image/jpeg";

/// Descriptor reference string for a media filename.
pub fn media_ref(file_name: &str) -> String {
    format!("{MEDIA_REF_PREFIX}/{file_name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_ref_uses_forward_slash() {
        assert_eq!(media_ref("image1.png"), "media/image1.png");
    }
}
