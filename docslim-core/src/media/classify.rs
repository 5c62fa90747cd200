use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageReader};

use crate::domain::MediaClass;
use crate::layout::RECOGNIZED_EXTS;

/// Lowercased extension when it is one of the recognized raster formats.
pub fn recognized_extension(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    RECOGNIZED_EXTS.contains(&ext.as_str()).then_some(ext)
}

/// True when no pixel is below full opacity. Images without alpha are opaque.
pub fn is_opaque(img: &DynamicImage) -> bool {
    match img {
        DynamicImage::ImageLumaA8(b) => b.pixels().all(|p| p.0[1] == u8::MAX),
        DynamicImage::ImageRgba8(b) => b.pixels().all(|p| p.0[3] == u8::MAX),
        DynamicImage::ImageLumaA16(b) => b.pixels().all(|p| p.0[1] == u16::MAX),
        DynamicImage::ImageRgba16(b) => b.pixels().all(|p| p.0[3] == u16::MAX),
        DynamicImage::ImageRgba32F(b) => b.pixels().all(|p| p.0[3] >= 1.0),
        other if other.color().has_alpha() => {
            other.to_rgba8().pixels().all(|p| p.0[3] == u8::MAX)
        }
        _ => true,
    }
}

/// Classify an in-memory media entry without touching the filesystem.
pub fn classify_bytes(name: &str, bytes: &[u8]) -> (MediaClass, Option<(u32, u32)>) {
    if recognized_extension(Path::new(name)).is_none() {
        return (MediaClass::Unrecognized, None);
    }
    let decoded = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| e.to_string())
        .and_then(|r| r.decode().map_err(|e| e.to_string()));
    match decoded {
        Ok(img) => {
            let dims = Some((img.width(), img.height()));
            if is_opaque(&img) {
                (MediaClass::Eligible, dims)
            } else {
                (MediaClass::Transparent, dims)
            }
        }
        Err(e) => (MediaClass::Unreadable(e), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

    fn png_bytes(img: DynamicImage) -> Vec<u8> {
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        assert_eq!(
            recognized_extension(Path::new("image1.PNG")).as_deref(),
            Some("png")
        );
        assert_eq!(
            recognized_extension(Path::new("scan.Tiff")).as_deref(),
            Some("tiff")
        );
        assert!(recognized_extension(Path::new("photo.jpeg")).is_none());
        assert!(recognized_extension(Path::new("vector.emf")).is_none());
        assert!(recognized_extension(Path::new("noext")).is_none());
        assert!(recognized_extension(Path::new("scan.tif")).is_none());
    }

    #[test]
    fn rgb_is_opaque() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([1, 2, 3])));
        assert!(is_opaque(&img));
    }

    #[test]
    fn rgba_full_alpha_is_opaque() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255])));
        assert!(is_opaque(&img));
    }

    #[test]
    fn single_translucent_pixel_makes_image_non_opaque() {
        let mut buf = RgbaImage::from_pixel(8, 8, Rgba([9, 9, 9, 255]));
        buf.put_pixel(7, 7, Rgba([9, 9, 9, 254]));
        assert!(!is_opaque(&DynamicImage::ImageRgba8(buf)));
    }

    #[test]
    fn classify_encoded_entries() {
        let opaque = png_bytes(DynamicImage::ImageRgb8(RgbImage::new(3, 2)));
        let (class, dims) = classify_bytes("word/media/a.png", &opaque);
        assert_eq!(class, MediaClass::Eligible);
        assert_eq!(dims, Some((3, 2)));

        let clear = png_bytes(DynamicImage::ImageRgba8(RgbaImage::new(3, 2)));
        assert_eq!(
            classify_bytes("word/media/b.png", &clear).0,
            MediaClass::Transparent
        );

        assert_eq!(
            classify_bytes("word/media/c.emf", b"whatever").0,
            MediaClass::Unrecognized
        );
        assert!(matches!(
            classify_bytes("word/media/d.png", b"not an image").0,
            MediaClass::Unreadable(_)
        ));
    }
}
