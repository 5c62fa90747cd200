use std::path::Path;

use image::DynamicImage;
use image::imageops::FilterType;
use jpeg_encoder::{ColorType, Density, Encoder, SamplingFactor};

use crate::config::{ConvertOptions, MAX_ENCODED_DIMENSION};
use crate::error::{DocError, Result};
use crate::layout::OUTPUT_EXT;

#[derive(Debug)]
pub struct Transcoded {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Scale to `target_width`, keeping the aspect ratio. Height truncates toward
/// zero and never drops below one pixel.
pub fn target_dimensions(src_w: u32, src_h: u32, target_width: u32) -> (u32, u32) {
    let h = (u64::from(target_width) * u64::from(src_h) / u64::from(src_w.max(1))).max(1);
    (target_width, u32::try_from(h).unwrap_or(u32::MAX))
}

/// Resize (Lanczos3) and re-encode as baseline JPEG carrying `dpi` density.
pub fn transcode(name: &str, img: &DynamicImage, opts: &ConvertOptions) -> Result<Transcoded> {
    if img.width() == 0 || img.height() == 0 {
        return Err(DocError::image(name, "image has no pixels"));
    }
    let (w, h) = target_dimensions(img.width(), img.height(), opts.target_width());
    if w > MAX_ENCODED_DIMENSION || h > MAX_ENCODED_DIMENSION {
        return Err(DocError::image(
            name,
            format!("target size {w}x{h} exceeds JPEG limits"),
        ));
    }

    let rgb = img.resize_exact(w, h, FilterType::Lanczos3).to_rgb8();
    let density = u16::try_from(opts.dpi)
        .map_err(|_| DocError::image(name, format!("dpi {} out of range", opts.dpi)))?;

    let mut bytes = Vec::new();
    let mut encoder = Encoder::new(&mut bytes, opts.quality);
    encoder.set_sampling_factor(SamplingFactor::R_4_2_0);
    encoder.set_density(Density::Inch {
        x: density,
        y: density,
    });
    encoder
        .encode(rgb.as_raw(), w as u16, h as u16, ColorType::Rgb)
        .map_err(|e| DocError::image(name, format!("jpeg encode: {e}")))?;

    Ok(Transcoded {
        bytes,
        width: w,
        height: h,
    })
}

/// File name for the converted image: same stem, output extension. A numeric
/// suffix is added when that name is already taken in `media_dir`.
pub fn converted_name(media_dir: &Path, file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    let mut candidate = format!("{stem}.{OUTPUT_EXT}");
    let mut n = 1u32;
    while media_dir.join(&candidate).exists() {
        candidate = format!("{stem}-{n}.{OUTPUT_EXT}");
        n += 1;
    }
    candidate
}
