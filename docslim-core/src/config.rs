use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{DocError, Result};

/// Largest pixel dimension the JPEG encoder accepts.
pub const MAX_ENCODED_DIMENSION: u32 = u16::MAX as u32;

#[derive(Clone, Debug)]
pub struct ConvertOptions {
    /// JPEG quality, 1..=100.
    pub quality: u8,
    /// Output density in pixels per inch; also drives the target width.
    pub dpi: u32,
    /// Physical width the images are scaled to, in inches.
    pub width_inches: u32,
    /// Parent for the per-run working tree. `None` uses the system temp dir.
    pub scratch_root: Option<PathBuf>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            quality: 80,
            dpi: 200,
            width_inches: 6,
            scratch_root: None,
        }
    }
}

impl ConvertOptions {
    pub fn target_width(&self) -> u32 {
        self.width_inches.saturating_mul(self.dpi)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.quality) {
            return Err(DocError::Config(format!(
                "quality must be within 1..=100, got {}",
                self.quality
            )));
        }
        if self.dpi == 0 || self.dpi > u16::MAX as u32 {
            return Err(DocError::Config(format!(
                "dpi must be within 1..=65535, got {}",
                self.dpi
            )));
        }
        if self.width_inches == 0 {
            return Err(DocError::Config("width_inches must be at least 1".into()));
        }
        if self.target_width() > MAX_ENCODED_DIMENSION {
            return Err(DocError::Config(format!(
                "target width {}px ({} in x {} dpi) exceeds {}px",
                self.target_width(),
                self.width_inches,
                self.dpi,
                MAX_ENCODED_DIMENSION
            )));
        }
        Ok(())
    }
}

/// On-disk settings: an `[ImageSettings]` section with integer keys.
///
/// Parsed as TOML, so INI-style files work when they stick to `key = value`
/// and `#` comments; `key: value` and `;` comments do not parse.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(rename = "ImageSettings", default)]
    pub image: ImageSettings,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ImageSettings {
    pub quality: Option<i64>,
    pub dpi: Option<i64>,
    pub width_inches: Option<i64>,
}

impl Settings {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| DocError::Config(format!("settings parse: {e}")))
    }

    /// Overlay the file values onto `base`, rejecting out-of-range integers.
    pub fn apply_to(&self, mut base: ConvertOptions) -> Result<ConvertOptions> {
        if let Some(q) = self.image.quality {
            base.quality = u8::try_from(q)
                .map_err(|_| DocError::Config(format!("quality out of range: {q}")))?;
        }
        if let Some(d) = self.image.dpi {
            base.dpi =
                u32::try_from(d).map_err(|_| DocError::Config(format!("dpi out of range: {d}")))?;
        }
        if let Some(w) = self.image.width_inches {
            base.width_inches = u32::try_from(w)
                .map_err(|_| DocError::Config(format!("width_inches out of range: {w}")))?;
        }
        Ok(base)
    }
}

pub fn load_settings(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Err(DocError::Config(format!(
            "settings file not found: {}",
            path.display()
        )));
    }
    let text = std::fs::read_to_string(path)?;
    Settings::from_toml_str(&text)
}
