use std::path::Path;

use crate::error::Result;

/// Byte sizes of a source package and its converted copy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SizeStats {
    pub original_bytes: u64,
    pub converted_bytes: u64,
}

impl SizeStats {
    pub fn from_paths(original: &Path, converted: &Path) -> Result<Self> {
        Ok(Self {
            original_bytes: std::fs::metadata(original)?.len(),
            converted_bytes: std::fs::metadata(converted)?.len(),
        })
    }

    /// Negative when the output grew.
    pub fn saved_bytes(&self) -> i64 {
        self.original_bytes as i64 - self.converted_bytes as i64
    }

    pub fn reduction_pct(&self) -> f64 {
        if self.original_bytes == 0 {
            return 0.0;
        }
        self.saved_bytes() as f64 / self.original_bytes as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduction_percentage() {
        let s = SizeStats {
            original_bytes: 2048,
            converted_bytes: 512,
        };
        assert_eq!(s.saved_bytes(), 1536);
        assert!((s.reduction_pct() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn growth_and_empty() {
        let grew = SizeStats {
            original_bytes: 100,
            converted_bytes: 150,
        };
        assert_eq!(grew.saved_bytes(), -50);
        assert!(grew.reduction_pct() < 0.0);
        assert_eq!(SizeStats::default().reduction_pct(), 0.0);
    }
}
