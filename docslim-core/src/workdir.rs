use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

use crate::error::Result;

/// Exclusively owned scratch directory for one conversion run.
///
/// Created fresh under the scratch root with a unique name. `release` removes
/// it and reports failures; dropping an unreleased tree removes it as well.
pub struct WorkingTree {
    dir: TempDir,
}

impl WorkingTree {
    pub fn acquire(scratch_root: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("docslim-");
        let dir = match scratch_root {
            Some(root) => {
                std::fs::create_dir_all(root)?;
                builder.tempdir_in(root)?
            }
            None => builder.tempdir()?,
        };
        debug!(path = %dir.path().display(), "working tree acquired");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    pub fn release(self) -> Result<()> {
        let path = self.dir.path().to_path_buf();
        self.dir.close()?;
        debug!(path = %path.display(), "working tree released");
        Ok(())
    }
}
