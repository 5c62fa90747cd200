// docslim_core/src/domain.rs
use std::fmt;

/// Orchestrator states. `CleanedUp` and `Aborted` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Start,
    Unpacked,
    StructureVerified,
    ImagesProcessed,
    Repacked,
    CleanedUp,
    Aborted,
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::CleanedUp | Stage::Aborted)
    }

    /// Forward-only transitions. Fatal package errors abort before images are
    /// processed; an I/O failure while repacking aborts from `ImagesProcessed`.
    pub fn can_advance_to(self, next: Stage) -> bool {
        use Stage::*;
        matches!(
            (self, next),
            (Start, Unpacked)
                | (Unpacked, StructureVerified)
                | (StructureVerified, ImagesProcessed)
                | (ImagesProcessed, Repacked)
                | (Repacked, CleanedUp)
                | (Start | Unpacked | StructureVerified | ImagesProcessed, Aborted)
        )
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageFailure {
    pub name: String,
    pub reason: String,
}

#[derive(Clone, Debug)]
pub struct ConversionReport {
    pub converted: usize,
    pub skipped_transparent: usize,
    pub skipped_unrecognized: usize,
    pub failed: Vec<ImageFailure>,
    pub stage: Stage,
}

impl Default for ConversionReport {
    fn default() -> Self {
        Self {
            converted: 0,
            skipped_transparent: 0,
            skipped_unrecognized: 0,
            failed: Vec::new(),
            stage: Stage::Start,
        }
    }
}

/// How a media entry would be treated by a conversion run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MediaClass {
    Eligible,
    Transparent,
    Unrecognized,
    Unreadable(String),
}

impl fmt::Display for MediaClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaClass::Eligible => f.write_str("eligible"),
            MediaClass::Transparent => f.write_str("transparent"),
            MediaClass::Unrecognized => f.write_str("unrecognized"),
            MediaClass::Unreadable(e) => write!(f, "unreadable ({e})"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct MediaRow {
    pub path: String,
    pub size: u64,
    pub dimensions: Option<(u32, u32)>,
    pub class: MediaClass,
}
