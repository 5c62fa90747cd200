#![forbid(unsafe_code)]

pub mod config;
pub mod domain;
pub mod error;
pub mod layout;
pub mod list;
pub mod pipeline;
pub mod stats;
pub mod workdir;

pub mod read {
    pub mod extract;
}

pub mod pack {
    pub mod writer;
}

pub mod media {
    pub mod classify;
    pub mod transcode;
}

pub mod rels {
    pub mod content_types;
    pub mod rewrite;
}

// Re-exports: stable API surface
pub use config::{ConvertOptions, Settings, load_settings};
pub use domain::{ConversionReport, ImageFailure, MediaRow, Stage};
pub use error::{DocError, PackageDir, Result};
pub use list::list_media;
pub use pipeline::convert;
pub use stats::SizeStats;
