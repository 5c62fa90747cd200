//! Conversion run: unpack, verify structure, convert media, repack, clean up.

use std::fs;
use std::path::{Path, PathBuf};

use image::ImageReader;
use tracing::{debug, error, info, warn};

use crate::config::ConvertOptions;
use crate::domain::{ConversionReport, ImageFailure, Stage};
use crate::error::{DocError, PackageDir, Result};
use crate::layout::{
    CONTENT_TYPES, MEDIA_DIR, OUTPUT_CONTENT_TYPE, OUTPUT_EXT, RELS_DIR, media_ref,
};
use crate::media::classify::{is_opaque, recognized_extension};
use crate::media::transcode::{converted_name, transcode};
use crate::pack::writer::repack;
use crate::read::extract::unpack;
use crate::rels::content_types::ensure_default_extension;
use crate::rels::rewrite;
use crate::workdir::WorkingTree;

/// Convert the package at `source` into a new package at `dest`.
///
/// Opaque raster images under the media directory are scaled to
/// `opts.target_width()` and re-encoded as JPEG; descriptors are rewritten to
/// point at the new files. Per-image failures are recorded in the report and
/// never fail the run. `CorruptArchive`, `MissingStructure`, configuration and
/// I/O errors abort it without creating `dest`. The working tree is removed on
/// every path.
pub fn convert(source: &Path, dest: &Path, opts: &ConvertOptions) -> Result<ConversionReport> {
    let mut run = Run::default();

    if let Err(e) = opts.validate() {
        return Err(run.abort(e));
    }
    let tree = match WorkingTree::acquire(opts.scratch_root.as_deref()) {
        Ok(t) => t,
        Err(e) => return Err(run.abort(e)),
    };

    let outcome = run.drive(&tree, source, dest, opts);
    let released = tree.release();

    match outcome {
        Ok(()) => {
            released?;
            run.advance(Stage::CleanedUp);
            let r = &run.report;
            if r.converted == 0 {
                info!(source = %source.display(), "no images were converted");
            } else {
                info!(
                    source = %source.display(),
                    dest = %dest.display(),
                    converted = r.converted,
                    "images converted"
                );
            }
            Ok(run.report)
        }
        Err(e) => {
            if let Err(re) = released {
                warn!(error = %re, "working tree cleanup failed");
            }
            Err(run.abort(e))
        }
    }
}

#[derive(Default)]
struct Run {
    report: ConversionReport,
}

impl Run {
    fn advance(&mut self, next: Stage) {
        let cur = self.report.stage;
        debug_assert!(cur.can_advance_to(next), "illegal transition {cur} -> {next}");
        info!(from = %cur, to = %next, "stage");
        self.report.stage = next;
    }

    fn abort(&mut self, e: DocError) -> DocError {
        error!(stage = %self.report.stage, error = %e, "conversion aborted");
        self.advance(Stage::Aborted);
        e
    }

    fn drive(
        &mut self,
        tree: &WorkingTree,
        source: &Path,
        dest: &Path,
        opts: &ConvertOptions,
    ) -> Result<()> {
        unpack(source, tree.path())?;
        self.advance(Stage::Unpacked);

        let rels_dir = tree.join(RELS_DIR);
        if !rels_dir.is_dir() {
            return Err(DocError::MissingStructure(PackageDir::Relationships));
        }
        let media_dir = tree.join(MEDIA_DIR);
        if !media_dir.is_dir() {
            return Err(DocError::MissingStructure(PackageDir::Media));
        }
        self.advance(Stage::StructureVerified);

        for path in media_files(&media_dir)? {
            self.process_entry(&media_dir, &rels_dir, &path, opts);
        }
        if self.report.converted > 0 {
            ensure_default_extension(&tree.join(CONTENT_TYPES), OUTPUT_EXT, OUTPUT_CONTENT_TYPE)?;
        }
        self.advance(Stage::ImagesProcessed);

        repack(tree.path(), dest)?;
        self.advance(Stage::Repacked);
        Ok(())
    }

    fn process_entry(
        &mut self,
        media_dir: &Path,
        rels_dir: &Path,
        path: &Path,
        opts: &ConvertOptions,
    ) {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            self.report.skipped_unrecognized += 1;
            return;
        };
        if recognized_extension(path).is_none() {
            debug!(image = name, "unrecognized format; left as is");
            self.report.skipped_unrecognized += 1;
            return;
        }

        match replace_image(media_dir, rels_dir, name, opts) {
            Ok(Some(new_name)) => {
                debug!(image = name, to = %new_name, "image converted");
                self.report.converted += 1;
            }
            Ok(None) => {
                debug!(image = name, "image has transparency; left as is");
                self.report.skipped_transparent += 1;
            }
            Err(e) => {
                warn!(image = name, error = %e, "image skipped");
                self.report.failed.push(ImageFailure {
                    name: name.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }
}

/// Regular files directly inside the media directory, sorted by name.
fn media_files(media_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in fs::read_dir(media_dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            out.push(entry.path());
        }
    }
    out.sort();
    Ok(out)
}

/// Transcode one image and swap it for the converted file.
///
/// Returns `Ok(None)` for non-opaque images. Every descriptor reference keeps
/// resolving on every path: the original is deleted only after all
/// descriptors point at the converted file.
fn replace_image(
    media_dir: &Path,
    rels_dir: &Path,
    name: &str,
    opts: &ConvertOptions,
) -> Result<Option<String>> {
    let path = media_dir.join(name);
    let img = ImageReader::open(&path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| DocError::image(name, e))?
        .decode()
        .map_err(|e| DocError::image(name, e))?;
    if !is_opaque(&img) {
        return Ok(None);
    }

    let encoded = transcode(name, &img, opts)?;
    drop(img);
    debug!(image = name, width = encoded.width, height = encoded.height, "image resized");

    let new_name = converted_name(media_dir, name);
    let new_path = media_dir.join(&new_name);
    fs::write(&new_path, &encoded.bytes).map_err(|e| DocError::image(name, e))?;

    let pending = match rewrite::prepare(rels_dir, &media_ref(name), &media_ref(&new_name)) {
        Ok(p) => p,
        Err(e) => {
            let _ = fs::remove_file(&new_path);
            return Err(DocError::image(name, format!("descriptor rewrite: {e}")));
        }
    };
    finish_replacement(name, &path, pending)?;
    Ok(Some(new_name))
}

/// Commit the descriptor rewrite, then drop the original image.
///
/// A failed commit keeps both files, since some descriptors may already name
/// the converted one. A failed delete only leaves a stale file behind.
fn finish_replacement(
    name: &str,
    original: &Path,
    pending: rewrite::PendingRewrite,
) -> Result<()> {
    pending
        .commit()
        .map_err(|e| DocError::image(name, format!("descriptor rewrite: {e}")))?;
    if let Err(e) = fs::remove_file(original) {
        warn!(image = name, error = %e, "original image could not be removed");
    }
    Ok(())
}
