//! AVIF thumbnail generation.
//!
//! Thumbnails are scaled to the configured width with Lanczos3, keeping the
//! aspect ratio. Sources narrower than the target keep their size.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use gallery_core::{Error, Result};
use image::codecs::avif::AvifEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use rayon::prelude::*;

use super::scan::PhotoPaths;
use super::settings::ThumbnailSettings;

/// Result of a single thumbnail job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailOutcome {
    /// A thumbnail was written with these dimensions.
    Generated { width: u32, height: u32 },
    /// The target already existed and overwrite was off.
    Skipped,
}

/// Totals for a batch of thumbnail jobs.
#[derive(Debug, Default)]
pub struct ThumbnailReport {
    pub generated: usize,
    pub skipped: usize,
    pub failed: Vec<(PathBuf, String)>,
}

impl ThumbnailReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Generates AVIF thumbnails with fixed settings.
#[derive(Debug, Clone, Copy)]
pub struct Thumbnailer {
    settings: ThumbnailSettings,
    overwrite: bool,
}

impl Thumbnailer {
    pub fn new(settings: ThumbnailSettings) -> Self {
        Self {
            settings,
            overwrite: false,
        }
    }

    /// Regenerate thumbnails that already exist.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Write the thumbnail for `source` to `target`.
    ///
    /// The parent directory of `target` is created if needed. A partially
    /// written target is removed when encoding fails.
    pub fn generate(&self, source: &Path, target: &Path) -> Result<ThumbnailOutcome> {
        if target.is_file() && !self.overwrite {
            tracing::debug!(
                "Skipping thumbnail generation, {} already exists",
                target.display()
            );
            return Ok(ThumbnailOutcome::Skipped);
        }

        let img = image::open(source)
            .map_err(|e| Error::Image(format!("failed to decode {}: {}", source.display(), e)))?;

        let thumb = if img.width() > self.settings.width() {
            img.resize(self.settings.width(), u32::MAX, FilterType::Lanczos3)
        } else {
            img
        };
        let (width, height) = (thumb.width(), thumb.height());

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }

        if let Err(e) = self.encode(&thumb, target) {
            let _ = std::fs::remove_file(target);
            return Err(e);
        }

        tracing::debug!(
            "Generated {} ({}x{})",
            target.display(),
            width,
            height
        );
        Ok(ThumbnailOutcome::Generated { width, height })
    }

    fn encode(&self, img: &DynamicImage, target: &Path) -> Result<()> {
        // The AVIF encoder only accepts 8-bit RGB(A).
        let img = if img.color().has_alpha() {
            DynamicImage::ImageRgba8(img.to_rgba8())
        } else {
            DynamicImage::ImageRgb8(img.to_rgb8())
        };

        let writer = BufWriter::new(File::create(target)?);
        let encoder = AvifEncoder::new_with_speed_quality(
            writer,
            self.settings.encoder_speed(),
            self.settings.quality(),
        );
        img.write_with_encoder(encoder)
            .map_err(|e| Error::Image(format!("failed to encode {}: {}", target.display(), e)))
    }

    /// Generate thumbnails for every entry in parallel.
    ///
    /// Failures are logged and collected; they never stop the batch.
    pub fn generate_all(&self, paths: &[PhotoPaths]) -> ThumbnailReport {
        tracing::info!("Beginning thumbnail generation for {} images", paths.len());

        let results: Vec<_> = paths
            .par_iter()
            .map(|p| (p, self.generate(&p.source, &p.thumbnail)))
            .collect();

        let mut report = ThumbnailReport::default();
        for (paths, result) in results {
            match result {
                Ok(ThumbnailOutcome::Generated { .. }) => report.generated += 1,
                Ok(ThumbnailOutcome::Skipped) => report.skipped += 1,
                Err(e) => {
                    tracing::error!("Thumbnail failed for {}: {}", paths.source.display(), e);
                    report.failed.push((paths.source.clone(), e.to_string()));
                }
            }
        }

        tracing::info!(
            "Thumbnails: {} generated, {} skipped, {} failed",
            report.generated,
            report.skipped,
            report.failed.len()
        );
        report
    }
}
