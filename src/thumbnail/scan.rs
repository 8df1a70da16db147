//! Source discovery.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use gallery_core::paths::{is_image_file, thumbnail_path};
use gallery_core::{Error, Result};
use walkdir::WalkDir;

/// A source photo and the thumbnail path derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoPaths {
    pub source: PathBuf,
    pub thumbnail: PathBuf,
}

impl PhotoPaths {
    pub fn new(source: PathBuf, dir_name: &str) -> Self {
        let thumbnail = thumbnail_path(&source, dir_name);
        Self { source, thumbnail }
    }

    /// File name of the source, used as its database filename and upload key.
    pub fn source_name(&self) -> String {
        file_name(&self.source)
    }

    /// File name of the thumbnail.
    pub fn thumbnail_name(&self) -> String {
        file_name(&self.thumbnail)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Result of scanning a source.
#[derive(Debug, Clone, Default)]
pub struct SourceScan {
    pub photos: Vec<PhotoPaths>,
    /// `(dropped, kept)` pairs: sources whose thumbnail path is already
    /// claimed by an earlier source in the same scan.
    pub clashes: Vec<(PathBuf, PathBuf)>,
}

/// Collect the photos under `source`.
///
/// A directory yields its direct image files sorted by name (the thumbnail
/// directory itself is not descended into). A file yields itself.
///
/// Thumbnail names only keep the text before the first `.`, so `a.jpg` and
/// `a.png` would share one thumbnail. The first by name is kept and the
/// rest are reported in [`SourceScan::clashes`].
pub fn scan_source(source: &Path, dir_name: &str) -> Result<SourceScan> {
    tracing::info!("Scanning path: {}", source.display());

    if !source.exists() {
        return Err(Error::not_found("source", source.display()));
    }

    if source.is_file() {
        if !is_image_file(source) {
            return Err(Error::validation(format!(
                "not a supported image file: {}",
                source.display()
            )));
        }
        return Ok(SourceScan {
            photos: vec![PhotoPaths::new(source.to_path_buf(), dir_name)],
            ..Default::default()
        });
    }

    let mut scan = SourceScan::default();
    let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();
    for entry in WalkDir::new(source)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| Error::Io {
            source: e.into(),
        })?;
        if !(entry.file_type().is_file() && is_image_file(entry.path())) {
            tracing::trace!("Ignoring {}", entry.path().display());
            continue;
        }

        let photo = PhotoPaths::new(entry.into_path(), dir_name);
        if let Some(kept) = claimed.get(&photo.thumbnail) {
            tracing::warn!(
                "Skipping {}: thumbnail {} already belongs to {}",
                photo.source.display(),
                photo.thumbnail_name(),
                kept.display()
            );
            scan.clashes.push((photo.source, kept.clone()));
            continue;
        }
        claimed.insert(photo.thumbnail.clone(), photo.source.clone());
        scan.photos.push(photo);
    }

    tracing::info!("Found {} files", scan.photos.len());
    Ok(scan)
}
