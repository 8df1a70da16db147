//! Thumbnail generation, source discovery, and EXIF extraction.

mod generator;
mod metadata;
mod scan;
mod settings;

pub use generator::{ThumbnailOutcome, ThumbnailReport, Thumbnailer};
pub use metadata::read_metadata;
pub use scan::{scan_source, PhotoPaths, SourceScan};
pub use settings::{ThumbnailSettings, MAX_EFFORT, MAX_QUALITY, MIN_WIDTH};
