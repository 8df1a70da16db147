//! Path utilities for source images and their thumbnails.
//!
//! The scanner uses [`is_image_file`] to pick up source photos, and every
//! component that needs to know where a photo's thumbnail lives goes through
//! [`thumbnail_path`] so the naming convention stays in one place.

use std::path::{Path, PathBuf};

/// List of supported source image extensions.
const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "tif", "tiff", "webp", "bmp", "gif",
];

/// Extension of generated thumbnails.
pub const THUMBNAIL_EXTENSION: &str = "avif";

/// Suffix appended to the source stem when naming a thumbnail.
pub const THUMBNAIL_SUFFIX: &str = "-thumb";

/// Check if a path has a supported image file extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use gallery_core::paths::is_image_file;
///
/// assert!(is_image_file(Path::new("beach.JPG")));
/// assert!(is_image_file(Path::new("/photos/scan.tiff")));
/// assert!(!is_image_file(Path::new("notes.txt")));
/// ```
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Thumbnail file name for a source file.
///
/// The stem is everything before the first `.` of the file name, so
/// `roll1.frame03.jpg` becomes `roll1-thumb.avif`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use gallery_core::paths::thumbnail_file_name;
///
/// assert_eq!(thumbnail_file_name(Path::new("/a/IMG_0001.jpg")), "IMG_0001-thumb.avif");
/// ```
pub fn thumbnail_file_name(source: &Path) -> String {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = name.split('.').next().unwrap_or_default();
    format!("{stem}{THUMBNAIL_SUFFIX}.{THUMBNAIL_EXTENSION}")
}

/// Full thumbnail path for a source file: `<source dir>/<dir_name>/<stem>-thumb.avif`.
pub fn thumbnail_path(source: &Path, dir_name: &str) -> PathBuf {
    let parent = source.parent().unwrap_or_else(|| Path::new(""));
    parent.join(dir_name).join(thumbnail_file_name(source))
}
