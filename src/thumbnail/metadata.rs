//! EXIF attribute extraction.
//!
//! Missing or unreadable tags are left as `None`; extraction never fails.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use exif::{Exif, In, Reader, Tag, Value};
use gallery_db::models::PhotoMetadata;

/// Read the EXIF attributes stored with a photo.
pub fn read_metadata(path: &Path) -> PhotoMetadata {
    match read_exif(path) {
        Ok(exif) => metadata_from_exif(&exif),
        Err(e) => {
            tracing::debug!("No EXIF data for {}: {}", path.display(), e);
            PhotoMetadata::default()
        }
    }
}

fn read_exif(path: &Path) -> Result<Exif, exif::Error> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    Reader::new().read_from_container(&mut reader)
}

fn metadata_from_exif(exif: &Exif) -> PhotoMetadata {
    PhotoMetadata {
        date_taken: date_taken(exif),
        lens: ascii(exif, Tag::LensModel),
        focal_length: with_unit(exif, Tag::FocalLength),
        f_stop: with_unit(exif, Tag::FNumber),
        exposure_time: with_unit(exif, Tag::ExposureTime),
        iso: plain(exif, Tag::PhotographicSensitivity),
        camera_model: ascii(exif, Tag::Model),
    }
}

fn date_taken(exif: &Exif) -> Option<String> {
    let field = exif
        .get_field(Tag::DateTimeOriginal, In::PRIMARY)
        .or_else(|| exif.get_field(Tag::DateTime, In::PRIMARY))?;
    match &field.value {
        Value::Ascii(parts) => {
            let raw = parts.first()?;
            exif::DateTime::from_ascii(raw)
                .map(|dt| dt.to_string())
                .ok()
                .or_else(|| clean(raw))
        }
        _ => None,
    }
}

// ASCII values are read raw; display_value() would wrap them in quotes.
fn ascii(exif: &Exif, tag: Tag) -> Option<String> {
    match &exif.get_field(tag, In::PRIMARY)?.value {
        Value::Ascii(parts) => parts.first().and_then(|raw| clean(raw)),
        _ => None,
    }
}

fn with_unit(exif: &Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    non_empty(field.display_value().with_unit(exif).to_string())
}

fn plain(exif: &Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    non_empty(field.display_value().to_string())
}

fn clean(raw: &[u8]) -> Option<String> {
    non_empty(
        String::from_utf8_lossy(raw)
            .trim_matches(|c: char| c == '\0' || c.is_whitespace())
            .to_string(),
    )
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_empty_metadata() {
        let dir = TempDir::new().unwrap();
        assert!(read_metadata(&dir.path().join("nope.jpg")).is_empty());
    }

    #[test]
    fn image_without_exif_yields_empty_metadata() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plain.png");
        RgbImage::from_pixel(8, 8, Rgb([0, 0, 0])).save(&path).unwrap();
        assert!(read_metadata(&path).is_empty());
    }

    #[test]
    fn garbage_yields_empty_metadata() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("junk.jpg");
        std::fs::write(&path, b"\xff\xd8 definitely not exif").unwrap();
        assert!(read_metadata(&path).is_empty());
    }

    #[test]
    fn clean_strips_padding() {
        assert_eq!(clean(b"OLYMPUS XA2\0\0 "), Some("OLYMPUS XA2".to_string()));
        assert_eq!(clean(b"\0\0"), None);
    }
}
