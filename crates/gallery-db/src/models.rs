//! Rust structs mapping to database tables.
//!
//! Each model implements `from_row` for constructing itself from a
//! `rusqlite::Row`.

use gallery_core::{CollectionId, PhotoId};
use serde::{Deserialize, Serialize};

/// Column list for `photo`, in the order [`Photo::from_row_at`] expects.
pub(crate) const PHOTO_COLS: &str = "id, filename, thumbnail, date_taken, lens, focal_length, \
     f_stop, exposure_time, iso, camera_model";

// ---------------------------------------------------------------------------
// Photo
// ---------------------------------------------------------------------------

/// EXIF-derived attributes. Every field is absent when unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoMetadata {
    pub date_taken: Option<String>,
    pub lens: Option<String>,
    pub focal_length: Option<String>,
    pub f_stop: Option<String>,
    pub exposure_time: Option<String>,
    pub iso: Option<String>,
    pub camera_model: Option<String>,
}

impl PhotoMetadata {
    /// True when no attribute is known.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A registered photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: PhotoId,
    pub filename: String,
    pub thumbnail: String,
    #[serde(flatten)]
    pub metadata: PhotoMetadata,
}

impl Photo {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Self::from_row_at(row, 0)
    }

    /// Read a photo whose columns start at `offset` (for joined queries).
    pub fn from_row_at(row: &rusqlite::Row, offset: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            id: PhotoId::from(row.get::<_, i64>(offset)?),
            filename: row.get(offset + 1)?,
            thumbnail: row.get(offset + 2)?,
            metadata: PhotoMetadata {
                date_taken: row.get(offset + 3)?,
                lens: row.get(offset + 4)?,
                focal_length: row.get(offset + 5)?,
                f_stop: row.get(offset + 6)?,
                exposure_time: row.get(offset + 7)?,
                iso: row.get(offset + 8)?,
                camera_model: row.get(offset + 9)?,
            },
        })
    }
}

/// Data needed to register a photo. Filename and thumbnail are mandatory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPhoto {
    pub filename: String,
    pub thumbnail: String,
    pub metadata: PhotoMetadata,
}

impl NewPhoto {
    pub fn new(filename: impl Into<String>, thumbnail: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            thumbnail: thumbnail.into(),
            metadata: PhotoMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: PhotoMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

// ---------------------------------------------------------------------------
// Collection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    pub name: String,
}

impl Collection {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: CollectionId::from(row.get::<_, i64>(0)?),
            name: row.get(1)?,
        })
    }
}

/// A collection together with its member count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSummary {
    pub id: CollectionId,
    pub name: String,
    pub photo_count: i64,
}

impl CollectionSummary {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: CollectionId::from(row.get::<_, i64>(0)?),
            name: row.get(1)?,
            photo_count: row.get(2)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Membership
// ---------------------------------------------------------------------------

/// One photo's place in one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub photo_id: PhotoId,
    pub collection_id: CollectionId,
    pub sort_order: i64,
}

impl Membership {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            photo_id: PhotoId::from(row.get::<_, i64>(0)?),
            collection_id: CollectionId::from(row.get::<_, i64>(1)?),
            sort_order: row.get(2)?,
        })
    }
}

/// A photo as listed within a collection, carrying its display position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionPhoto {
    pub sort_order: i64,
    #[serde(flatten)]
    pub photo: Photo,
}

impl CollectionPhoto {
    /// Expects `sort_order` followed by the [`PHOTO_COLS`] columns.
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            sort_order: row.get(0)?,
            photo: Photo::from_row_at(row, 1)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_is_empty() {
        assert!(PhotoMetadata::default().is_empty());
        let meta = PhotoMetadata {
            iso: Some("400".into()),
            ..Default::default()
        };
        assert!(!meta.is_empty());
    }

    #[test]
    fn collection_photo_serializes_flat() {
        let entry = CollectionPhoto {
            sort_order: 2,
            photo: Photo {
                id: PhotoId::from(7),
                filename: "a.jpg".into(),
                thumbnail: "a-thumb.avif".into(),
                metadata: PhotoMetadata {
                    camera_model: Some("XA2".into()),
                    ..Default::default()
                },
            },
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["sort_order"], 2);
        assert_eq!(json["id"], 7);
        assert_eq!(json["camera_model"], "XA2");
        assert!(json["lens"].is_null());
    }
}
