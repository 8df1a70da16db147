//! Photo operations.

use gallery_core::{Error, PhotoId, Result};
use rusqlite::Connection;

use crate::error::sqlite_error;
use crate::models::{NewPhoto, Photo, PHOTO_COLS};

fn validate(new: &NewPhoto) -> Result<()> {
    if new.filename.trim().is_empty() {
        return Err(Error::validation("photo filename must not be empty"));
    }
    if new.thumbnail.trim().is_empty() {
        return Err(Error::validation("photo thumbnail must not be empty"));
    }
    Ok(())
}

/// Insert a new photo.
///
/// Fails with [`Error::UniqueConstraintViolation`] if the filename or
/// thumbnail is already registered.
pub fn insert_photo(conn: &Connection, new: &NewPhoto) -> Result<Photo> {
    validate(new)?;
    let m = &new.metadata;
    conn.execute(
        "INSERT INTO photo (filename, thumbnail, date_taken, lens, focal_length, f_stop,
                            exposure_time, iso, camera_model)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        rusqlite::params![
            new.filename,
            new.thumbnail,
            m.date_taken,
            m.lens,
            m.focal_length,
            m.f_stop,
            m.exposure_time,
            m.iso,
            m.camera_model,
        ],
    )
    .map_err(sqlite_error)?;

    Ok(Photo {
        id: PhotoId::from(conn.last_insert_rowid()),
        filename: new.filename.clone(),
        thumbnail: new.thumbnail.clone(),
        metadata: new.metadata.clone(),
    })
}

/// Register a photo, or refresh an existing one with the same filename.
///
/// On re-processing the thumbnail name is replaced and newly known EXIF
/// attributes overwrite stored ones; attributes that are now unknown keep
/// their stored value.
pub fn upsert_photo(conn: &Connection, new: &NewPhoto) -> Result<Photo> {
    validate(new)?;
    let m = &new.metadata;
    conn.execute(
        "INSERT INTO photo (filename, thumbnail, date_taken, lens, focal_length, f_stop,
                            exposure_time, iso, camera_model)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
         ON CONFLICT(filename) DO UPDATE SET
            thumbnail     = excluded.thumbnail,
            date_taken    = COALESCE(excluded.date_taken, photo.date_taken),
            lens          = COALESCE(excluded.lens, photo.lens),
            focal_length  = COALESCE(excluded.focal_length, photo.focal_length),
            f_stop        = COALESCE(excluded.f_stop, photo.f_stop),
            exposure_time = COALESCE(excluded.exposure_time, photo.exposure_time),
            iso           = COALESCE(excluded.iso, photo.iso),
            camera_model  = COALESCE(excluded.camera_model, photo.camera_model)",
        rusqlite::params![
            new.filename,
            new.thumbnail,
            m.date_taken,
            m.lens,
            m.focal_length,
            m.f_stop,
            m.exposure_time,
            m.iso,
            m.camera_model,
        ],
    )
    .map_err(sqlite_error)?;

    get_photo_by_filename(conn, &new.filename)?
        .ok_or_else(|| Error::Internal(format!("photo {} vanished after upsert", new.filename)))
}

/// Upsert a batch of photos in a single transaction.
///
/// Either every photo is registered or none is.
pub fn register_photos(conn: &Connection, batch: &[NewPhoto]) -> Result<Vec<Photo>> {
    let tx = conn.unchecked_transaction().map_err(sqlite_error)?;
    let mut photos = Vec::with_capacity(batch.len());
    for new in batch {
        photos.push(upsert_photo(&tx, new)?);
    }
    tx.commit().map_err(sqlite_error)?;
    Ok(photos)
}

/// Get a photo by ID.
pub fn get_photo(conn: &Connection, id: PhotoId) -> Result<Option<Photo>> {
    let q = format!("SELECT {PHOTO_COLS} FROM photo WHERE id = ?1");
    let result = conn.query_row(&q, [id.get()], Photo::from_row);
    match result {
        Ok(p) => Ok(Some(p)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(sqlite_error(e)),
    }
}

/// Get a photo by its unique source filename.
pub fn get_photo_by_filename(conn: &Connection, filename: &str) -> Result<Option<Photo>> {
    let q = format!("SELECT {PHOTO_COLS} FROM photo WHERE filename = ?1");
    let result = conn.query_row(&q, [filename], Photo::from_row);
    match result {
        Ok(p) => Ok(Some(p)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(sqlite_error(e)),
    }
}

/// Get the photo that owns a thumbnail name.
pub fn get_photo_by_thumbnail(conn: &Connection, thumbnail: &str) -> Result<Option<Photo>> {
    let q = format!("SELECT {PHOTO_COLS} FROM photo WHERE thumbnail = ?1");
    let result = conn.query_row(&q, [thumbnail], Photo::from_row);
    match result {
        Ok(p) => Ok(Some(p)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(sqlite_error(e)),
    }
}

/// List all photos ordered by ID.
pub fn list_photos(conn: &Connection) -> Result<Vec<Photo>> {
    let q = format!("SELECT {PHOTO_COLS} FROM photo ORDER BY id");
    let mut stmt = conn.prepare(&q).map_err(sqlite_error)?;
    let rows = stmt
        .query_map([], Photo::from_row)
        .map_err(sqlite_error)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(sqlite_error)?;
    Ok(rows)
}

/// Delete a photo (cascades to its memberships). Returns true if removed.
pub fn delete_photo(conn: &Connection, id: PhotoId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM photo WHERE id = ?1", [id.get()])
        .map_err(sqlite_error)?;
    Ok(n > 0)
}
