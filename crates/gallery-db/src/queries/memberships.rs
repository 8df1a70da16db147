//! Ordered collection membership.
//!
//! A membership places one photo in one collection at a `sort_order`
//! position. Positions are derived from the rows themselves: a new member is
//! appended at `MAX(sort_order) + 1` of its collection, or `1` when the
//! collection is empty. No counter is stored anywhere else.
//!
//! Appending reads the current maximum and then inserts, so the two steps run
//! inside an IMMEDIATE transaction. SQLite hands out its write lock before the
//! read, which serializes concurrent appends: two writers adding to the same
//! empty collection always end up at 1 and 2.

use gallery_core::{CollectionId, Error, PhotoId, Result};
use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::error::sqlite_error;
use crate::models::{CollectionPhoto, Membership, PHOTO_COLS};
use crate::queries::collections::require_collection;

/// Highest position a membership may hold. Keeps `MAX(sort_order) + 1`
/// well inside SQLite's integer range.
pub const MAX_SORT_ORDER: i64 = i32::MAX as i64;

/// Add a photo to the named collection, appending it at the end.
///
/// Re-adding a photo that is already a member is a no-op: the existing
/// `sort_order` is kept. Returns the membership and whether a row was
/// inserted.
///
/// # Errors
///
/// * [`Error::NotFound`] if no collection has that name (checked before any insert)
/// * [`Error::ForeignKeyViolation`] if `photo_id` does not exist
/// * [`Error::Validation`] if the last position is already [`MAX_SORT_ORDER`]
pub fn add_photo_to_collection(
    conn: &Connection,
    photo_id: PhotoId,
    collection_name: &str,
) -> Result<(Membership, bool)> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)
        .map_err(sqlite_error)?;

    let collection = require_collection(&tx, collection_name)?;

    let last: i64 = tx
        .query_row(
            "SELECT COALESCE(MAX(sort_order), 0) FROM photo_collection
             WHERE collection_id = ?1",
            [collection.id.get()],
            |row| row.get(0),
        )
        .map_err(sqlite_error)?;

    let next_sort = match last.checked_add(1).filter(|n| *n <= MAX_SORT_ORDER) {
        Some(n) => n,
        None => {
            // No room left at the end; re-adding a member is still a no-op.
            let existing = get_membership(&tx, photo_id, collection.id)?;
            tx.commit().map_err(sqlite_error)?;
            return match existing {
                Some(m) => Ok((m, false)),
                None => Err(Error::validation(format!(
                    "collection {} has no position left after {last}",
                    collection.name
                ))),
            };
        }
    };

    let inserted = tx
        .execute(
            "INSERT INTO photo_collection (photo_id, collection_id, sort_order)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(photo_id, collection_id) DO NOTHING",
            rusqlite::params![photo_id.get(), collection.id.get(), next_sort],
        )
        .map_err(sqlite_error)?
        > 0;

    let membership = get_membership(&tx, photo_id, collection.id)?.ok_or_else(|| {
        Error::Internal(format!(
            "membership of photo {photo_id} in {} missing after insert",
            collection.name
        ))
    })?;

    tx.commit().map_err(sqlite_error)?;

    if inserted {
        tracing::debug!(
            photo_id = %photo_id,
            collection = %collection.name,
            sort_order = membership.sort_order,
            "Added photo to collection"
        );
    } else {
        tracing::debug!(
            photo_id = %photo_id,
            collection = %collection.name,
            "Photo already in collection"
        );
    }

    Ok((membership, inserted))
}

/// Remove a photo from the named collection.
///
/// Returns false (not an error) when there was nothing to remove, including
/// when the collection name does not exist.
pub fn remove_photo_from_collection(
    conn: &Connection,
    photo_id: PhotoId,
    collection_name: &str,
) -> Result<bool> {
    let n = conn
        .execute(
            "DELETE FROM photo_collection
             WHERE photo_id = ?1
               AND collection_id = (SELECT id FROM collection WHERE name = ?2)",
            rusqlite::params![photo_id.get(), collection_name.trim()],
        )
        .map_err(sqlite_error)?;
    Ok(n > 0)
}

/// List the photos of the named collection in display order.
///
/// An existing but empty collection yields an empty list; a name that does
/// not exist fails with [`Error::NotFound`].
pub fn list_collection_photos(
    conn: &Connection,
    collection_name: &str,
) -> Result<Vec<CollectionPhoto>> {
    // One read transaction so the existence check and listing see the same snapshot.
    let tx = conn.unchecked_transaction().map_err(sqlite_error)?;
    let collection = require_collection(&tx, collection_name)?;

    let cols = PHOTO_COLS
        .split(", ")
        .map(|c| format!("p.{c}"))
        .collect::<Vec<_>>()
        .join(", ");
    let q = format!(
        "SELECT pc.sort_order, {cols}
         FROM photo_collection pc
         JOIN photo p ON p.id = pc.photo_id
         WHERE pc.collection_id = ?1
         ORDER BY pc.sort_order ASC, p.id ASC"
    );

    let rows = {
        let mut stmt = tx.prepare(&q).map_err(sqlite_error)?;
        let rows = stmt
            .query_map([collection.id.get()], CollectionPhoto::from_row)
            .map_err(sqlite_error)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(sqlite_error)?;
        rows
    };
    tx.commit().map_err(sqlite_error)?;
    Ok(rows)
}

/// Get a single membership row.
pub fn get_membership(
    conn: &Connection,
    photo_id: PhotoId,
    collection_id: CollectionId,
) -> Result<Option<Membership>> {
    let result = conn.query_row(
        "SELECT photo_id, collection_id, sort_order FROM photo_collection
         WHERE photo_id = ?1 AND collection_id = ?2",
        rusqlite::params![photo_id.get(), collection_id.get()],
        Membership::from_row,
    );
    match result {
        Ok(m) => Ok(Some(m)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(sqlite_error(e)),
    }
}

/// Move a member to an explicit position.
///
/// Positions need not be contiguous or unique; ties are listed by photo ID.
/// They must lie in `1..=MAX_SORT_ORDER`.
pub fn set_sort_order(
    conn: &Connection,
    photo_id: PhotoId,
    collection_name: &str,
    sort_order: i64,
) -> Result<()> {
    if !(1..=MAX_SORT_ORDER).contains(&sort_order) {
        return Err(Error::validation(format!(
            "sort order must be between 1 and {MAX_SORT_ORDER}, got {sort_order}"
        )));
    }
    let collection = require_collection(conn, collection_name)?;
    let n = conn
        .execute(
            "UPDATE photo_collection SET sort_order = ?1
             WHERE photo_id = ?2 AND collection_id = ?3",
            rusqlite::params![sort_order, photo_id.get(), collection.id.get()],
        )
        .map_err(sqlite_error)?;
    if n == 0 {
        return Err(Error::not_found(
            "membership",
            format!("photo {photo_id} in {}", collection.name),
        ));
    }
    Ok(())
}

/// Number of photos in the named collection.
pub fn membership_count(conn: &Connection, collection_name: &str) -> Result<i64> {
    let collection = require_collection(conn, collection_name)?;
    conn.query_row(
        "SELECT COUNT(*) FROM photo_collection WHERE collection_id = ?1",
        [collection.id.get()],
        |row| row.get(0),
    )
    .map_err(sqlite_error)
}
