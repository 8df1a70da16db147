//! Collection CRUD operations.
//!
//! Collections are addressed by their unique name everywhere outside this
//! crate; the numeric ID only appears in membership rows.

use gallery_core::{CollectionId, Error, Result};
use rusqlite::Connection;

use crate::error::sqlite_error;
use crate::models::{Collection, CollectionSummary};

fn validate_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("collection name must not be empty"));
    }
    Ok(name)
}

/// Create a new collection.
///
/// Fails with [`Error::UniqueConstraintViolation`] if the name is taken.
pub fn create_collection(conn: &Connection, name: &str) -> Result<Collection> {
    let name = validate_name(name)?;
    conn.execute("INSERT INTO collection (name) VALUES (?1)", [name])
        .map_err(sqlite_error)?;

    Ok(Collection {
        id: CollectionId::from(conn.last_insert_rowid()),
        name: name.to_string(),
    })
}

/// Get the collection with `name`, creating it if it does not exist.
pub fn get_or_create_collection(conn: &Connection, name: &str) -> Result<Collection> {
    let name = validate_name(name)?;
    conn.execute(
        "INSERT INTO collection (name) VALUES (?1) ON CONFLICT(name) DO NOTHING",
        [name],
    )
    .map_err(sqlite_error)?;
    require_collection(conn, name)
}

/// Look up a collection by name.
pub fn get_collection_by_name(conn: &Connection, name: &str) -> Result<Option<Collection>> {
    let result = conn.query_row(
        "SELECT id, name FROM collection WHERE name = ?1",
        [name.trim()],
        Collection::from_row,
    );
    match result {
        Ok(c) => Ok(Some(c)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(sqlite_error(e)),
    }
}

/// Look up a collection by name, failing with [`Error::NotFound`] if absent.
pub fn require_collection(conn: &Connection, name: &str) -> Result<Collection> {
    get_collection_by_name(conn, name)?.ok_or_else(|| Error::not_found("collection", name.trim()))
}

/// List all collections with their member counts, ordered by name.
pub fn list_collections(conn: &Connection) -> Result<Vec<CollectionSummary>> {
    let mut stmt = conn
        .prepare(
            "SELECT c.id, c.name, COUNT(pc.photo_id)
             FROM collection c
             LEFT JOIN photo_collection pc ON pc.collection_id = c.id
             GROUP BY c.id, c.name
             ORDER BY c.name",
        )
        .map_err(sqlite_error)?;
    let rows = stmt
        .query_map([], CollectionSummary::from_row)
        .map_err(sqlite_error)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(sqlite_error)?;
    Ok(rows)
}

/// Delete a collection by name (cascades to memberships). Returns true if removed.
pub fn delete_collection(conn: &Connection, name: &str) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM collection WHERE name = ?1", [name.trim()])
        .map_err(sqlite_error)?;
    Ok(n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;

    #[test]
    fn crud() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let created = create_collection(&conn, "Film").unwrap();
        assert_eq!(created.name, "Film");

        let found = get_collection_by_name(&conn, "Film").unwrap().unwrap();
        assert_eq!(found, created);

        assert!(delete_collection(&conn, "Film").unwrap());
        assert!(get_collection_by_name(&conn, "Film").unwrap().is_none());
        assert!(!delete_collection(&conn, "Film").unwrap());
    }

    #[test]
    fn duplicate_name_is_unique_violation() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        create_collection(&conn, "Film").unwrap();
        let err = create_collection(&conn, "Film").unwrap_err();
        assert!(matches!(err, Error::UniqueConstraintViolation(_)));
    }

    #[test]
    fn blank_name_rejected() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let err = create_collection(&conn, "   ").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn names_are_trimmed() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        create_collection(&conn, " Street ").unwrap();
        assert!(get_collection_by_name(&conn, "Street").unwrap().is_some());
    }

    #[test]
    fn get_or_create_is_stable() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let a = get_or_create_collection(&conn, "Travel").unwrap();
        let b = get_or_create_collection(&conn, "Travel").unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(list_collections(&conn).unwrap().len(), 1);
    }

    #[test]
    fn require_missing_is_not_found() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let err = require_collection(&conn, "nope").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn list_includes_counts() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let travel = create_collection(&conn, "Travel").unwrap();
        create_collection(&conn, "Empty").unwrap();
        conn.execute_batch(
            "INSERT INTO photo (id, filename, thumbnail) VALUES (1, 'a.jpg', 'a-thumb.avif');",
        )
        .unwrap();
        conn.execute(
            "INSERT INTO photo_collection (photo_id, collection_id, sort_order) VALUES (1, ?1, 1)",
            [travel.id.get()],
        )
        .unwrap();

        let list = list_collections(&conn).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].name, "Empty");
        assert_eq!(list[0].photo_count, 0);
        assert_eq!(list[1].name, "Travel");
        assert_eq!(list[1].photo_count, 1);
    }
}
