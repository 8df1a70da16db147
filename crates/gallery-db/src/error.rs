//! Translation of SQLite failures into the typed gallery error.

use gallery_core::Error;
use rusqlite::ffi;

/// Convert a `rusqlite` error into [`Error`].
///
/// Foreign key and uniqueness failures are recognised by their extended
/// result code and surfaced as [`Error::ForeignKeyViolation`] and
/// [`Error::UniqueConstraintViolation`]; everything else becomes
/// [`Error::Database`].
pub fn sqlite_error(e: rusqlite::Error) -> Error {
    if let rusqlite::Error::SqliteFailure(err, msg) = &e {
        if err.code == rusqlite::ErrorCode::ConstraintViolation {
            let detail = msg.clone().unwrap_or_else(|| err.to_string());
            match err.extended_code {
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => return Error::ForeignKeyViolation(detail),
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                    return Error::UniqueConstraintViolation(detail)
                }
                _ => {}
            }
        }
    }
    Error::database(e.to_string())
}
