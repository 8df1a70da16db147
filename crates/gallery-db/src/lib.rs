//! gallery-db: persistence layer for photos, collections, and memberships.
//!
//! This crate provides SQLite-backed storage with connection pooling,
//! embedded migrations, typed models, and query modules. The interesting
//! part is [`queries::memberships`], which keeps each collection's
//! `sort_order` sequence consistent under concurrent writers.
//!
//! # Example
//!
//! ```
//! use gallery_db::pool::{init_memory_pool, get_conn};
//! use gallery_db::models::NewPhoto;
//! use gallery_db::queries::{collections, memberships, photos};
//!
//! let pool = init_memory_pool().unwrap();
//! let conn = get_conn(&pool).unwrap();
//!
//! let photo = photos::insert_photo(&conn, &NewPhoto::new("a.jpg", "a-thumb.avif")).unwrap();
//! collections::create_collection(&conn, "travel").unwrap();
//! memberships::add_photo_to_collection(&conn, photo.id, "travel").unwrap();
//!
//! let listed = memberships::list_collection_photos(&conn, "travel").unwrap();
//! assert_eq!(listed[0].sort_order, 1);
//! ```

mod error;
pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;

pub use error::sqlite_error;
