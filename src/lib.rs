//! Gallery - photo thumbnailing, uploads and ordered collections
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod processor;
pub mod storage;
pub mod thumbnail;
