//! Database query modules.

pub mod collections;
pub mod memberships;
pub mod photos;
