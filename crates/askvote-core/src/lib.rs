//! askvote-core
//!
//! Pure domain types for forum voting: vote targets, wire payloads,
//! button highlighting and page element conventions.
//! No I/O here; this is the shared vocabulary of the askvote crates.

pub mod error;
pub mod models;
pub mod page_keys;
