//! askvote-page
//!
//! The page side of voting: the [`page::Page`] surface a handler reads
//! and updates, an in-memory [`document::Document`] implementing it, and
//! the [`handler::VoteHandler`] that turns clicks into requests and
//! replies into page updates.

pub mod document;
pub mod error;
pub mod events;
pub mod handler;
pub mod page;
