//! askvote-client
//!
//! Everything needed to get a vote to the forum server: CSRF token
//! resolution, the transport abstraction, the HTTP transport and the
//! client configuration file.

pub mod config;
pub mod csrf;
pub mod error;
pub mod http;
pub mod transport;
