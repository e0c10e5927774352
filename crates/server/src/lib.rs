//! HTTP server for the ticket analyst.
//!
//! Exposed as a library so integration tests can build the router
//! in-process with mock dependencies injected.

pub mod api;
pub mod state;
