//! Farm Service Library
//!
//! Farm and pond resource management with soft-delete lifecycle,
//! referential integrity between ponds and their owning farm, paginated
//! listing, and per-endpoint usage statistics.

pub mod api;
pub mod domain;
pub mod infrastructure;
pub mod service;
