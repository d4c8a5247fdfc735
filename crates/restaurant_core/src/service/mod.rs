//! Use-case services over a `Registry`.
//!
//! # Responsibility
//! - Drive every entity kind through the persistence adapter in one call.
//! - Keep callers unaware of per-kind file handling.

pub mod extent_service;
