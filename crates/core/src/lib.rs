//! Pure domain logic for the orgst community platform.
//!
//! This crate has no internal dependencies so it can be used by the
//! repository layer, the API server, and any future CLI tooling.

pub mod access;
pub mod docs;
pub mod error;
pub mod roles;
pub mod types;
