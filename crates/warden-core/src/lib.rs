//! Core abstractions for Warden: the user domain model, pure registry
//! operations, password hashing, and the storage contract.
//! This crate is intentionally small to keep dependency surface minimal.

pub mod password;
pub mod registry;
pub mod store;
pub mod user;
