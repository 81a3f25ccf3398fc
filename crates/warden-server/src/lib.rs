//! HTTP boundary for the Warden credential service: configuration,
//! error mapping, shared state, and the route handlers. The binary in
//! `main.rs` wires these together.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
