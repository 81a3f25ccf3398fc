//! Encrypted-at-rest persistence for the user collection.
//! AES-256-CBC with a fresh IV per save; keys come from a `KeyProvider`
//! (external configuration or the OS keyring, never hardcoded).

pub mod cipher;
pub mod key_provider;
pub mod user_file_store;
