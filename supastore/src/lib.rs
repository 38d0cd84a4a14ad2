//! Client for a Supabase-compatible object storage REST API.
//!
//! Exposes path-addressed blob upload, batch removal, prefix listing and
//! public URL derivation. No retries and no business rules live here.

mod client;
mod error;
mod models;

pub use client::StorageClient;
pub use error::StorageError;
pub use models::ObjectEntry;
