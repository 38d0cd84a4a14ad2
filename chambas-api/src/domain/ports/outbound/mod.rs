mod listings;
mod mock;
mod object_store;
mod profiles;

use thiserror::Error;

pub use listings::*;
pub use mock::*;
pub use object_store::*;
pub use profiles::*;

/// A record-store call failed; carries the backing store's message.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct RecordStoreError(pub String);
