mod avatar;
mod listings;

pub use avatar::*;
pub use listings::*;
