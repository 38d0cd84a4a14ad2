mod ids;
mod listing;
mod media;
mod profile;

pub use ids::*;
pub use listing::*;
pub use media::*;
pub use profile::*;
