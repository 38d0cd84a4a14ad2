mod listings;
mod profiles;

pub use listings::PostgresListingRepository;
pub use profiles::PostgresProfileRepository;
