mod avatar;
mod listing;
mod paths;

pub use avatar::AvatarServiceImpl;
pub use listing::ListingServiceImpl;
