mod extractor;
mod identity;
mod router;

pub use extractor::AuthUser;
pub use identity::{IdentityClaims, IdentityClient, IdentityError};
pub use router::router;

pub(crate) const SESSION_USER_KEY: &str = "auth.user_id";
