use std::sync::Arc;

use crate::{
    auth::IdentityClient,
    domain::ports::inbound::{AvatarService, ListingService},
};

#[derive(Clone)]
pub struct AppState {
    pub listing_service: Arc<dyn ListingService>,
    pub avatar_service: Arc<dyn AvatarService>,
    pub identity: Arc<IdentityClient>,
}
