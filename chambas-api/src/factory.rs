//! Composition root: the only place that imports concrete outbound
//! adapters and wires them into the domain services.

use std::sync::Arc;

use sqlx::PgPool;
use supastore::StorageClient;

use crate::{
    adapters::outbound::{
        postgres::{PostgresListingRepository, PostgresProfileRepository},
        storage::SupaObjectStore,
    },
    app_state::AppState,
    auth::IdentityClient,
    config::Settings,
    domain::services::{AvatarServiceImpl, ListingServiceImpl},
};

pub fn build_state(pool: PgPool, settings: &Settings) -> AppState {
    let store = Arc::new(SupaObjectStore::new(StorageClient::new(
        &settings.storage.api_url,
        &settings.storage.service_key,
    )));
    let listings = Arc::new(PostgresListingRepository::new(pool.clone()));
    let profiles = Arc::new(PostgresProfileRepository::new(pool));

    AppState {
        listing_service: Arc::new(ListingServiceImpl::new(listings, Arc::clone(&store))),
        avatar_service: Arc::new(AvatarServiceImpl::new(profiles, store)),
        identity: Arc::new(IdentityClient::new(
            &settings.auth.api_url,
            &settings.auth.api_key,
        )),
    }
}
