use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    app_state::AppState,
    auth::AuthUser,
    domain::{
        asset_policy::MAX_IMAGES_PER_LISTING,
        models::{
            CandidateFile, Category, Listing, ListingFilter, ListingId, ListingPatch,
            ListingStatus, NewListing, PriceType, RejectedFile,
        },
    },
};

use super::ApiError;

// Five 5 MiB images plus form-field overhead; the asset policy, not the
// transport, should be what rejects an oversized image.
const LISTING_UPLOAD_BODY_LIMIT: usize = 26 * 1024 * 1024;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(browse_listings).post(create_listing))
        .route(
            "/:listing_id",
            get(get_listing).patch(update_listing).delete(delete_listing),
        )
        .route_layer(DefaultBodyLimit::max(LISTING_UPLOAD_BODY_LIMIT))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BrowseParams {
    category: Option<Category>,
    author: Option<Uuid>,
    status: Option<ListingStatus>,
}

#[instrument(name = "GET /listings", skip_all)]
async fn browse_listings(
    State(app_state): State<AppState>,
    Query(params): Query<BrowseParams>,
) -> Result<Json<Vec<Listing>>, ApiError> {
    let filter = ListingFilter {
        category: params.category,
        author: params.author.map(Into::into),
        status: params.status,
    };

    let listings = app_state.listing_service.browse_listings(filter).await?;
    Ok(Json(listings))
}

#[instrument(name = "GET /listings/:id", skip_all)]
async fn get_listing(
    State(app_state): State<AppState>,
    Path(listing_id): Path<Uuid>,
) -> Result<Json<Listing>, ApiError> {
    let listing = app_state
        .listing_service
        .get_listing(&ListingId::new(listing_id))
        .await?;
    Ok(Json(listing))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateListingResponse {
    listing: Listing,
    rejected_files: Vec<RejectedFile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_warning: Option<String>,
}

#[instrument(name = "POST /listings", skip_all, fields(user = %user.id))]
async fn create_listing(
    user: AuthUser,
    State(app_state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<CreateListingResponse>), ApiError> {
    let (form, files) = parse_listing_form(multipart).await?;

    let outcome = app_state
        .listing_service
        .create_listing(&user.id, form, files)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateListingResponse {
            listing: outcome.listing,
            rejected_files: outcome.rejected_files,
            image_warning: outcome.image_warning,
        }),
    ))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateListingBody {
    title: Option<String>,
    description: Option<String>,
    category: Option<Category>,
    price: Option<f64>,
    price_type: Option<PriceType>,
    /// Absent = untouched, `null` = clear, string = set.
    #[serde(default, with = "serde_with::rust::double_option")]
    location: Option<Option<String>>,
    contact_info: Option<String>,
    tags: Option<Vec<String>>,
    status: Option<ListingStatus>,
}

#[instrument(name = "PATCH /listings/:id", skip_all, fields(user = %user.id))]
async fn update_listing(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(listing_id): Path<Uuid>,
    Json(body): Json<UpdateListingBody>,
) -> Result<Json<Listing>, ApiError> {
    let patch = ListingPatch {
        title: body.title,
        description: body.description,
        category: body.category,
        price: body.price,
        price_type: body.price_type,
        location: body.location,
        contact_info: body.contact_info,
        tags: body.tags,
        status: body.status,
    };

    let listing = app_state
        .listing_service
        .update_listing(&user.id, &ListingId::new(listing_id), patch)
        .await?;
    Ok(Json(listing))
}

#[instrument(name = "DELETE /listings/:id", skip_all, fields(user = %user.id))]
async fn delete_listing(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(listing_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .listing_service
        .delete_listing(&user.id, &ListingId::new(listing_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Pull the form fields and image files out of the multipart payload.
async fn parse_listing_form(
    mut multipart: Multipart,
) -> Result<(NewListing, Vec<CandidateFile>), ApiError> {
    let mut title = None;
    let mut description = None;
    let mut category = None;
    let mut price = None;
    let mut price_type = None;
    let mut location = None;
    let mut contact_info = None;
    let mut tags = Vec::new();
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::bad_request("failed to parse multipart field"))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "images" => {
                if files.len() >= MAX_IMAGES_PER_LISTING {
                    return Err(ApiError::bad_request(format!(
                        "at most {MAX_IMAGES_PER_LISTING} images are allowed"
                    )));
                }
                let file_name = field.file_name().unwrap_or("image").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| ApiError::bad_request("failed to read image payload"))?;
                files.push(CandidateFile::new(file_name, content_type, bytes.to_vec()));
            }
            _ => {
                let value = field
                    .text()
                    .await
                    .map_err(|_| ApiError::bad_request("failed to read form field"))?;
                match name.as_str() {
                    "title" => title = Some(value),
                    "description" => description = Some(value),
                    "category" => {
                        category = Some(value.parse::<Category>().map_err(|_| {
                            ApiError::bad_request(format!("unknown category: {value}"))
                        })?);
                    }
                    "price" => {
                        price = Some(value.parse::<f64>().map_err(|_| {
                            ApiError::bad_request(format!("invalid price: {value}"))
                        })?);
                    }
                    "priceType" => {
                        price_type = Some(value.parse::<PriceType>().map_err(|_| {
                            ApiError::bad_request(format!("unknown price type: {value}"))
                        })?);
                    }
                    "location" => location = Some(value),
                    "contactInfo" => contact_info = Some(value),
                    "tags" => tags.extend(
                        value
                            .split(',')
                            .map(str::trim)
                            .filter(|tag| !tag.is_empty())
                            .map(str::to_string),
                    ),
                    _ => {}
                }
            }
        }
    }

    let form = NewListing {
        title: title.ok_or_else(|| ApiError::bad_request("missing field: title"))?,
        description: description
            .ok_or_else(|| ApiError::bad_request("missing field: description"))?,
        category: category.ok_or_else(|| ApiError::bad_request("missing field: category"))?,
        price: price.ok_or_else(|| ApiError::bad_request("missing field: price"))?,
        price_type: price_type
            .ok_or_else(|| ApiError::bad_request("missing field: priceType"))?,
        location: location.filter(|l| !l.trim().is_empty()),
        contact_info: contact_info
            .ok_or_else(|| ApiError::bad_request("missing field: contactInfo"))?,
        tags,
    };

    Ok((form, files))
}
