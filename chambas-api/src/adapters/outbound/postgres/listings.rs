use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::{
    models::{Listing, ListingFilter, ListingId, ListingPatch, NewListing, UserId},
    ports::outbound::{ListingRepository, RecordStoreError},
};

const LISTING_COLUMNS: &str = "id, author_id, title, description, category, price, price_type, \
                               location, contact_info, tags, status, image_urls, created_at, updated_at";

pub struct PostgresListingRepository {
    pool: PgPool,
}

impl PostgresListingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Raw row shape; enum columns are stored as text and parsed on the way
/// out so the domain types never depend on sqlx.
#[derive(sqlx::FromRow)]
struct ListingRow {
    id: Uuid,
    author_id: Uuid,
    title: String,
    description: String,
    category: String,
    price: f64,
    price_type: String,
    location: Option<String>,
    contact_info: String,
    tags: Vec<String>,
    status: String,
    image_urls: Vec<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl TryFrom<ListingRow> for Listing {
    type Error = RecordStoreError;

    fn try_from(row: ListingRow) -> Result<Self, Self::Error> {
        Ok(Listing {
            id: ListingId::new(row.id),
            author_id: UserId::new(row.author_id),
            title: row.title,
            description: row.description,
            category: row
                .category
                .parse()
                .map_err(|_| RecordStoreError(format!("unknown category: {}", row.category)))?,
            price: row.price,
            price_type: row
                .price_type
                .parse()
                .map_err(|_| RecordStoreError(format!("unknown price type: {}", row.price_type)))?,
            location: row.location,
            contact_info: row.contact_info,
            tags: row.tags,
            status: row
                .status
                .parse()
                .map_err(|_| RecordStoreError(format!("unknown status: {}", row.status)))?,
            image_urls: row.image_urls,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl ListingRepository for PostgresListingRepository {
    async fn insert(&self, author: &UserId, new: &NewListing) -> Result<Listing, RecordStoreError> {
        let row = sqlx::query_as::<_, ListingRow>(&format!(
            r#"
            INSERT INTO listings
                (author_id, title, description, category, price, price_type,
                 location, contact_info, tags)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {LISTING_COLUMNS}
            "#
        ))
        .bind(author.as_uuid())
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.category.to_string())
        .bind(new.price)
        .bind(new.price_type.to_string())
        .bind(&new.location)
        .bind(&new.contact_info)
        .bind(&new.tags)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| RecordStoreError(err.to_string()))?;

        row.try_into()
    }

    async fn find(&self, id: &ListingId) -> Result<Option<Listing>, RecordStoreError> {
        let row = sqlx::query_as::<_, ListingRow>(&format!(
            "SELECT {LISTING_COLUMNS} FROM listings WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| RecordStoreError(err.to_string()))?;

        row.map(Listing::try_from).transpose()
    }

    async fn browse(&self, filter: &ListingFilter) -> Result<Vec<Listing>, RecordStoreError> {
        let mut query = QueryBuilder::<sqlx::Postgres>::new(format!(
            "SELECT {LISTING_COLUMNS} FROM listings WHERE true"
        ));

        if let Some(category) = filter.category {
            query.push(" AND category = ").push_bind(category.to_string());
        }
        if let Some(author) = filter.author {
            query.push(" AND author_id = ").push_bind(author.as_uuid());
        }
        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status.to_string());
        }
        query.push(" ORDER BY created_at DESC");

        let rows = query
            .build_query_as::<ListingRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|err| RecordStoreError(err.to_string()))?;

        rows.into_iter().map(Listing::try_from).collect()
    }

    async fn update_images(
        &self,
        id: &ListingId,
        urls: &[String],
    ) -> Result<(), RecordStoreError> {
        sqlx::query("UPDATE listings SET image_urls = $2, updated_at = now() WHERE id = $1")
            .bind(id.as_uuid())
            .bind(urls)
            .execute(&self.pool)
            .await
            .map_err(|err| RecordStoreError(err.to_string()))?;

        Ok(())
    }

    async fn update(
        &self,
        id: &ListingId,
        patch: &ListingPatch,
    ) -> Result<Listing, RecordStoreError> {
        let row = sqlx::query_as::<_, ListingRow>(&format!(
            r#"
            UPDATE listings SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                price = COALESCE($5, price),
                price_type = COALESCE($6, price_type),
                location = CASE WHEN $11 THEN $7 ELSE location END,
                contact_info = COALESCE($8, contact_info),
                tags = COALESCE($9, tags),
                status = COALESCE($10, status),
                updated_at = now()
            WHERE id = $1
            RETURNING {LISTING_COLUMNS}
            "#
        ))
        .bind(id.as_uuid())
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(patch.category.map(|c| c.to_string()))
        .bind(patch.price)
        .bind(patch.price_type.map(|p| p.to_string()))
        .bind(patch.location.clone().flatten())
        .bind(&patch.contact_info)
        .bind(&patch.tags)
        .bind(patch.status.map(|s| s.to_string()))
        .bind(patch.location.is_some())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| RecordStoreError(err.to_string()))?;

        row.try_into()
    }

    async fn delete(&self, id: &ListingId) -> Result<(), RecordStoreError> {
        sqlx::query("DELETE FROM listings WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|err| RecordStoreError(err.to_string()))?;

        Ok(())
    }
}
