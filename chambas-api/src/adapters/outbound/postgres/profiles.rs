use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::{
    models::{Profile, UserId},
    ports::outbound::{ProfileRepository, RecordStoreError},
};

pub struct PostgresProfileRepository {
    pool: PgPool,
}

impl PostgresProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: Uuid,
    display_name: Option<String>,
    avatar_url: Option<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: UserId::new(row.id),
            display_name: row.display_name,
            avatar_url: row.avatar_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ProfileRepository for PostgresProfileRepository {
    async fn find(&self, id: &UserId) -> Result<Option<Profile>, RecordStoreError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, display_name, avatar_url, created_at, updated_at
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| RecordStoreError(err.to_string()))?;

        Ok(row.map(Profile::from))
    }

    async fn update_avatar_url(&self, id: &UserId, url: &str) -> Result<(), RecordStoreError> {
        // Upsert so the first avatar upload creates the profile row.
        sqlx::query(
            r#"
            INSERT INTO profiles (id, avatar_url, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (id) DO UPDATE
            SET avatar_url = EXCLUDED.avatar_url,
                updated_at = now()
            "#,
        )
        .bind(id.as_uuid())
        .bind(url)
        .execute(&self.pool)
        .await
        .map_err(|err| RecordStoreError(err.to_string()))?;

        Ok(())
    }
}
