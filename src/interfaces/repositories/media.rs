use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    constants::MEDIA_KEY,
    entities::media::{MediaItem, MediaType},
    errors::AppError,
    repositories::{kv_repo::KvMediaRepo, sqlx_repo::SqlxMediaRepo},
};

#[async_trait]
pub trait MediaRepository: Send + Sync {
    /// Every item, newest first.
    async fn list_media(&self) -> Result<Vec<MediaItem>, AppError>;
    async fn get_media_by_id(&self, id: &str) -> Result<Option<MediaItem>, AppError>;
    async fn insert_media(&self, item: &MediaItem) -> Result<(), AppError>;
    /// Returns false when no item has `item.id`.
    async fn update_media(&self, item: &MediaItem) -> Result<bool, AppError>;
    /// Returns false when no item has `id`.
    async fn delete_media(&self, id: &str) -> Result<bool, AppError>;
}

pub type DynMediaRepo = Arc<dyn MediaRepository>;

#[async_trait]
impl<T: MediaRepository + ?Sized> MediaRepository for Arc<T> {
    async fn list_media(&self) -> Result<Vec<MediaItem>, AppError> {
        (**self).list_media().await
    }

    async fn get_media_by_id(&self, id: &str) -> Result<Option<MediaItem>, AppError> {
        (**self).get_media_by_id(id).await
    }

    async fn insert_media(&self, item: &MediaItem) -> Result<(), AppError> {
        (**self).insert_media(item).await
    }

    async fn update_media(&self, item: &MediaItem) -> Result<bool, AppError> {
        (**self).update_media(item).await
    }

    async fn delete_media(&self, id: &str) -> Result<bool, AppError> {
        (**self).delete_media(id).await
    }
}

// ───── Key-value backend ─────────────────────────────────────────────
// Whole-collection read, mutate, write back. Assumes a single writer per store.

impl KvMediaRepo {
    fn load(&self) -> Vec<MediaItem> {
        self.storage.get_list(MEDIA_KEY)
    }

    fn save(&self, items: &[MediaItem]) -> Result<(), AppError> {
        if self.storage.set(MEDIA_KEY, items) {
            Ok(())
        } else {
            Err(AppError::InternalError("Could not save media".into()))
        }
    }
}

#[async_trait]
impl MediaRepository for KvMediaRepo {
    async fn list_media(&self) -> Result<Vec<MediaItem>, AppError> {
        Ok(self.load())
    }

    async fn get_media_by_id(&self, id: &str) -> Result<Option<MediaItem>, AppError> {
        Ok(self.load().into_iter().find(|item| item.id == id))
    }

    async fn insert_media(&self, item: &MediaItem) -> Result<(), AppError> {
        let mut items = self.load();
        if items.iter().any(|existing| existing.id == item.id) {
            return Err(AppError::Conflict(format!("Media {} already exists", item.id)));
        }

        items.insert(0, item.clone());
        self.save(&items)
    }

    async fn update_media(&self, item: &MediaItem) -> Result<bool, AppError> {
        let mut items = self.load();
        let Some(slot) = items.iter_mut().find(|existing| existing.id == item.id) else {
            return Ok(false);
        };

        *slot = item.clone();
        self.save(&items).map(|_| true)
    }

    async fn delete_media(&self, id: &str) -> Result<bool, AppError> {
        let mut items = self.load();
        let before = items.len();
        items.retain(|item| item.id != id);

        if items.len() == before {
            return Ok(false);
        }
        self.save(&items).map(|_| true)
    }
}

// ───── Postgres backend ──────────────────────────────────────────────

#[derive(Debug, sqlx::FromRow)]
struct MediaRow {
    id: String,
    title: String,
    url: String,
    #[sqlx(rename = "type")]
    media_type: String,
    category: String,
    thumbnail_url: Option<String>,
    user_id: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<MediaRow> for MediaItem {
    type Error = AppError;

    fn try_from(row: MediaRow) -> Result<Self, Self::Error> {
        Ok(MediaItem {
            media_type: row.media_type.parse::<MediaType>()?,
            id: row.id,
            title: row.title,
            url: row.url,
            category: row.category,
            thumbnail: row.thumbnail_url,
            created_at: row.created_at,
            user_id: row.user_id,
        })
    }
}

const MEDIA_COLUMNS: &str = "id, title, url, type, category, thumbnail_url, user_id, created_at";

impl SqlxMediaRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxMediaRepo { pool }
    }
}

#[async_trait]
impl MediaRepository for SqlxMediaRepo {
    async fn list_media(&self) -> Result<Vec<MediaItem>, AppError> {
        let rows = sqlx::query_as::<_, MediaRow>(&format!(
            "SELECT {MEDIA_COLUMNS} FROM media ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(MediaItem::try_from).collect()
    }

    async fn get_media_by_id(&self, id: &str) -> Result<Option<MediaItem>, AppError> {
        let row = sqlx::query_as::<_, MediaRow>(&format!(
            "SELECT {MEDIA_COLUMNS} FROM media WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(MediaItem::try_from).transpose()
    }

    async fn insert_media(&self, item: &MediaItem) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO media (id, title, url, type, category, thumbnail_url, user_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&item.id)
        .bind(&item.title)
        .bind(&item.url)
        .bind(item.media_type.as_str())
        .bind(&item.category)
        .bind(&item.thumbnail)
        .bind(&item.user_id)
        .bind(item.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::Conflict(_) => AppError::Conflict(format!("Media {} already exists", item.id)),
            other => other,
        })?;

        Ok(())
    }

    async fn update_media(&self, item: &MediaItem) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE media SET
                title = $2,
                url = $3,
                type = $4,
                category = $5,
                thumbnail_url = $6
            WHERE id = $1
            "#,
        )
        .bind(&item.id)
        .bind(&item.title)
        .bind(&item.url)
        .bind(item.media_type.as_str())
        .bind(&item.category)
        .bind(&item.thumbnail)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_media(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM media WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
