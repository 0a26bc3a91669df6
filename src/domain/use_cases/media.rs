use validator::Validate;

use crate::{
    entities::media::{MediaItem, MediaType, NewMedia, UpdateMedia},
    errors::AppError,
    repositories::media::MediaRepository,
    utils::ids::next_timestamp_id,
};

/// Media collection operations.
///
/// Filters are linear scans over the full collection on every call; galleries are
/// small and no index is kept.
#[derive(Clone)]
pub struct MediaService<R>
where
    R: MediaRepository,
{
    pub media_repo: R,
}

impl<R> MediaService<R>
where
    R: MediaRepository,
{
    pub fn new(media_repo: R) -> Self {
        MediaService { media_repo }
    }

    pub async fn get_all(&self) -> Result<Vec<MediaItem>, AppError> {
        self.media_repo.list_media().await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<MediaItem>, AppError> {
        self.media_repo.get_media_by_id(id).await
    }

    pub async fn get_by_type(&self, media_type: MediaType) -> Result<Vec<MediaItem>, AppError> {
        self.filter(|item| item.media_type == media_type).await
    }

    pub async fn get_by_category(&self, category: &str) -> Result<Vec<MediaItem>, AppError> {
        self.filter(|item| item.category == category).await
    }

    pub async fn get_by_user(&self, user_id: &str) -> Result<Vec<MediaItem>, AppError> {
        self.filter(|item| item.user_id == user_id).await
    }

    /// Most recent `limit` items by `created_at`, sorted on every call.
    pub async fn get_recent(&self, limit: usize) -> Result<Vec<MediaItem>, AppError> {
        let mut items = self.media_repo.list_media().await?;
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        items.truncate(limit);
        Ok(items)
    }

    /// Items whose id is in `ids`, in collection order. Unknown ids are skipped.
    pub async fn get_favorites(&self, ids: &[String]) -> Result<Vec<MediaItem>, AppError> {
        self.filter(|item| ids.contains(&item.id)).await
    }

    /// Prepends a new item. An id is generated from the clock when none is given.
    pub async fn add(&self, media: NewMedia) -> Result<MediaItem, AppError> {
        media.validate()?;

        let id = media
            .id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(next_timestamp_id);
        let item = media.into_item(id);

        self.media_repo.insert_media(&item).await?;

        tracing::info!(media_id = %item.id, user_id = %item.user_id, "Media added");
        Ok(item)
    }

    /// Applies `changes` when `requester_id` owns the item. `None` covers both a
    /// missing item and a foreign one.
    pub async fn update(
        &self,
        id: &str,
        changes: &UpdateMedia,
        requester_id: &str,
    ) -> Result<Option<MediaItem>, AppError> {
        changes.validate()?;

        let Some(mut item) = self.owned_item(id, requester_id).await? else {
            return Ok(None);
        };

        changes.apply_to(&mut item);

        if self.media_repo.update_media(&item).await? {
            Ok(Some(item))
        } else {
            Ok(None)
        }
    }

    /// Deletes the item when `requester_id` owns it. Returns false otherwise and
    /// leaves the collection untouched.
    pub async fn delete(&self, id: &str, requester_id: &str) -> Result<bool, AppError> {
        if self.owned_item(id, requester_id).await?.is_none() {
            return Ok(false);
        }

        let deleted = self.media_repo.delete_media(id).await?;
        if deleted {
            tracing::info!(media_id = %id, "Media deleted");
        }
        Ok(deleted)
    }

    async fn owned_item(&self, id: &str, requester_id: &str) -> Result<Option<MediaItem>, AppError> {
        let item = self.media_repo.get_media_by_id(id).await?;

        match item {
            Some(item) if item.is_owned_by(requester_id) => Ok(Some(item)),
            Some(_) => {
                tracing::warn!(media_id = %id, requester = %requester_id, "Rejected change by non-owner");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn filter<F>(&self, predicate: F) -> Result<Vec<MediaItem>, AppError>
    where
        F: Fn(&MediaItem) -> bool + Send,
    {
        let items = self.media_repo.list_media().await?;
        Ok(items.into_iter().filter(|item| predicate(item)).collect())
    }
}
