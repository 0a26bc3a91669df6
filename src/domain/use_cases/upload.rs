use url::Url;

use crate::{
    entities::media::{MediaItem, MediaType, NewMedia, UploadMediaRequest},
    errors::AppError,
    infrastructure::storage::{images::{image_url, stored_image_id}, ImageStore},
    repositories::media::MediaRepository,
    use_cases::media::MediaService,
    utils::thumbnail::resolve_thumbnail,
};

/// Turns a link or a captured image into a stored media record.
#[derive(Clone)]
pub struct UploadService<R>
where
    R: MediaRepository,
{
    media_service: MediaService<R>,
    images: ImageStore,
}

impl<R> UploadService<R>
where
    R: MediaRepository,
{
    pub fn new(media_service: MediaService<R>, images: ImageStore) -> Self {
        UploadService { media_service, images }
    }

    /// Validates the request, works out a thumbnail and adds the item.
    ///
    /// `url` is either an http(s) link or, for images captured from a camera or
    /// file picker, a data URI that gets moved into the image store.
    pub async fn upload_media(
        &self,
        request: UploadMediaRequest,
        user_id: &str,
    ) -> Result<MediaItem, AppError> {
        let media_type: MediaType = request.media_type.parse()?;
        let raw_url = request.url.trim();

        if raw_url.is_empty() {
            return Err(AppError::InvalidInput("URL is required".into()));
        }

        // Images written to the store by this upload; dropped again if the upload fails.
        let mut stored = Vec::new();

        let result = self
            .build_and_add(&request, raw_url, media_type, user_id, &mut stored)
            .await;

        if result.is_err() {
            for image_id in &stored {
                self.images.remove(image_id);
            }
        }

        result
    }

    async fn build_and_add(
        &self,
        request: &UploadMediaRequest,
        raw_url: &str,
        media_type: MediaType,
        user_id: &str,
        stored: &mut Vec<String>,
    ) -> Result<MediaItem, AppError> {
        let (url, default_thumbnail) = if raw_url.starts_with("data:") {
            if media_type != MediaType::Image {
                return Err(AppError::InvalidInput("Only images can be uploaded from a capture".into()));
            }
            let image_id = self.images.save("media", user_id, raw_url)?;
            let url = image_url(&image_id);
            stored.push(image_id);
            (url.clone(), url)
        } else {
            check_web_url(raw_url)?;
            (raw_url.to_string(), resolve_thumbnail(raw_url, media_type))
        };

        let thumbnail = match request.custom_thumbnail.as_deref().map(str::trim) {
            Some(data_uri) if !data_uri.is_empty() => {
                let image_id = self.images.save("thumbnail", user_id, data_uri)?;
                let thumbnail = image_url(&image_id);
                stored.push(image_id);
                thumbnail
            }
            _ => default_thumbnail,
        };

        self.media_service
            .add(NewMedia {
                id: None,
                title: request.title.clone(),
                url,
                media_type,
                category: request.category.clone(),
                thumbnail: Some(thumbnail),
                user_id: user_id.to_string(),
                created_at: None,
            })
            .await
    }

    /// Deletes an item owned by `requester_id` together with any images it stored.
    pub async fn remove_media(&self, id: &str, requester_id: &str) -> Result<bool, AppError> {
        let Some(item) = self.media_service.get_by_id(id).await? else {
            return Ok(false);
        };

        if !self.media_service.delete(id, requester_id).await? {
            return Ok(false);
        }

        for url in std::iter::once(item.url.as_str()).chain(item.thumbnail.as_deref()) {
            if let Some(image_id) = stored_image_id(url) {
                self.images.remove(image_id);
            }
        }

        Ok(true)
    }
}

fn check_web_url(raw: &str) -> Result<(), AppError> {
    let url = Url::parse(raw).map_err(|_| AppError::InvalidInput(format!("Invalid URL: {}", raw)))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(AppError::InvalidInput(format!("Unsupported URL scheme: {}", scheme))),
    }
}
