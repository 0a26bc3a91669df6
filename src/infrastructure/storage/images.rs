use std::collections::HashMap;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::{
    constants::{IMAGES_KEY, MAX_IMAGE_BYTES},
    errors::AppError,
    utils::ids::next_timestamp_ms,
};
use super::StorageFacade;

/// A decoded image ready to be served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Blob map of image id → data URI, kept under a single storage key.
///
/// Ids look like `{kind}_{user_id}_{timestamp}`, e.g. `avatar_42_1718000000000`.
#[derive(Clone)]
pub struct ImageStore {
    storage: StorageFacade,
}

impl ImageStore {
    pub fn new(storage: StorageFacade) -> Self {
        ImageStore { storage }
    }

    pub fn save(&self, kind: &str, user_id: &str, data_uri: &str) -> Result<String, AppError> {
        let image = decode_data_uri(data_uri)?;
        let id = format!("{}_{}_{}", kind, user_id, next_timestamp_ms());

        let mut images: HashMap<String, String> = self.storage.get(IMAGES_KEY).unwrap_or_default();
        images.insert(
            id.clone(),
            format!("data:{};base64,{}", image.mime_type, STANDARD.encode(&image.bytes)),
        );

        if !self.storage.set(IMAGES_KEY, &images) {
            return Err(AppError::InternalError("Could not store image".into()));
        }

        tracing::info!("Stored {} image {} ({} bytes)", kind, id, image.bytes.len());
        Ok(id)
    }

    pub fn get(&self, id: &str) -> Option<StoredImage> {
        let images: HashMap<String, String> = self.storage.get(IMAGES_KEY)?;
        let data_uri = images.get(id)?;

        decode_data_uri(data_uri)
            .map_err(|e| tracing::warn!("Stored image {} is unreadable: {}", id, e))
            .ok()
    }

    pub fn remove(&self, id: &str) -> bool {
        let mut images: HashMap<String, String> = self.storage.get(IMAGES_KEY).unwrap_or_default();
        if images.remove(id).is_none() {
            return false;
        }
        self.storage.set(IMAGES_KEY, &images)
    }
}

const IMAGE_URL_PREFIX: &str = "/api/images/";

/// Public path under which a stored image is served.
pub fn image_url(id: &str) -> String {
    format!("{}{}", IMAGE_URL_PREFIX, id)
}

/// Inverse of [`image_url`]: the image id when `url` points into this store.
pub fn stored_image_id(url: &str) -> Option<&str> {
    url.strip_prefix(IMAGE_URL_PREFIX).filter(|id| !id.is_empty())
}

/// Parses `data:<mime>;base64,<payload>` and checks the bytes really are an image.
pub fn decode_data_uri(data_uri: &str) -> Result<StoredImage, AppError> {
    let rest = data_uri
        .strip_prefix("data:")
        .ok_or_else(|| AppError::InvalidInput("Image must be a data URI".into()))?;

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| AppError::InvalidInput("Malformed data URI".into()))?;

    if !header.ends_with(";base64") {
        return Err(AppError::InvalidInput("Image data URI must be base64 encoded".into()));
    }

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|_| AppError::InvalidInput("Image data is not valid base64".into()))?;

    if bytes.is_empty() {
        return Err(AppError::InvalidInput("Image is empty".into()));
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(AppError::InvalidInput(format!(
            "Image exceeds {} MB",
            MAX_IMAGE_BYTES / (1024 * 1024)
        )));
    }

    let kind = infer::get(&bytes)
        .filter(|kind| kind.matcher_type() == infer::MatcherType::Image)
        .ok_or_else(|| AppError::InvalidInput("Unsupported image format".into()))?;

    Ok(StoredImage {
        mime_type: kind.mime_type().to_string(),
        bytes,
    })
}
