use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{domain::validation::validate_not_blank, errors::AppError};

// ───── Constants ──────────────────────────────────────────────────────
const MAX_TITLE_LENGTH: u64 = 200;
const MAX_CATEGORY_LENGTH: u64 = 60;
const MAX_URL_LENGTH: u64 = 2048;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
        }
    }
}

impl FromStr for MediaType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "image" => Ok(MediaType::Image),
            "video" => Ok(MediaType::Video),
            other => Err(AppError::InvalidInput(format!(
                "Invalid media type '{}': expected image or video",
                other
            ))),
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A gallery entry. `user_id` is the only actor allowed to update or delete it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub created_at: DateTime<Utc>,
    pub user_id: String,
}

impl MediaItem {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewMedia {
    #[serde(default)]
    pub id: Option<String>,

    #[validate(
        length(max = MAX_TITLE_LENGTH, message = "Title is too long"),
        custom(function = "validate_not_blank", message = "Title is required")
    )]
    pub title: String,

    #[validate(
        length(max = MAX_URL_LENGTH, message = "URL is too long"),
        custom(function = "validate_not_blank", message = "URL is required")
    )]
    pub url: String,

    #[serde(rename = "type")]
    pub media_type: MediaType,

    #[validate(
        length(max = MAX_CATEGORY_LENGTH, message = "Category is too long"),
        custom(function = "validate_not_blank", message = "Category is required")
    )]
    pub category: String,

    #[serde(default)]
    pub thumbnail: Option<String>,

    #[validate(length(min = 1, message = "Owner is required"))]
    pub user_id: String,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl NewMedia {
    pub fn into_item(self, id: String) -> MediaItem {
        MediaItem {
            id,
            title: self.title.trim().to_string(),
            url: self.url.trim().to_string(),
            media_type: self.media_type,
            category: self.category.trim().to_string(),
            thumbnail: self.thumbnail,
            created_at: self.created_at.unwrap_or_else(Utc::now),
            user_id: self.user_id,
        }
    }
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMedia {
    #[validate(
        length(max = MAX_TITLE_LENGTH, message = "Title is too long"),
        custom(function = "validate_not_blank", message = "Title cannot be empty")
    )]
    pub title: Option<String>,

    #[validate(
        length(max = MAX_CATEGORY_LENGTH, message = "Category is too long"),
        custom(function = "validate_not_blank", message = "Category cannot be empty")
    )]
    pub category: Option<String>,

    pub thumbnail: Option<String>,
}

impl UpdateMedia {
    pub fn apply_to(&self, item: &mut MediaItem) {
        if let Some(title) = &self.title {
            item.title = title.trim().to_string();
        }
        if let Some(category) = &self.category {
            item.category = category.trim().to_string();
        }
        if let Some(thumbnail) = &self.thumbnail {
            item.thumbnail = Some(thumbnail.clone());
        }
    }
}

/// Body of an upload. `media_type` stays a string so a bad value surfaces as a
/// validation failure instead of a JSON decode error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadMediaRequest {
    pub url: String,
    #[serde(rename = "type")]
    pub media_type: String,
    pub title: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_thumbnail: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MediaQuery {
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    pub category: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<usize>,
}
