use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::validation::validate_not_blank;

const MAX_COMMENT_LENGTH: u64 = 1000;

/// A comment on a media item; deletable only by its author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub media_id: String,
    pub user_id: String,
    pub user_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_avatar: Option<String>,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn is_authored_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

#[derive(Debug, Clone, Validate)]
pub struct NewComment {
    #[validate(length(min = 1, message = "Media is required"))]
    pub media_id: String,

    #[validate(length(min = 1, message = "Author is required"))]
    pub user_id: String,

    pub user_name: String,

    pub user_avatar: Option<String>,

    #[validate(
        length(max = MAX_COMMENT_LENGTH, message = "Comment is too long"),
        custom(function = "validate_not_blank", message = "Comment cannot be empty")
    )]
    pub text: String,
}

impl NewComment {
    pub fn into_comment(self, id: String) -> Comment {
        Comment {
            id,
            media_id: self.media_id,
            user_id: self.user_id,
            user_name: self.user_name,
            user_avatar: self.user_avatar,
            text: self.text.trim().to_string(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub text: String,
}
