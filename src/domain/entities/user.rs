use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use validator::Validate;

use crate::constants::HISTORY_LIMIT;
use crate::domain::validation::{normalize_email, validate_not_blank, validate_password};

/// Canonical user record. `email` is always stored normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub favorites: Vec<String>,
    #[serde(default)]
    pub history: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn has_favorite(&self, media_id: &str) -> bool {
        self.favorites.iter().any(|id| id == media_id)
    }

    /// Returns false when the id was already a favorite.
    pub fn add_favorite(&mut self, media_id: &str) -> bool {
        if self.has_favorite(media_id) {
            return false;
        }
        self.favorites.push(media_id.to_string());
        true
    }

    /// Returns false when the id was not a favorite.
    pub fn remove_favorite(&mut self, media_id: &str) -> bool {
        let before = self.favorites.len();
        self.favorites.retain(|id| id != media_id);
        self.favorites.len() != before
    }

    /// Moves `media_id` to the front of the history, dropping anything past the limit.
    pub fn record_view(&mut self, media_id: &str) {
        self.history.retain(|id| id != media_id);
        self.history.insert(0, media_id.to_string());
        self.history.truncate(HISTORY_LIMIT);
    }
}

/// User fields safe to hand to clients and to keep in a session snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub favorites: Vec<String>,
    #[serde(default)]
    pub history: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        PublicUser {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            image: user.image.clone(),
            favorites: user.favorites.clone(),
            history: user.history.clone(),
            created_at: user.created_at,
        }
    }
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        PublicUser {
            id: user.id,
            name: user.name,
            email: user.email,
            image: user.image,
            favorites: user.favorites,
            history: user.history,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewUser {
    #[validate(
        length(max = 80, message = "Name is too long"),
        custom(function = "validate_not_blank", message = "Name is required")
    )]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(custom(
        function = "validate_password",
        message = "Password must be at least 6 characters"
    ))]
    pub password: String,
}

impl NewUser {
    pub fn prepare_for_insert(&self, id: String, password_hash: String) -> User {
        User {
            id,
            name: self.name.trim().to_string(),
            email: normalize_email(&self.email),
            password_hash,
            image: None,
            favorites: Vec::new(),
            history: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginUser {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,

    #[serde(default)]
    pub remember: bool,
}

/// Profile edit. `image` is a data URI for a new avatar.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfile {
    #[validate(
        length(max = 80, message = "Name is too long"),
        custom(function = "validate_not_blank", message = "Name cannot be empty")
    )]
    pub name: Option<String>,

    pub image: Option<String>,
}
