use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

// ───── Storage keys ─────────────────────────────────────────────────
pub const MEDIA_KEY: &str = "gallery:media";
pub const COMMENTS_KEY: &str = "gallery:comments";
pub const USERS_KEY: &str = "gallery:users";
pub const CURRENT_USER_KEY: &str = "gallery:current_user";
pub const REMEMBER_ME_KEY: &str = "gallery:remember_me";
pub const IMAGES_KEY: &str = "gallery:images";
pub const SESSION_ACTIVE_KEY: &str = "gallery:session_active";
pub const MIGRATED_KEY: &str = "gallery:migrated";

/// Pre-namespace keys and the keys they move to.
pub const LEGACY_KEYS: &[(&str, &str)] = &[
    ("media", MEDIA_KEY),
    ("comments", COMMENTS_KEY),
    ("users", USERS_KEY),
    ("currentUser", CURRENT_USER_KEY),
    ("rememberMe", REMEMBER_ME_KEY),
    ("profileImages", IMAGES_KEY),
];

// ───── Limits ───────────────────────────────────────────────────────
pub const HISTORY_LIMIT: usize = 100;
pub const DEFAULT_RECENT_LIMIT: usize = 12;
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
pub const MIN_PASSWORD_LENGTH: u64 = 6;

pub const VIDEO_PLACEHOLDER_THUMBNAIL: &str = "/images/video-placeholder.png";
