use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    constants::COMMENTS_KEY,
    entities::comment::Comment,
    errors::AppError,
    repositories::{kv_repo::KvCommentRepo, sqlx_repo::SqlxCommentRepo},
};

#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Every comment, newest first.
    async fn list_comments(&self) -> Result<Vec<Comment>, AppError>;
    async fn get_comment_by_id(&self, id: &str) -> Result<Option<Comment>, AppError>;
    async fn insert_comment(&self, comment: &Comment) -> Result<(), AppError>;
    async fn delete_comment(&self, id: &str) -> Result<bool, AppError>;
    /// Returns how many comments were removed.
    async fn delete_comments_for_media(&self, media_id: &str) -> Result<u64, AppError>;
}

pub type DynCommentRepo = Arc<dyn CommentRepository>;

#[async_trait]
impl<T: CommentRepository + ?Sized> CommentRepository for Arc<T> {
    async fn list_comments(&self) -> Result<Vec<Comment>, AppError> {
        (**self).list_comments().await
    }

    async fn get_comment_by_id(&self, id: &str) -> Result<Option<Comment>, AppError> {
        (**self).get_comment_by_id(id).await
    }

    async fn insert_comment(&self, comment: &Comment) -> Result<(), AppError> {
        (**self).insert_comment(comment).await
    }

    async fn delete_comment(&self, id: &str) -> Result<bool, AppError> {
        (**self).delete_comment(id).await
    }

    async fn delete_comments_for_media(&self, media_id: &str) -> Result<u64, AppError> {
        (**self).delete_comments_for_media(media_id).await
    }
}

// ───── Key-value backend ─────────────────────────────────────────────

impl KvCommentRepo {
    fn load(&self) -> Vec<Comment> {
        self.storage.get_list(COMMENTS_KEY)
    }

    fn save(&self, comments: &[Comment]) -> Result<(), AppError> {
        if self.storage.set(COMMENTS_KEY, comments) {
            Ok(())
        } else {
            Err(AppError::InternalError("Could not save comments".into()))
        }
    }
}

#[async_trait]
impl CommentRepository for KvCommentRepo {
    async fn list_comments(&self) -> Result<Vec<Comment>, AppError> {
        Ok(self.load())
    }

    async fn get_comment_by_id(&self, id: &str) -> Result<Option<Comment>, AppError> {
        Ok(self.load().into_iter().find(|comment| comment.id == id))
    }

    async fn insert_comment(&self, comment: &Comment) -> Result<(), AppError> {
        let mut comments = self.load();
        comments.insert(0, comment.clone());
        self.save(&comments)
    }

    async fn delete_comment(&self, id: &str) -> Result<bool, AppError> {
        let mut comments = self.load();
        let before = comments.len();
        comments.retain(|comment| comment.id != id);

        if comments.len() == before {
            return Ok(false);
        }
        self.save(&comments).map(|_| true)
    }

    async fn delete_comments_for_media(&self, media_id: &str) -> Result<u64, AppError> {
        let mut comments = self.load();
        let before = comments.len();
        comments.retain(|comment| comment.media_id != media_id);

        let removed = (before - comments.len()) as u64;
        if removed > 0 {
            self.save(&comments)?;
        }
        Ok(removed)
    }
}

// ───── Postgres backend ──────────────────────────────────────────────
// Author name and avatar are not stored on the row; they come from `users`.

const COMMENT_SELECT: &str = r#"
    SELECT c.id, c.media_id, c.user_id, u.name AS user_name, u.image_url AS user_avatar,
           c.text, c.created_at
    FROM comments c
    JOIN users u ON u.id = c.user_id
"#;

#[derive(Debug, sqlx::FromRow)]
struct CommentRow {
    id: String,
    media_id: String,
    user_id: String,
    user_name: String,
    user_avatar: Option<String>,
    text: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.id,
            media_id: row.media_id,
            user_id: row.user_id,
            user_name: row.user_name,
            user_avatar: row.user_avatar,
            text: row.text,
            created_at: row.created_at,
        }
    }
}

impl SqlxCommentRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxCommentRepo { pool }
    }
}

#[async_trait]
impl CommentRepository for SqlxCommentRepo {
    async fn list_comments(&self) -> Result<Vec<Comment>, AppError> {
        let rows = sqlx::query_as::<_, CommentRow>(&format!(
            "{COMMENT_SELECT} ORDER BY c.created_at DESC, c.id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }

    async fn get_comment_by_id(&self, id: &str) -> Result<Option<Comment>, AppError> {
        let row = sqlx::query_as::<_, CommentRow>(&format!("{COMMENT_SELECT} WHERE c.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Comment::from))
    }

    async fn insert_comment(&self, comment: &Comment) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, media_id, user_id, text, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&comment.id)
        .bind(&comment.media_id)
        .bind(&comment.user_id)
        .bind(&comment.text)
        .bind(comment.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_comment(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_comments_for_media(&self, media_id: &str) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM comments WHERE media_id = $1")
            .bind(media_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
