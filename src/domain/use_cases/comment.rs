use validator::Validate;

use crate::{
    entities::comment::{Comment, NewComment},
    errors::AppError,
    repositories::comment::CommentRepository,
    utils::ids::next_timestamp_id,
};

#[derive(Clone)]
pub struct CommentService<R>
where
    R: CommentRepository,
{
    pub comment_repo: R,
}

impl<R> CommentService<R>
where
    R: CommentRepository,
{
    pub fn new(comment_repo: R) -> Self {
        CommentService { comment_repo }
    }

    pub async fn get_all(&self) -> Result<Vec<Comment>, AppError> {
        self.comment_repo.list_comments().await
    }

    /// Comments on one media item, newest first.
    pub async fn get_by_media_id(&self, media_id: &str) -> Result<Vec<Comment>, AppError> {
        let mut comments: Vec<Comment> = self
            .comment_repo
            .list_comments()
            .await?
            .into_iter()
            .filter(|comment| comment.media_id == media_id)
            .collect();

        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(comments)
    }

    pub async fn add(&self, comment: NewComment) -> Result<Comment, AppError> {
        comment.validate()?;

        let comment = comment.into_comment(next_timestamp_id());
        self.comment_repo.insert_comment(&comment).await?;

        tracing::info!(comment_id = %comment.id, media_id = %comment.media_id, "Comment added");
        Ok(comment)
    }

    /// Deletes the comment when `requester_id` wrote it; false for missing or foreign comments.
    pub async fn delete(&self, id: &str, requester_id: &str) -> Result<bool, AppError> {
        match self.comment_repo.get_comment_by_id(id).await? {
            Some(comment) if comment.is_authored_by(requester_id) => {
                self.comment_repo.delete_comment(id).await
            }
            Some(_) => {
                tracing::warn!(comment_id = %id, requester = %requester_id, "Rejected delete by non-author");
                Ok(false)
            }
            None => Ok(false),
        }
    }

    /// Drops every comment on a media item that no longer exists.
    pub async fn delete_for_media(&self, media_id: &str) -> Result<u64, AppError> {
        self.comment_repo.delete_comments_for_media(media_id).await
    }
}
