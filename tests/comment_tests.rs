mod test_utils;

use gallery_backend::{entities::comment::NewComment, errors::AppError};
use test_utils::*;

fn comment(media_id: &str, user_id: &str, text: &str) -> NewComment {
    NewComment {
        media_id: media_id.to_string(),
        user_id: user_id.to_string(),
        user_name: format!("User {}", user_id),
        user_avatar: None,
        text: text.to_string(),
    }
}

#[tokio::test]
async fn comments_are_listed_per_media_newest_first() {
    let services = services();

    let first = services.comments.add(comment("m1", "u1", "first")).await.unwrap();
    services.comments.add(comment("m2", "u1", "elsewhere")).await.unwrap();
    let second = services.comments.add(comment("m1", "u2", "second")).await.unwrap();

    let ids: Vec<_> = services
        .comments
        .get_by_media_id("m1")
        .await
        .unwrap()
        .into_iter()
        .map(|comment| comment.id)
        .collect();

    assert_eq!(ids, vec![second.id, first.id]);
    assert_eq!(services.comments.get_all().await.unwrap().len(), 3);
    assert!(services.comments.get_by_media_id("m3").await.unwrap().is_empty());
}

#[tokio::test]
async fn text_is_trimmed_and_required() {
    let services = services();

    let saved = services.comments.add(comment("m1", "u1", "  nice shot  ")).await.unwrap();
    assert_eq!(saved.text, "nice shot");
    assert_eq!(saved.user_name, "User u1");

    let err = services.comments.add(comment("m1", "u1", "   ")).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));

    let err = services.comments.add(comment("m1", "u1", &"x".repeat(1001))).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn only_the_author_can_delete() {
    let services = services();
    let saved = services.comments.add(comment("m1", "author", "mine")).await.unwrap();

    assert!(!services.comments.delete(&saved.id, "someone-else").await.unwrap());
    assert_eq!(services.comments.get_all().await.unwrap().len(), 1);

    assert!(services.comments.delete(&saved.id, "author").await.unwrap());
    assert!(services.comments.get_all().await.unwrap().is_empty());

    assert!(!services.comments.delete(&saved.id, "author").await.unwrap());
}

#[tokio::test]
async fn deleting_media_comments_leaves_others() {
    let services = services();
    services.comments.add(comment("m1", "u1", "a")).await.unwrap();
    services.comments.add(comment("m1", "u2", "b")).await.unwrap();
    services.comments.add(comment("m2", "u1", "c")).await.unwrap();

    assert_eq!(services.comments.delete_for_media("m1").await.unwrap(), 2);
    assert_eq!(services.comments.delete_for_media("m1").await.unwrap(), 0);

    let left = services.comments.get_all().await.unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].media_id, "m2");
}
