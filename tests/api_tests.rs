mod test_utils;

use std::sync::Arc;

use async_trait::async_trait;
use gallery_backend::{
    entities::comment::Comment,
    errors::AppError,
    repositories::comment::CommentRepository,
    shared_repos::SharedRepositories,
    storage::StorageFacade,
};
use mockall::mock;
use reqwest::StatusCode;
use serde_json::{json, Value};
use test_utils::*;

mock! {
    pub CommentRepo {}

    #[async_trait]
    impl CommentRepository for CommentRepo {
        async fn list_comments(&self) -> Result<Vec<Comment>, AppError>;
        async fn get_comment_by_id(&self, id: &str) -> Result<Option<Comment>, AppError>;
        async fn insert_comment(&self, comment: &Comment) -> Result<(), AppError>;
        async fn delete_comment(&self, id: &str) -> Result<bool, AppError>;
        async fn delete_comments_for_media(&self, media_id: &str) -> Result<u64, AppError>;
    }
}

#[actix_rt::test]
async fn health_reports_backend() {
    let app = TestApp::spawn().await;

    let response = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage_backend"], "memory");
    assert_eq!(body["users"], 0);
}

#[actix_rt::test]
async fn register_returns_201_with_token() {
    let app = TestApp::spawn().await;

    let response = app.register_user(&new_user("Ana", "ana@x.com")).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["token_type"], "Bearer");
    assert_eq!(body["data"]["user"]["email"], "ana@x.com");
    assert!(body["data"]["user"].get("passwordHash").is_none());
    assert!(!body["data"]["access_token"].as_str().unwrap().is_empty());
}

#[actix_rt::test]
async fn duplicate_registration_is_409() {
    let app = TestApp::spawn().await;
    app.create_user("Ana", "ana@x.com").await;

    let response = app.register_user(&new_user("Ana again", "ANA@x.com")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "success": false, "error": "Email is already registered" }));
}

#[actix_rt::test]
async fn short_password_is_rejected_with_details() {
    let app = TestApp::spawn().await;

    let mut user = new_user("Ana", "ana@x.com");
    user.password = "abc".to_string();
    let response = app.register_user(&user).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["details"][0]["field"], "password");
}

#[actix_rt::test]
async fn login_with_wrong_password_is_401() {
    let app = TestApp::spawn().await;
    app.create_user("Ana", "ana@x.com").await;

    let response = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&json!({ "email": "ana@x.com", "password": "wrong-password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "success": false, "error": "Wrong credentials" }));

    let response = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&json!({ "email": "ana@x.com", "password": "abcdef", "remember": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn protected_routes_need_a_token() {
    let app = TestApp::spawn().await;

    let response = app.client.get(app.url("/api/users/me")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);

    let response = app
        .client
        .get(app.url("/api/users/me"))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .upload("garbage", json!({ "url": "https://x.com/a.jpg", "type": "image", "title": "t", "category": "c" }))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.client.get(app.url("/api/media")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn me_returns_the_token_owner() {
    let app = TestApp::spawn().await;
    let auth = app.create_user("Ana", "ana@x.com").await;

    let response = app
        .client
        .get(app.url("/api/users/me"))
        .bearer_auth(&auth.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["id"], auth.user.id.as_str());
    assert_eq!(body["data"]["name"], "Ana");
}

#[actix_rt::test]
async fn upload_list_and_delete_media() {
    let app = TestApp::spawn().await;
    let ana = app.create_user("Ana", "ana@x.com").await;
    let bob = app.create_user("Bob", "bob@x.com").await;

    let response = app
        .upload(
            &ana.access_token,
            json!({ "url": "https://x.com/a.jpg", "type": "image", "title": "Sunset", "category": "estudio" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    let media_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["userId"], ana.user.id.as_str());
    assert_eq!(body["data"]["thumbnail"], "https://x.com/a.jpg");

    let listed: Value = app
        .client
        .get(app.url("/api/media?type=image&category=estudio"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed["data"][0]["id"], media_id.as_str());

    let videos: Value = app
        .client
        .get(app.url("/api/media?type=video"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(videos["data"], json!([]));

    let response = app
        .client
        .delete(app.url(&format!("/api/media/{}", media_id)))
        .bearer_auth(&bob.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .client
        .delete(app.url(&format!("/api/media/{}", media_id)))
        .bearer_auth(&ana.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .client
        .get(app.url(&format!("/api/media/{}", media_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn invalid_media_type_is_400() {
    let app = TestApp::spawn().await;
    let ana = app.create_user("Ana", "ana@x.com").await;

    let response = app
        .upload(
            &ana.access_token,
            json!({ "url": "https://x.com/a.mp3", "type": "audio", "title": "Song", "category": "music" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.client.get(app.url("/api/media?type=audio")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn recent_is_limited() {
    let app = TestApp::spawn().await;
    let ana = app.create_user("Ana", "ana@x.com").await;

    for title in ["one", "two", "three"] {
        let response = app
            .upload(
                &ana.access_token,
                json!({ "url": format!("https://x.com/{}.jpg", title), "type": "image", "title": title, "category": "c" }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let recent: Value = app
        .client
        .get(app.url("/api/media/recent?limit=2"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let titles: Vec<_> = recent["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["three", "two"]);
}

#[actix_rt::test]
async fn comments_carry_the_author_profile() {
    let app = TestApp::spawn().await;
    let ana = app.create_user("Ana", "ana@x.com").await;
    let bob = app.create_user("Bob", "bob@x.com").await;

    let body: Value = app
        .upload(
            &ana.access_token,
            json!({ "url": "https://vimeo.com/76979871", "type": "video", "title": "Clip", "category": "c" }),
        )
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["thumbnail"], "https://vumbnail.com/76979871.jpg");
    let media_id = body["data"]["id"].as_str().unwrap().to_string();
    let comments_url = app.url(&format!("/api/media/{}/comments", media_id));

    let response = app
        .client
        .post(&comments_url)
        .bearer_auth(&bob.access_token)
        .json(&json!({ "text": "Great clip" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = response.json().await.unwrap();
    assert_eq!(created["data"]["userName"], "Bob");
    let comment_id = created["data"]["id"].as_str().unwrap().to_string();

    let listed: Value = app.client.get(&comments_url).send().await.unwrap().json().await.unwrap();
    assert_eq!(listed["data"][0]["text"], "Great clip");

    let response = app
        .client
        .delete(app.url(&format!("/api/comments/{}", comment_id)))
        .bearer_auth(&ana.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .client
        .delete(app.url(&format!("/api/comments/{}", comment_id)))
        .bearer_auth(&bob.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[actix_rt::test]
async fn favorites_and_history_endpoints() {
    let app = TestApp::spawn().await;
    let ana = app.create_user("Ana", "ana@x.com").await;

    let body: Value = app
        .upload(
            &ana.access_token,
            json!({ "url": "https://x.com/a.jpg", "type": "image", "title": "Sunset", "category": "c" }),
        )
        .await
        .json()
        .await
        .unwrap();
    let media_id = body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .client
        .post(app.url("/api/users/me/favorites/unknown-media"))
        .bearer_auth(&ana.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let favorites: Value = app
        .client
        .post(app.url(&format!("/api/users/me/favorites/{}", media_id)))
        .bearer_auth(&ana.access_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(favorites["data"], json!([media_id.clone()]));

    let items: Value = app
        .client
        .get(app.url("/api/users/me/favorites"))
        .bearer_auth(&ana.access_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(items["data"][0]["title"], "Sunset");

    let history: Value = app
        .client
        .post(app.url(&format!("/api/users/me/history/{}", media_id)))
        .bearer_auth(&ana.access_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(history["data"], json!([media_id.clone()]));

    let response = app
        .client
        .delete(app.url("/api/users/me/history"))
        .bearer_auth(&ana.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let favorites: Value = app
        .client
        .delete(app.url(&format!("/api/users/me/favorites/{}", media_id)))
        .bearer_auth(&ana.access_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(favorites["data"], json!([]));
}

#[actix_rt::test]
async fn avatar_is_served_from_the_image_store() {
    let app = TestApp::spawn().await;
    let ana = app.create_user("Ana", "ana@x.com").await;

    let response = app
        .client
        .put(app.url("/api/users/me"))
        .bearer_auth(&ana.access_token)
        .json(&json!({ "image": png_data_uri() }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    let avatar_path = body["data"]["image"].as_str().unwrap().to_string();

    let response = app.client.get(app.url(&avatar_path)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/png");
    assert_eq!(response.bytes().await.unwrap().to_vec(), png_bytes());

    let response = app.client.get(app.url("/api/images/missing")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn malformed_json_uses_the_error_envelope() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.url("/api/auth/login"))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[actix_rt::test]
async fn media_delete_succeeds_when_comment_cleanup_fails() {
    let mut comments = MockCommentRepo::new();
    comments
        .expect_delete_comments_for_media()
        .times(1)
        .returning(|_| Err(AppError::InternalError("Database error: gone".into())));

    let mut repos = SharedRepositories::key_value(StorageFacade::in_memory());
    repos.comment_repo = Arc::new(comments);

    let app = TestApp::spawn_with(repos).await;
    let ana = app.create_user("Ana", "ana@x.com").await;

    let body: Value = app
        .upload(
            &ana.access_token,
            json!({ "url": "https://x.com/a.jpg", "type": "image", "title": "Sunset", "category": "estudio" }),
        )
        .await
        .json()
        .await
        .unwrap();
    let media_id = body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .client
        .delete(app.url(&format!("/api/media/{}", media_id)))
        .bearer_auth(&ana.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .client
        .get(app.url(&format!("/api/media/{}", media_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
