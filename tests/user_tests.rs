mod test_utils;

use gallery_backend::{
    constants::HISTORY_LIMIT,
    entities::{session::SessionState, user::UpdateProfile},
    errors::AppError,
    storage::images::stored_image_id,
};
use test_utils::*;

#[tokio::test]
async fn login_accepts_only_the_right_password() {
    let services = services();
    let ana = register(&services, "Ana", "ana@x.com").await;

    let ok = services.users.login("ana@x.com", "abcdef", false).await.unwrap();
    assert_eq!(ok.map(|user| user.id), Some(ana.id));

    let wrong = services.users.login("ana@x.com", "abcdeg", false).await.unwrap();
    assert!(wrong.is_none());

    let unknown = services.users.login("bob@x.com", "abcdef", false).await.unwrap();
    assert!(unknown.is_none());
}

#[tokio::test]
async fn emails_are_case_insensitive_and_unique() {
    let services = services();
    let ana = register(&services, "Ana", "Ana@X.com").await;
    assert_eq!(ana.email, "ana@x.com");

    let login = services.users.login("ANA@x.COM", "abcdef", false).await.unwrap();
    assert!(login.is_some());

    let err = services.users.register(new_user("Other Ana", "ana@x.com")).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn passwords_are_hashed_at_rest() {
    let services = services();
    let ana = register(&services, "Ana", "ana@x.com").await;

    let stored = services.users.authenticate("ana@x.com", "abcdef").await.unwrap().unwrap();
    assert_eq!(stored.id, ana.id);
    assert_ne!(stored.password_hash, "abcdef");
    assert!(stored.password_hash.starts_with("$argon2id$"));
}

#[tokio::test]
async fn registration_validates_input() {
    let services = services();

    let six_chars = services.users.register(new_user("Ana", "ana@x.com")).await;
    assert!(six_chars.is_ok());

    let mut weak = new_user("Bob", "bob@x.com");
    weak.password = "abc".to_string();
    let err = services.users.register(weak).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(ref fields) if fields[0].field == "password"));

    let err = services.users.register(new_user("   ", "carl@x.com")).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));

    let err = services.users.register(new_user("Dana", "not-an-email")).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn history_moves_repeats_to_the_front() {
    let services = services();
    let ana = register(&services, "Ana", "ana@x.com").await;

    for id in ["a", "b", "c", "a", "a"] {
        assert!(services.users.add_to_history(&ana.id, id).await.unwrap());
    }

    assert_eq!(services.users.get_history(&ana.id).await.unwrap(), vec!["a", "c", "b"]);
}

#[tokio::test]
async fn history_is_capped() {
    let services = services();
    let ana = register(&services, "Ana", "ana@x.com").await;

    for i in 0..(HISTORY_LIMIT + 5) {
        services.users.add_to_history(&ana.id, &i.to_string()).await.unwrap();
    }

    let history = services.users.get_history(&ana.id).await.unwrap();
    assert_eq!(history.len(), HISTORY_LIMIT);
    assert_eq!(history[0], (HISTORY_LIMIT + 4).to_string());
    assert!(!history.contains(&"0".to_string()));

    assert!(services.users.clear_history(&ana.id).await.unwrap());
    assert!(services.users.get_history(&ana.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn favorites_round_trip() {
    let services = services();
    let ana = register(&services, "Ana", "ana@x.com").await;
    services.users.add_to_favorites(&ana.id, "keep").await.unwrap();
    let before = services.users.get_favorites(&ana.id).await.unwrap();

    assert!(services.users.add_to_favorites(&ana.id, "m1").await.unwrap());
    assert!(services.users.add_to_favorites(&ana.id, "m1").await.unwrap());
    assert_eq!(services.users.get_favorites(&ana.id).await.unwrap(), vec!["keep", "m1"]);

    assert!(services.users.remove_from_favorites(&ana.id, "m1").await.unwrap());
    assert_eq!(services.users.get_favorites(&ana.id).await.unwrap(), before);
}

#[tokio::test]
async fn toggle_flips_membership() {
    let services = services();
    let ana = register(&services, "Ana", "ana@x.com").await;

    assert_eq!(services.users.toggle_favorite(&ana.id, "m1").await.unwrap(), Some(true));
    assert_eq!(services.users.toggle_favorite(&ana.id, "m1").await.unwrap(), Some(false));
    assert!(services.users.get_favorites(&ana.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_users_are_not_mutated() {
    let services = services();

    assert!(!services.users.add_to_favorites("ghost", "m1").await.unwrap());
    assert!(!services.users.add_to_history("ghost", "m1").await.unwrap());
    assert_eq!(services.users.toggle_favorite("ghost", "m1").await.unwrap(), None);
    assert!(services.users.get_favorites("ghost").await.unwrap().is_empty());
    assert!(services.users.get_by_id("ghost").await.unwrap().is_none());
}

#[tokio::test]
async fn profile_updates_replace_the_avatar() {
    let services = services();
    let ana = register(&services, "Ana", "ana@x.com").await;

    let first = services
        .users
        .update_profile(&ana.id, UpdateProfile { name: Some(" Ana Maria ".into()), image: Some(png_data_uri()) })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.name, "Ana Maria");
    let first_avatar = stored_image_id(first.image.as_deref().unwrap()).unwrap().to_string();
    assert!(first_avatar.starts_with(&format!("avatar_{}_", ana.id)));

    let second = services
        .users
        .update_profile(&ana.id, UpdateProfile { name: None, image: Some(png_data_uri()) })
        .await
        .unwrap()
        .unwrap();
    let second_avatar = stored_image_id(second.image.as_deref().unwrap()).unwrap();

    assert_eq!(second.name, "Ana Maria");
    assert!(services.images.get(second_avatar).is_some());
    assert!(services.images.get(&first_avatar).is_none());
}

#[tokio::test]
async fn blank_profile_name_is_rejected() {
    let services = services();
    let ana = register(&services, "Ana", "ana@x.com").await;

    let err = services
        .users
        .update_profile(&ana.id, UpdateProfile { name: Some("   ".into()), image: None })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ValidationError(ref fields) if fields[0].field == "name"));
    assert_eq!(services.users.get_by_id(&ana.id).await.unwrap().unwrap().name, "Ana");
}

#[tokio::test]
async fn bad_avatar_leaves_profile_untouched() {
    let services = services();
    let ana = register(&services, "Ana", "ana@x.com").await;

    let err = services
        .users
        .update_profile(&ana.id, UpdateProfile { name: Some("Renamed".into()), image: Some("data:image/png;base64,AAAA".into()) })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidInput(_)));
    assert_eq!(services.users.get_by_id(&ana.id).await.unwrap().unwrap().name, "Ana");
}

#[tokio::test]
async fn non_remembered_session_ends_on_reload() {
    let (services, session) = services_with_session();
    register(&services, "Ana", "ana@x.com").await;
    services.users.logout();

    services.users.login("ana@x.com", "abcdef", false).await.unwrap();
    assert!(matches!(session.state(), SessionState::Ephemeral(_)));

    let reloaded = session.reload();
    assert_eq!(reloaded.state(), SessionState::Anonymous);
    // The stale snapshot is gone for the original tab too.
    assert_eq!(session.state(), SessionState::Anonymous);
}

#[tokio::test]
async fn remembered_session_survives_reload() {
    let (services, session) = services_with_session();
    let ana = register(&services, "Ana", "ana@x.com").await;

    services.users.login("ana@x.com", "abcdef", true).await.unwrap();

    let reloaded = session.reload();
    let state = reloaded.state();
    assert!(state.is_remembered());
    assert_eq!(state.user().map(|user| user.id.as_str()), Some(ana.id.as_str()));
}

#[tokio::test]
async fn registration_opens_an_ephemeral_session() {
    let (services, session) = services_with_session();
    let ana = register(&services, "Ana", "ana@x.com").await;

    let current = services.users.current_session();
    assert!(current.is_authenticated());
    assert!(!current.is_remembered());
    assert_eq!(session.current_user().map(|user| user.id), Some(ana.id));
}

#[tokio::test]
async fn logout_clears_the_session() {
    let (services, session) = services_with_session();
    register(&services, "Ana", "ana@x.com").await;
    services.users.login("ana@x.com", "abcdef", true).await.unwrap();

    services.users.logout();

    assert_eq!(session.state(), SessionState::Anonymous);
    assert_eq!(session.reload().state(), SessionState::Anonymous);
}

#[tokio::test]
async fn session_snapshot_follows_user_changes() {
    let (services, session) = services_with_session();
    let ana = register(&services, "Ana", "ana@x.com").await;
    let bob = register(&services, "Bob", "bob@x.com").await;
    services.users.login("ana@x.com", "abcdef", true).await.unwrap();

    services.users.add_to_favorites(&ana.id, "m1").await.unwrap();
    services.users.add_to_favorites(&bob.id, "m2").await.unwrap();

    let snapshot = session.current_user().unwrap();
    assert_eq!(snapshot.id, ana.id);
    assert_eq!(snapshot.favorites, vec!["m1"]);
}
