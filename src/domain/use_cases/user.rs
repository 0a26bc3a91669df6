use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::password::{hash_password, verify_password},
    domain::validation::normalize_email,
    entities::{
        session::SessionState,
        user::{NewUser, PublicUser, UpdateProfile, User},
    },
    errors::AppError,
    infrastructure::storage::{images::{image_url, stored_image_id}, ImageStore},
    repositories::user::UserRepository,
    use_cases::session::SessionManager,
};

/// Accounts, credentials, favorites and viewing history.
///
/// With a [`SessionManager`] attached, `register`/`login`/`logout` drive the client
/// session, and every mutation of the session owner refreshes its snapshot.
#[derive(Clone)]
pub struct UserService<R>
where
    R: UserRepository,
{
    pub user_repo: R,
    images: ImageStore,
    session: Option<SessionManager>,
}

impl<R> UserService<R>
where
    R: UserRepository,
{
    pub fn new(user_repo: R, images: ImageStore) -> Self {
        UserService {
            user_repo,
            images,
            session: None,
        }
    }

    pub fn with_session(mut self, session: SessionManager) -> Self {
        self.session = Some(session);
        self
    }

    pub fn session(&self) -> Option<&SessionManager> {
        self.session.as_ref()
    }

    /// Creates an account with empty favorites and history, then opens a
    /// non-remembered session when a session manager is attached.
    pub async fn register(&self, request: NewUser) -> Result<PublicUser, AppError> {
        request.validate()?;

        let email = normalize_email(&request.email);
        if self.user_repo.get_user_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("Email is already registered".into()));
        }

        let password_hash = hash_password(&request.password)?;
        let user = request.prepare_for_insert(Uuid::new_v4().to_string(), password_hash);

        self.user_repo.create_user(&user).await?;

        let public = PublicUser::from(&user);
        if let Some(session) = &self.session {
            session.start(&public, false);
        }

        tracing::info!(user_id = %user.id, "User registered");
        Ok(public)
    }

    /// Returns the user whose email and password match, `None` otherwise.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>, AppError> {
        let email = normalize_email(email);

        let Some(user) = self.user_repo.get_user_by_email(&email).await? else {
            return Ok(None);
        };

        match verify_password(password, &user.password_hash) {
            Ok(true) => Ok(Some(user)),
            Ok(false) => Ok(None),
            Err(e) => {
                tracing::warn!(user_id = %user.id, "Stored password hash unusable: {}", e);
                Ok(None)
            }
        }
    }

    pub async fn login(
        &self,
        email: &str,
        password: &str,
        remember: bool,
    ) -> Result<Option<PublicUser>, AppError> {
        let Some(user) = self.authenticate(email, password).await? else {
            tracing::info!("Login rejected");
            return Ok(None);
        };

        let public = PublicUser::from(user);
        if let Some(session) = &self.session {
            session.start(&public, remember);
        }

        tracing::info!(user_id = %public.id, "User logged in");
        Ok(Some(public))
    }

    pub fn logout(&self) {
        if let Some(session) = &self.session {
            session.end();
        }
    }

    pub fn current_session(&self) -> SessionState {
        self.session
            .as_ref()
            .map(SessionManager::state)
            .unwrap_or(SessionState::Anonymous)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<PublicUser>, AppError> {
        Ok(self.user_repo.get_user_by_id(id).await?.map(PublicUser::from))
    }

    /// Renames the user and/or replaces the avatar (a data URI) in the image store.
    pub async fn update_profile(
        &self,
        user_id: &str,
        changes: UpdateProfile,
    ) -> Result<Option<PublicUser>, AppError> {
        changes.validate()?;

        let Some(mut user) = self.user_repo.get_user_by_id(user_id).await? else {
            return Ok(None);
        };

        if let Some(name) = &changes.name {
            user.name = name.trim().to_string();
        }

        let previous_avatar = user.image.clone();
        let mut new_avatar = None;
        if let Some(data_uri) = &changes.image {
            let image_id = self.images.save("avatar", &user.id, data_uri)?;
            user.image = Some(image_url(&image_id));
            new_avatar = Some(image_id);
        }

        if !self.persist(&user).await? {
            if let Some(image_id) = new_avatar {
                self.images.remove(&image_id);
            }
            return Ok(None);
        }

        if changes.image.is_some() {
            if let Some(old_id) = previous_avatar.as_deref().and_then(stored_image_id) {
                self.images.remove(old_id);
            }
        }

        Ok(Some(PublicUser::from(user)))
    }

    /// Adds `media_id` to the favorites. Repeating it is a no-op. False when the user is unknown.
    pub async fn add_to_favorites(&self, user_id: &str, media_id: &str) -> Result<bool, AppError> {
        self.mutate(user_id, |user| user.add_favorite(media_id))
            .await
            .map(|user| user.is_some())
    }

    /// Removes `media_id` from the favorites. False when the user is unknown.
    pub async fn remove_from_favorites(&self, user_id: &str, media_id: &str) -> Result<bool, AppError> {
        self.mutate(user_id, |user| user.remove_favorite(media_id))
            .await
            .map(|user| user.is_some())
    }

    /// Flips membership and returns the new state, `None` when the user is unknown.
    pub async fn toggle_favorite(&self, user_id: &str, media_id: &str) -> Result<Option<bool>, AppError> {
        let user = self
            .mutate(user_id, |user| {
                if !user.remove_favorite(media_id) {
                    user.add_favorite(media_id);
                }
                true
            })
            .await?;

        Ok(user.map(|user| user.has_favorite(media_id)))
    }

    pub async fn get_favorites(&self, user_id: &str) -> Result<Vec<String>, AppError> {
        Ok(self
            .user_repo
            .get_user_by_id(user_id)
            .await?
            .map(|user| user.favorites)
            .unwrap_or_default())
    }

    /// Moves `media_id` to the front of the history, capped at 100 entries.
    pub async fn add_to_history(&self, user_id: &str, media_id: &str) -> Result<bool, AppError> {
        self.mutate(user_id, |user| {
            if user.history.first().map(String::as_str) == Some(media_id) {
                return false;
            }
            user.record_view(media_id);
            true
        })
        .await
        .map(|user| user.is_some())
    }

    pub async fn get_history(&self, user_id: &str) -> Result<Vec<String>, AppError> {
        Ok(self
            .user_repo
            .get_user_by_id(user_id)
            .await?
            .map(|user| user.history)
            .unwrap_or_default())
    }

    pub async fn clear_history(&self, user_id: &str) -> Result<bool, AppError> {
        self.mutate(user_id, |user| {
            let had_entries = !user.history.is_empty();
            user.history.clear();
            had_entries
        })
        .await
        .map(|user| user.is_some())
    }

    /// Loads the user, applies `change` and persists only when it reports a change.
    async fn mutate<F>(&self, user_id: &str, change: F) -> Result<Option<User>, AppError>
    where
        F: FnOnce(&mut User) -> bool,
    {
        let Some(mut user) = self.user_repo.get_user_by_id(user_id).await? else {
            tracing::debug!(user_id = %user_id, "Skipping update for unknown user");
            return Ok(None);
        };

        if change(&mut user) && !self.persist(&user).await? {
            return Ok(None);
        }

        Ok(Some(user))
    }

    async fn persist(&self, user: &User) -> Result<bool, AppError> {
        let updated = self.user_repo.update_user(user).await?;

        if updated {
            if let Some(session) = &self.session {
                session.sync_user(user);
            }
        }

        Ok(updated)
    }
}
