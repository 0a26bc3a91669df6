use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    constants::USERS_KEY,
    entities::user::User,
    errors::AppError,
    repositories::{kv_repo::KvUserRepo, sqlx_repo::SqlxUserRepo},
};

const HEALTH_PROBE_KEY: &str = "gallery:health";

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn check_connection(&self) -> Result<(), AppError>;
    async fn count_users(&self) -> Result<u64, AppError>;
    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    /// `email` must already be normalized.
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    /// Fails with `Conflict` when the email is taken.
    async fn create_user(&self, user: &User) -> Result<(), AppError>;
    /// Replaces the stored record, favorites and history included.
    async fn update_user(&self, user: &User) -> Result<bool, AppError>;
}

pub type DynUserRepo = Arc<dyn UserRepository>;

#[async_trait]
impl<T: UserRepository + ?Sized> UserRepository for Arc<T> {
    async fn check_connection(&self) -> Result<(), AppError> {
        (**self).check_connection().await
    }

    async fn count_users(&self) -> Result<u64, AppError> {
        (**self).count_users().await
    }

    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        (**self).get_user_by_id(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        (**self).get_user_by_email(email).await
    }

    async fn create_user(&self, user: &User) -> Result<(), AppError> {
        (**self).create_user(user).await
    }

    async fn update_user(&self, user: &User) -> Result<bool, AppError> {
        (**self).update_user(user).await
    }
}

// ───── Key-value backend ─────────────────────────────────────────────

impl KvUserRepo {
    fn load(&self) -> Vec<User> {
        self.storage.get_list(USERS_KEY)
    }

    fn save(&self, users: &[User]) -> Result<(), AppError> {
        if self.storage.set(USERS_KEY, users) {
            Ok(())
        } else {
            Err(AppError::InternalError("Could not save users".into()))
        }
    }
}

#[async_trait]
impl UserRepository for KvUserRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        if self.storage.set(HEALTH_PROBE_KEY, &Utc::now()) && self.storage.remove(HEALTH_PROBE_KEY) {
            Ok(())
        } else {
            Err(AppError::InternalError("Storage is not writable".into()))
        }
    }

    async fn count_users(&self) -> Result<u64, AppError> {
        Ok(self.load().len() as u64)
    }

    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        Ok(self.load().into_iter().find(|user| user.id == id))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .load()
            .into_iter()
            .find(|user| user.email.eq_ignore_ascii_case(email)))
    }

    async fn create_user(&self, user: &User) -> Result<(), AppError> {
        let mut users = self.load();
        if users.iter().any(|existing| existing.email.eq_ignore_ascii_case(&user.email)) {
            return Err(AppError::Conflict("Email is already registered".into()));
        }

        users.push(user.clone());
        self.save(&users)
    }

    async fn update_user(&self, user: &User) -> Result<bool, AppError> {
        let mut users = self.load();
        let Some(slot) = users.iter_mut().find(|existing| existing.id == user.id) else {
            return Ok(false);
        };

        *slot = user.clone();
        self.save(&users).map(|_| true)
    }
}

// ───── Postgres backend ──────────────────────────────────────────────

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    name: String,
    email: String,
    password: String,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl SqlxUserRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxUserRepo { pool }
    }

    async fn hydrate(&self, row: UserRow) -> Result<User, AppError> {
        let favorites: Vec<String> = sqlx::query_scalar(
            "SELECT media_id FROM favorites WHERE user_id = $1 ORDER BY position",
        )
        .bind(&row.id)
        .fetch_all(&self.pool)
        .await?;

        let history: Vec<String> = sqlx::query_scalar(
            "SELECT media_id FROM history WHERE user_id = $1 ORDER BY viewed_at DESC",
        )
        .bind(&row.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password,
            image: row.image_url,
            favorites,
            history,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    async fn count_users(&self) -> Result<u64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u64)
    }

    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, password, image_url, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => self.hydrate(row).await.map(Some),
            None => Ok(None),
        }
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, password, image_url, created_at FROM users WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => self.hydrate(row).await.map(Some),
            None => Ok(None),
        }
    }

    async fn create_user(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password, image_url, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.image)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::Conflict(_) => AppError::Conflict("Email is already registered".into()),
            other => other,
        })?;

        Ok(())
    }

    async fn update_user(&self, user: &User) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE users SET name = $2, email = $3, password = $4, image_url = $5 WHERE id = $1",
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.image)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("DELETE FROM favorites WHERE user_id = $1")
            .bind(&user.id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO favorites (user_id, media_id, position)
            SELECT $1, entry.media_id, entry.position
            FROM UNNEST($2::text[]) WITH ORDINALITY AS entry(media_id, position)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(&user.id)
        .bind(&user.favorites)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM history WHERE user_id = $1")
            .bind(&user.id)
            .execute(&mut *tx)
            .await?;

        // Position in the list becomes a descending viewed_at so the order round-trips.
        sqlx::query(
            r#"
            INSERT INTO history (user_id, media_id, viewed_at)
            SELECT $1, entry.media_id, NOW() - (entry.position * INTERVAL '1 millisecond')
            FROM UNNEST($2::text[]) WITH ORDINALITY AS entry(media_id, position)
            "#,
        )
        .bind(&user.id)
        .bind(&user.history)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }
}
