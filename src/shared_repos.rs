use std::sync::Arc;

use crate::{
    infrastructure::storage::StorageFacade,
    repositories::{
        comment::DynCommentRepo,
        kv_repo::{KvCommentRepo, KvMediaRepo, KvUserRepo},
        media::DynMediaRepo,
        sqlx_repo::{SqlxCommentRepo, SqlxMediaRepo, SqlxUserRepo},
        user::DynUserRepo,
    },
};

/// One repository per collection, all on the same backend.
#[derive(Clone)]
pub struct SharedRepositories {
    pub user_repo: DynUserRepo,
    pub media_repo: DynMediaRepo,
    pub comment_repo: DynCommentRepo,
}

impl SharedRepositories {
    pub fn key_value(storage: StorageFacade) -> Self {
        SharedRepositories {
            user_repo: Arc::new(KvUserRepo::new(storage.clone())),
            media_repo: Arc::new(KvMediaRepo::new(storage.clone())),
            comment_repo: Arc::new(KvCommentRepo::new(storage)),
        }
    }

    pub fn postgres(pool: sqlx::PgPool) -> Self {
        SharedRepositories {
            user_repo: Arc::new(SqlxUserRepo::new(pool.clone())),
            media_repo: Arc::new(SqlxMediaRepo::new(pool.clone())),
            comment_repo: Arc::new(SqlxCommentRepo::new(pool)),
        }
    }
}
