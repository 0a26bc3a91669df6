use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod shared_repos;

pub use domain::{entities, use_cases, validation};
pub use interfaces::{handlers, repositories, middlewares, routes};
pub use infrastructure::{auth, db, storage, utils};

use auth::jwt::JwtService;
use repositories::{comment::DynCommentRepo, media::DynMediaRepo, user::DynUserRepo};
use settings::{AppConfig, StorageBackend};
use shared_repos::SharedRepositories;
use storage::{migrate_legacy_keys, FileStore, ImageStore, KeyValueStore, MemoryStore, StorageFacade};
use use_cases::{comment::CommentService, media::MediaService, upload::UploadService, user::UserService};

pub type AppMediaService = MediaService<DynMediaRepo>;
pub type AppCommentService = CommentService<DynCommentRepo>;
pub type AppUserService = UserService<DynUserRepo>;
pub type AppUploadService = UploadService<DynMediaRepo>;

pub struct AppState {
    pub media_service: AppMediaService,
    pub comment_service: AppCommentService,
    pub user_service: AppUserService,
    pub upload_service: AppUploadService,
    pub images: ImageStore,
    pub jwt_service: JwtService,
    pub storage_backend: StorageBackend,
}

impl AppState {
    pub fn new(
        config: &AppConfig,
        repos: SharedRepositories,
        blob_storage: StorageFacade,
    ) -> Self {
        let images = ImageStore::new(blob_storage);
        let media_service = MediaService::new(repos.media_repo);

        AppState {
            upload_service: UploadService::new(media_service.clone(), images.clone()),
            media_service,
            comment_service: CommentService::new(repos.comment_repo),
            user_service: UserService::new(repos.user_repo, images.clone()),
            images,
            jwt_service: JwtService::new(config),
            storage_backend: config.storage_backend,
        }
    }

    /// Builds the state for the configured backend. Key-value stores get the legacy
    /// key migration; Postgres gets its schema migrations and keeps images on disk.
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let state = match config.storage_backend {
            StorageBackend::Memory => {
                let storage = open_storage(config, true)?;
                migrate_legacy_keys(&storage);
                AppState::new(config, SharedRepositories::key_value(storage.clone()), storage)
            }
            StorageBackend::File => {
                let storage = open_storage(config, false)?;
                migrate_legacy_keys(&storage);
                AppState::new(config, SharedRepositories::key_value(storage.clone()), storage)
            }
            StorageBackend::Postgres => {
                let pool = db::postgres::connect_and_migrate(
                    &config.database_url,
                    (config.worker_count as u32 * 2).max(5),
                )
                .await?;
                let blobs = open_storage(config, false)?;
                AppState::new(config, SharedRepositories::postgres(pool), blobs)
            }
        };

        tracing::info!("Storage backend ready: {:?}", config.storage_backend);
        Ok(state)
    }
}

fn open_storage(config: &AppConfig, in_memory: bool) -> anyhow::Result<StorageFacade> {
    let backend: Arc<dyn KeyValueStore> = if in_memory {
        match config.storage_quota_bytes {
            Some(quota) => Arc::new(MemoryStore::with_quota(quota)),
            None => Arc::new(MemoryStore::new()),
        }
    } else {
        Arc::new(FileStore::open(&config.storage_path)?)
    };

    Ok(StorageFacade::new(backend))
}
