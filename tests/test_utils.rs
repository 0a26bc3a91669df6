#![allow(dead_code)]

use actix_web::{
    middleware::NormalizePath,
    web,
    App, HttpServer
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use gallery_backend::{
    entities::{token::AuthResponse, user::{NewUser, PublicUser}},
    middlewares::auth::AuthMiddleware,
    repositories::kv_repo::{KvCommentRepo, KvMediaRepo, KvUserRepo},
    routes::configure_routes,
    settings::{AppConfig, AppEnvironment, StorageBackend},
    shared_repos::SharedRepositories,
    storage::{ImageStore, StorageFacade},
    use_cases::{
        comment::CommentService, media::MediaService, session::SessionManager,
        upload::UploadService, user::UserService,
    },
    AppState,
};
use reqwest::Client;
use serde_json::Value;
use std::{net::TcpListener, sync::Arc, time::Duration};

pub struct TestApp {
    pub state: Arc<AppState>,
    pub address: String,
    pub client: Client,
    pub config: AppConfig,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let config = test_config();
        let state = AppState::from_config(&config)
            .await
            .expect("Failed to build app state");

        Self::serve(config, state).await
    }

    /// Runs the app over the given repositories, keeping images in memory.
    pub async fn spawn_with(repos: SharedRepositories) -> Self {
        let config = test_config();
        let state = AppState::new(&config, repos, StorageFacade::in_memory());

        Self::serve(config, state).await
    }

    async fn serve(config: AppConfig, state: AppState) -> Self {
        let state = Arc::new(state);

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let state_clone = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::from(state_clone.clone()))
                .wrap(AuthMiddleware)
                .wrap(NormalizePath::trim())
                .configure(configure_routes)
        })
        .listen(listener)
        .expect("Failed to bind server")
        .workers(config.worker_count)
        .run();

        tokio::spawn(server);

        let client = Client::new();
        while client.get(format!("{}/health", address)).send().await.is_err() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        Self {
            state,
            address,
            client,
            config,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn register_user(&self, user: &NewUser) -> reqwest::Response {
        self.client
            .post(self.url("/api/auth/register"))
            .json(user)
            .send()
            .await
            .expect("Failed to register user")
    }

    /// Registers a fresh account and returns its token and profile.
    pub async fn create_user(&self, name: &str, email: &str) -> AuthResponse {
        let response = self
            .register_user(&NewUser {
                name: name.to_string(),
                email: email.to_string(),
                password: "abcdef".to_string(),
            })
            .await;

        let status = response.status();
        let body: Value = response.json().await.expect("Failed to parse register response");
        assert!(status.is_success(), "Register failed ({}): {}", status, body);

        serde_json::from_value(body["data"].clone()).expect("Unexpected register payload")
    }

    pub async fn upload(&self, token: &str, body: Value) -> reqwest::Response {
        self.client
            .post(self.url("/api/media"))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .expect("Failed to upload media")
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        env: AppEnvironment::Testing,
        name: "Gallery Backend Test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        worker_count: 1,
        storage_backend: StorageBackend::Memory,
        storage_path: String::new(),
        storage_quota_bytes: None,
        database_url: String::new(),
        cors_allowed_origins: vec!["*".to_string()],
        jwt_secret: "test_jwt_secret_that_is_long_enough_for_hs512_1234567890".into(),
        jwt_expiration_minutes: 5,
    }
}

/// Services wired over one in-memory store, the way the `memory` backend runs.
pub struct Services {
    pub storage: StorageFacade,
    pub media: MediaService<KvMediaRepo>,
    pub comments: CommentService<KvCommentRepo>,
    pub users: UserService<KvUserRepo>,
    pub uploads: UploadService<KvMediaRepo>,
    pub images: ImageStore,
}

pub fn services() -> Services {
    services_on(StorageFacade::in_memory())
}

pub fn services_on(storage: StorageFacade) -> Services {
    let images = ImageStore::new(storage.clone());
    let media = MediaService::new(KvMediaRepo::new(storage.clone()));

    Services {
        uploads: UploadService::new(media.clone(), images.clone()),
        media,
        comments: CommentService::new(KvCommentRepo::new(storage.clone())),
        users: UserService::new(KvUserRepo::new(storage.clone()), images.clone()),
        images,
        storage,
    }
}

/// Same services, plus a session whose durable side shares `storage`.
pub fn services_with_session() -> (Services, SessionManager) {
    let mut services = services();
    let session = SessionManager::new(services.storage.clone(), StorageFacade::in_memory());
    services.users = services.users.clone().with_session(session.clone());
    (services, session)
}

pub fn new_user(name: &str, email: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        email: email.to_string(),
        password: "abcdef".to_string(),
    }
}

pub async fn register(services: &Services, name: &str, email: &str) -> PublicUser {
    services
        .users
        .register(new_user(name, email))
        .await
        .expect("Failed to register user")
}

/// Smallest payload the image sniffer accepts as a PNG.
pub fn png_bytes() -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(&[0, 0, 0, 0x0D, b'I', b'H', b'D', b'R']);
    bytes.extend_from_slice(&[0; 17]);
    bytes
}

pub fn png_data_uri() -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png_bytes()))
}
