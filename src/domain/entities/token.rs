use serde::{Serialize, Deserialize};

use crate::entities::user::PublicUser;

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: PublicUser,
}

impl AuthResponse {
    pub fn new(access_token: String, user: PublicUser) -> Self {
        AuthResponse {
            access_token,
            token_type: "Bearer".to_string(),
            user,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub exp: usize,
    pub iat: usize,
}
