//! Response bodies for auth endpoints. Request bodies live in `gateway::types`.

use serde::Serialize;
use utoipa::ToSchema;

use crate::gateway::Session;
use crate::provider::UserMap;

#[derive(ToSchema, Serialize, Debug)]
pub struct LoginResponse {
    #[schema(value_type = Object)]
    pub user: UserMap,
    pub message: String,
}

#[derive(ToSchema, Serialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(ToSchema, Serialize, Debug)]
pub struct CallbackResponse {
    pub session: Option<Session>,
    pub message: String,
}

#[derive(ToSchema, Serialize, Debug)]
pub struct TokenStatusResponse {
    pub valid: bool,
    #[schema(value_type = Object)]
    pub user: UserMap,
}
