//! Email verification link.

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::gateway::{CredentialGateway, VerifyRequest};

use super::bad_request_response;
use super::types::MessageResponse;

#[utoipa::path(
    get,
    path = "/auth/verify",
    params(VerifyRequest),
    responses(
        (status = 200, description = "Email verified", body = MessageResponse),
        (status = 400, description = "Invalid or expired token", body = String)
    ),
    tag = "auth"
)]
pub async fn verify_email(
    gateway: Extension<Arc<CredentialGateway>>,
    query: Option<Query<VerifyRequest>>,
) -> impl IntoResponse {
    let request: VerifyRequest = match query {
        Some(Query(query)) => query,
        None => return (StatusCode::BAD_REQUEST, "Missing token".to_string()).into_response(),
    };

    match gateway.verify_email(&request).await {
        Ok(result) => (StatusCode::OK, Json(MessageResponse::new(result.message))).into_response(),
        Err(err) => bad_request_response(&err, "Email verification failed").into_response(),
    }
}
