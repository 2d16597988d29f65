use super::handlers::{auth, health};
use utoipa::openapi::{InfoBuilder, License, OpenApiBuilder, Tag};
use utoipa_axum::{router::OpenApiRouter, routes};

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    let (_router, openapi) = api_router().split_for_parts();
    openapi
}

/// Build the router that also drives the `OpenAPI` document.
///
/// Routes added outside (like `/` or `OPTIONS /health`) are not documented.
pub(crate) fn api_router() -> OpenApiRouter {
    OpenApiRouter::with_openapi(cargo_openapi())
        .routes(routes!(health::health))
        .routes(routes!(auth::login::login))
        .routes(routes!(auth::signup::signup))
        .routes(routes!(auth::session::signout))
        .routes(routes!(auth::session::current_user))
        .routes(routes!(auth::session::verify_token))
        .routes(routes!(auth::password::reset_password))
        .routes(routes!(auth::password::set_password))
        .routes(routes!(auth::verification::verify_email))
        .routes(routes!(auth::callback::callback))
}

fn cargo_openapi() -> utoipa::openapi::OpenApi {
    // Use Cargo.toml metadata instead of the utoipa-axum crate info defaults.
    let mut info = InfoBuilder::new()
        .title(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .description(optional_str(env!("CARGO_PKG_DESCRIPTION")))
        .build();

    info.license = optional_str(env!("CARGO_PKG_LICENSE")).map(|identifier| {
        let mut license = License::new(identifier);
        license.identifier = Some(identifier.to_string());
        license
    });

    OpenApiBuilder::new()
        .info(info)
        .tags(Some(tags()))
        .build()
}

fn tags() -> Vec<Tag> {
    let mut health_tag = Tag::new("health");
    health_tag.description = Some("Service and identity provider status".to_string());

    let mut auth_tag = Tag::new("auth");
    auth_tag.description = Some("Login, signup, sessions and password recovery".to_string());

    vec![health_tag, auth_tag]
}

fn optional_str(value: &'static str) -> Option<&'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
