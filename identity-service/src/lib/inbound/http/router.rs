use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header;
use axum::http::HeaderValue;
use axum::http::Method;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::login::login;
use super::handlers::me::me;
use super::handlers::oauth_authorize::oauth_authorize;
use super::handlers::oauth_callback::oauth_callback;
use super::handlers::refresh::refresh;
use super::handlers::signup::signup;
use super::middleware::request_id;
use super::middleware::require_access_token;
use super::middleware::RequestId;
use crate::domain::session::ports::AuthSessionServicePort;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthSessionServicePort>,
    pub secure_cookies: bool,
}

/// HTTP-level settings for the router.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub request_timeout: Duration,
    pub secure_cookies: bool,
    /// Single allowed origin; any origin when absent
    pub cors_origin: Option<HeaderValue>,
}

pub fn create_router(
    auth_service: Arc<dyn AuthSessionServicePort>,
    settings: HttpSettings,
) -> Router {
    let state = AppState {
        auth_service,
        secure_cookies: settings.secure_cookies,
    };

    let public_routes = Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/oauth/:provider", get(oauth_authorize))
        .route("/oauth/:provider/callback", get(oauth_callback));

    let protected_routes = Router::new()
        .route("/me", get(me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_access_token,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            let request_id = request
                .extensions()
                .get::<RequestId>()
                .map(|id| id.0.as_str())
                .unwrap_or_default();
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri().path(),
                version = ?request.version(),
                request_id = %request_id,
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri().path(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    let cors_layer = match settings.cors_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true),
        None => CorsLayer::permissive(),
    };

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(TimeoutLayer::new(settings.request_timeout))
        .layer(trace_layer)
        .layer(middleware::from_fn(request_id))
        .layer(cors_layer)
        .with_state(state)
}
