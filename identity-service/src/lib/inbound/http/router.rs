use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::current_user::current_user;
use super::handlers::health::health;
use super::handlers::list_users::list_users;
use super::handlers::login::login;
use super::handlers::register::register;
use crate::access::AccessGate;
use crate::domain::user::ports::UserServicePort;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub gate: Arc<AccessGate>,
}

pub fn create_router(user_service: Arc<dyn UserServicePort>, gate: Arc<AccessGate>) -> Router {
    let state = AppState { user_service, gate };

    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/register", post(register))
        .route("/login", post(login));

    // Protection comes from the AuthenticatedUser extractor in each handler
    let protected_routes = Router::new()
        .route("/users", get(list_users))
        .route("/me", get(current_user));

    // Headers stay out of the span: they carry bearer tokens
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
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

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
