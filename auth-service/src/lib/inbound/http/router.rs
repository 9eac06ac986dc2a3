use std::sync::Arc;
use std::time::Duration;

use auth::internal::messages::VERIFY_USER_PATH;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::cookies::RefreshCookie;
use super::handlers::addresses::add_address;
use super::handlers::addresses::delete_address;
use super::handlers::addresses::list_addresses;
use super::handlers::addresses::update_address;
use super::handlers::internal::verify_user;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::me::admin_check;
use super::handlers::me::me;
use super::handlers::refresh::refresh;
use super::handlers::register::register;
use super::handlers::verify_otp::verify_otp;
use super::middleware::authenticate;
use super::middleware::require_admin;
use crate::domain::session::ports::AuthServicePort;
use crate::domain::user::ports::UserServicePort;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServicePort>,
    pub user_service: Arc<dyn UserServicePort>,
    pub refresh_cookie: RefreshCookie,
}

pub fn create_router(
    auth_service: Arc<dyn AuthServicePort>,
    user_service: Arc<dyn UserServicePort>,
    refresh_cookie: RefreshCookie,
) -> Router {
    let state = AppState {
        auth_service,
        user_service,
        refresh_cookie,
    };

    let public_routes = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/verify-otp", post(verify_otp))
        .route("/auth/refresh", post(refresh));

    let protected_routes = Router::new()
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
        .route(
            "/auth/me/addresses",
            get(list_addresses).post(add_address),
        )
        .route(
            "/auth/me/addresses/:address_id",
            put(update_address).delete(delete_address),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    let admin_routes = Router::new()
        .route("/auth/admin-check", get(admin_check))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    let api = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes);

    // Headers are left out of the span; they carry bearer tokens and cookies.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri().path(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                path = %request.uri().path(),
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
        .nest("/api/v1", api)
        .route(VERIFY_USER_PATH, post(verify_user))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
