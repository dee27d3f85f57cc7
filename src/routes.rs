// src/routes.rs

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::Method,
    middleware,
    routing::{get, post, put},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{auth, location, posts, profile, reports, upload},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Uploads stay under 5MB; leave some headroom for multipart framing.
const MAX_UPLOAD_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, posts, users, profile, upload, location).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (Database Pool + Config).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let post_routes = Router::new()
        .route("/", get(posts::list_feed))
        .route("/{id}", get(posts::get_post))
        // Protected post routes
        .merge(
            Router::new()
                .route("/", post(posts::create_post))
                .route("/expiring", get(posts::list_expiring))
                .route(
                    "/{id}",
                    put(posts::update_post).delete(posts::delete_post),
                )
                .route("/{id}/extend", post(posts::extend_post))
                .route("/{id}/report", post(reports::report_post))
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth_middleware,
                )),
        );

    let user_routes = Router::new()
        .route("/{id}", get(profile::get_user))
        .route("/{id}/posts", get(profile::list_user_posts));

    let profile_routes = Router::new()
        .route("/me", get(profile::get_me).put(profile::update_me))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let upload_routes = Router::new()
        .route("/", post(upload::upload_image))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY_BYTES))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let location_routes = Router::new().route("/postal/{code}", get(location::postal_lookup));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/posts", post_routes)
        .nest("/api/users", user_routes)
        .nest("/api/profile", profile_routes)
        .nest("/api/upload", upload_routes)
        .nest("/api/location", location_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
