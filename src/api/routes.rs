use crate::AppState;
use crate::api::ApiDoc;
use crate::auth::jwt::TokenService;
use axum::{
    Json, Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

/// API routes, relative to `/api`.
pub fn create_router(token_service: Arc<TokenService>) -> Router<AppState> {
    let public_routes = Router::new()
        // Public routes (no auth required)
        .route("/auth/register", post(crate::api::handlers::auth::register))
        .route("/auth/login", post(crate::api::handlers::auth::login))
        .route("/health", get(crate::api::handlers::health::health))
        .route("/openapi.json", get(|| async { Json(ApiDoc::openapi()) }));

    let protected_routes = Router::new()
        // Protected routes (auth required)
        .route(
            "/notes",
            get(crate::api::handlers::notes::list_notes)
                .post(crate::api::handlers::notes::create_note),
        )
        .route(
            "/notes/{id}",
            get(crate::api::handlers::notes::get_note)
                .put(crate::api::handlers::notes::update_note)
                .delete(crate::api::handlers::notes::delete_note),
        )
        .layer(middleware::from_fn(move |req, next| {
            crate::auth::middleware::auth_middleware(token_service.clone(), req, next)
        }));

    public_routes.merge(protected_routes)
}

/// The complete application: API routes under `/api`, request tracing, CORS
/// and (with the `swagger-ui` feature) interactive docs.
pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors.allowed_origins);

    let app = Router::new()
        .nest("/api", create_router(state.tokens.clone()))
        .with_state(state);

    #[cfg(feature = "swagger-ui")]
    let app = app.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    app.layer(cors).layer(TraceLayer::new_for_http())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
