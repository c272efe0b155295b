use crate::{
    AppState,
    types::{LoginRequest, RegisterRequest, Result, TokenResponse},
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered successfully", body = TokenResponse),
        (status = 400, description = "Invalid input or email already registered")
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    body: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>> {
    let Json(payload) = body?;
    let tokens = state
        .accounts
        .register(&payload.name, &payload.email, &payload.password)
        .await?;

    Ok(Json(tokens))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    body: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>> {
    let Json(payload) = body?;
    let tokens = state
        .accounts
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(tokens))
}
