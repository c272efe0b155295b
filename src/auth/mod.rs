//! Authentication and identity
//!
//! This module holds everything between a raw credential and an authenticated
//! [`Caller`](identity::Caller):
//!
//! - [`auth::password`](crate::auth::password) - Argon2id password hashing and verification
//! - [`auth::jwt`](crate::auth::jwt) - HS256 token issuance and verification
//! - [`auth::identity`](crate::auth::identity) - Caller resolution from verified claims
//! - [`auth::middleware`](crate::auth::middleware) - Axum layer and extractor for protected routes
//!
//! # Token Lifecycle
//!
//! Tokens are issued at registration and login and are never stored. A token
//! is accepted while its signature, issuer and audience match the process
//! configuration and the current time lies in `[nbf, exp)`.
//!
//! ```ignore
//! use notes::auth::jwt::{TokenService, TokenVerification};
//! use notes::auth::identity;
//!
//! let token = tokens.issue(account.id, &account.name, &account.email)?;
//! if let TokenVerification::Valid(claims) = tokens.verify(&token) {
//!     let caller = identity::resolve(&claims);
//! }
//! ```
//!
//! # Configuration
//!
//! Configure via `notes.toml`:
//! ```toml
//! [auth]
//! jwt_secret_env = "JWT_SECRET"   # env var holding the signing key
//! issuer = "notes-server"
//! audience = "notes-client"
//! expires_minutes = 60
//! ```

/// Caller identity resolution from verified claims.
pub mod identity;
/// Token issuance and verification.
pub mod jwt;
/// Authentication middleware and extractors for protected routes.
pub mod middleware;
/// Password hashing.
pub mod password;
