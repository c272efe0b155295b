//! # Notes Server
//!
//! A personal notes API: accounts register and log in, receive a signed
//! token, and perform CRUD on notes they own.
//!
//! ## Overview
//!
//! The interesting part is the authentication and ownership layer:
//!
//! 1. **Credential hashing** - Argon2id, verified only through the hasher
//! 2. **Stateless tokens** - HS256 JWTs with issuer, audience and expiry
//! 3. **Identity resolution** - a verified claim set becomes a [`Caller`](auth::identity::Caller)
//! 4. **Ownership** - every note query filters on `(note id, owner id)`
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use notes::{AppState, NotesConfig, api::routes::create_app};
//!
//! let config = NotesConfig::load("notes.toml")?;
//! let db = config.database_provider().create_client().await?;
//! let state = AppState::new(config.clone(), db, config.token_settings()?);
//! let app = create_app(state);
//! ```
//!
//! ## Modules
//!
//! - [`api`] - REST API handlers and routes
//! - [`auth`] - Password hashing, tokens, identity and middleware
//! - [`cli`] - Command-line parsing and project scaffolding
//! - [`db`] - Store contracts and the libsql implementation
//! - [`services`] - Account and note services
//! - [`types`] - Common types and error handling
//! - [`utils`] - Configuration loading

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// Password hashing, JWT tokens and authentication middleware.
pub mod auth;
/// Command-line interface for the `notes-server` binary.
pub mod cli;
/// Database clients and store contracts.
pub mod db;
/// Account and note services.
pub mod services;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use db::{DatabaseProvider, TursoClient};
pub use types::{AppError, Result};
pub use utils::toml_config::{ConfigError, NotesConfig};

use crate::auth::jwt::{TokenService, TokenSettings};
use crate::services::{AccountService, NoteService};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Configuration loaded at startup
    pub config: Arc<NotesConfig>,
    /// Database client backing both stores
    pub db: Arc<TursoClient>,
    /// Token issuer/verifier
    pub tokens: Arc<TokenService>,
    /// Registration and login
    pub accounts: Arc<AccountService>,
    /// Owner-scoped note operations
    pub notes: Arc<NoteService>,
}

impl AppState {
    /// Wire the services together around one database client.
    pub fn new(config: NotesConfig, db: Arc<TursoClient>, token_settings: TokenSettings) -> Self {
        let tokens = Arc::new(TokenService::new(token_settings));
        let accounts = Arc::new(AccountService::new(db.clone(), tokens.clone()));
        let notes = Arc::new(NoteService::new(db.clone()));

        Self {
            config: Arc::new(config),
            db,
            tokens,
            accounts,
            notes,
        }
    }
}
