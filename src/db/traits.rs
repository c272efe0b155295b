//! Store contracts
//!
//! The account and note services depend only on these traits. There is one
//! implementation, [`TursoClient`](super::turso::TursoClient); which backend it
//! talks to (in-memory SQLite, a local file, or remote Turso) is chosen by
//! [`DatabaseProvider`].
//!
//! # Example
//!
//! ```rust,ignore
//! use notes::db::DatabaseProvider;
//!
//! // In-memory database (default for development/testing)
//! let db = DatabaseProvider::Memory.create_client().await?;
//!
//! // File-based SQLite
//! let db = DatabaseProvider::SQLite { path: "data/notes.db".into() }.create_client().await?;
//! ```

use crate::types::{Account, AccountId, NewAccount, NewNote, Note, NoteId, NoteUpdate, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Database provider configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DatabaseProvider {
    /// In-memory SQLite database (ephemeral, lost on restart)
    #[default]
    Memory,
    /// File-based SQLite database
    SQLite {
        /// Path to the SQLite database file
        path: String,
    },
    /// Remote Turso database (requires network access)
    #[cfg(feature = "turso")]
    Turso {
        /// The Turso database URL (e.g., `libsql://your-db.turso.io`)
        url: String,
        /// Authentication token for the Turso database
        auth_token: String,
    },
}

impl DatabaseProvider {
    /// Create a database client from this provider configuration
    pub async fn create_client(&self) -> Result<Arc<super::turso::TursoClient>> {
        let client = match self {
            DatabaseProvider::Memory => super::turso::TursoClient::new_memory().await?,
            DatabaseProvider::SQLite { path } => super::turso::TursoClient::new_local(path).await?,
            #[cfg(feature = "turso")]
            DatabaseProvider::Turso { url, auth_token } => {
                super::turso::TursoClient::new_remote(url.clone(), auth_token.clone()).await?
            }
        };

        Ok(Arc::new(client))
    }

    /// Short human-readable description, safe to log.
    pub fn describe(&self) -> String {
        match self {
            DatabaseProvider::Memory => "in-memory SQLite".to_string(),
            DatabaseProvider::SQLite { path } => format!("SQLite file {}", path),
            #[cfg(feature = "turso")]
            DatabaseProvider::Turso { url, .. } => format!("Turso {}", url),
        }
    }
}

/// Account persistence used by registration and login.
///
/// Emails are compared case-insensitively.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Whether an account with this email exists
    async fn email_exists(&self, email: &str) -> Result<bool>;

    /// Persist a new account and return it with its assigned id.
    ///
    /// Fails with `AppError::DuplicateEmail` if the email was taken concurrently.
    async fn create_account(&self, account: &NewAccount) -> Result<Account>;

    /// Get an account by email
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>>;
}

/// Note persistence. Every lookup and mutation is keyed by owner as well as id.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// All notes of an owner, newest created first
    async fn list_by_owner(&self, owner: AccountId) -> Result<Vec<Note>>;

    /// A single note, only if it belongs to `owner`
    async fn get_by_id_and_owner(&self, id: NoteId, owner: AccountId) -> Result<Option<Note>>;

    /// Persist a new note and return its assigned id
    async fn create_note(&self, note: &NewNote) -> Result<NoteId>;

    /// Replace title and content; `false` if no note matched id and owner
    async fn update_by_id_and_owner(&self, update: &NoteUpdate) -> Result<bool>;

    /// Delete a note; `false` if no note matched id and owner
    async fn delete_by_id_and_owner(&self, id: NoteId, owner: AccountId) -> Result<bool>;
}
