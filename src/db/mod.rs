//! Persistence for accounts and notes.
//!
//! - [`traits`] - the `UserStore` / `NoteStore` contracts and backend selection
//! - [`turso`] - the libsql implementation (in-memory, local file, or remote Turso)

#![allow(missing_docs)]

pub mod traits;
pub mod turso;

// Re-exports
pub use traits::{DatabaseProvider, NoteStore, UserStore};
pub use turso::TursoClient;
