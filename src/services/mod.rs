//! Application services.
//!
//! - [`accounts`] - registration and login, the only code that handles plaintext passwords
//! - [`notes`] - note CRUD, always scoped to the authenticated caller

/// Registration and login orchestration.
pub mod accounts;
/// Owner-scoped note operations.
pub mod notes;

pub use accounts::AccountService;
pub use notes::NoteService;
