//! API request handlers.
//!
//! This module contains all HTTP request handlers organized by functionality.

/// Authentication handlers (login, register).
pub mod auth;
/// Health check handler.
pub mod health;
/// Note CRUD handlers.
pub mod notes;
