use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

// ============= Identifiers =============

/// Surrogate key of an account.
///
/// The same type is used by the stores, the token subject and the identity
/// resolver. On the wire it is a plain integer; inside a token it is the
/// decimal string form.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct AccountId(pub i64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccountId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(AccountId)
    }
}

/// Surrogate key of a note.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct NoteId(pub i64);

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============= Domain Types =============

/// A registered account as stored by the user store.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub email: String,
    /// PHC-formatted Argon2 hash. Never the plaintext.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Account data handed to the user store; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    /// Owning account. Set once at creation from the authenticated caller.
    pub user_id: AccountId,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Note data handed to the note store; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewNote {
    pub owner: AccountId,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Replacement title/content for an existing note, scoped to its owner.
#[derive(Debug, Clone)]
pub struct NoteUpdate {
    pub id: NoteId,
    pub owner: AccountId,
    pub title: String,
    pub content: String,
    pub updated_at: DateTime<Utc>,
}

// ============= Authentication Types =============

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

// ============= Note Request Types =============

/// Body of note create and update requests.
///
/// There is no owner field: unknown fields such as `userId` are
/// dropped during deserialization and the owner always comes from the token.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NoteRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;

        match self {
            AppError::Unauthenticated | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::DuplicateEmail | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();

        // Server-side failures are logged in full but reported generically.
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            match self {
                AppError::StoreUnavailable(_) => "Service temporarily unavailable".to_string(),
                _ => "Internal server error".to_string(),
            }
        } else {
            self.to_string()
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Malformed or incomplete JSON bodies answer 400 with the usual error body.
impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_account_id_parses_decimal_strings() {
        assert_eq!("42".parse::<AccountId>().unwrap(), AccountId(42));
        assert_eq!(" 7 ".parse::<AccountId>().unwrap(), AccountId(7));
        assert!("abc".parse::<AccountId>().is_err());
        assert!("".parse::<AccountId>().is_err());
        assert!("4f1c-uuid".parse::<AccountId>().is_err());
    }

    #[test]
    fn test_note_serializes_camel_case() {
        let note = Note {
            id: NoteId(1),
            user_id: AccountId(9),
            title: "t".to_string(),
            content: "c".to_string(),
            created_at: Utc::now(),
            updated_at: None,
        };

        let value = serde_json::to_value(&note).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["userId"], 9);
        assert!(value.get("createdAt").is_some());
        assert!(value["updatedAt"].is_null());
    }

    #[test]
    fn test_note_request_ignores_owner_field() {
        let req: NoteRequest =
            serde_json::from_str(r#"{"title":"a","content":"b","userId":99}"#).unwrap();
        assert_eq!(req.title, "a");
        assert_eq!(req.content, "b");
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(AppError::Unauthenticated.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::DuplicateEmail.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::NotFound("note".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::StoreUnavailable("down".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert!(AppError::Database("x".into()).status_code().is_server_error());
    }
}
