use crate::auth::jwt::TokenService;
use crate::auth::password::CredentialHasher;
use crate::db::UserStore;
use crate::types::{Account, AppError, NewAccount, Result, TokenResponse};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

/// Registration and login.
///
/// These are the only operations that see a plaintext password. It is hashed
/// or verified and then dropped; it is never logged or stored.
pub struct AccountService {
    users: Arc<dyn UserStore>,
    hasher: CredentialHasher,
    tokens: Arc<TokenService>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserStore>, tokens: Arc<TokenService>) -> Self {
        Self {
            users,
            hasher: CredentialHasher::new(),
            tokens,
        }
    }

    /// Creates an account and returns a token for it.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<TokenResponse> {
        let name = name.trim();
        let email = normalize_email(email);

        if name.is_empty() {
            return Err(AppError::InvalidInput("Name is required".to_string()));
        }
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::InvalidInput("A valid email is required".to_string()));
        }
        if password.is_empty() {
            return Err(AppError::InvalidInput("Password is required".to_string()));
        }

        if self.users.email_exists(&email).await? {
            debug!(%email, "registration rejected: email taken");
            return Err(AppError::DuplicateEmail);
        }

        let password_hash = self.hash_password(password).await?;

        // A concurrent registration can still win the race; the store's
        // unique index turns that into DuplicateEmail.
        let account = self
            .users
            .create_account(&NewAccount {
                name: name.to_string(),
                email,
                password_hash,
                created_at: Utc::now(),
            })
            .await?;

        info!(account_id = %account.id, "account registered");

        self.issue_for(&account)
    }

    /// Checks credentials and returns a fresh token.
    ///
    /// An unknown email and a wrong password produce the same error.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse> {
        let email = normalize_email(email);

        let Some(account) = self.users.find_by_email(&email).await? else {
            debug!("login rejected");
            return Err(AppError::InvalidCredentials);
        };

        if !self.verify_password(password, &account.password_hash).await? {
            debug!("login rejected");
            return Err(AppError::InvalidCredentials);
        }

        info!(account_id = %account.id, "account logged in");

        self.issue_for(&account)
    }

    fn issue_for(&self, account: &Account) -> Result<TokenResponse> {
        let token = self
            .tokens
            .issue(account.id, &account.name, &account.email)?;

        Ok(TokenResponse {
            token,
            expires_in: self.tokens.expires_in(),
        })
    }

    // Argon2 is CPU-bound; run it off the async worker threads.
    async fn hash_password(&self, password: &str) -> Result<String> {
        let hasher = self.hasher.clone();
        let password = password.to_string();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
    }

    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        let hash = hash.to_string();

        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
