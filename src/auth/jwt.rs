use crate::auth::identity::{NAME_IDENTIFIER_CLAIM, SUBJECT_CLAIM};
use crate::types::{AccountId, AppError, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};

/// Claim set carried by every token.
///
/// The subject is optional on decode because tokens from other producers may
/// carry the account id under [`NAME_IDENTIFIER_CLAIM`] instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(rename = "nameid", default, skip_serializing_if = "Option::is_none")]
    pub name_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

impl Claims {
    /// Looks up a string claim by its JWT name.
    pub fn claim(&self, name: &str) -> Option<&str> {
        match name {
            SUBJECT_CLAIM => self.sub.as_deref(),
            NAME_IDENTIFIER_CLAIM => self.name_id.as_deref(),
            "name" => Some(self.name.as_str()),
            "email" => Some(self.email.as_str()),
            "iss" => Some(self.iss.as_str()),
            "aud" => Some(self.aud.as_str()),
            _ => None,
        }
    }
}

/// Outcome of verifying a token. Verification never fails with an error.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenVerification {
    Valid(Claims),
    Expired,
    /// Bad signature, wrong issuer/audience, not yet valid, or malformed
    Invalid,
}

/// Signing parameters, loaded once at startup.
#[derive(Clone)]
pub struct TokenSettings {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub expires_minutes: i64,
}

impl std::fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("expires_minutes", &self.expires_minutes)
            .finish()
    }
}

/// Issues and verifies HS256 identity tokens.
///
/// Tokens are fully stateless: nothing is stored server-side, so a token stays
/// valid until it expires.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    /// Same checks minus `exp`, used to classify expired tokens
    expired_validation: Validation,
    issuer: String,
    audience: String,
    expiry: Duration,
}

impl TokenService {
    pub fn new(settings: TokenSettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.set_issuer(&[settings.issuer.as_str()]);
        validation.set_audience(&[settings.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "nbf", "iss", "aud"]);

        let mut expired_validation = validation.clone();
        expired_validation.validate_exp = false;

        // Out-of-range lifetimes surface as an error from `issue`, not a panic
        let expiry = Duration::try_minutes(settings.expires_minutes).unwrap_or(Duration::MAX);

        Self {
            encoding_key: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
            validation,
            expired_validation,
            issuer: settings.issuer,
            audience: settings.audience,
            expiry,
        }
    }

    /// Token lifetime in seconds.
    pub fn expires_in(&self) -> i64 {
        self.expiry.num_seconds()
    }

    /// Issues a token for an account, valid from now until the configured expiry.
    pub fn issue(&self, id: AccountId, name: &str, email: &str) -> Result<String> {
        self.issue_at(id, name, email, Utc::now())
    }

    pub(crate) fn issue_at(
        &self,
        id: AccountId,
        name: &str,
        email: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String> {
        let expires_at = issued_at.checked_add_signed(self.expiry).ok_or_else(|| {
            AppError::Internal("Token expiry is outside the representable time range".to_string())
        })?;

        let claims = Claims {
            sub: Some(id.to_string()),
            name_id: None,
            name: name.to_string(),
            email: email.to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: issued_at.timestamp(),
            nbf: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Verifies signature, issuer, audience and lifetime.
    ///
    /// A token is valid while `nbf <= now < exp`; there is no clock-skew leeway.
    /// `Expired` is only reported for tokens that pass every other check.
    pub fn verify(&self, token: &str) -> TokenVerification {
        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => {
                let now = Utc::now().timestamp();
                // The library treats `exp == now` as still valid
                if data.claims.exp <= now {
                    TokenVerification::Expired
                } else if data.claims.nbf > now {
                    TokenVerification::Invalid
                } else {
                    TokenVerification::Valid(data.claims)
                }
            }
            Err(e) => match e.kind() {
                ErrorKind::ExpiredSignature => self.classify_expired(token),
                kind => {
                    tracing::debug!(?kind, "token rejected");
                    TokenVerification::Invalid
                }
            },
        }
    }

    // The library checks `exp` before issuer and audience, so an expired
    // token from the wrong issuer would otherwise read as merely expired.
    fn classify_expired(&self, token: &str) -> TokenVerification {
        match decode::<Claims>(token, &self.decoding_key, &self.expired_validation) {
            Ok(_) => TokenVerification::Expired,
            Err(e) => {
                tracing::debug!(kind = ?e.kind(), "expired token also failed other checks");
                TokenVerification::Invalid
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(secret: &str) -> TokenSettings {
        TokenSettings {
            secret: secret.to_string(),
            issuer: "notes-server".to_string(),
            audience: "notes-client".to_string(),
            expires_minutes: 60,
        }
    }

    fn create_test_service() -> TokenService {
        TokenService::new(settings("test-secret-key-that-is-at-least-32-chars"))
    }

    fn valid_claims(verification: TokenVerification) -> Claims {
        match verification {
            TokenVerification::Valid(claims) => claims,
            other => panic!("expected a valid token, got {:?}", other),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let service = create_test_service();
        let token = service
            .issue(AccountId(42), "Ann", "ann@x.com")
            .expect("should issue token");

        assert_eq!(token.split('.').count(), 3, "compact JWS has three segments");

        let claims = valid_claims(service.verify(&token));
        assert_eq!(claims.sub.as_deref(), Some("42"));
        assert_eq!(claims.name, "Ann");
        assert_eq!(claims.email, "ann@x.com");
        assert_eq!(claims.iss, "notes-server");
        assert_eq!(claims.aud, "notes-client");
        assert!(claims.name_id.is_none());
    }

    #[test]
    fn test_claims_lifetime() {
        let service = create_test_service();
        let token = service.issue(AccountId(1), "a", "a@x.com").unwrap();
        let claims = valid_claims(service.verify(&token));

        let now = Utc::now().timestamp();
        assert!(claims.iat <= now && claims.iat >= now - 5);
        assert_eq!(claims.nbf, claims.iat);
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(service.expires_in(), 3600);
    }

    #[test]
    fn test_expired_token_reports_expired() {
        let service = create_test_service();
        let issued_at = Utc::now() - Duration::minutes(61);
        let token = service
            .issue_at(AccountId(1), "a", "a@x.com", issued_at)
            .unwrap();

        assert_eq!(service.verify(&token), TokenVerification::Expired);
    }

    #[test]
    fn test_token_at_exact_expiry_is_expired() {
        let service = create_test_service();
        let issued_at = Utc::now() - Duration::minutes(60);
        let token = service
            .issue_at(AccountId(1), "a", "a@x.com", issued_at)
            .unwrap();

        assert_eq!(service.verify(&token), TokenVerification::Expired);
    }

    #[test]
    fn test_not_yet_valid_token_is_invalid() {
        let service = create_test_service();
        let issued_at = Utc::now() + Duration::minutes(5);
        let token = service
            .issue_at(AccountId(1), "a", "a@x.com", issued_at)
            .unwrap();

        assert_eq!(service.verify(&token), TokenVerification::Invalid);
    }

    #[test]
    fn test_token_verification_wrong_secret() {
        let service1 = TokenService::new(settings("secret-one-that-is-32-chars-long"));
        let service2 = TokenService::new(settings("secret-two-that-is-32-chars-long"));

        let token = service1.issue(AccountId(7), "a", "a@x.com").unwrap();

        assert_eq!(service2.verify(&token), TokenVerification::Invalid);
    }

    #[test]
    fn test_expired_token_with_wrong_secret_is_invalid() {
        let service1 = TokenService::new(settings("secret-one-that-is-32-chars-long"));
        let service2 = TokenService::new(settings("secret-two-that-is-32-chars-long"));

        let token = service1
            .issue_at(AccountId(7), "a", "a@x.com", Utc::now() - Duration::days(1))
            .unwrap();

        assert_eq!(service2.verify(&token), TokenVerification::Invalid);
    }

    #[test]
    fn test_expired_token_for_other_audience_is_invalid() {
        let issuer = create_test_service();
        let token = issuer
            .issue_at(AccountId(7), "a", "a@x.com", Utc::now() - Duration::days(1))
            .unwrap();

        let mut other_audience = settings("test-secret-key-that-is-at-least-32-chars");
        other_audience.audience = "another-client".to_string();
        assert_eq!(
            TokenService::new(other_audience).verify(&token),
            TokenVerification::Invalid
        );

        let mut other_issuer = settings("test-secret-key-that-is-at-least-32-chars");
        other_issuer.issuer = "someone-else".to_string();
        assert_eq!(
            TokenService::new(other_issuer).verify(&token),
            TokenVerification::Invalid
        );

        assert_eq!(issuer.verify(&token), TokenVerification::Expired);
    }

    #[test]
    fn test_unrepresentable_expiry_fails_without_panicking() {
        let mut huge = settings("test-secret-key-that-is-at-least-32-chars");
        huge.expires_minutes = 1_000_000_000_000;
        let service = TokenService::new(huge);

        assert!(matches!(
            service.issue(AccountId(1), "a", "a@x.com"),
            Err(AppError::Internal(_))
        ));

        huge = settings("test-secret-key-that-is-at-least-32-chars");
        huge.expires_minutes = i64::MAX;
        assert!(
            TokenService::new(huge)
                .issue(AccountId(1), "a", "a@x.com")
                .is_err()
        );
    }

    #[test]
    fn test_issuer_and_audience_must_match() {
        let service = create_test_service();
        let token = service.issue(AccountId(3), "a", "a@x.com").unwrap();

        let mut other_issuer = settings("test-secret-key-that-is-at-least-32-chars");
        other_issuer.issuer = "someone-else".to_string();
        assert_eq!(
            TokenService::new(other_issuer).verify(&token),
            TokenVerification::Invalid
        );

        let mut other_audience = settings("test-secret-key-that-is-at-least-32-chars");
        other_audience.audience = "another-client".to_string();
        assert_eq!(
            TokenService::new(other_audience).verify(&token),
            TokenVerification::Invalid
        );
    }

    #[test]
    fn test_tampered_payload_is_invalid() {
        let service = create_test_service();
        let token = service.issue(AccountId(1), "a", "a@x.com").unwrap();
        let other = service.issue(AccountId(2), "b", "b@x.com").unwrap();

        // Splice the second token's claims onto the first token's signature
        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

        assert_eq!(service.verify(&forged), TokenVerification::Invalid);
    }

    #[test]
    fn test_malformed_tokens_are_invalid() {
        let service = create_test_service();

        assert_eq!(service.verify(""), TokenVerification::Invalid);
        assert_eq!(service.verify("invalid.token.here"), TokenVerification::Invalid);
        assert_eq!(service.verify("not-a-jwt"), TokenVerification::Invalid);
    }

    #[test]
    fn test_claim_lookup_by_name() {
        let service = create_test_service();
        let token = service.issue(AccountId(5), "Bo", "bo@x.com").unwrap();
        let claims = valid_claims(service.verify(&token));

        assert_eq!(claims.claim(SUBJECT_CLAIM), Some("5"));
        assert_eq!(claims.claim(NAME_IDENTIFIER_CLAIM), None);
        assert_eq!(claims.claim("email"), Some("bo@x.com"));
        assert_eq!(claims.claim("unknown"), None);
    }
}
