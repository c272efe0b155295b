//! Caller identity resolution.
//!
//! A verified claim set is turned into a [`Caller`] here and nowhere else. The
//! note service only accepts a `Caller`, so the owner of every note operation
//! is always the identity proven by the token.

use crate::auth::jwt::Claims;
use crate::types::AccountId;

/// Primary claim holding the account id.
pub const SUBJECT_CLAIM: &str = "sub";

/// Fallback claim holding the account id (name-identifier convention).
pub const NAME_IDENTIFIER_CLAIM: &str = "nameid";

/// Claim names checked for the account id, in order.
pub const SUBJECT_CLAIM_NAMES: [&str; 2] = [SUBJECT_CLAIM, NAME_IDENTIFIER_CLAIM];

/// The authenticated account behind a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    id: AccountId,
}

impl Caller {
    pub fn id(&self) -> AccountId {
        self.id
    }
}

/// Extracts the caller from a verified claim set.
///
/// Returns `None` when neither subject claim is present or when the first one
/// present does not parse as an [`AccountId`].
pub fn resolve(claims: &Claims) -> Option<Caller> {
    let raw = SUBJECT_CLAIM_NAMES
        .iter()
        .find_map(|name| claims.claim(name).filter(|value| !value.trim().is_empty()))?;

    raw.parse::<AccountId>().ok().map(|id| Caller { id })
}

#[cfg(test)]
impl Caller {
    pub(crate) fn for_tests(id: AccountId) -> Self {
        Self { id }
    }
}
