//! Outcome of an authentication attempt.
//!
//! The auth endpoint returns company scopes as comma-joined strings
//! (`"1,2,3"`). `RawCredential` accepts that shape, or a JSON array, and
//! `Credential::parse` turns it into typed lists.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{ClientError, Result};
use crate::http::AUTHORIZATION;

/// Status value used for credentials that were never fetched remotely.
pub const USER_SUPPLIED_STATUS: i64 = 0;
pub const SUCCESS_STATUS: i64 = 200;

const LIST_DELIMITER: char = ',';

/// Where a credential's token came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    /// Issued by the `/auth` endpoint.
    Fetched,
    /// Pinned by the caller at construction.
    UserSupplied,
}

/// A list field as it arrives from the wire.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ListField {
    Joined(String),
    Items(Vec<Value>),
}

impl Default for ListField {
    fn default() -> Self {
        ListField::Joined(String::new())
    }
}

/// Authentication response body, before list fields are typed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCredential {
    pub status: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default, rename = "type")]
    pub token_type: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub companies: ListField,
    #[serde(default)]
    pub companies_codes: ListField,
    #[serde(default)]
    pub companies_names: ListField,
}

/// Immutable, parsed credential.
#[derive(Clone, PartialEq)]
pub struct Credential {
    pub status: i64,
    pub message: String,
    pub kind: CredentialKind,
    /// Token type as reported by the server (`"bearer"` for pinned tokens).
    pub token_type: String,
    token: String,
    pub companies: Vec<i64>,
    pub company_codes: Vec<i64>,
    pub company_names: Vec<String>,
}

impl Credential {
    /// Type the wire body. A successful status must carry a non-blank token.
    pub fn parse(raw: RawCredential) -> Result<Self> {
        if raw.status == SUCCESS_STATUS && raw.token.trim().is_empty() {
            return Err(ClientError::MalformedCredential {
                field: "token",
                value: raw.token,
            });
        }
        Ok(Self {
            status: raw.status,
            message: raw.message,
            kind: CredentialKind::Fetched,
            token_type: raw.token_type,
            token: raw.token,
            companies: split_list("companies", &raw.companies)?,
            company_codes: split_list("companies_codes", &raw.companies_codes)?,
            company_names: split_list("companies_names", &raw.companies_names)?,
        })
    }

    /// Synthetic credential for a bearer token supplied by the caller.
    pub fn user_supplied(token: &str) -> Self {
        Self {
            status: USER_SUPPLIED_STATUS,
            message: "Bearer token was user provided".to_string(),
            kind: CredentialKind::UserSupplied,
            token_type: "bearer".to_string(),
            token: token.to_string(),
            companies: Vec::new(),
            company_codes: Vec::new(),
            company_names: Vec::new(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn is_success(&self) -> bool {
        self.kind == CredentialKind::UserSupplied || self.status == SUCCESS_STATUS
    }

    /// `("Authorization", "Bearer <token>")`.
    pub fn as_auth_header(&self) -> (String, String) {
        (AUTHORIZATION.to_string(), format!("Bearer {}", self.token))
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("status", &self.status)
            .field("message", &self.message)
            .field("kind", &self.kind)
            .field("token_type", &self.token_type)
            .field("token", &"<redacted>")
            .field("companies", &self.companies)
            .field("company_codes", &self.company_codes)
            .field("company_names", &self.company_names)
            .finish()
    }
}

fn split_list<T: FromStr>(field: &'static str, raw: &ListField) -> Result<Vec<T>> {
    let malformed = |value: String| ClientError::MalformedCredential { field, value };
    match raw {
        ListField::Joined(joined) if joined.trim().is_empty() => Ok(Vec::new()),
        ListField::Joined(joined) => joined
            .split(LIST_DELIMITER)
            .map(|item| {
                let item = item.trim();
                item.parse().map_err(|_| malformed(item.to_string()))
            })
            .collect(),
        ListField::Items(items) => items
            .iter()
            .map(|item| {
                let text = match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                text.trim().parse().map_err(|_| malformed(text.clone()))
            })
            .collect(),
    }
}
