//! Authorizer settings.
//!
//! Settings can be built in code, deserialized with serde, or read from
//! `TUTTO_*` environment variables. Blank strings count as absent.

use serde::Deserialize;

use crate::error::{ClientError, Result};

pub const DEFAULT_USER_TYPE: &str = "external";

pub const ENV_BASE_URL: &str = "TUTTO_BASE_URL";
pub const ENV_USER: &str = "TUTTO_USER";
pub const ENV_PASSWORD: &str = "TUTTO_PASSWORD";
pub const ENV_BASIC_AUTH_TOKEN: &str = "TUTTO_BASIC_AUTH_TOKEN";
pub const ENV_BEARER_TOKEN: &str = "TUTTO_BEARER_TOKEN";
pub const ENV_USER_TYPE: &str = "TUTTO_USER_TYPE";

#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct AuthorizerConfig {
    pub base_url: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub basic_auth_token: Option<String>,
    #[serde(default)]
    pub bearer_token: Option<String>,
    #[serde(default = "default_user_type")]
    pub user_type: String,
}

fn default_user_type() -> String {
    DEFAULT_USER_TYPE.to_string()
}

impl AuthorizerConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            user: None,
            password: None,
            basic_auth_token: None,
            bearer_token: None,
            user_type: default_user_type(),
        }
    }

    pub fn with_user(mut self, user: &str) -> Self {
        self.user = Some(user.to_string());
        self
    }

    pub fn with_password(mut self, password: &str) -> Self {
        self.password = Some(password.to_string());
        self
    }

    pub fn with_basic_auth_token(mut self, token: &str) -> Self {
        self.basic_auth_token = Some(token.to_string());
        self
    }

    pub fn with_bearer_token(mut self, token: &str) -> Self {
        self.bearer_token = Some(token.to_string());
        self
    }

    pub fn with_user_type(mut self, user_type: &str) -> Self {
        self.user_type = user_type.to_string();
        self
    }

    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = present(lookup(ENV_BASE_URL))
            .ok_or_else(|| ClientError::Configuration(format!("{ENV_BASE_URL} is not set")))?;
        Ok(Self {
            base_url,
            user: present(lookup(ENV_USER)),
            password: present(lookup(ENV_PASSWORD)),
            basic_auth_token: present(lookup(ENV_BASIC_AUTH_TOKEN)),
            bearer_token: present(lookup(ENV_BEARER_TOKEN)),
            user_type: present(lookup(ENV_USER_TYPE)).unwrap_or_else(default_user_type),
        })
    }

    pub(crate) fn user(&self) -> Option<&str> {
        non_blank(&self.user)
    }

    pub(crate) fn password(&self) -> Option<&str> {
        non_blank(&self.password)
    }

    pub(crate) fn basic_auth_token(&self) -> Option<&str> {
        non_blank(&self.basic_auth_token)
    }

    pub(crate) fn bearer_token(&self) -> Option<&str> {
        non_blank(&self.bearer_token)
    }
}

impl std::fmt::Debug for AuthorizerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("AuthorizerConfig")
            .field("base_url", &self.base_url)
            .field("user", &self.user)
            .field("password", &redact(&self.password))
            .field("basic_auth_token", &redact(&self.basic_auth_token))
            .field("bearer_token", &redact(&self.bearer_token))
            .field("user_type", &self.user_type)
            .finish()
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
