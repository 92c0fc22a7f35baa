//! Credential source for every endpoint call.
//!
//! # Design
//! An `Authorizer` is either pinned to a caller-supplied bearer token or
//! holds what it needs to fetch one from `POST /auth`. It never caches a
//! fetched credential: each `current_credential` call on a fetching
//! authorizer performs its own round trip.
//!
//! A rejected authentication is not an error. It yields `Ok(None)` and the
//! endpoint call proceeds without a bearer header.

use std::fmt;
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::config::AuthorizerConfig;
use crate::credential::{Credential, RawCredential, SUCCESS_STATUS};
use crate::error::{ClientError, Result, TransportError};
use crate::http::{HttpRequest, AUTHORIZATION};
use crate::transport::{Transport, UreqTransport};

pub const AUTH_PATH: &str = "/auth";

/// Non-fatal findings made while validating the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthWarning {
    /// Both a basic-auth token and a bearer token were supplied; the bearer
    /// token is used.
    BearerOverridesBasic,
}

impl fmt::Display for AuthWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthWarning::BearerOverridesBasic => write!(
                f,
                "both basic auth and bearer token were provided, using bearer token"
            ),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
enum CredentialSource {
    PinnedBearer(String),
    MustFetch {
        user: String,
        password: String,
        basic_auth_token: String,
    },
}

pub struct Authorizer {
    transport: Arc<dyn Transport>,
    source: CredentialSource,
    user_type: String,
    warnings: Vec<AuthWarning>,
}

impl Authorizer {
    /// Validate `config` and bind the authorizer to `transport`.
    ///
    /// Fails with `ClientError::Configuration` when neither token is given,
    /// or when a token must be fetched but user or password is missing.
    pub fn new(config: &AuthorizerConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let mut warnings = Vec::new();
        let source = match (config.bearer_token(), config.basic_auth_token()) {
            (None, None) => {
                return Err(ClientError::Configuration(
                    "basic auth token or bearer token is required".to_string(),
                ))
            }
            (Some(token), basic) => {
                if basic.is_some() {
                    warn!("{}", AuthWarning::BearerOverridesBasic);
                    warnings.push(AuthWarning::BearerOverridesBasic);
                }
                CredentialSource::PinnedBearer(token.to_string())
            }
            (None, Some(basic)) => match (config.user(), config.password()) {
                (Some(user), Some(password)) => CredentialSource::MustFetch {
                    user: user.to_string(),
                    password: password.to_string(),
                    basic_auth_token: basic.to_string(),
                },
                _ => {
                    return Err(ClientError::Configuration(
                        "user and password are required to fetch a bearer token".to_string(),
                    ))
                }
            },
        };

        Ok(Self {
            transport,
            source,
            user_type: config.user_type.clone(),
            warnings,
        })
    }

    /// Build an authorizer with its own `UreqTransport` for `config.base_url`.
    pub fn from_config(config: &AuthorizerConfig) -> Result<Self> {
        Self::new(config, Arc::new(UreqTransport::new(&config.base_url)))
    }

    pub fn warnings(&self) -> &[AuthWarning] {
        &self.warnings
    }

    pub fn is_pinned(&self) -> bool {
        matches!(self.source, CredentialSource::PinnedBearer(_))
    }

    /// The `POST /auth` request, or `None` when a bearer token is pinned.
    pub fn auth_request(&self) -> Option<HttpRequest> {
        match &self.source {
            CredentialSource::PinnedBearer(_) => None,
            CredentialSource::MustFetch {
                user,
                password,
                basic_auth_token,
            } => Some(self.fetch_request(user, password, basic_auth_token)),
        }
    }

    fn fetch_request(&self, user: &str, password: &str, basic_auth_token: &str) -> HttpRequest {
        let body = json!({
            "user": user,
            "password": password,
            "user_type": self.user_type,
        });
        HttpRequest::post_json(AUTH_PATH, body)
            .with_header(AUTHORIZATION, format!("Basic {basic_auth_token}"))
    }

    /// Current credential. Pinned tokens are returned without network
    /// traffic; otherwise one authentication round trip is made.
    pub fn current_credential(&self) -> Result<Option<Credential>> {
        let request = match &self.source {
            CredentialSource::PinnedBearer(token) => {
                return Ok(Some(Credential::user_supplied(token)))
            }
            CredentialSource::MustFetch {
                user,
                password,
                basic_auth_token,
            } => self.fetch_request(user, password, basic_auth_token),
        };

        debug!(user_type = %self.user_type, "authenticating");
        let body = match self.transport.send(&request) {
            Ok(body) => body,
            Err(TransportError::Status { status, .. }) => {
                warn!(status, "authentication rejected");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let status = body.get("status").and_then(Value::as_i64);
        if status != Some(SUCCESS_STATUS) {
            warn!(?status, "authentication did not succeed");
            return Ok(None);
        }

        let raw: RawCredential =
            serde_json::from_value(body).map_err(|e| ClientError::MalformedCredential {
                field: "body",
                value: e.to_string(),
            })?;
        let credential = Credential::parse(raw)?;
        info!(companies = credential.companies.len(), "credential issued");
        Ok(Some(credential))
    }

    /// `Authorization: Bearer <token>` for the current credential, if any.
    pub fn auth_header(&self) -> Result<Option<(String, String)>> {
        Ok(self
            .current_credential()?
            .map(|credential| credential.as_auth_header()))
    }
}

impl fmt::Debug for Authorizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = match self.source {
            CredentialSource::PinnedBearer(_) => "pinned-bearer",
            CredentialSource::MustFetch { .. } => "must-fetch",
        };
        f.debug_struct("Authorizer")
            .field("source", &source)
            .field("user_type", &self.user_type)
            .field("warnings", &self.warnings)
            .finish()
    }
}
