//! Blocking client for the Tutto payroll/HR API.
//!
//! # Overview
//! An `Authorizer` turns configured credentials into a bearer token, either
//! a pinned one or one fetched from `POST /auth`. A `Dispatcher` maps an
//! endpoint name (or a typed payload) onto one of the nine catalog
//! endpoints and binds it to a transport and the authorizer. Invoking the
//! result performs one HTTP round trip and returns the decoded JSON body.
//!
//! # Design
//! - Request building is pure: `EndpointRequest::to_http_request` produces
//!   plain data, and only a `Transport` performs I/O.
//! - Dependencies are injected at construction; there is no global state.
//! - Fetched credentials are never cached. Every invocation on a
//!   non-pinned authorizer authenticates again.
//! - Field omission rules live on the payload types as serde attributes.

pub mod authorizer;
pub mod client;
pub mod config;
pub mod credential;
pub mod dispatcher;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use authorizer::{AuthWarning, Authorizer, AUTH_PATH};
pub use client::TuttoClient;
pub use config::AuthorizerConfig;
pub use credential::{Credential, CredentialKind, RawCredential};
pub use dispatcher::{catalog, BoundEndpoint, CatalogEntry, Dispatcher};
pub use endpoints::{EndpointKind, EndpointRequest};
pub use error::{ClientError, Result, TransportError};
pub use http::{HttpMethod, HttpRequest};
pub use transport::{Transport, UreqTransport};
pub use types::{
    DirfQuery, Employee, EmployeeOccupation, Occupation, Occurrence, ReferenceQuery, Relative,
    ServiceTicket,
};
