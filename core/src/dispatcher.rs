//! Name-based endpoint construction.
//!
//! # Design
//! A `Dispatcher` is built from a transport and an authorizer, so every
//! `BoundEndpoint` it hands out is wired to both. `create` is strict about
//! names; `create_or_placeholder` keeps the lenient behavior for callers
//! that rely on getting an inert object back for endpoints the catalog does
//! not know yet.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::warn;

use crate::authorizer::Authorizer;
use crate::endpoints::{EndpointKind, EndpointRequest};
use crate::error::{ClientError, Result};
use crate::http::HttpMethod;
use crate::transport::{Transport, UreqTransport};

/// One row of the static catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub method: HttpMethod,
    pub path: &'static str,
}

pub fn catalog() -> Vec<CatalogEntry> {
    EndpointKind::ALL
        .into_iter()
        .map(|kind| CatalogEntry {
            name: kind.name(),
            method: kind.method(),
            path: kind.path(),
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    authorizer: Arc<Authorizer>,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>, authorizer: Arc<Authorizer>) -> Self {
        Self {
            transport,
            authorizer,
        }
    }

    /// Dispatcher with its own `UreqTransport` bound to `base_url`.
    pub fn for_base_url(base_url: &str, authorizer: Arc<Authorizer>) -> Self {
        Self::new(Arc::new(UreqTransport::new(base_url)), authorizer)
    }

    pub fn authorizer(&self) -> &Arc<Authorizer> {
        &self.authorizer
    }

    /// Build the endpoint `name` from `params`.
    ///
    /// Fails with `UnknownEndpoint` for names outside the catalog and with
    /// `InvalidParameters` when `params` does not fit the endpoint.
    pub fn create(&self, name: &str, params: Map<String, Value>) -> Result<BoundEndpoint> {
        let kind = EndpointKind::from_name(name)
            .ok_or_else(|| ClientError::UnknownEndpoint(name.to_string()))?;
        Ok(self.bind(EndpointRequest::from_params(kind, params)?))
    }

    /// Like `create`, but an unknown name yields a placeholder endpoint
    /// instead of an error. The placeholder refuses to be invoked.
    pub fn create_or_placeholder(
        &self,
        name: &str,
        params: Map<String, Value>,
    ) -> Result<BoundEndpoint> {
        match EndpointKind::from_name(name) {
            Some(kind) => Ok(self.bind(EndpointRequest::from_params(kind, params)?)),
            None => {
                warn!(endpoint = name, "unknown endpoint, returning a placeholder");
                Ok(self.bind(EndpointRequest::placeholder(name)))
            }
        }
    }

    pub fn bind(&self, request: EndpointRequest) -> BoundEndpoint {
        BoundEndpoint {
            request,
            transport: Arc::clone(&self.transport),
            authorizer: Arc::clone(&self.authorizer),
        }
    }
}

/// An endpoint request wired to a transport and an authorizer.
#[derive(Debug, Clone)]
pub struct BoundEndpoint {
    request: EndpointRequest,
    transport: Arc<dyn Transport>,
    authorizer: Arc<Authorizer>,
}

impl BoundEndpoint {
    pub fn request(&self) -> &EndpointRequest {
        &self.request
    }

    pub fn name(&self) -> &str {
        self.request.name()
    }

    pub fn method(&self) -> HttpMethod {
        self.request.method()
    }

    pub fn path(&self) -> &'static str {
        self.request.path()
    }

    pub fn is_placeholder(&self) -> bool {
        self.request.kind().is_none()
    }

    /// Look up the current credential and perform the call.
    pub fn invoke(&self) -> Result<Value> {
        // Rejected before `auth_header` so a placeholder makes no auth round trip.
        if let EndpointRequest::Placeholder { name } = &self.request {
            return Err(ClientError::PlaceholderEndpoint(name.clone()));
        }
        let auth_header = self.authorizer.auth_header()?;
        self.request.invoke(self.transport.as_ref(), auth_header)
    }
}
