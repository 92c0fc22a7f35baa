//! The network seam.
//!
//! # Design
//! Everything above this module builds `HttpRequest` values; only a
//! `Transport` performs I/O. `UreqTransport` is the blocking default. Tests
//! substitute an in-process fake so request building and the authorization
//! flow can be checked without a server.
//!
//! The transport adds no retries or timeouts of its own and is stateless
//! apart from its base URL, so one instance can be shared across threads.

use std::fmt;

use serde_json::Value;
use tracing::debug;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest};

/// Executes one request and returns the decoded JSON body.
pub trait Transport: Send + Sync {
    fn send(&self, request: &HttpRequest) -> Result<Value, TransportError>;
}

impl fmt::Debug for dyn Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("dyn Transport")
    }
}

/// Blocking transport backed by a `ureq` agent.
#[derive(Clone)]
pub struct UreqTransport {
    base_url: String,
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(base_url: &str) -> Self {
        // Non-2xx statuses come back as data so their body can be reported.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<Value, TransportError> {
        let url = self.url_for(&request.path);
        debug!(method = request.method.as_str(), url = %url, "sending request");

        let result = match request.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                for (name, value) in &request.query {
                    builder = builder.query(name, value);
                }
                builder.call()
            }
            HttpMethod::Post => {
                let mut builder = self.agent.post(&url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                for (name, value) in &request.query {
                    builder = builder.query(name, value);
                }
                match &request.body {
                    Some(body) => builder.send_json(body),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result.map_err(|e| TransportError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        debug!(status, url = %url, "received response");

        if !(200..300).contains(&status) {
            return Err(TransportError::Status { status, body });
        }
        decode_body(&body)
    }
}

/// Decode a 2xx body. An empty body is JSON `null`.
pub fn decode_body(body: &str) -> Result<Value, TransportError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| TransportError::Decode(e.to_string()))
}

#[cfg(test)]
pub(crate) mod fake {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Records every request and answers from a queue, falling back to a
    /// fixed response once the queue is empty.
    pub(crate) struct RecordingTransport {
        requests: Mutex<Vec<HttpRequest>>,
        queued: Mutex<VecDeque<Result<Value, TransportError>>>,
        fallback: Value,
    }

    impl RecordingTransport {
        pub(crate) fn new(fallback: Value) -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                queued: Mutex::new(VecDeque::new()),
                fallback,
            }
        }

        pub(crate) fn push(&self, response: Result<Value, TransportError>) {
            self.queued.lock().unwrap().push_back(response);
        }

        pub(crate) fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub(crate) fn count_path(&self, path: &str) -> usize {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.path == path)
                .count()
        }
    }

    impl Transport for RecordingTransport {
        fn send(&self, request: &HttpRequest) -> Result<Value, TransportError> {
            self.requests.lock().unwrap().push(request.clone());
            self.queued
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(self.fallback.clone()))
        }
    }
}
