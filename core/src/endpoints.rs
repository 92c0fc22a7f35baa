//! The endpoint catalog and typed request variants.
//!
//! # Design
//! `EndpointKind` is the closed catalog: one variant per remote operation,
//! each with a fixed method and path. `EndpointRequest` pairs a kind with
//! its payload and knows how to turn itself into an `HttpRequest`: GET
//! variants become query parameters, POST variants a JSON body.
//!
//! `Placeholder` stands in for a name outside the catalog when the caller
//! explicitly asks for lenient construction. It builds no request.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{ClientError, Result};
use crate::http::{HttpMethod, HttpRequest};
use crate::transport::Transport;
use crate::types::{
    DirfQuery, Employee, EmployeeOccupation, Occupation, ReferenceQuery, ServiceTicket,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointKind {
    Deductions,
    Purchases,
    ServiceTypes,
    DirfInfos,
    DirfAdditionalInfos,
    Employees,
    EmployeesOccupations,
    Occupations,
    ServiceTickets,
}

impl EndpointKind {
    pub const ALL: [EndpointKind; 9] = [
        EndpointKind::Deductions,
        EndpointKind::Purchases,
        EndpointKind::ServiceTypes,
        EndpointKind::DirfInfos,
        EndpointKind::DirfAdditionalInfos,
        EndpointKind::Employees,
        EndpointKind::EmployeesOccupations,
        EndpointKind::Occupations,
        EndpointKind::ServiceTickets,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EndpointKind::Deductions => "deductions",
            EndpointKind::Purchases => "purchases",
            EndpointKind::ServiceTypes => "service_types",
            EndpointKind::DirfInfos => "dirf_infos",
            EndpointKind::DirfAdditionalInfos => "dirf_additional_infos",
            EndpointKind::Employees => "employees",
            EndpointKind::EmployeesOccupations => "employees_occupations",
            EndpointKind::Occupations => "occupations",
            EndpointKind::ServiceTickets => "service_tickets",
        }
    }

    pub fn method(self) -> HttpMethod {
        match self {
            EndpointKind::Deductions
            | EndpointKind::Purchases
            | EndpointKind::ServiceTypes
            | EndpointKind::DirfInfos
            | EndpointKind::DirfAdditionalInfos => HttpMethod::Get,
            EndpointKind::Employees
            | EndpointKind::EmployeesOccupations
            | EndpointKind::Occupations
            | EndpointKind::ServiceTickets => HttpMethod::Post,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            EndpointKind::Deductions => "/deductions",
            EndpointKind::Purchases => "/purchases",
            EndpointKind::ServiceTypes => "/service_types",
            EndpointKind::DirfInfos => "/dirf_infos",
            EndpointKind::DirfAdditionalInfos => "/dirf_additional_infos",
            EndpointKind::Employees => "/employees",
            EndpointKind::EmployeesOccupations => "/employees_occupations",
            EndpointKind::Occupations => "/occupations",
            EndpointKind::ServiceTickets => "/service_tickets",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// One call to the Tutto API, ready to be serialized.
#[derive(Debug, Clone, PartialEq)]
pub enum EndpointRequest {
    Deductions(ReferenceQuery),
    Purchases(ReferenceQuery),
    ServiceTypes,
    DirfInfos(DirfQuery),
    DirfAdditionalInfos(DirfQuery),
    Employees(Box<Employee>),
    EmployeesOccupations(EmployeeOccupation),
    Occupations(Occupation),
    ServiceTickets(ServiceTicket),
    /// A name outside the catalog. Cannot be invoked.
    Placeholder { name: String },
}

impl EndpointRequest {
    /// Build the variant for `kind` from a parameter bag.
    pub fn from_params(kind: EndpointKind, params: Map<String, Value>) -> Result<Self> {
        let invalid = |source| ClientError::InvalidParameters {
            endpoint: kind.name().to_string(),
            source,
        };
        let params = Value::Object(params);
        let request = match kind {
            EndpointKind::Deductions => {
                EndpointRequest::Deductions(serde_json::from_value(params).map_err(invalid)?)
            }
            EndpointKind::Purchases => {
                EndpointRequest::Purchases(serde_json::from_value(params).map_err(invalid)?)
            }
            EndpointKind::ServiceTypes => {
                if params.as_object().is_some_and(|p| !p.is_empty()) {
                    warn!("service_types takes no parameters, ignoring them");
                }
                EndpointRequest::ServiceTypes
            }
            EndpointKind::DirfInfos => {
                EndpointRequest::DirfInfos(serde_json::from_value(params).map_err(invalid)?)
            }
            EndpointKind::DirfAdditionalInfos => EndpointRequest::DirfAdditionalInfos(
                serde_json::from_value(params).map_err(invalid)?,
            ),
            EndpointKind::Employees => {
                EndpointRequest::Employees(serde_json::from_value(params).map_err(invalid)?)
            }
            EndpointKind::EmployeesOccupations => EndpointRequest::EmployeesOccupations(
                serde_json::from_value(params).map_err(invalid)?,
            ),
            EndpointKind::Occupations => {
                EndpointRequest::Occupations(serde_json::from_value(params).map_err(invalid)?)
            }
            EndpointKind::ServiceTickets => {
                EndpointRequest::ServiceTickets(serde_json::from_value(params).map_err(invalid)?)
            }
        };
        Ok(request)
    }

    pub fn placeholder(name: &str) -> Self {
        EndpointRequest::Placeholder {
            name: name.to_string(),
        }
    }

    /// `None` for a placeholder.
    pub fn kind(&self) -> Option<EndpointKind> {
        let kind = match self {
            EndpointRequest::Deductions(_) => EndpointKind::Deductions,
            EndpointRequest::Purchases(_) => EndpointKind::Purchases,
            EndpointRequest::ServiceTypes => EndpointKind::ServiceTypes,
            EndpointRequest::DirfInfos(_) => EndpointKind::DirfInfos,
            EndpointRequest::DirfAdditionalInfos(_) => EndpointKind::DirfAdditionalInfos,
            EndpointRequest::Employees(_) => EndpointKind::Employees,
            EndpointRequest::EmployeesOccupations(_) => EndpointKind::EmployeesOccupations,
            EndpointRequest::Occupations(_) => EndpointKind::Occupations,
            EndpointRequest::ServiceTickets(_) => EndpointKind::ServiceTickets,
            EndpointRequest::Placeholder { .. } => return None,
        };
        Some(kind)
    }

    pub fn name(&self) -> &str {
        match self {
            EndpointRequest::Placeholder { name } => name.as_str(),
            other => other.kind().map_or("", EndpointKind::name),
        }
    }

    /// Placeholders report GET.
    pub fn method(&self) -> HttpMethod {
        self.kind().map_or(HttpMethod::Get, EndpointKind::method)
    }

    /// Placeholders have an empty path.
    pub fn path(&self) -> &'static str {
        self.kind().map_or("", EndpointKind::path)
    }

    /// Serialize into an unauthenticated `HttpRequest`.
    pub fn to_http_request(&self) -> Result<HttpRequest> {
        let path = self.path();
        let request = match self {
            EndpointRequest::Deductions(query) | EndpointRequest::Purchases(query) => {
                with_query(path, self.name(), query)?
            }
            EndpointRequest::DirfInfos(query) | EndpointRequest::DirfAdditionalInfos(query) => {
                with_query(path, self.name(), query)?
            }
            EndpointRequest::ServiceTypes => HttpRequest::get(path),
            EndpointRequest::Employees(employee) => {
                with_body(path, self.name(), &**employee)?
            }
            EndpointRequest::EmployeesOccupations(payload) => {
                with_body(path, self.name(), payload)?
            }
            EndpointRequest::Occupations(payload) => with_body(path, self.name(), payload)?,
            EndpointRequest::ServiceTickets(payload) => with_body(path, self.name(), payload)?,
            EndpointRequest::Placeholder { name } => {
                return Err(ClientError::PlaceholderEndpoint(name.clone()))
            }
        };
        Ok(request)
    }

    /// Send this request through `transport`, attaching `auth_header` when
    /// present. The transport's result is returned unchanged.
    pub fn invoke(
        &self,
        transport: &dyn Transport,
        auth_header: Option<(String, String)>,
    ) -> Result<Value> {
        let mut request = self.to_http_request()?;
        match auth_header {
            Some((name, value)) => request = request.with_header(&name, value),
            None => warn!(endpoint = self.name(), "sending request without credentials"),
        }
        debug!(
            endpoint = self.name(),
            method = request.method.as_str(),
            query_params = request.query.len(),
            "invoking endpoint"
        );
        Ok(transport.send(&request)?)
    }
}

fn to_object<T: Serialize>(endpoint: &str, payload: &T) -> Result<Map<String, Value>> {
    let invalid = |source| ClientError::InvalidParameters {
        endpoint: endpoint.to_string(),
        source,
    };
    match serde_json::to_value(payload).map_err(invalid)? {
        Value::Object(map) => Ok(map),
        _ => Err(invalid(serde::ser::Error::custom("payload is not an object"))),
    }
}

fn with_query<T: Serialize>(path: &str, endpoint: &str, payload: &T) -> Result<HttpRequest> {
    let mut request = HttpRequest::get(path);
    request.query = to_object(endpoint, payload)?
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (key, value)
        })
        .collect();
    Ok(request)
}

fn with_body<T: Serialize>(path: &str, endpoint: &str, payload: &T) -> Result<HttpRequest> {
    let body = Value::Object(to_object(endpoint, payload)?);
    Ok(HttpRequest::post_json(path, body))
}
