//! Typed entry point for the Tutto API.
//!
//! # Design
//! `TuttoClient` owns one transport shared by its authorizer and its
//! dispatcher. Each accessor returns a `BoundEndpoint`; nothing touches the
//! network until `invoke` is called on it.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::authorizer::Authorizer;
use crate::config::AuthorizerConfig;
use crate::dispatcher::{BoundEndpoint, Dispatcher};
use crate::endpoints::EndpointRequest;
use crate::error::Result;
use crate::transport::{Transport, UreqTransport};
use crate::types::{
    DirfQuery, Employee, EmployeeOccupation, Occupation, ReferenceQuery, ServiceTicket,
};

#[derive(Debug, Clone)]
pub struct TuttoClient {
    base_url: String,
    dispatcher: Dispatcher,
}

impl TuttoClient {
    /// Validate `config` and build a client over a `UreqTransport`.
    pub fn new(config: &AuthorizerConfig) -> Result<Self> {
        Self::with_transport(config, Arc::new(UreqTransport::new(&config.base_url)))
    }

    /// Build a client from `TUTTO_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(&AuthorizerConfig::from_env()?)
    }

    pub fn with_transport(config: &AuthorizerConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let authorizer = Arc::new(Authorizer::new(config, Arc::clone(&transport))?);
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            dispatcher: Dispatcher::new(transport, authorizer),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn authorizer(&self) -> &Authorizer {
        self.dispatcher.authorizer()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Name-based construction; unknown names are an error.
    pub fn endpoint(&self, name: &str, params: Map<String, Value>) -> Result<BoundEndpoint> {
        self.dispatcher.create(name, params)
    }

    pub fn deductions(&self, query: ReferenceQuery) -> BoundEndpoint {
        self.dispatcher.bind(EndpointRequest::Deductions(query))
    }

    pub fn purchases(&self, query: ReferenceQuery) -> BoundEndpoint {
        self.dispatcher.bind(EndpointRequest::Purchases(query))
    }

    pub fn service_types(&self) -> BoundEndpoint {
        self.dispatcher.bind(EndpointRequest::ServiceTypes)
    }

    pub fn dirf_infos(&self, query: DirfQuery) -> BoundEndpoint {
        self.dispatcher.bind(EndpointRequest::DirfInfos(query))
    }

    pub fn dirf_additional_infos(&self, query: DirfQuery) -> BoundEndpoint {
        self.dispatcher.bind(EndpointRequest::DirfAdditionalInfos(query))
    }

    pub fn employees(&self, employee: Employee) -> BoundEndpoint {
        self.dispatcher
            .bind(EndpointRequest::Employees(Box::new(employee)))
    }

    pub fn employees_occupations(&self, payload: EmployeeOccupation) -> BoundEndpoint {
        self.dispatcher
            .bind(EndpointRequest::EmployeesOccupations(payload))
    }

    pub fn occupations(&self, payload: Occupation) -> BoundEndpoint {
        self.dispatcher.bind(EndpointRequest::Occupations(payload))
    }

    pub fn service_tickets(&self, payload: ServiceTicket) -> BoundEndpoint {
        self.dispatcher.bind(EndpointRequest::ServiceTickets(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::http::{HttpMethod, AUTHORIZATION};
    use crate::transport::fake::RecordingTransport;
    use serde_json::json;

    fn client(transport: Arc<RecordingTransport>) -> TuttoClient {
        let config = AuthorizerConfig::new("https://tutto.example/").with_bearer_token("tok");
        TuttoClient::with_transport(&config, transport).unwrap()
    }

    #[test]
    fn base_url_trailing_slash_is_stripped() {
        let c = client(Arc::new(RecordingTransport::new(Value::Null)));
        assert_eq!(c.base_url(), "https://tutto.example");
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = AuthorizerConfig::new("https://tutto.example");
        let err = TuttoClient::new(&config).unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));
    }

    #[test]
    fn typed_accessors_match_catalog() {
        let c = client(Arc::new(RecordingTransport::new(Value::Null)));
        let cases = [
            (c.deductions(ReferenceQuery::new("1")), "/deductions", HttpMethod::Get),
            (c.purchases(ReferenceQuery::new("1")), "/purchases", HttpMethod::Get),
            (c.service_types(), "/service_types", HttpMethod::Get),
            (c.dirf_infos(DirfQuery::new("1")), "/dirf_infos", HttpMethod::Get),
            (
                c.dirf_additional_infos(DirfQuery::new("1")),
                "/dirf_additional_infos",
                HttpMethod::Get,
            ),
            (c.employees(Employee::default()), "/employees", HttpMethod::Post),
            (
                c.employees_occupations(EmployeeOccupation::default()),
                "/employees_occupations",
                HttpMethod::Post,
            ),
            (c.occupations(Occupation::default()), "/occupations", HttpMethod::Post),
            (
                c.service_tickets(ServiceTicket::default()),
                "/service_tickets",
                HttpMethod::Post,
            ),
        ];
        for (endpoint, path, method) in cases {
            assert_eq!(endpoint.path(), path);
            assert_eq!(endpoint.method(), method);
        }
    }

    #[test]
    fn service_ticket_round_trip() {
        let transport = Arc::new(RecordingTransport::new(json!({"id": 77})));
        let c = client(transport.clone());
        let ticket = ServiceTicket {
            employee_badge: "42".to_string(),
            employee_vat: "123".to_string(),
            employee_email: "ana@example.com".to_string(),
            title: "Payslip".to_string(),
            description: "Missing payslip".to_string(),
            service_type_id: 3,
        };

        let result = c.service_tickets(ticket).invoke().unwrap();
        assert_eq!(result, json!({"id": 77}));

        let sent = &transport.requests()[0];
        assert_eq!(sent.method, HttpMethod::Post);
        assert_eq!(sent.header(AUTHORIZATION), Some("Bearer tok"));
        assert_eq!(sent.body.as_ref().unwrap()["service_type_id"], 3);
    }

    #[test]
    fn endpoint_by_name_rejects_unknown() {
        let c = client(Arc::new(RecordingTransport::new(Value::Null)));
        assert!(matches!(
            c.endpoint("nope", Map::new()),
            Err(ClientError::UnknownEndpoint(_))
        ));
    }
}
