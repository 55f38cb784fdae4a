// Core Client Implementation

use crate::builder::{RequestBuilder, RestRequest};
use crate::context::RestContext;
use crate::domains::*;
use crate::middleware::{RequestMiddleware, ResponseMiddleware};
use crate::transport::{RawResponse, ReqwestTransport, Transport};
use crate::types::*;
use bytes::Bytes;
use reqwest::Method;
use serde_json::Value;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::{debug, warn};

/// The request dispatcher shared by the client and every domain client.
///
/// Holds the target context, the transport and the middleware chain. It has
/// no mutable state: each dispatch is an independent request/response.
#[derive(Clone)]
pub struct Dispatcher {
    pub(crate) context: RestContext,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) request_middleware: Vec<Arc<dyn RequestMiddleware>>,
    pub(crate) response_middleware: Vec<Arc<dyn ResponseMiddleware>>,
}

impl Dispatcher {
    pub fn context(&self) -> &RestContext {
        &self.context
    }

    /// Start building a request for `path`
    pub fn request(&self, method: Method, path: impl Into<String>) -> RequestBuilder<'_> {
        RequestBuilder::new(self, method, path)
    }

    /// Dispatch a request and parse the response payload.
    ///
    /// A successful body that is not JSON is returned as a string value and an
    /// empty body as `null`.
    pub async fn dispatch(&self, request: RestRequest) -> RestResult<Value> {
        let response = self.execute(request).await?;
        let mut payload = parse_payload(&response.body);

        for middleware in &self.response_middleware {
            payload = middleware.process_response(payload).await?;
        }

        Ok(payload)
    }

    /// Dispatch a request and return the raw response body
    pub async fn dispatch_bytes(&self, request: RestRequest) -> RestResult<Bytes> {
        Ok(self.execute(request).await?.body)
    }

    async fn execute(&self, mut request: RestRequest) -> RestResult<RawResponse> {
        for middleware in &self.request_middleware {
            request = middleware.process_request(request).await?;
        }

        let method = request.method.clone();
        let path = request.path.clone();
        debug!(method = %method, path = %path, multipart = request.is_multipart(), "Dispatching request");

        let response = self.transport.execute(&self.context, request).await?;
        debug!(method = %method, path = %path, status = response.status, "Received response");

        if !response.is_success() {
            let body = String::from_utf8_lossy(&response.body);
            warn!(method = %method, path = %path, status = response.status, "Request failed");
            return Err(RestError::from_status(response.status, &body));
        }

        Ok(response)
    }
}

fn parse_payload(body: &[u8]) -> Value {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

#[derive(Clone)]
pub struct RestClient {
    dispatcher: Arc<Dispatcher>,
    domain_registry: Arc<OnceLock<Arc<DomainClientRegistry>>>,
    custom_transport: bool,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient").finish_non_exhaustive()
    }
}

impl RestClient {
    /// Create a client for the given context using the default reqwest transport
    pub fn new(context: RestContext) -> RestResult<Self> {
        Ok(Self::build(context, Arc::new(ReqwestTransport::new()?), false))
    }

    /// Create a client that sends its requests through `transport`.
    /// This is useful for testing
    pub fn with_transport_for(context: RestContext, transport: impl Transport + 'static) -> Self {
        Self::build(context, Arc::new(transport), true)
    }

    fn build(context: RestContext, transport: Arc<dyn Transport>, custom_transport: bool) -> Self {
        Self {
            dispatcher: Arc::new(Dispatcher {
                context,
                transport,
                request_middleware: Vec::new(),
                response_middleware: Vec::new(),
            }),
            domain_registry: Arc::new(OnceLock::new()),
            custom_transport,
        }
    }

    /// Replace the transport
    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        self.custom_transport = true;
        self.modify(|dispatcher| dispatcher.transport = Arc::new(transport))
    }

    /// Use a reqwest transport with a custom request timeout.
    ///
    /// Fails with [`RestError::Configuration`] once a custom transport is
    /// installed, since the timeout could not reach it.
    pub fn with_timeout(self, timeout: Duration) -> RestResult<Self> {
        if self.custom_transport {
            return Err(RestError::Configuration(
                "a request timeout only applies to the built-in reqwest transport".to_string(),
            ));
        }
        let transport = ReqwestTransport::with_timeout(timeout)?;
        Ok(self.modify(|dispatcher| dispatcher.transport = Arc::new(transport)))
    }

    /// Add middleware that processes requests before they're sent
    pub fn add_request_middleware(self, middleware: impl RequestMiddleware + 'static) -> Self {
        self.modify(|dispatcher| dispatcher.request_middleware.push(Arc::new(middleware)))
    }

    /// Add middleware that processes response payloads after they're received
    pub fn add_response_middleware(self, middleware: impl ResponseMiddleware + 'static) -> Self {
        self.modify(|dispatcher| dispatcher.response_middleware.push(Arc::new(middleware)))
    }

    // Domain clients capture the dispatcher, so any change starts a fresh registry
    fn modify(mut self, change: impl FnOnce(&mut Dispatcher)) -> Self {
        change(Arc::make_mut(&mut self.dispatcher));
        self.domain_registry = Arc::new(OnceLock::new());
        self
    }

    pub fn context(&self) -> &RestContext {
        self.dispatcher.context()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Start building a request against an arbitrary resource path
    pub fn request(&self, method: Method, path: impl Into<String>) -> RequestBuilder<'_> {
        self.dispatcher.request(method, path)
    }

    /// Get the domain client registry
    pub fn domains(&self) -> Arc<DomainClientRegistry> {
        self.domain_registry
            .get_or_init(|| Arc::new(DomainClientRegistry::new(self.dispatcher.clone())))
            .clone()
    }

    /// Get the client for group endpoints
    pub fn groups(&self) -> Arc<GroupClient> {
        self.domains().groups()
    }

    /// Get the client for meeting endpoints
    pub fn meetings(&self) -> Arc<MeetingClient> {
        self.domains().meetings()
    }

    /// Get the client for picture cropping
    pub fn crop(&self) -> Arc<CropClient> {
        self.domains().crop()
    }

    /// Register a custom domain client
    pub fn register_domain<T: DomainClient + 'static>(&self, name: &str, client: T) -> &Self {
        self.domains().register(name, client);
        self
    }

    /// Get a custom domain client by name
    pub fn get_domain(&self, name: &str) -> Option<Arc<dyn DomainClient>> {
        self.domains().get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_parsing_falls_back_to_text() {
        assert_eq!(parse_payload(b""), Value::Null);
        assert_eq!(parse_payload(b"  \n"), Value::Null);
        assert_eq!(parse_payload(br#"{"id":"g:cam:a"}"#), json!({ "id": "g:cam:a" }));
        assert_eq!(parse_payload(b"OK"), Value::String("OK".to_string()));
    }

    #[test]
    fn domain_clients_are_cached_per_configuration() {
        let context = RestContext::new("http://tenant.example.com").unwrap();
        let client = RestClient::new(context).unwrap();
        assert!(Arc::ptr_eq(&client.groups(), &client.groups()));

        let reconfigured = client.clone().with_timeout(Duration::from_secs(5)).unwrap();
        assert!(!Arc::ptr_eq(&client.groups(), &reconfigured.groups()));
    }
}
