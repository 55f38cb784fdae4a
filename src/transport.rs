//! HTTP transport seam.
//!
//! The dispatcher hands every finished [`RestRequest`] to a [`Transport`].
//! [`ReqwestTransport`] performs real HTTP exchanges; tests install their own
//! implementation to observe requests without a network.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header, multipart, Client as HttpClient, Method};
use std::time::Duration;

use crate::builder::{FilePart, RestRequest};
use crate::context::RestContext;
use crate::transport_error;
use crate::types::*;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

lazy_static::lazy_static! {
    static ref CLIENT_CONFIG: std::sync::Mutex<TlsConfig> = std::sync::Mutex::new(TlsConfig::default());
}

/// Configuration for TLS
#[derive(Clone, Debug)]
pub struct TlsConfig {
    pub min_tls_version: Option<reqwest::tls::Version>,
    pub cert_verification: bool,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            min_tls_version: Some(reqwest::tls::Version::TLS_1_2),
            cert_verification: true,
        }
    }
}

/// Set the TLS configuration used by transports created afterwards
pub fn set_tls_config(config: TlsConfig) {
    if let Ok(mut cfg) = CLIENT_CONFIG.lock() {
        *cfg = config;
    }
}

fn current_tls_config() -> TlsConfig {
    match CLIENT_CONFIG.lock() {
        Ok(guard) => guard.clone(),
        Err(_) => TlsConfig::default(),
    }
}

/// Status, content type and body of a completed exchange
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            content_type: None,
            body: body.into(),
        }
    }

    /// A response carrying a JSON document
    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self {
            status,
            content_type: Some("application/json".to_string()),
            body: Bytes::from(value.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes one HTTP exchange for a request
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, context: &RestContext, request: RestRequest) -> RestResult<RawResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn execute(&self, context: &RestContext, request: RestRequest) -> RestResult<RawResponse> {
        (**self).execute(context, request).await
    }
}

/// Transport backed by a pooled `reqwest` client
#[derive(Clone)]
pub struct ReqwestTransport {
    http_client: HttpClient,
}

impl ReqwestTransport {
    pub fn new() -> RestResult<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> RestResult<Self> {
        let tls_config = current_tls_config();

        let mut builder = HttpClient::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(!tls_config.cert_verification);

        if let Some(version) = tls_config.min_tls_version {
            builder = builder.min_tls_version(version);
        }

        let http_client = builder
            .build()
            .map_err(|e| RestError::Configuration(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { http_client })
    }

    /// Read-style methods carry their parameters in the query string
    fn uses_query(method: &Method) -> bool {
        matches!(*method, Method::GET | Method::DELETE | Method::HEAD)
    }

    fn multipart_form(request: &RestRequest) -> RestResult<multipart::Form> {
        let mut form = multipart::Form::new();
        for (key, value) in request.params.to_query_pairs() {
            form = form.text(key, value);
        }
        for file in &request.files {
            form = form.part(file.field.clone(), Self::file_part(file)?);
        }
        Ok(form)
    }

    fn file_part(file: &FilePart) -> RestResult<multipart::Part> {
        let part = multipart::Part::bytes(file.data.to_vec()).file_name(file.file_name.clone());
        match &file.content_type {
            Some(content_type) => part
                .mime_str(content_type)
                .map_err(|e| RestError::InvalidParameter(format!("invalid content type {}: {}", content_type, e))),
            None => Ok(part),
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, context: &RestContext, request: RestRequest) -> RestResult<RawResponse> {
        let url = context.resolve(&request.path)?;
        let same_origin = url.origin() == context.base_url().origin();

        let mut builder = self
            .http_client
            .request(request.method.clone(), url)
            .header(header::ACCEPT, "application/json");

        // Tenant headers and credentials never leave the tenant origin
        if same_origin {
            builder = builder.header(header::REFERER, context.base_url().as_str());
            if let Some(host) = context.host_header() {
                builder = builder.header(header::HOST, host);
            }
            if let Some(credentials) = context.credentials() {
                builder = builder.basic_auth(&credentials.username, Some(credentials.password.as_str()));
            }
        }

        builder = if !request.files.is_empty() {
            builder.multipart(Self::multipart_form(&request)?)
        } else if Self::uses_query(&request.method) {
            if request.params.is_empty() {
                builder
            } else {
                builder.query(&request.params.to_query_pairs())
            }
        } else if request.params.is_empty() {
            builder
        } else {
            builder.json(&request.params.to_json())
        };

        let response = builder.send().await.map_err(|e| transport_error!(
            format!("Something went wrong trying to contact the server: {}", e),
            e
        ))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = response.bytes().await?;

        Ok(RawResponse {
            status,
            content_type,
            body,
        })
    }
}
