//! Tenant addressing.
//!
//! A [`RestContext`] names the tenant a request is sent to and the
//! credentials it is sent with. It is immutable once built and cloned into
//! every client that uses it.

use url::Url;

use crate::types::*;

/// Environment variable holding the tenant base URL
pub const BASE_URL_ENV: &str = "OAE_BASE_URL";
/// Environment variable holding the username for basic authentication
pub const USERNAME_ENV: &str = "OAE_USERNAME";
/// Environment variable holding the password for basic authentication
pub const PASSWORD_ENV: &str = "OAE_PASSWORD";
/// Environment variable holding an explicit `Host` header for virtual tenants
pub const HOST_HEADER_ENV: &str = "OAE_HOST_HEADER";

/// Username and secret sent with every request of a context
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecureSecret,
}

/// Tenant base URL plus the credential material used to address requests
#[derive(Debug, Clone)]
pub struct RestContext {
    base_url: Url,
    host_header: Option<String>,
    credentials: Option<Credentials>,
}

impl RestContext {
    /// Create an anonymous context for the tenant at `base_url`
    pub fn new(base_url: &str) -> RestResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| RestError::Configuration(format!("invalid base URL {}: {}", base_url, e)))?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(RestError::Configuration(format!(
                "base URL must use http or https, got {}",
                base_url.scheme()
            )));
        }

        Ok(Self {
            base_url,
            host_header: None,
            credentials: None,
        })
    }

    /// Build a context from `OAE_BASE_URL`, `OAE_USERNAME`, `OAE_PASSWORD`
    /// and `OAE_HOST_HEADER`.
    pub fn from_env() -> RestResult<Self> {
        let base_url = std::env::var(BASE_URL_ENV)
            .map_err(|_| RestError::Configuration(format!("{} is not set", BASE_URL_ENV)))?;
        let mut context = Self::new(&base_url)?;

        match (std::env::var(USERNAME_ENV), std::env::var(PASSWORD_ENV)) {
            (Ok(username), Ok(password)) => context = context.with_credentials(username, password),
            (Err(_), Err(_)) => {}
            _ => {
                return Err(RestError::Configuration(format!(
                    "{} and {} must be set together",
                    USERNAME_ENV, PASSWORD_ENV
                )))
            }
        }

        if let Ok(host) = std::env::var(HOST_HEADER_ENV) {
            context = context.with_host_header(host);
        }

        Ok(context)
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(Credentials {
            username: username.into(),
            password: SecureSecret::new(password),
        });
        self
    }

    /// Send requests with an explicit `Host` header, for tenants served on a
    /// virtual host behind a shared address
    pub fn with_host_header(mut self, host: impl Into<String>) -> Self {
        self.host_header = Some(host.into());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn host_header(&self) -> Option<&str> {
        self.host_header.as_deref()
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Resolve a resource path against the base URL.
    ///
    /// Absolute URLs (as returned by the server for downloads) are used as is.
    pub fn resolve(&self, path: &str) -> RestResult<Url> {
        let joined = if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
        } else {
            format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path)
        };

        Url::parse(&joined).map_err(|e| RestError::InvalidParameter(format!("invalid request path {}: {}", path, e)))
    }
}
