// Core types and errors

use thiserror::Error;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// The result type used throughout the crate
pub type RestResult<T> = Result<T, RestError>;

/// Status code reported for transport failures that carry no HTTP status
pub const TRANSPORT_ERROR_CODE: u16 = 500;

/// Status code reported when the transport gave up waiting for the server
pub const TIMEOUT_ERROR_CODE: u16 = 504;

/// Maximum length for error response bodies kept in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Convert reqwest::Error to our RestError
impl From<reqwest::Error> for RestError {
    fn from(err: reqwest::Error) -> Self {
        RestError::Transport {
            message: format!("Something went wrong trying to contact the server: {}", err),
            timeout: err.is_timeout(),
            location: None,
            source: Some(Arc::new(err) as Arc<dyn std::error::Error + Send + Sync>),
        }
    }
}

impl From<serde_json::Error> for RestError {
    fn from(err: serde_json::Error) -> Self {
        RestError::Parse {
            message: err.to_string(),
            source_text: None,
            location: None,
        }
    }
}

/// A secure container for credential secrets that zeroes its memory when dropped
pub struct SecureSecret {
    secret: String,
}

impl SecureSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self { secret: secret.into() }
    }

    /// Get a reference to the underlying secret
    pub fn as_str(&self) -> &str {
        &self.secret
    }
}

impl Deref for SecureSecret {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.secret
    }
}

impl Drop for SecureSecret {
    fn drop(&mut self) {
        // SAFETY: zero bytes are valid UTF-8, so the string stays well-formed
        unsafe {
            let bytes = self.secret.as_bytes_mut();
            bytes.iter_mut().for_each(|b| *b = 0);
        }
    }
}

impl fmt::Debug for SecureSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecureSecret([REDACTED])")
    }
}

impl fmt::Display for SecureSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED SECRET]")
    }
}

impl Clone for SecureSecret {
    fn clone(&self) -> Self {
        Self {
            secret: self.secret.clone(),
        }
    }
}

/// Every failure a REST call can produce.
///
/// All variants map onto the platform's `{code, message}` error shape via
/// [`RestError::code`] and [`RestError::message`].
#[derive(Debug, Error, Clone)]
pub enum RestError {
    #[error("API returned error: {code} - {message}")]
    Api {
        code: u16,
        message: String,
        response_body: Option<String>,
        location: Option<String>,
    },

    #[error("Transport failure: {message}")]
    Transport {
        message: String,
        timeout: bool,
        location: Option<String>,
        source: Option<Arc<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed to parse response: {message}")]
    Parse {
        message: String,
        source_text: Option<String>,
        location: Option<String>,
    },

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Domain error: {domain}: {message}")]
    Domain {
        domain: String,
        message: String,
        details: Option<String>,
        location: Option<String>,
    },
}

impl RestError {
    /// The numeric code of this error, following HTTP status semantics
    pub fn code(&self) -> u16 {
        match self {
            Self::Api { code, .. } => *code,
            Self::Transport { timeout: true, .. } => TIMEOUT_ERROR_CODE,
            Self::Transport { .. } => TRANSPORT_ERROR_CODE,
            Self::InvalidParameter(_) => 400,
            Self::NotFound(_) => 404,
            Self::Parse { .. } => 500,
            Self::Configuration(_) => 400,
            Self::Domain { .. } => 400,
        }
    }

    /// The human readable message of this error
    pub fn message(&self) -> &str {
        match self {
            Self::Api { message, .. } => message,
            Self::Transport { message, .. } => message,
            Self::InvalidParameter(message) => message,
            Self::NotFound(message) => message,
            Self::Parse { message, .. } => message,
            Self::Configuration(message) => message,
            Self::Domain { message, .. } => message,
        }
    }

    pub fn api_error<T: Into<String>>(
        message: T,
        code: u16,
        response_body: Option<String>,
        location: Option<&str>,
    ) -> Self {
        let error = Self::Api {
            code,
            message: message.into(),
            response_body,
            location: location.map(String::from),
        };

        error.log();
        error
    }

    pub fn transport_error<T: Into<String>>(
        message: T,
        timeout: bool,
        source: Option<impl std::error::Error + Send + Sync + 'static>,
        location: Option<&str>,
    ) -> Self {
        let error = Self::Transport {
            message: message.into(),
            timeout,
            location: location.map(String::from),
            source: source.map(|e| Arc::new(e) as Arc<dyn std::error::Error + Send + Sync>),
        };

        error.log();
        error
    }

    pub fn parse_error<T: Into<String>>(
        message: T,
        source_text: Option<String>,
        location: Option<&str>,
    ) -> Self {
        let error = Self::Parse {
            message: message.into(),
            source_text,
            location: location.map(String::from),
        };

        error.log();
        error
    }

    pub fn domain_error<T: Into<String>>(
        message: T,
        domain: Option<String>,
        details: Option<String>,
        location: Option<&str>,
    ) -> Self {
        let error = Self::Domain {
            message: message.into(),
            domain: domain.unwrap_or_default(),
            details,
            location: location.map(String::from),
        };

        error.log();
        error
    }

    /// Build an error from a non-2xx response
    pub fn from_status(status: u16, body: &str) -> Self {
        let sanitized = sanitize_error_message(&truncate_body(body));
        Self::api_error(sanitized, status, Some(body.to_string()), None)
    }

    pub fn simple_api_error<T: Into<String>>(message: T, code: u16) -> Self {
        Self::api_error(message, code, None, None)
    }

    pub fn simple_domain_error<T: Into<String>>(message: T, domain: &str) -> Self {
        Self::domain_error(message, Some(domain.to_string()), None, None)
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Api { location, .. } => location.as_deref(),
            Self::Transport { location, .. } => location.as_deref(),
            Self::Parse { location, .. } => location.as_deref(),
            Self::Domain { location, .. } => location.as_deref(),
            _ => None,
        }
    }

    pub fn source_error(&self) -> Option<&(dyn std::error::Error + Send + Sync)> {
        match self {
            Self::Transport { source, .. } => source.as_ref().map(|s| s.as_ref()),
            _ => None,
        }
    }

    fn log(&self) {
        if let Some(loc) = self.location() {
            log::error!("{} at {}", self, loc);
        } else {
            log::error!("{}", self);
        }
    }
}

/// Create a transport error that records the call location
#[macro_export]
macro_rules! transport_error {
    ($message:expr) => {
        $crate::types::RestError::transport_error($message, false, None::<reqwest::Error>, Some(concat!(file!(), ":", line!())))
    };
    ($message:expr, $source:expr) => {
        $crate::types::RestError::transport_error($message, $source.is_timeout(), Some($source), Some(concat!(file!(), ":", line!())))
    };
}

/// Create a domain error that records the call location
#[macro_export]
macro_rules! domain_error {
    ($domain:expr, $message:expr) => {
        $crate::types::RestError::domain_error($message, Some($domain.to_string()), None, Some(concat!(file!(), ":", line!())))
    };
    ($domain:expr, $message:expr, $details:expr) => {
        $crate::types::RestError::domain_error($message, Some($domain.to_string()), Some($details), Some(concat!(file!(), ":", line!())))
    };
}

fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
}

lazy_static::lazy_static! {
    static ref SECRET_PATTERN: Option<regex::Regex> =
        regex::Regex::new(r"(?i)(password|secret|token)=[^&\s]+").ok();
}

/// Helper function to sanitize error messages to prevent leaking credentials
pub fn sanitize_error_message(message: &str) -> String {
    match SECRET_PATTERN.as_ref() {
        Some(pattern) => pattern.replace_all(message, "$1=[REDACTED]").into_owned(),
        None => message.to_string(),
    }
}
