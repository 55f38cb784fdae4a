// Request Builder

use bytes::Bytes;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::client::Dispatcher;
use crate::params::{ParamValue, RequestParams};
use crate::types::*;

/// A binary part sent as `multipart/form-data`
#[derive(Debug, Clone)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// A request ready to be handed to a transport.
///
/// `path` is either a path relative to the tenant base URL, with resource
/// identifiers already percent-encoded, or an absolute URL.
#[derive(Debug, Clone)]
pub struct RestRequest {
    pub method: Method,
    pub path: String,
    pub params: RequestParams,
    pub files: Vec<FilePart>,
}

impl RestRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: RequestParams::new(),
            files: Vec::new(),
        }
    }

    pub fn is_multipart(&self) -> bool {
        !self.files.is_empty()
    }
}

/// A struct for building REST requests with a fluent interface.
pub struct RequestBuilder<'a> {
    dispatcher: &'a Dispatcher,
    request: RestRequest,
}

impl<'a> RequestBuilder<'a> {
    pub(crate) fn new(dispatcher: &'a Dispatcher, method: Method, path: impl Into<String>) -> Self {
        Self {
            dispatcher,
            request: RestRequest::new(method, path),
        }
    }

    /// Set a single parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.request.params.insert(key, value);
        self
    }

    /// Merge the fields of a typed parameter struct.
    ///
    /// Fields serialized as `null` are left out of the request.
    pub fn params<T: Serialize + ?Sized>(mut self, params: &T) -> RestResult<Self> {
        for (key, value) in RequestParams::from_serialize(params)?.iter() {
            self.request.params.insert(key, value.clone());
        }
        Ok(self)
    }

    /// Attach a file; the request is then sent as multipart content
    pub fn file(mut self, file: FilePart) -> Self {
        self.request.files.push(file);
        self
    }

    /// Finish building without sending
    pub fn build(self) -> RestRequest {
        self.request
    }

    /// Send the request and return the parsed response payload
    pub async fn send(self) -> RestResult<Value> {
        self.dispatcher.dispatch(self.request).await
    }

    /// Send the request and deserialize the payload into `T`
    pub async fn send_json<T: DeserializeOwned>(self) -> RestResult<T> {
        let value = self.send().await?;
        serde_json::from_value(value.clone()).map_err(|e| {
            RestError::parse_error(
                format!("Failed to parse response: {}", e),
                Some(value.to_string()),
                Some(concat!(file!(), ":", line!())),
            )
        })
    }

    /// Send the request and return the raw response body
    pub async fn send_bytes(self) -> RestResult<Bytes> {
        self.dispatcher.dispatch_bytes(self.request).await
    }
}
