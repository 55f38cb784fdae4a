//! Resource-specific API clients
//!
//! Each domain client wraps one family of REST endpoints. The clients are
//! pure call-sites: they assemble a resource path and a typed parameter
//! struct and hand both to the shared [`Dispatcher`].
//!
//! ## Architecture
//!
//! - `DomainClient` trait: domain identification for the registry
//! - `ValidationOperations` trait: local parameter checks (code 400, no request)
//! - `DomainOperations` trait: access to the dispatcher and shared call shapes
//! - `BaseDomainClient`: implements all three and serves as a composition base
//!
//! ## Example: Creating a Custom Domain Client
//!
//! ```rust
//! use oae_rest::{Dispatcher, RestResult};
//! use oae_rest::domains::{DomainClient, DomainOperations, ValidationOperations, base::BaseDomainClient};
//! use oae_rest::utils::resource_path;
//! use std::sync::Arc;
//!
//! struct FolderClient {
//!     base: BaseDomainClient,
//! }
//!
//! impl FolderClient {
//!     pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
//!         Self { base: BaseDomainClient::new(dispatcher, "folder") }
//!     }
//!
//!     pub async fn get(&self, folder_id: &str) -> RestResult<serde_json::Value> {
//!         let folder_id = self.validate_id(folder_id, "folderId")?;
//!         self.get_resource(&resource_path("/api/folder", &folder_id, "")).await
//!     }
//! }
//!
//! impl DomainClient for FolderClient {
//!     fn domain_name(&self) -> &str {
//!         self.base.domain_name()
//!     }
//! }
//!
//! impl ValidationOperations for FolderClient {}
//!
//! impl DomainOperations for FolderClient {
//!     fn dispatcher(&self) -> &Dispatcher {
//!         self.base.dispatcher()
//!     }
//! }
//! ```

pub mod base;
pub mod crop;
pub mod group;
pub mod meeting;

pub use crop::CropClient;
pub use group::{CreateGroup, GroupClient, MemberRole, MemberUpdates, UpdateGroup};
pub use meeting::{CreateMeeting, MeetingClient, UpdateMeeting};

use dashmap::DashMap;
use reqwest::Method;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, OnceLock};

use crate::client::Dispatcher;
use crate::domain_error;
use crate::models::{ListResponse, Paging};
use crate::types::*;

/// Type alias for futures returned by the shared domain operations
pub type DomainFuture<'a, T> = Pin<Box<dyn Future<Output = RestResult<T>> + Send + 'a>>;

/// Common trait for all domain clients
pub trait DomainClient: Send + Sync {
    /// The domain name for this client
    fn domain_name(&self) -> &str;
}

/// Local parameter checks. Failures never reach the network.
pub trait ValidationOperations: DomainClient {
    /// Creates a domain-specific error
    fn domain_error<T>(&self, message: impl Into<String>) -> RestResult<T> {
        Err(domain_error!(self.domain_name(), message.into()))
    }

    /// Validate a required string parameter
    fn validate_string<S: Into<String>>(&self, value: S, param_name: &str) -> RestResult<String> {
        let string = value.into();
        if string.trim().is_empty() {
            return self.domain_error(format!("{} cannot be empty", param_name));
        }
        Ok(string)
    }

    /// Validate a resource identifier before it is placed in a path
    fn validate_id(&self, id: &str, param_name: &str) -> RestResult<String> {
        if id.is_empty() {
            return Err(RestError::InvalidParameter(format!("A valid {} must be provided", param_name)));
        }
        Ok(id.to_string())
    }
}

/// Common implementation for domain operations
pub trait DomainOperations: DomainClient + Sync {
    /// Get a reference to the request dispatcher
    fn dispatcher(&self) -> &Dispatcher;

    /// GET a single resource
    fn get_resource<'a>(&'a self, path: &'a str) -> DomainFuture<'a, Value> {
        Box::pin(async move { self.dispatcher().request(Method::GET, path).send().await })
    }

    /// Issue a parameterless request, typically a state change like delete or join
    fn plain_operation<'a>(&'a self, method: Method, path: &'a str) -> DomainFuture<'a, Value> {
        Box::pin(async move { self.dispatcher().request(method, path).send().await })
    }

    /// GET one page of a list endpoint, forwarding `start` and `limit` as is
    fn list_operation<'a>(&'a self, path: &'a str, paging: Paging) -> DomainFuture<'a, ListResponse> {
        Box::pin(async move {
            let response = self
                .dispatcher()
                .request(Method::GET, path)
                .params(&paging)?
                .send()
                .await?;
            ListResponse::from_value(response)
        })
    }
}

/// Registry for domain clients that provides a central access point.
pub struct DomainClientRegistry {
    dispatcher: Arc<Dispatcher>,
    clients: Arc<DashMap<String, Arc<dyn DomainClient>>>,
    group_client: OnceLock<Arc<GroupClient>>,
    meeting_client: OnceLock<Arc<MeetingClient>>,
    crop_client: OnceLock<Arc<CropClient>>,
}

impl DomainClientRegistry {
    pub(crate) fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            clients: Arc::new(DashMap::new()),
            group_client: OnceLock::new(),
            meeting_client: OnceLock::new(),
            crop_client: OnceLock::new(),
        }
    }

    pub fn groups(&self) -> Arc<GroupClient> {
        self.group_client
            .get_or_init(|| Arc::new(GroupClient::new(self.dispatcher.clone(), self.crop())))
            .clone()
    }

    pub fn meetings(&self) -> Arc<MeetingClient> {
        self.meeting_client
            .get_or_init(|| Arc::new(MeetingClient::new(self.dispatcher.clone())))
            .clone()
    }

    pub fn crop(&self) -> Arc<CropClient> {
        self.crop_client
            .get_or_init(|| Arc::new(CropClient::new(self.dispatcher.clone())))
            .clone()
    }

    /// The dispatcher custom domain clients should be built on
    pub fn dispatcher(&self) -> Arc<Dispatcher> {
        self.dispatcher.clone()
    }

    /// Register a custom domain client
    pub fn register<T: DomainClient + 'static>(&self, name: &str, client: T) {
        self.clients.insert(name.to_string(), Arc::new(client));
    }

    /// Get a registered custom domain client by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn DomainClient>> {
        self.clients.get(name).map(|r| r.value().clone())
    }

    /// Get all registered domains
    pub fn list_domains(&self) -> Vec<String> {
        self.clients.iter().map(|entry| entry.key().clone()).collect()
    }
}
