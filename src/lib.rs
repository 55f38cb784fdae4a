//! # oae-rest: typed async bindings for OAE group and meeting endpoints
//!
//! Every call builds a resource path and a typed parameter struct, then hands
//! both to one shared request dispatcher. The dispatcher performs a single
//! HTTP exchange and resolves to a [`RestResult`]: either the response
//! payload or a [`RestError`] carrying a numeric code and a message.
//!
//! ## Key Features
//!
//! - Group endpoints: create, read, update, delete, restore, members,
//!   join/leave, memberships, picture upload with optional crop, picture download
//! - Meeting endpoints: create, read, update, delete, members, library
//! - `start`/`limit` pagination helpers, including a page-walking stream
//! - Request and response middleware
//! - Pluggable transport for testing without a network
//!
//! ## Basic Usage
//!
//! ```no_run
//! use oae_rest::{RestClient, RestContext, Paging, Visibility};
//! use oae_rest::domains::CreateGroup;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let context = RestContext::new("http://cam.oae.com")?
//!         .with_credentials("bert", "password");
//!     let client = RestClient::new(context)?;
//!
//!     let group = client.groups()
//!         .create(&CreateGroup::new("Rust Guild").visibility(Visibility::Public))
//!         .await?;
//!
//!     let group_id = group["id"].as_str().unwrap_or_default();
//!     let page = client.groups().members(group_id, Paging::new().limit(10)).await?;
//!     println!("{} members", page.results.len());
//!
//!     Ok(())
//! }
//! ```

pub mod types;
pub mod client;
pub mod builder;
pub mod context;
pub mod params;
pub mod models;
pub mod transport;
pub mod paging;
mod middleware;
pub mod domains;
pub mod utils;

// Re-export core components
pub use client::{Dispatcher, RestClient};
pub use builder::{FilePart, RequestBuilder, RestRequest};
pub use context::{Credentials, RestContext};
pub use params::{ParamValue, RequestParams, Scalar};
pub use models::{Joinable, ListResponse, Paging, PictureFile, PictureSize, SelectedArea, Visibility};
pub use transport::{set_tls_config, RawResponse, ReqwestTransport, TlsConfig, Transport};
pub use types::{sanitize_error_message, RestError, RestResult, SecureSecret};
pub use middleware::{RequestMiddleware, ResponseMiddleware};
pub use paging::paginate;

pub mod prelude {
    //! Convenient imports for commonly used types and functions
    pub use crate::{from_env, new_client, RestClient, RestContext, RestError, RestResult};
    pub use crate::{Joinable, ListResponse, Paging, PictureFile, PictureSize, SelectedArea, Visibility};
    pub use crate::domains::{
        CreateGroup, CreateMeeting, CropClient, GroupClient, MeetingClient, MemberRole, MemberUpdates,
        UpdateGroup, UpdateMeeting,
    };
}

// Public domain access
pub use domains::{
    DomainClient,
    DomainOperations,
    ValidationOperations,
    CropClient,
    GroupClient,
    MeetingClient,
};

// Entry point functions
pub fn new_client(base_url: &str) -> RestResult<RestClient> {
    RestClient::new(RestContext::new(base_url)?)
}

/// Create a client from `OAE_BASE_URL` and the optional `OAE_USERNAME`,
/// `OAE_PASSWORD` and `OAE_HOST_HEADER` variables
pub fn from_env() -> RestResult<RestClient> {
    RestClient::new(RestContext::from_env()?)
}
