// Middleware and Extension Traits

use crate::builder::RestRequest;
use crate::types::*;
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait RequestMiddleware: Send + Sync {
    /// Process and possibly modify the request before sending
    async fn process_request(&self, request: RestRequest) -> RestResult<RestRequest>;
}

#[async_trait]
pub trait ResponseMiddleware: Send + Sync {
    /// Process and possibly modify the parsed payload after receiving
    async fn process_response(&self, response: Value) -> RestResult<Value>;
}
