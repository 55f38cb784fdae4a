// Crop Client

use crate::client::Dispatcher;
use crate::domains::{base::BaseDomainClient, DomainClient, DomainOperations, ValidationOperations};
use crate::models::SelectedArea;
use crate::types::*;
use crate::utils::validate;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

const CROP_PATH: &str = "/api/crop";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CropRequest<'a> {
    principal_id: &'a str,
    #[serde(flatten)]
    area: SelectedArea,
}

/// Reject areas the server could never crop, before any request is sent
pub(crate) fn check_area(area: SelectedArea) -> RestResult<SelectedArea> {
    validate(
        area,
        |area| area.width > 0 && area.height != Some(0),
        "The selected area must be at least one pixel wide and high",
    )
}

/// Client for cropping a principal's uploaded picture
pub struct CropClient {
    base: BaseDomainClient,
}

impl CropClient {
    pub(crate) fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            base: BaseDomainClient::new(dispatcher, "crop"),
        }
    }

    /// Crop the last uploaded picture of a user or group to `area` and
    /// generate its rendered sizes
    pub async fn crop_picture(&self, principal_id: &str, area: SelectedArea) -> RestResult<Value> {
        let principal_id = self.validate_id(principal_id, "principalId")?;
        let area = check_area(area)?;

        self.dispatcher()
            .request(Method::POST, CROP_PATH)
            .params(&CropRequest {
                principal_id: &principal_id,
                area,
            })?
            .send()
            .await
    }
}

impl DomainClient for CropClient {
    fn domain_name(&self) -> &str {
        self.base.domain_name()
    }
}

impl ValidationOperations for CropClient {}

impl DomainOperations for CropClient {
    fn dispatcher(&self) -> &Dispatcher {
        self.base.dispatcher()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_areas_are_rejected() {
        assert!(check_area(SelectedArea::square(0, 0, 1)).is_ok());
        assert_eq!(check_area(SelectedArea::square(0, 0, 0)).unwrap_err().code(), 400);
        assert_eq!(check_area(SelectedArea::square(0, 0, 10).with_height(0)).unwrap_err().code(), 400);
    }

    #[test]
    fn crop_request_flattens_area() {
        let request = CropRequest {
            principal_id: "g:cam:abc",
            area: SelectedArea::square(10, 20, 100),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "principalId": "g:cam:abc", "x": 10, "y": 20, "width": 100 })
        );
    }
}
