//! Typed request and response shapes shared by the domain clients.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::builder::FilePart;
use crate::types::*;

/// Who can see a group or meeting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Loggedin,
    Private,
}

/// Whether users can add themselves to a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Joinable {
    Yes,
    No,
    Request,
}

/// Cursor parameters accepted by every list endpoint.
///
/// `start` is exclusive: the item with that id is not part of the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Paging {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl Paging {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(mut self, start: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// One page of a list endpoint
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub results: Vec<Value>,
    #[serde(rename = "nextToken", default)]
    pub next_token: Option<String>,
}

impl ListResponse {
    /// Read a page from a response payload. A bare array is accepted as a
    /// single page without a continuation token.
    pub fn from_value(value: Value) -> RestResult<Self> {
        match value {
            Value::Array(results) => Ok(Self {
                results,
                next_token: None,
            }),
            Value::Object(_) => serde_json::from_value(value.clone()).map_err(|e| {
                RestError::parse_error(
                    format!("Failed to parse list response: {}", e),
                    Some(value.to_string()),
                    Some(concat!(file!(), ":", line!())),
                )
            }),
            other => Err(RestError::parse_error(
                "Expected a list response",
                Some(other.to_string()),
                Some(concat!(file!(), ":", line!())),
            )),
        }
    }
}

/// Rendered sizes of a principal's picture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PictureSize {
    Small,
    Medium,
    Large,
}

impl PictureSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            PictureSize::Small => "small",
            PictureSize::Medium => "medium",
            PictureSize::Large => "large",
        }
    }
}

/// Rectangle of an uploaded picture to crop, in pixels from the top left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectedArea {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl SelectedArea {
    /// A square area
    pub fn square(x: u32, y: u32, size: u32) -> Self {
        Self {
            x,
            y,
            width: size,
            height: None,
        }
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }
}

/// An image to upload
#[derive(Debug, Clone)]
pub struct PictureFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl PictureFile {
    pub fn new(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let file_name = file_name.into();
        let content_type = guess_image_type(&file_name).map(String::from);
        Self {
            file_name,
            content_type,
            data: data.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Read an image from disk
    pub async fn from_path(path: impl AsRef<Path>) -> RestResult<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| RestError::InvalidParameter(format!("cannot read {}: {}", path.display(), e)))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "picture".to_string());
        Ok(Self::new(file_name, data))
    }

    pub(crate) fn into_part(self, field: &str) -> FilePart {
        FilePart {
            field: field.to_string(),
            file_name: self.file_name,
            content_type: self.content_type,
            data: self.data,
        }
    }
}

fn guess_image_type(file_name: &str) -> Option<&'static str> {
    let extension = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn paging_omits_unset_fields() {
        assert_eq!(serde_json::to_value(Paging::new()).unwrap(), json!({}));
        assert_eq!(
            serde_json::to_value(Paging::new().start("u:cam:b").limit(5)).unwrap(),
            json!({ "start": "u:cam:b", "limit": 5 })
        );
    }

    #[test]
    fn list_response_accepts_objects_and_arrays() {
        let page = ListResponse::from_value(json!({ "results": [{ "id": "a" }], "nextToken": "a" })).unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.next_token.as_deref(), Some("a"));

        let bare = ListResponse::from_value(json!([1, 2, 3])).unwrap();
        assert_eq!(bare.results.len(), 3);
        assert!(bare.next_token.is_none());

        assert!(ListResponse::from_value(json!("nope")).is_err());
    }

    #[test]
    fn enums_serialize_lowercase() {
        assert_eq!(serde_json::to_value(Visibility::Loggedin).unwrap(), json!("loggedin"));
        assert_eq!(serde_json::to_value(Joinable::Request).unwrap(), json!("request"));
        assert_eq!(PictureSize::Medium.as_str(), "medium");
    }

    #[test]
    fn picture_content_type_is_guessed_from_name() {
        assert_eq!(PictureFile::new("me.JPG", vec![1u8]).content_type.as_deref(), Some("image/jpeg"));
        assert_eq!(PictureFile::new("notes.txt", vec![1u8]).content_type, None);
    }
}
