// Group Client

use crate::client::Dispatcher;
use crate::domains::crop::check_area;
use crate::domains::{base::BaseDomainClient, CropClient, DomainClient, DomainOperations, ValidationOperations};
use crate::models::{Joinable, ListResponse, Paging, PictureFile, PictureSize, SelectedArea, Visibility};
use crate::types::*;
use crate::utils::resource_path;
use bytes::Bytes;
use reqwest::Method;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

const GROUP_PREFIX: &str = "/api/group";
const USER_PREFIX: &str = "/api/user";

/// Parameters for creating a group
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroup {
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joinable: Option<Joinable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub managers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<String>>,
}

impl CreateGroup {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            ..Default::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = Some(visibility);
        self
    }

    pub fn joinable(mut self, joinable: Joinable) -> Self {
        self.joinable = Some(joinable);
        self
    }

    pub fn managers<I, S>(mut self, managers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.managers = Some(managers.into_iter().map(Into::into).collect());
        self
    }

    pub fn members<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.members = Some(members.into_iter().map(Into::into).collect());
        self
    }
}

/// Profile fields to change on a group. Unset fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joinable: Option<Joinable>,
}

/// Role of a principal inside a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Manager,
    Member,
}

/// Membership changes keyed by principal id.
///
/// Serialized as `{principalId: "manager" | "member" | false}`, where `false`
/// removes the principal from the group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberUpdates {
    changes: Vec<(String, Option<MemberRole>)>,
}

impl MemberUpdates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the principal with `role`, or change its role
    pub fn set(self, principal_id: impl Into<String>, role: MemberRole) -> Self {
        self.change(principal_id.into(), Some(role))
    }

    /// Remove the principal from the group
    pub fn remove(self, principal_id: impl Into<String>) -> Self {
        self.change(principal_id.into(), None)
    }

    fn change(mut self, principal_id: String, role: Option<MemberRole>) -> Self {
        match self.changes.iter_mut().find(|(id, _)| *id == principal_id) {
            Some(entry) => entry.1 = role,
            None => self.changes.push((principal_id, role)),
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

impl Serialize for MemberUpdates {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.changes.len()))?;
        for (principal_id, role) in &self.changes {
            match role {
                Some(role) => map.serialize_entry(principal_id, role)?,
                None => map.serialize_entry(principal_id, &false)?,
            }
        }
        map.end()
    }
}

/// Client for the group endpoints
pub struct GroupClient {
    base: BaseDomainClient,
    crop: Arc<CropClient>,
}

impl GroupClient {
    pub(crate) fn new(dispatcher: Arc<Dispatcher>, crop: Arc<CropClient>) -> Self {
        Self {
            base: BaseDomainClient::new(dispatcher, "group"),
            crop,
        }
    }

    fn group_path(&self, group_id: &str, suffix: &str) -> RestResult<String> {
        let group_id = self.validate_id(group_id, "groupId")?;
        Ok(resource_path(GROUP_PREFIX, &group_id, suffix))
    }

    /// Create a group. Optional fields are only sent when set.
    pub async fn create(&self, group: &CreateGroup) -> RestResult<Value> {
        self.validate_string(group.display_name.as_str(), "displayName")?;
        self.dispatcher()
            .request(Method::POST, format!("{}/create", GROUP_PREFIX))
            .params(group)?
            .send()
            .await
    }

    pub async fn get(&self, group_id: &str) -> RestResult<Value> {
        let path = self.group_path(group_id, "")?;
        self.get_resource(&path).await
    }

    /// Update the profile fields that are set in `fields`
    pub async fn update(&self, group_id: &str, fields: &UpdateGroup) -> RestResult<Value> {
        let path = self.group_path(group_id, "")?;
        self.dispatcher()
            .request(Method::POST, path)
            .params(fields)?
            .send()
            .await
    }

    pub async fn delete(&self, group_id: &str) -> RestResult<Value> {
        let path = self.group_path(group_id, "")?;
        self.plain_operation(Method::DELETE, &path).await
    }

    /// Restore a previously deleted group
    pub async fn restore(&self, group_id: &str) -> RestResult<Value> {
        let path = self.group_path(group_id, "/restore")?;
        self.plain_operation(Method::POST, &path).await
    }

    /// List the users and groups that are members of a group
    pub async fn members(&self, group_id: &str, paging: Paging) -> RestResult<ListResponse> {
        let path = self.group_path(group_id, "/members")?;
        self.list_operation(&path, paging).await
    }

    pub async fn set_members(&self, group_id: &str, updates: &MemberUpdates) -> RestResult<Value> {
        let path = self.group_path(group_id, "/members")?;
        self.dispatcher()
            .request(Method::POST, path)
            .params(updates)?
            .send()
            .await
    }

    /// Join the group as the current user
    pub async fn join(&self, group_id: &str) -> RestResult<Value> {
        let path = self.group_path(group_id, "/join")?;
        self.plain_operation(Method::POST, &path).await
    }

    /// Leave the group as the current user
    pub async fn leave(&self, group_id: &str) -> RestResult<Value> {
        let path = self.group_path(group_id, "/leave")?;
        self.plain_operation(Method::POST, &path).await
    }

    /// List the groups a user is a direct or indirect member of
    pub async fn memberships(&self, user_id: &str, paging: Paging) -> RestResult<ListResponse> {
        let user_id = self.validate_id(user_id, "userId")?;
        let path = resource_path(USER_PREFIX, &user_id, "/memberships");
        self.list_operation(&path, paging).await
    }

    /// Upload a new group picture and, when an area is given, crop it.
    ///
    /// The area is checked before anything is sent. The crop request is only
    /// sent once the upload succeeded; its response is returned in that case.
    pub async fn upload_picture(
        &self,
        group_id: &str,
        file: PictureFile,
        selected_area: Option<SelectedArea>,
    ) -> RestResult<Value> {
        let path = self.group_path(group_id, "/picture")?;
        let selected_area = selected_area.map(check_area).transpose()?;
        let uploaded = self
            .dispatcher()
            .request(Method::POST, path)
            .file(file.into_part("file"))
            .send()
            .await?;

        match selected_area {
            Some(area) => {
                debug!(group_id, "Picture uploaded, cropping");
                self.crop.crop_picture(group_id, area).await
            }
            None => Ok(uploaded),
        }
    }

    /// Download a rendered size of the group picture.
    ///
    /// Fails with code 400 before any request when no size is given, and with
    /// code 404 when the group has no picture of that size.
    pub async fn download_picture(&self, group_id: &str, size: Option<PictureSize>) -> RestResult<Bytes> {
        let size = size.ok_or_else(|| RestError::InvalidParameter("Missing size parameter".to_string()))?;

        let group = self.get(group_id).await?;
        let url = group
            .get("picture")
            .and_then(|picture| picture.get(size.as_str()))
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| RestError::NotFound("This group has no picture.".to_string()))?;

        self.dispatcher().request(Method::GET, url).send_bytes().await
    }
}

impl DomainClient for GroupClient {
    fn domain_name(&self) -> &str {
        self.base.domain_name()
    }
}

impl ValidationOperations for GroupClient {}

impl DomainOperations for GroupClient {
    fn dispatcher(&self) -> &Dispatcher {
        self.base.dispatcher()
    }
}
