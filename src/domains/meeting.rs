// Meeting Client

use crate::client::Dispatcher;
use crate::domains::{base::BaseDomainClient, DomainClient, DomainOperations, ValidationOperations};
use crate::models::{ListResponse, Paging, Visibility};
use crate::types::*;
use crate::utils::resource_path;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

const MEETING_PREFIX: &str = "/api/meeting-jitsi";

/// Parameters for creating a meeting
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMeeting {
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_list: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub managers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<String>>,
}

impl CreateMeeting {
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

    pub fn chat(mut self, enabled: bool) -> Self {
        self.chat = Some(enabled);
        self
    }

    pub fn contact_list(mut self, enabled: bool) -> Self {
        self.contact_list = Some(enabled);
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = Some(visibility);
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

/// Meeting fields to change. Unset fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMeeting {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_list: Option<bool>,
}

/// Client for the meeting endpoints
pub struct MeetingClient {
    base: BaseDomainClient,
}

impl MeetingClient {
    pub(crate) fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            base: BaseDomainClient::new(dispatcher, "meeting"),
        }
    }

    fn meeting_path(&self, meeting_id: &str, suffix: &str) -> RestResult<String> {
        let meeting_id = self.validate_id(meeting_id, "meetingId")?;
        Ok(resource_path(MEETING_PREFIX, &meeting_id, suffix))
    }

    pub async fn create(&self, meeting: &CreateMeeting) -> RestResult<Value> {
        self.validate_string(meeting.display_name.as_str(), "displayName")?;
        self.dispatcher()
            .request(Method::POST, format!("{}/create", MEETING_PREFIX))
            .params(meeting)?
            .send()
            .await
    }

    pub async fn get(&self, meeting_id: &str) -> RestResult<Value> {
        let path = self.meeting_path(meeting_id, "")?;
        self.get_resource(&path).await
    }

    pub async fn update(&self, meeting_id: &str, fields: &UpdateMeeting) -> RestResult<Value> {
        let path = self.meeting_path(meeting_id, "")?;
        self.dispatcher()
            .request(Method::PUT, path)
            .params(fields)?
            .send()
            .await
    }

    pub async fn delete(&self, meeting_id: &str) -> RestResult<Value> {
        let path = self.meeting_path(meeting_id, "")?;
        self.plain_operation(Method::DELETE, &path).await
    }

    /// List the members of a meeting with their roles
    pub async fn members(&self, meeting_id: &str, paging: Paging) -> RestResult<ListResponse> {
        let path = self.meeting_path(meeting_id, "/members")?;
        self.list_operation(&path, paging).await
    }

    /// List the meetings in a user's or group's library
    pub async fn library(&self, principal_id: &str, paging: Paging) -> RestResult<ListResponse> {
        let principal_id = self.validate_id(principal_id, "principalId")?;
        let path = resource_path(&format!("{}/library", MEETING_PREFIX), &principal_id, "");
        self.list_operation(&path, paging).await
    }
}

impl DomainClient for MeetingClient {
    fn domain_name(&self) -> &str {
        self.base.domain_name()
    }
}

impl ValidationOperations for MeetingClient {}

impl DomainOperations for MeetingClient {
    fn dispatcher(&self) -> &Dispatcher {
        self.base.dispatcher()
    }
}
