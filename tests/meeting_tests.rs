use futures::{StreamExt, TryStreamExt};
use oae_rest::domains::{CreateMeeting, UpdateMeeting};
use oae_rest::{paginate, Paging, SelectedArea, Visibility};
use pretty_assertions::assert_eq;
use reqwest::Method;
use serde_json::json;
use std::time::Duration;


use mock_transport::mock_client;

#[tokio::test]
async fn test_create_meeting() {
    let (client, transport) = mock_client();
    transport.respond_json(201, json!({ "id": "d:cam:m1", "displayName": "Standup" }));

    let meeting = client
        .meetings()
        .create(
            &CreateMeeting::new("Standup")
                .chat(true)
                .contact_list(false)
                .visibility(Visibility::Private)
                .members(["u:cam:a"]),
        )
        .await
        .unwrap();

    assert_eq!(meeting["id"], "d:cam:m1");
    let request = transport.single_request();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.path, "/api/meeting-jitsi/create");
    assert_eq!(
        request.params.to_json(),
        json!({
            "displayName": "Standup",
            "chat": true,
            "contactList": false,
            "visibility": "private",
            "members": ["u:cam:a"]
        })
    );
}

#[tokio::test]
async fn test_update_meeting_uses_put() {
    let (client, transport) = mock_client();
    let fields = UpdateMeeting {
        chat: Some(false),
        ..Default::default()
    };

    client.meetings().update("d:cam:m1", &fields).await.unwrap();

    let request = transport.single_request();
    assert_eq!(request.method, Method::PUT);
    assert_eq!(request.path, "/api/meeting-jitsi/d%3Acam%3Am1");
    assert_eq!(request.params.to_json(), json!({ "chat": false }));
}

#[tokio::test]
async fn test_get_and_delete_meeting() {
    let (client, transport) = mock_client();
    transport.respond_json(200, json!({ "id": "d:cam:m1" }));

    let meeting = client.meetings().get("d:cam:m1").await.unwrap();
    client.meetings().delete("d:cam:m1").await.unwrap();

    assert_eq!(meeting["id"], "d:cam:m1");
    let requests = transport.requests();
    assert_eq!(requests[0].method, Method::GET);
    assert_eq!(requests[1].method, Method::DELETE);
    assert_eq!(requests[1].path, "/api/meeting-jitsi/d%3Acam%3Am1");
}

#[tokio::test]
async fn test_library_and_members_paths() {
    let (client, transport) = mock_client();
    transport.respond_json(200, json!({ "results": [{ "id": "d:cam:m1" }, { "id": "d:cam:m2" }], "nextToken": "d:cam:m2" }));

    let library = client
        .meetings()
        .library("g:cam:abc", Paging::new().limit(2))
        .await
        .unwrap();
    client.meetings().members("d:cam:m1", Paging::new().start("u:cam:z")).await.unwrap();

    assert_eq!(library.results.len(), 2);
    assert_eq!(library.next_token.as_deref(), Some("d:cam:m2"));

    let requests = transport.requests();
    assert_eq!(requests[0].path, "/api/meeting-jitsi/library/g%3Acam%3Aabc");
    assert_eq!(requests[0].params.to_json(), json!({ "limit": 2 }));
    assert_eq!(requests[1].path, "/api/meeting-jitsi/d%3Acam%3Am1/members");
    assert_eq!(requests[1].params.to_json(), json!({ "start": "u:cam:z" }));
}

#[tokio::test]
async fn test_empty_ids_fail_locally() {
    let (client, transport) = mock_client();

    let err = client.meetings().get("").await.unwrap_err();
    assert_eq!(err.code(), 400);
    assert_eq!(err.message(), "A valid meetingId must be provided");

    let err = client.meetings().library("", Paging::new()).await.unwrap_err();
    assert_eq!(err.code(), 400);

    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_paginate_walks_library_pages() {
    let (client, transport) = mock_client();
    transport
        .respond_json(200, json!({ "results": [{ "id": "d:cam:m1" }, { "id": "d:cam:m2" }], "nextToken": "d:cam:m2" }))
        .respond_json(200, json!({ "results": [{ "id": "d:cam:m3" }] }));

    let meetings = client.meetings();
    let all: Vec<_> = paginate(Some(2), |paging| meetings.library("u:cam:bert", paging))
        .try_collect()
        .await
        .unwrap();

    assert_eq!(all.len(), 3);
    assert_eq!(all[2]["id"], "d:cam:m3");

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].params.to_json(), json!({ "limit": 2 }));
    assert_eq!(requests[1].params.to_json(), json!({ "start": "d:cam:m2", "limit": 2 }));
}

#[tokio::test]
async fn test_paginate_stops_after_error() {
    let (client, transport) = mock_client();
    transport.respond_raw(404, b"Could not find principal");

    let meetings = client.meetings();
    let items: Vec<_> = paginate(None, |paging| meetings.library("u:cam:ghost", paging))
        .collect()
        .await;

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].as_ref().unwrap_err().code(), 404);
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn test_crop_rejects_empty_area() {
    let (client, transport) = mock_client();

    let err = client
        .crop()
        .crop_picture("u:cam:bert", SelectedArea::square(0, 0, 0))
        .await
        .unwrap_err();

    assert_eq!(err.code(), 400);
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_concurrent_calls_each_resolve_once() {
    let (client, transport) = mock_client();
    transport.with_delay(Duration::from_millis(20));
    transport
        .respond_json(200, json!({ "id": "d:cam:m1" }))
        .respond_json(200, json!({ "id": "d:cam:m2" }));

    let meetings = client.meetings();
    let (first, second) = tokio::join!(meetings.get("d:cam:m1"), meetings.get("d:cam:m2"));

    assert!(first.is_ok());
    assert!(second.is_ok());
    assert_eq!(transport.request_count(), 2);
}
