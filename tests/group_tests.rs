use oae_rest::domains::{CreateGroup, MemberRole, MemberUpdates, UpdateGroup};
use oae_rest::DomainClient;
use oae_rest::{Joinable, ParamValue, Paging, PictureFile, PictureSize, RestError, SelectedArea, Visibility};
use pretty_assertions::assert_eq;
use reqwest::Method;
use serde_json::json;


use mock_transport::mock_client;

#[tokio::test]
async fn test_reserved_characters_in_ids_are_percent_encoded() {
    let (client, transport) = mock_client();
    let groups = client.groups();

    groups.get("g:cam:a/b c").await.unwrap();
    groups.members("g:cam:a/b c", Paging::new()).await.unwrap();
    groups.memberships("u:cam:?&#", Paging::new()).await.unwrap();
    groups.join("g:cam:x").await.unwrap();

    let paths: Vec<String> = transport.requests().into_iter().map(|r| r.path).collect();
    assert_eq!(
        paths,
        vec![
            "/api/group/g%3Acam%3Aa%2Fb%20c",
            "/api/group/g%3Acam%3Aa%2Fb%20c/members",
            "/api/user/u%3Acam%3A%3F%26%23/memberships",
            "/api/group/g%3Acam%3Ax/join",
        ]
    );
}

#[tokio::test]
async fn test_create_group_sends_only_given_fields() {
    let (client, transport) = mock_client();
    transport.respond_json(201, json!({ "id": "g:cam:new", "displayName": "Rust Guild" }));

    let group = client
        .groups()
        .create(&CreateGroup::new("Rust Guild").joinable(Joinable::Yes).members(["u:cam:a", "u:cam:b"]))
        .await
        .unwrap();

    assert_eq!(group["id"], "g:cam:new");
    let request = transport.single_request();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.path, "/api/group/create");
    assert_eq!(
        request.params.to_json(),
        json!({ "displayName": "Rust Guild", "joinable": "yes", "members": ["u:cam:a", "u:cam:b"] })
    );
}

#[tokio::test]
async fn test_create_group_without_name_never_dispatches() {
    let (client, transport) = mock_client();

    let err = client.groups().create(&CreateGroup::new("   ")).await.unwrap_err();

    assert_eq!(err.code(), 400);
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_update_omits_unset_fields() {
    let (client, transport) = mock_client();
    let fields = UpdateGroup {
        description: Some("New description".to_string()),
        visibility: Some(Visibility::Loggedin),
        ..Default::default()
    };

    client.groups().update("g:cam:abc", &fields).await.unwrap();

    let request = transport.single_request();
    assert_eq!(request.method, Method::POST);
    assert!(!request.params.contains_key("displayName"));
    assert!(!request.params.contains_key("joinable"));
    assert_eq!(
        request.params.to_json(),
        json!({ "description": "New description", "visibility": "loggedin" })
    );
}

#[tokio::test]
async fn test_list_calls_forward_start_and_limit() {
    let (client, transport) = mock_client();
    transport.respond_json(200, json!({ "results": [{ "profile": { "id": "u:cam:c" } }], "nextToken": "u:cam:c" }));

    let page = client
        .groups()
        .members("g:cam:abc", Paging::new().start("u:cam:b").limit(7))
        .await
        .unwrap();
    client.groups().memberships("u:cam:b", Paging::new().limit(3)).await.unwrap();

    assert_eq!(page.results.len(), 1);
    assert_eq!(page.next_token.as_deref(), Some("u:cam:c"));

    let requests = transport.requests();
    assert_eq!(requests[0].method, Method::GET);
    let mut pairs = requests[0].params.to_query_pairs();
    pairs.sort();
    assert_eq!(
        pairs,
        vec![
            ("limit".to_string(), "7".to_string()),
            ("start".to_string(), "u:cam:b".to_string()),
        ]
    );
    assert_eq!(requests[1].params.to_query_pairs(), vec![("limit".to_string(), "3".to_string())]);
}

#[tokio::test]
async fn test_set_members_sends_roles_and_removals() {
    let (client, transport) = mock_client();
    let updates = MemberUpdates::new()
        .set("u:cam:a", MemberRole::Manager)
        .remove("u:cam:b");

    client.groups().set_members("g:cam:abc", &updates).await.unwrap();

    let request = transport.single_request();
    assert_eq!(request.path, "/api/group/g%3Acam%3Aabc/members");
    assert_eq!(request.params.to_json(), json!({ "u:cam:a": "manager", "u:cam:b": false }));
}

#[tokio::test]
async fn test_state_changes_use_expected_methods() {
    let (client, transport) = mock_client();
    let groups = client.groups();

    groups.delete("g:cam:abc").await.unwrap();
    groups.restore("g:cam:abc").await.unwrap();
    groups.leave("g:cam:abc").await.unwrap();

    let calls: Vec<(Method, String)> = transport
        .requests()
        .into_iter()
        .map(|r| (r.method, r.path))
        .collect();
    assert_eq!(
        calls,
        vec![
            (Method::DELETE, "/api/group/g%3Acam%3Aabc".to_string()),
            (Method::POST, "/api/group/g%3Acam%3Aabc/restore".to_string()),
            (Method::POST, "/api/group/g%3Acam%3Aabc/leave".to_string()),
        ]
    );
    assert!(transport.requests().iter().all(|r| r.params.is_empty()));
}

#[tokio::test]
async fn test_download_without_size_makes_no_request() {
    let (client, transport) = mock_client();

    let err = client.groups().download_picture("g:cam:abc", None).await.unwrap_err();

    assert!(matches!(err, RestError::InvalidParameter(_)));
    assert_eq!(err.code(), 400);
    assert_eq!(err.message(), "Missing size parameter");
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_download_fetches_group_then_picture_url() {
    let (client, transport) = mock_client();
    transport
        .respond_json(200, json!({ "id": "g:cam:abc", "picture": { "medium": "/api/download/signed?uri=local%3Ag" } }))
        .respond_raw(200, b"\x89PNG\r\n");

    let bytes = client
        .groups()
        .download_picture("g:cam:abc", Some(PictureSize::Medium))
        .await
        .unwrap();

    assert_eq!(&bytes[..], b"\x89PNG\r\n");
    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].path, "/api/group/g%3Acam%3Aabc");
    assert_eq!(requests[1].method, Method::GET);
    assert_eq!(requests[1].path, "/api/download/signed?uri=local%3Ag");
}

#[tokio::test]
async fn test_download_missing_picture_is_not_found() {
    let (client, transport) = mock_client();
    transport.respond_json(200, json!({ "id": "g:cam:abc", "picture": {} }));

    let err = client
        .groups()
        .download_picture("g:cam:abc", Some(PictureSize::Large))
        .await
        .unwrap_err();

    assert_eq!(err.code(), 404);
    assert_eq!(err.message(), "This group has no picture.");
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn test_download_group_error_short_circuits() {
    let (client, transport) = mock_client();
    transport.respond_raw(401, b"Unauthorized");

    let err = client
        .groups()
        .download_picture("g:cam:abc", Some(PictureSize::Small))
        .await
        .unwrap_err();

    assert_eq!(err.code(), 401);
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn test_upload_without_area_is_a_single_multipart_request() {
    let (client, transport) = mock_client();
    transport.respond_json(200, json!({ "id": "g:cam:abc" }));

    let group = client
        .groups()
        .upload_picture("g:cam:abc", PictureFile::new("me.png", vec![1u8, 2, 3]), None)
        .await
        .unwrap();

    assert_eq!(group["id"], "g:cam:abc");
    let request = transport.single_request();
    assert_eq!(request.path, "/api/group/g%3Acam%3Aabc/picture");
    assert!(request.is_multipart());
    assert_eq!(request.files[0].field, "file");
    assert_eq!(request.files[0].file_name, "me.png");
    assert_eq!(request.files[0].content_type.as_deref(), Some("image/png"));
}

#[tokio::test]
async fn test_upload_with_area_crops_after_upload() {
    let (client, transport) = mock_client();
    transport
        .respond_json(200, json!({ "id": "g:cam:abc" }))
        .respond_json(200, json!({ "id": "g:cam:abc", "picture": { "small": "/s", "medium": "/m" } }));

    let cropped = client
        .groups()
        .upload_picture(
            "g:cam:abc",
            PictureFile::new("me.jpg", vec![9u8; 16]),
            Some(SelectedArea::square(10, 10, 200)),
        )
        .await
        .unwrap();

    assert_eq!(cropped["picture"]["medium"], "/m");
    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].path, "/api/group/g%3Acam%3Aabc/picture");
    assert_eq!(requests[1].method, Method::POST);
    assert_eq!(requests[1].path, "/api/crop");
    assert!(!requests[1].is_multipart());
    assert_eq!(
        requests[1].params.to_json(),
        json!({ "principalId": "g:cam:abc", "x": 10, "y": 10, "width": 200 })
    );
}

#[tokio::test]
async fn test_failed_upload_suppresses_crop() {
    let (client, transport) = mock_client();
    transport.respond_raw(400, b"The uploaded file is not an image");

    let err = client
        .groups()
        .upload_picture(
            "g:cam:abc",
            PictureFile::new("notes.txt", vec![0u8]),
            Some(SelectedArea::square(0, 0, 50)),
        )
        .await
        .unwrap_err();

    assert_eq!(err.code(), 400);
    assert_eq!(err.message(), "The uploaded file is not an image");
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn test_transport_failure_on_upload_suppresses_crop() {
    let (client, transport) = mock_client();
    transport.fail_transport("connection reset");

    let err = client
        .groups()
        .upload_picture("g:cam:abc", PictureFile::new("me.png", vec![1u8]), Some(SelectedArea::square(0, 0, 10)))
        .await
        .unwrap_err();

    assert_eq!(err.code(), 500);
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn test_params_keep_scalar_types() {
    let (client, transport) = mock_client();

    client.groups().members("g:cam:abc", Paging::new().limit(25)).await.unwrap();

    let request = transport.single_request();
    assert_eq!(request.params.get("limit"), Some(&ParamValue::from(25u32)));
}

#[tokio::test]
async fn test_invalid_crop_area_fails_before_upload() {
    let (client, transport) = mock_client();

    let err = client
        .groups()
        .upload_picture("g:cam:abc", PictureFile::new("me.png", vec![1u8]), Some(SelectedArea::square(0, 0, 0)))
        .await
        .unwrap_err();
    assert!(matches!(err, RestError::InvalidParameter(_)));
    assert_eq!(err.code(), 400);

    let err = client
        .groups()
        .upload_picture(
            "g:cam:abc",
            PictureFile::new("me.png", vec![1u8]),
            Some(SelectedArea::square(0, 0, 10).with_height(0)),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), 400);

    let err = client
        .groups()
        .upload_picture("", PictureFile::new("me.png", vec![1u8]), Some(SelectedArea::square(0, 0, 10)))
        .await
        .unwrap_err();
    assert_eq!(err.code(), 400);

    assert_eq!(transport.request_count(), 0);
}

#[test]
fn test_groups_share_the_registry_crop_client() {
    let (client, _) = mock_client();
    let registry = client.domains();
    let groups = registry.groups();
    assert!(std::sync::Arc::ptr_eq(&registry.crop(), &client.crop()));
    assert_eq!(groups.domain_name(), "group");
}
