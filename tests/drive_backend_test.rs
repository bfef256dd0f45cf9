use birthdays::adapters::{DriveStore, ServiceAccountAuth, ServiceAccountKey, StaticToken};
use birthdays::core::{FileHandle, FileStore, TokenSource};
use birthdays::{ErrorKind, FileLocation, Record, StoreError, SubmissionStore, WriteMode};
use httpmock::prelude::*;
use httpmock::Method::PATCH;
use std::sync::Arc;

const QUERY: &str = "'folder1' in parents and name='data.json'";

fn drive_for(server: &MockServer) -> DriveStore {
    DriveStore::new(
        reqwest::Client::new(),
        Arc::new(StaticToken("test-token".to_string())),
    )
    .with_endpoints(&server.url(""), &server.url("/upload"))
}

fn store_for(server: &MockServer) -> SubmissionStore {
    SubmissionStore::new(
        Arc::new(drive_for(server)),
        FileLocation {
            folder_id: "folder1".to_string(),
            file_name: "data.json".to_string(),
        },
    )
}

#[tokio::test]
async fn test_fetch_all_lists_then_downloads() {
    let server = MockServer::start();

    let list_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/files")
            .query_param("q", QUERY)
            .query_param("fields", "files(id)")
            .header("authorization", "Bearer test-token");
        then.status(200)
            .json_body(serde_json::json!({"files": [{"id": "abc"}, {"id": "dup"}]}));
    });
    let version_mock = server.mock(|when, then| {
        when.method(GET).path("/files/abc").query_param("fields", "version");
        then.status(200).json_body(serde_json::json!({"version": "7"}));
    });
    let media_mock = server.mock(|when, then| {
        when.method(GET).path("/files/abc").query_param("alt", "media");
        then.status(200)
            .body(r#"[{"date": "4", "month": "7", "reddit": "uncle_sam"}]"#);
    });

    let records = store_for(&server).fetch_all().await.unwrap();

    assert_eq!(records, vec![Record::new("4", "7", "uncle_sam")]);
    list_mock.assert();
    media_mock.assert();
    // Plain reads never ask for the file version.
    version_mock.assert_hits(0);
}

#[tokio::test]
async fn test_append_overwrites_whole_file() {
    let server = MockServer::start();
    let existing = vec![Record::new("1", "1", "newyear")];
    let record = Record::new("25", "12", "festive");
    let expected_body =
        serde_json::to_string_pretty(&vec![existing[0].clone(), record.clone()]).unwrap();

    let list_mock = server.mock(|when, then| {
        when.method(GET).path("/files").query_param("q", QUERY);
        then.status(200).json_body(serde_json::json!({"files": [{"id": "abc"}]}));
    });
    let version_mock = server.mock(|when, then| {
        when.method(GET).path("/files/abc").query_param("fields", "version");
        then.status(200).json_body(serde_json::json!({"version": "3"}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/files/abc").query_param("alt", "media");
        then.status(200).json_body(serde_json::to_value(&existing).unwrap());
    });
    let update_mock = server.mock(|when, then| {
        when.method(PATCH)
            .path("/upload/files/abc")
            .query_param("uploadType", "media")
            .header("content-type", "application/json")
            .header("authorization", "Bearer test-token")
            .body(expected_body.clone());
        then.status(200).json_body(serde_json::json!({"id": "abc"}));
    });

    store_for(&server).append(record).await.unwrap();

    // Once for the read, once more before the write.
    list_mock.assert_hits(2);
    update_mock.assert();
    version_mock.assert_hits(0);
}

#[tokio::test]
async fn test_conditional_append_checks_version() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/files").query_param("q", QUERY);
        then.status(200).json_body(serde_json::json!({"files": [{"id": "abc"}]}));
    });
    let version_mock = server.mock(|when, then| {
        when.method(GET).path("/files/abc").query_param("fields", "version");
        then.status(200).json_body(serde_json::json!({"version": "3"}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/files/abc").query_param("alt", "media");
        then.status(200).body("[]");
    });
    let update_mock = server.mock(|when, then| {
        when.method(PATCH).path("/upload/files/abc");
        then.status(200).json_body(serde_json::json!({"id": "abc"}));
    });

    store_for(&server)
        .with_write_mode(WriteMode::Conditional, 3)
        .append(Record::new("9", "9", "careful"))
        .await
        .unwrap();

    // Once with the download, once more right before the upload.
    version_mock.assert_hits(2);
    update_mock.assert();
}

#[tokio::test]
async fn test_missing_file_reports_not_found() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/files");
        then.status(200).json_body(serde_json::json!({"files": []}));
    });

    let err = store_for(&server).fetch_all().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.to_string(), "data.json not found in Google Drive");
}

#[tokio::test]
async fn test_service_errors_carry_status() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/files");
        then.status(403).body("insufficientFilePermissions");
    });

    let err = store_for(&server).fetch_all().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Storage);
    assert!(matches!(err, StoreError::Remote { status: 403, ref body } if body.contains("insufficient")));
}

#[tokio::test]
async fn test_update_checks_version_before_upload() {
    let server = MockServer::start();
    let drive = drive_for(&server);
    let handle = FileHandle::new("abc");

    let mut version_mock = server.mock(|when, then| {
        when.method(GET).path("/files/abc").query_param("fields", "version");
        then.status(200).json_body(serde_json::json!({"version": "7"}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/files/abc").query_param("alt", "media");
        then.status(200).body("[]");
    });
    let update_mock = server.mock(|when, then| {
        when.method(PATCH).path("/upload/files/abc");
        then.status(200).json_body(serde_json::json!({"id": "abc"}));
    });

    let download = drive.download(&handle, true).await.unwrap();
    assert_eq!(download.revision.as_deref(), Some("7"));

    // Someone else writes in between.
    version_mock.delete();
    version_mock = server.mock(|when, then| {
        when.method(GET).path("/files/abc").query_param("fields", "version");
        then.status(200).json_body(serde_json::json!({"version": "8"}));
    });

    let err = drive
        .update(&handle, b"[]".to_vec(), Some("7"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::PreconditionFailed));
    update_mock.assert_hits(0);

    drive
        .update(&handle, b"[]".to_vec(), Some("8"))
        .await
        .unwrap();
    update_mock.assert_hits(1);
    version_mock.assert_hits(2);
}

fn test_key(server: &MockServer) -> ServiceAccountKey {
    ServiceAccountKey {
        client_email: "birthdays@example.iam.gserviceaccount.com".to_string(),
        private_key: include_str!("fixtures/test_key.pem").to_string(),
        token_uri: server.url("/token"),
    }
}

#[tokio::test]
async fn test_service_account_token_is_cached() {
    let server = MockServer::start();
    let token_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/token")
            .header("content-type", "application/x-www-form-urlencoded")
            .body_contains("grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer")
            .body_contains("assertion=");
        then.status(200)
            .json_body(serde_json::json!({"access_token": "ya29.test", "expires_in": 3600}));
    });
    let list_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/files")
            .header("authorization", "Bearer ya29.test");
        then.status(200).json_body(serde_json::json!({"files": [{"id": "abc"}]}));
    });

    let client = reqwest::Client::new();
    let auth = Arc::new(ServiceAccountAuth::new(test_key(&server), client.clone()).unwrap());
    let drive = DriveStore::new(client, auth.clone()).with_endpoints(&server.url(""), &server.url("/upload"));

    drive.locate("data.json", "folder1").await.unwrap();
    drive.locate("data.json", "folder1").await.unwrap();
    assert_eq!(auth.access_token().await.unwrap(), "ya29.test");

    token_mock.assert_hits(1);
    list_mock.assert_hits(2);
}

#[tokio::test]
async fn test_rejected_token_exchange_is_an_auth_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/token");
        then.status(400)
            .json_body(serde_json::json!({"error": "invalid_grant"}));
    });

    let auth = ServiceAccountAuth::new(test_key(&server), reqwest::Client::new()).unwrap();
    let err = auth.access_token().await.unwrap_err();

    assert!(matches!(err, StoreError::Auth { ref message } if message.contains("invalid_grant")));
}
