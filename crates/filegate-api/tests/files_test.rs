//! File lifecycle integration tests.
//!
//! Run with: `cargo test -p filegate-api --test files_test`

mod helpers;

use chrono::{Duration as ChronoDuration, Utc};
use filegate_core::models::{FileDerivative, FileRecord, FileStatus};
use filegate_db::RecordStore;
use helpers::auth::{tenant_a_user, TestUser};
use helpers::{api_path, setup_test_app, TestApp, TEST_MAX_FILE_SIZE_BYTES};
use serde_json::{json, Value};
use std::collections::HashSet;
use uuid::Uuid;

async fn request_upload(app: &TestApp, user: &TestUser, body: Value) -> Value {
    let response = app
        .client()
        .post(&api_path("/files/upload-url"))
        .add_header("Authorization", user.bearer())
        .json(&body)
        .await;
    assert_eq!(response.status_code(), 200, "{}", response.text());
    response.json::<Value>()
}

async fn upload_pdf(app: &TestApp, user: &TestUser, filename: &str) -> Uuid {
    let body = request_upload(
        app,
        user,
        json!({ "filename": filename, "contentType": "application/pdf", "size": 2048 }),
    )
    .await;
    body["fileId"].as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn test_upload_url_registers_pending_file() {
    let app = setup_test_app().await;
    let user = tenant_a_user();

    let body = request_upload(
        &app,
        &user,
        json!({ "filename": "report.pdf", "contentType": "application/pdf", "size": 1024 }),
    )
    .await;

    let file_id: Uuid = body["fileId"].as_str().unwrap().parse().unwrap();
    let expected_key = format!("uploads/{}/{}.pdf", user.tenant_id, file_id);
    assert_eq!(body["storageKey"], expected_key.as_str());
    assert_eq!(body["expiresIn"], 3600);
    assert!(body["uploadUrl"].as_str().unwrap().contains(&expected_key));

    let puts = app.signer.puts();
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].storage_key, expected_key);
    assert_eq!(puts[0].content_type, "application/pdf");
    assert_eq!(puts[0].content_length, 1024);

    let (record, _) = app
        .store
        .get(file_id, user.tenant_id, false)
        .await
        .unwrap();
    assert_eq!(record.status, FileStatus::Pending);
    assert_eq!(record.uploaded_by, user.user_id);
    assert_eq!(record.size_bytes, 1024);
}

#[tokio::test]
async fn test_upload_url_without_extension_has_bare_key() {
    let app = setup_test_app().await;
    let user = tenant_a_user();

    let body = request_upload(
        &app,
        &user,
        json!({ "filename": "README", "contentType": "application/pdf", "size": 10 }),
    )
    .await;

    let key = body["storageKey"].as_str().unwrap();
    assert_eq!(key, format!("uploads/{}/{}", user.tenant_id, body["fileId"].as_str().unwrap()));
}

#[tokio::test]
async fn test_upload_url_rejects_invalid_intents() {
    let app = setup_test_app().await;
    let user = tenant_a_user();

    let cases = [
        json!({ "filename": "movie.mp4", "contentType": "video/mp4", "size": 10 }),
        json!({ "filename": "big.pdf", "contentType": "application/pdf", "size": TEST_MAX_FILE_SIZE_BYTES + 1 }),
        json!({ "filename": "empty.pdf", "contentType": "application/pdf", "size": 0 }),
        json!({ "contentType": "application/pdf", "size": 10 }),
        json!({ "filename": "a.pdf", "size": 10 }),
        json!({ "filename": "a.pdf", "contentType": "application/pdf" }),
    ];

    for case in cases {
        let response = app
            .client()
            .post(&api_path("/files/upload-url"))
            .add_header("Authorization", user.bearer())
            .json(&case)
            .await;
        assert_eq!(response.status_code(), 400, "accepted {}", case);
        assert_eq!(response.json::<Value>()["code"], "INVALID_INPUT");
    }

    assert_eq!(app.store.file_count().await, 0);
    assert!(app.signer.puts().is_empty());
}

#[tokio::test]
async fn test_upload_url_accepts_whole_float_size() {
    let app = setup_test_app().await;
    let user = tenant_a_user();

    request_upload(
        &app,
        &user,
        json!({ "filename": "a.pdf", "contentType": "application/pdf", "size": 1000.0 }),
    )
    .await;
    assert_eq!(app.signer.puts()[0].content_length, 1000);

    let response = app
        .client()
        .post(&api_path("/files/upload-url"))
        .add_header("Authorization", user.bearer())
        .json(&json!({ "filename": "a.pdf", "contentType": "application/pdf", "size": 10.5 }))
        .await;
    assert_eq!(response.status_code(), 400);
    assert_eq!(app.store.file_count().await, 1);
}

#[tokio::test]
async fn test_upload_url_content_type_is_case_insensitive() {
    let app = setup_test_app().await;
    let user = tenant_a_user();

    request_upload(
        &app,
        &user,
        json!({ "filename": "song.MP3", "contentType": "Audio/MPEG", "size": 5 }),
    )
    .await;
    assert_eq!(app.store.file_count().await, 1);
}

#[tokio::test]
async fn test_upload_url_signing_failure_leaves_pending_record() {
    let app = setup_test_app().await;
    let user = tenant_a_user();
    app.signer.fail_signing();

    let response = app
        .client()
        .post(&api_path("/files/upload-url"))
        .add_header("Authorization", user.bearer())
        .json(&json!({ "filename": "a.pdf", "contentType": "application/pdf", "size": 10 }))
        .await;

    assert_eq!(response.status_code(), 500);
    let body = response.json::<Value>();
    assert_eq!(body["code"], "SIGNING_ERROR");
    assert!(body.get("details").is_none());
    assert_eq!(app.store.file_count().await, 1);
}

#[tokio::test]
async fn test_confirm_is_idempotent() {
    let app = setup_test_app().await;
    let user = tenant_a_user();
    let file_id = upload_pdf(&app, &user, "a.pdf").await;

    for _ in 0..2 {
        let response = app
            .client()
            .post(&api_path(&format!("/files/{}/confirm", file_id)))
            .add_header("Authorization", user.bearer())
            .await;
        assert_eq!(response.status_code(), 200);
        assert_eq!(response.json::<Value>()["status"], "ready");
    }

    assert!(app.store.jobs_for(file_id).await.is_empty());
}

#[tokio::test]
async fn test_confirm_creates_processing_job() {
    let app = setup_test_app().await;
    let user = tenant_a_user();
    let file_id = upload_pdf(&app, &user, "talk.pdf").await;

    let response = app
        .client()
        .post(&api_path(&format!("/files/{}/confirm", file_id)))
        .add_header("Authorization", user.bearer())
        .json(&json!({ "createJob": "transcribe", "priority": 5 }))
        .await;
    assert_eq!(response.status_code(), 200);

    let response = app
        .client()
        .get(&api_path(&format!("/files/{}", file_id)))
        .add_header("Authorization", user.bearer())
        .await;
    assert_eq!(response.status_code(), 200);
    let body = response.json::<Value>();
    assert_eq!(body["status"], "ready");
    let jobs = body["processingJobs"].as_array().unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0]["jobType"], "transcribe");
    assert_eq!(jobs[0]["status"], "pending");
    assert_eq!(jobs[0]["priority"], 5);
}

#[tokio::test]
async fn test_confirm_job_priority_defaults_to_zero() {
    let app = setup_test_app().await;
    let user = tenant_a_user();
    let file_id = upload_pdf(&app, &user, "a.pdf").await;

    let response = app
        .client()
        .post(&api_path(&format!("/files/{}/confirm", file_id)))
        .add_header("Authorization", user.bearer())
        .json(&json!({ "createJob": "ocr" }))
        .await;
    assert_eq!(response.status_code(), 200);

    let jobs = app.store.jobs_for(file_id).await;
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].priority, 0);
}

#[tokio::test]
async fn test_confirm_rejects_malformed_body_and_unknown_file() {
    let app = setup_test_app().await;
    let user = tenant_a_user();
    let file_id = upload_pdf(&app, &user, "a.pdf").await;

    let response = app
        .client()
        .post(&api_path(&format!("/files/{}/confirm", file_id)))
        .add_header("Authorization", user.bearer())
        .text("{not json")
        .await;
    assert_eq!(response.status_code(), 400);

    let response = app
        .client()
        .post(&api_path(&format!("/files/{}/confirm", Uuid::new_v4())))
        .add_header("Authorization", user.bearer())
        .await;
    assert_eq!(response.status_code(), 404);

    let response = app
        .client()
        .post(&api_path("/files/not-a-uuid/confirm"))
        .add_header("Authorization", user.bearer())
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_confirm_rejected_job_leaves_file_pending() {
    let app = setup_test_app().await;
    let user = tenant_a_user();
    let file_id = upload_pdf(&app, &user, "a.pdf").await;

    let response = app
        .client()
        .post(&api_path(&format!("/files/{}/confirm", file_id)))
        .add_header("Authorization", user.bearer())
        .json(&json!({ "createJob": "x".repeat(65) }))
        .await;
    assert_eq!(response.status_code(), 400);
    assert_eq!(response.json::<Value>()["code"], "INVALID_INPUT");

    let (record, _) = app
        .store
        .get(file_id, user.tenant_id, false)
        .await
        .unwrap();
    assert_eq!(record.status, FileStatus::Pending);
    assert!(app.store.jobs_for(file_id).await.is_empty());
}

#[tokio::test]
async fn test_download_url() {
    let app = setup_test_app().await;
    let user = tenant_a_user();
    let file_id = upload_pdf(&app, &user, "invoice.pdf").await;

    let response = app
        .client()
        .post(&api_path("/files/download-url"))
        .add_header("Authorization", user.bearer())
        .json(&json!({ "fileId": file_id }))
        .await;
    assert_eq!(response.status_code(), 200);
    let body = response.json::<Value>();
    assert_eq!(body["filename"], "invoice.pdf");
    assert_eq!(body["contentType"], "application/pdf");
    assert_eq!(body["expiresIn"], 3600);
    let key = format!("uploads/{}/{}.pdf", user.tenant_id, file_id);
    let url = body["downloadUrl"].as_str().unwrap();
    assert!(url.contains(&key));
    assert!(url.contains("method=GET"));
}

#[tokio::test]
async fn test_download_url_errors() {
    let app = setup_test_app().await;
    let user = tenant_a_user();

    let response = app
        .client()
        .post(&api_path("/files/download-url"))
        .add_header("Authorization", user.bearer())
        .json(&json!({}))
        .await;
    assert_eq!(response.status_code(), 400);
    assert_eq!(response.json::<Value>()["error"], "fileId is required");

    let response = app
        .client()
        .post(&api_path("/files/download-url"))
        .add_header("Authorization", user.bearer())
        .json(&json!({ "fileId": Uuid::new_v4() }))
        .await;
    assert_eq!(response.status_code(), 404);
}

fn aged_record(user: &TestUser, age_secs: i64, status: FileStatus) -> FileRecord {
    let id = Uuid::new_v4();
    let mut record = FileRecord::new_pending(
        id,
        user.tenant_id,
        user.user_id,
        format!("{}.pdf", age_secs),
        "application/pdf".to_string(),
        1,
        format!("uploads/{}/{}.pdf", user.tenant_id, id),
    );
    record.status = status;
    record.created_at = Utc::now() - ChronoDuration::seconds(age_secs);
    record
}

#[tokio::test]
async fn test_list_pages_newest_first() {
    let app = setup_test_app().await;
    let user = tenant_a_user();
    let mut expected = Vec::new();
    for age in [40, 30, 20, 10] {
        let record = aged_record(&user, age, FileStatus::Pending);
        app.store.create(&record).await.unwrap();
        expected.push(record.id);
    }
    expected.reverse();

    let mut seen = Vec::new();
    for offset in [0, 2] {
        let response = app
            .client()
            .get(&api_path(&format!("/files?limit=2&offset={}", offset)))
            .add_header("Authorization", user.bearer())
            .await;
        assert_eq!(response.status_code(), 200);
        let body = response.json::<Value>();
        assert_eq!(body["total"], 4);
        for file in body["files"].as_array().unwrap() {
            seen.push(file["id"].as_str().unwrap().parse::<Uuid>().unwrap());
        }
    }

    assert_eq!(seen, expected);
    assert_eq!(seen.iter().collect::<HashSet<_>>().len(), 4);
}

#[tokio::test]
async fn test_list_filters_by_status() {
    let app = setup_test_app().await;
    let user = tenant_a_user();
    let ready = aged_record(&user, 5, FileStatus::Ready);
    app.store.create(&ready).await.unwrap();
    app.store
        .create(&aged_record(&user, 1, FileStatus::Pending))
        .await
        .unwrap();

    let response = app
        .client()
        .get(&api_path("/files?status=ready"))
        .add_header("Authorization", user.bearer())
        .await;
    assert_eq!(response.status_code(), 200);
    let body = response.json::<Value>();
    assert_eq!(body["total"], 1);
    assert_eq!(body["files"][0]["id"], ready.id.to_string());

    let response = app
        .client()
        .get(&api_path("/files"))
        .add_header("Authorization", user.bearer())
        .await;
    assert_eq!(response.json::<Value>()["total"], 2);
}

#[tokio::test]
async fn test_list_treats_empty_params_as_absent() {
    let app = setup_test_app().await;
    let user = tenant_a_user();
    for (age, status) in [
        (3, FileStatus::Ready),
        (2, FileStatus::Pending),
        (1, FileStatus::Ready),
    ] {
        app.store
            .create(&aged_record(&user, age, status))
            .await
            .unwrap();
    }

    for query in ["status=&limit=&offset=", "limit=", "status=%20"] {
        let response = app
            .client()
            .get(&api_path(&format!("/files?{}", query)))
            .add_header("Authorization", user.bearer())
            .await;
        assert_eq!(response.status_code(), 200, "rejected {}", query);
        let body = response.json::<Value>();
        assert_eq!(body["total"], 3);
        assert_eq!(body["files"].as_array().unwrap().len(), 3);
    }
}

#[tokio::test]
async fn test_list_rejects_bad_query() {
    let app = setup_test_app().await;
    let user = tenant_a_user();

    for query in ["limit=-1", "offset=-5", "status=archived", "limit=abc"] {
        let response = app
            .client()
            .get(&api_path(&format!("/files?{}", query)))
            .add_header("Authorization", user.bearer())
            .await;
        assert_eq!(response.status_code(), 400, "accepted {}", query);
    }
}

#[tokio::test]
async fn test_get_includes_derivatives() {
    let app = setup_test_app().await;
    let user = tenant_a_user();
    let file_id = upload_pdf(&app, &user, "scan.pdf").await;

    app.store
        .insert_derivative(FileDerivative {
            id: Uuid::new_v4(),
            file_id,
            derivative_type: "thumbnail".to_string(),
            storage_key: format!("derivatives/{}/thumb.png", file_id),
            content_type: "image/png".to_string(),
            size_bytes: Some(512),
            metadata: json!({ "width": 128 }),
            created_at: Utc::now(),
        })
        .await;

    let response = app
        .client()
        .get(&api_path(&format!("/files/{}", file_id)))
        .add_header("Authorization", user.bearer())
        .await;
    assert_eq!(response.status_code(), 200);
    let body = response.json::<Value>();
    assert_eq!(body["id"], file_id.to_string());
    assert_eq!(body["derivatives"][0]["derivativeType"], "thumbnail");
    assert_eq!(body["derivatives"][0]["metadata"]["width"], 128);
    assert_eq!(body["processingJobs"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_delete_removes_object_and_record() {
    let app = setup_test_app().await;
    let user = tenant_a_user();
    let file_id = upload_pdf(&app, &user, "a.pdf").await;

    let response = app
        .client()
        .delete(&api_path(&format!("/files/{}", file_id)))
        .add_header("Authorization", user.bearer())
        .await;
    assert_eq!(response.status_code(), 200);
    let body = response.json::<Value>();
    assert_eq!(body["success"], true);
    assert_eq!(body["deletedId"], file_id.to_string());

    assert_eq!(
        app.storage.deletes(),
        vec![format!("uploads/{}/{}.pdf", user.tenant_id, file_id)]
    );

    let response = app
        .client()
        .get(&api_path(&format!("/files/{}", file_id)))
        .add_header("Authorization", user.bearer())
        .await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_delete_survives_storage_failure() {
    let app = setup_test_app().await;
    let user = tenant_a_user();
    let file_id = upload_pdf(&app, &user, "a.pdf").await;
    app.storage.fail_deletes();

    let response = app
        .client()
        .delete(&api_path(&format!("/files/{}", file_id)))
        .add_header("Authorization", user.bearer())
        .await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(app.storage.deletes().len(), 1);
    assert_eq!(app.store.file_count().await, 0);
}

#[tokio::test]
async fn test_delete_unknown_file_touches_no_storage() {
    let app = setup_test_app().await;
    let user = tenant_a_user();

    let response = app
        .client()
        .delete(&api_path(&format!("/files/{}", Uuid::new_v4())))
        .add_header("Authorization", user.bearer())
        .await;
    assert_eq!(response.status_code(), 404);
    assert!(app.storage.deletes().is_empty());
}

#[tokio::test]
async fn test_full_lifecycle() {
    let app = setup_test_app().await;
    let user = tenant_a_user();

    let file_id = upload_pdf(&app, &user, "episode.pdf").await;

    let response = app
        .client()
        .post(&api_path(&format!("/files/{}/confirm", file_id)))
        .add_header("Authorization", user.bearer())
        .json(&json!({ "createJob": "summarize" }))
        .await;
    assert_eq!(response.status_code(), 200);

    let response = app
        .client()
        .get(&api_path("/files?status=ready"))
        .add_header("Authorization", user.bearer())
        .await;
    assert_eq!(response.json::<Value>()["total"], 1);

    let response = app
        .client()
        .post(&api_path("/files/download-url"))
        .add_header("Authorization", user.bearer())
        .json(&json!({ "fileId": file_id }))
        .await;
    assert_eq!(response.status_code(), 200);

    let response = app
        .client()
        .delete(&api_path(&format!("/files/{}", file_id)))
        .add_header("Authorization", user.bearer())
        .await;
    assert_eq!(response.status_code(), 200);
    assert!(app.store.jobs_for(file_id).await.is_empty());

    let response = app
        .client()
        .get(&api_path("/files"))
        .add_header("Authorization", user.bearer())
        .await;
    assert_eq!(response.json::<Value>()["total"], 0);
}
