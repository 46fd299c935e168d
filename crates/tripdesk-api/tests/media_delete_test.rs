//! Media delete API integration tests.
//!
//! Run with: `cargo test -p tripdesk-api --test media_delete_test`
//! No database or CDN needed: the router runs against in-memory fakes.

mod helpers;

use helpers::{bearer, image, media_path, setup_test_app, setup_test_app_with, CDN_URL};
use serde_json::Value;
use tripdesk_api::auth::SESSION_COOKIE;
use tripdesk_api::test_helpers::{MockAuthorizer, MockContentCatalog, MockRemoteStore};
use tripdesk_core::ResourceKind;
use tripdesk_storage::{DestroyOutcome, StorageError};
use uuid::Uuid;

#[tokio::test]
async fn test_delete_without_session_is_unauthorized() {
    let app = setup_test_app().await;
    app.catalog.add_media(image("m1"));

    let response = app.client().delete(&media_path("m1")).await;

    assert_eq!(response.status_code(), 401);
    let body: Value = response.json();
    assert_eq!(body["error"], "Unauthorized");
    assert!(app.catalog.calls().is_empty());
    assert!(app.remote.calls().is_empty());
    assert!(app.catalog.has_media("m1"));
}

#[tokio::test]
async fn test_delete_with_expired_session_is_unauthorized() {
    let app = setup_test_app().await;
    let expired =
        MockAuthorizer::token_with_expiry(app.admin_id, chrono::Utc::now().timestamp() - 60);

    let response = app
        .client()
        .delete(&media_path("m1"))
        .add_header("Authorization", format!("Bearer {}", expired))
        .await;

    assert_eq!(response.status_code(), 401);
    assert!(app.catalog.calls().is_empty());
}

#[tokio::test]
async fn test_delete_by_non_admin_is_forbidden() {
    let app = setup_test_app().await;
    app.catalog.add_media(image("m1"));

    let response = app
        .client()
        .delete(&media_path("m1"))
        .add_header("Authorization", bearer(Uuid::new_v4()))
        .await;

    assert_eq!(response.status_code(), 403);
    let body: Value = response.json();
    assert_eq!(body["error"], "Forbidden");
    assert!(app.catalog.calls().is_empty());
    assert!(app.remote.calls().is_empty());
}

#[tokio::test]
async fn test_revoked_admin_is_forbidden() {
    let app = setup_test_app().await;
    app.authorizer.revoke_admin(app.admin_id);

    let response = app
        .client()
        .delete(&media_path("m1"))
        .add_header("Authorization", bearer(app.admin_id))
        .await;

    assert_eq!(response.status_code(), 403);
}

#[tokio::test]
async fn test_delete_unknown_media_is_not_found() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .delete(&media_path("missing"))
        .add_header("Authorization", bearer(app.admin_id))
        .await;

    assert_eq!(response.status_code(), 404);
    assert!(app.remote.calls().is_empty());
    assert_eq!(app.catalog.calls(), vec!["find_media:missing:public_id"]);
}

#[tokio::test]
async fn test_delete_reconciles_everywhere() {
    let app = setup_test_app().await;
    app.catalog.add_media(image("m1"));
    app.catalog.set_scalar("vehicles", "image_url", "V1", Some(CDN_URL));
    app.catalog.set_scalar("diaries", "author_avatar", "D1", Some(CDN_URL));
    app.catalog.set_collection(
        "blogs",
        "gallery",
        "B1",
        &["https://a/1.jpg", CDN_URL, "https://a/2.jpg", CDN_URL],
    );
    app.catalog
        .set_collection("packages", "images", "P1", &["https://a/9.jpg"]);

    let response = app
        .client()
        .delete(&media_path("m1"))
        .add_header("Authorization", bearer(app.admin_id))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["ok"], true);
    assert_eq!(body["removed"]["vehicles_image_url"], 1);
    assert_eq!(body["removed"]["diaries_author_avatar"], 1);
    assert_eq!(body["removed"]["blogs_gallery_rows"], 1);
    assert_eq!(body["removed"]["packages_images_rows"], 0);
    assert_eq!(body["removed"].as_object().unwrap().len(), 7);
    assert!(body.get("cleanup_errors").is_none());

    assert_eq!(
        app.remote.calls(),
        vec![(ResourceKind::Image, "trips/alps".to_string())]
    );
    assert_eq!(app.catalog.scalar("vehicles", "image_url", "V1"), None);
    assert_eq!(
        app.catalog.collection("blogs", "gallery", "B1"),
        vec!["https://a/1.jpg", "https://a/2.jpg"]
    );
    assert!(!app.catalog.was_written("packages", "images", "P1"));
    assert!(!app.catalog.has_media("m1"));
}

#[tokio::test]
async fn test_session_cookie_is_accepted() {
    let app = setup_test_app().await;
    app.catalog.add_media(image("m1"));

    let response = app
        .client()
        .delete(&media_path("m1"))
        .add_header(
            "Cookie",
            format!("{}={}", SESSION_COOKIE, MockAuthorizer::token_for(app.admin_id)),
        )
        .await;

    assert_eq!(response.status_code(), 200);
    assert!(!app.catalog.has_media("m1"));
}

#[tokio::test]
async fn test_remote_failure_leaves_catalog_untouched() {
    let remote = MockRemoteStore::new();
    remote.respond(
        ResourceKind::Image,
        Err(StorageError::Rejected {
            status: 401,
            message: "Invalid Signature".to_string(),
        }),
    );
    let app = setup_test_app_with(MockContentCatalog::new(), remote).await;
    app.catalog.add_media(image("m1"));
    app.catalog.set_scalar("vehicles", "image_url", "V1", Some(CDN_URL));

    let response = app
        .client()
        .delete(&media_path("m1"))
        .add_header("Authorization", bearer(app.admin_id))
        .await;

    assert_eq!(response.status_code(), 500);
    let body: Value = response.json();
    assert_eq!(body["code"], "REMOTE_DELETE_FAILED");
    assert!(body["error"].as_str().unwrap().contains("Invalid Signature"));
    assert_eq!(app.catalog.calls(), vec!["find_media:m1:public_id"]);
    assert_eq!(
        app.catalog.scalar("vehicles", "image_url", "V1").as_deref(),
        Some(CDN_URL)
    );
    assert!(app.catalog.has_media("m1"));
}

#[tokio::test]
async fn test_missing_cdn_credentials_fail_before_any_change() {
    let app =
        setup_test_app_with(MockContentCatalog::new(), MockRemoteStore::unconfigured()).await;
    app.catalog.add_media(image("m1"));

    let response = app
        .client()
        .delete(&media_path("m1"))
        .add_header("Authorization", bearer(app.admin_id))
        .await;

    assert_eq!(response.status_code(), 500);
    let body: Value = response.json();
    assert_eq!(body["code"], "REMOTE_DELETE_FAILED");
    assert!(app.catalog.has_media("m1"));
}

#[tokio::test]
async fn test_catalog_delete_failure_then_retry() {
    let app = setup_test_app().await;
    app.catalog.add_media(image("m1"));
    app.catalog.set_scalar("blogs", "cover_image", "B1", Some(CDN_URL));
    app.catalog.fail_media_delete("row is locked");

    let response = app
        .client()
        .delete(&media_path("m1"))
        .add_header("Authorization", bearer(app.admin_id))
        .await;

    assert_eq!(response.status_code(), 500);
    let body: Value = response.json();
    assert_eq!(body["code"], "CATALOG_DELETE_FAILED");
    assert_eq!(body["recoverable"], true);
    assert_eq!(app.catalog.scalar("blogs", "cover_image", "B1"), None);
    assert!(app.catalog.has_media("m1"));

    // The remote object is gone now; the retry finishes the job.
    app.catalog.allow_media_delete();
    app.remote.respond(ResourceKind::Image, Ok(DestroyOutcome::NotFound));
    app.remote.respond(ResourceKind::Raw, Ok(DestroyOutcome::NotFound));

    let retry = app
        .client()
        .delete(&media_path("m1"))
        .add_header("Authorization", bearer(app.admin_id))
        .await;

    assert_eq!(retry.status_code(), 200);
    let body: Value = retry.json();
    assert_eq!(body["removed"]["blogs_cover_image"], 0);
    assert!(!app.catalog.has_media("m1"));
}

#[tokio::test]
async fn test_cleanup_errors_are_reported_not_fatal() {
    let app = setup_test_app().await;
    app.catalog.add_media(image("m1"));
    app.catalog.set_scalar("vehicles", "image_url", "V1", Some(CDN_URL));
    app.catalog.fail_site("diaries_gallery_rows", "permission denied for table diaries");

    let response = app
        .client()
        .delete(&media_path("m1"))
        .add_header("Authorization", bearer(app.admin_id))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["ok"], true);
    assert_eq!(body["removed"]["vehicles_image_url"], 1);
    assert_eq!(body["removed"]["diaries_gallery_rows"], 0);
    let errors = body["cleanup_errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["site"], "diaries_gallery_rows");
    assert!(errors[0]["error"]
        .as_str()
        .unwrap()
        .contains("permission denied"));
    assert!(!app.catalog.has_media("m1"));
}

#[tokio::test]
async fn test_second_delete_is_not_found() {
    let app = setup_test_app().await;
    app.catalog.add_media(image("m1"));

    let first = app
        .client()
        .delete(&media_path("m1"))
        .add_header("Authorization", bearer(app.admin_id))
        .await;
    assert_eq!(first.status_code(), 200);

    let second = app
        .client()
        .delete(&media_path("m1"))
        .add_header("Authorization", bearer(app.admin_id))
        .await;
    assert_eq!(second.status_code(), 404);
    assert_eq!(app.remote.calls().len(), 1);
}

#[tokio::test]
async fn test_legacy_schema_without_public_id() {
    let app =
        setup_test_app_with(MockContentCatalog::legacy_schema(), MockRemoteStore::new()).await;
    app.catalog.add_media(image("m1"));

    let response = app
        .client()
        .delete(&media_path("m1"))
        .add_header("Authorization", bearer(app.admin_id))
        .await;

    assert_eq!(response.status_code(), 200);
    let calls = app.catalog.calls();
    assert_eq!(calls[0], "find_media:m1:public_id");
    assert_eq!(calls[1], "find_media:m1:plain");
    assert_eq!(
        app.remote.calls(),
        vec![(ResourceKind::Image, "trips/alps".to_string())]
    );
}
