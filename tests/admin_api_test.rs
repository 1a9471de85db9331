mod common;

use common::{ADMIN_TOKEN, client, setup_app_data, setup_app_data_with};
use poem::http::StatusCode;
use serde_json::json;

const REFERENCE_KINDS: [&str; 14] = [
    "roles",
    "positions",
    "departments",
    "unions",
    "activity-categories",
    "activity-codes",
    "network-numbers",
    "director-codes",
    "reason-codes",
    "cpc-codes",
    "budgets",
    "expense-categories",
    "expense-options",
    "calendar-categories",
];

#[tokio::test]
async fn test_admin_token_required() {
    let cli = client(setup_app_data().await);

    cli.get("/api/admin/positions").send().await.assert_status(StatusCode::UNAUTHORIZED);
    cli.get("/api/admin/positions")
        .header("X-Admin-Token", "wrong-token")
        .send()
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    cli.get("/api/admin/positions")
        .header("X-Admin-Token", ADMIN_TOKEN)
        .send()
        .await
        .assert_status_is_ok();
}

#[tokio::test]
async fn test_reference_crud() {
    let cli = client(setup_app_data().await);

    let resp = cli
        .post("/api/admin/departments")
        .header("X-Admin-Token", ADMIN_TOKEN)
        .body_json(&json!({ "key": "  Engineering  ", "description": "Design" }))
        .send()
        .await;
    resp.assert_status(StatusCode::CREATED);
    let json = resp.json().await;
    let created = json.value().object();
    created.get("key").assert_string("Engineering");
    created.get("isActive").assert_bool(true);
    let id = created.get("id").string().to_string();

    cli.post("/api/admin/departments")
        .header("X-Admin-Token", ADMIN_TOKEN)
        .body_json(&json!({ "key": "Engineering" }))
        .send()
        .await
        .assert_status(StatusCode::CONFLICT);

    cli.put(format!("/api/admin/departments/{}", id))
        .header("X-Admin-Token", ADMIN_TOKEN)
        .body_json(&json!({ "key": "Engineering Services", "isActive": false }))
        .send()
        .await
        .assert_status_is_ok();

    let resp = cli
        .get(format!("/api/admin/departments/{}", id))
        .header("X-Admin-Token", ADMIN_TOKEN)
        .send()
        .await;
    resp.assert_status_is_ok();
    resp.json().await.value().object().get("key").assert_string("Engineering Services");

    cli.delete(format!("/api/admin/departments/{}", id))
        .header("X-Admin-Token", ADMIN_TOKEN)
        .send()
        .await
        .assert_status(StatusCode::NO_CONTENT);
    cli.delete(format!("/api/admin/departments/{}", id))
        .header("X-Admin-Token", ADMIN_TOKEN)
        .send()
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blank_key_is_bad_request() {
    let cli = client(setup_app_data().await);

    let resp = cli
        .post("/api/admin/cpc-codes")
        .header("X-Admin-Token", ADMIN_TOKEN)
        .body_json(&json!({ "key": "   " }))
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    resp.json().await.value().object().get("message").assert_string("Code is required");
}

#[tokio::test]
async fn test_missing_row_is_not_found_for_every_kind() {
    let cli = client(setup_app_data().await);

    for kind in REFERENCE_KINDS {
        cli.put(format!("/api/admin/{}/does-not-exist", kind))
            .header("X-Admin-Token", ADMIN_TOKEN)
            .body_json(&json!({ "key": "" }))
            .send()
            .await
            .assert_status(StatusCode::NOT_FOUND);

        cli.delete(format!("/api/admin/{}/does-not-exist", kind))
            .header("X-Admin-Token", ADMIN_TOKEN)
            .send()
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn test_unknown_role_name_rejected() {
    let cli = client(setup_app_data().await);

    cli.post("/api/admin/roles")
        .header("X-Admin-Token", ADMIN_TOKEN)
        .body_json(&json!({ "key": "Superuser" }))
        .send()
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    // Roles are ensured at startup, so the canonical names already exist
    cli.post("/api/admin/roles")
        .header("X-Admin-Token", ADMIN_TOKEN)
        .body_json(&json!({ "key": "manager" }))
        .send()
        .await
        .assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_user_admin_and_password() {
    let cli = client(setup_app_data().await);

    let resp = cli
        .post("/api/admin/users")
        .header("X-Admin-Token", ADMIN_TOKEN)
        .body_json(&json!({ "username": "newhire", "email": "newhire@example.com" }))
        .send()
        .await;
    resp.assert_status(StatusCode::CREATED);
    let json = resp.json().await;
    let profile = json.value().object();
    profile.get("hasPassword").assert_bool(false);
    let id = profile.get("id").string().to_string();

    cli.post("/api/admin/users")
        .header("X-Admin-Token", ADMIN_TOKEN)
        .body_json(&json!({ "username": "newhire", "email": "other@example.com" }))
        .send()
        .await
        .assert_status(StatusCode::CONFLICT);

    cli.put(format!("/api/admin/users/{}/password", id))
        .header("X-Admin-Token", ADMIN_TOKEN)
        .body_json(&json!({ "password": "short" }))
        .send()
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    cli.put(format!("/api/admin/users/{}/password", id))
        .header("X-Admin-Token", ADMIN_TOKEN)
        .body_json(&json!({ "password": "a-much-longer-password" }))
        .send()
        .await
        .assert_status(StatusCode::NO_CONTENT);

    cli.post("/api/auth/login")
        .body_json(&json!({ "username": "newhire", "password": "a-much-longer-password" }))
        .send()
        .await
        .assert_status_is_ok();
}

#[tokio::test]
async fn test_update_missing_user_is_not_found() {
    let cli = client(setup_app_data().await);

    cli.put("/api/admin/users/no-such-user")
        .header("X-Admin-Token", ADMIN_TOKEN)
        .body_json(&json!({ "email": "  " }))
        .send()
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_calendar_entries() {
    let cli = client(setup_app_data().await);

    cli.post("/api/admin/calendar-entries")
        .header("X-Admin-Token", ADMIN_TOKEN)
        .body_json(&json!({ "title": " ", "entryDate": "2025-07-01" }))
        .send()
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    cli.post("/api/admin/calendar-entries")
        .header("X-Admin-Token", ADMIN_TOKEN)
        .body_json(&json!({ "title": "Canada Day", "entryDate": "2025-07-01" }))
        .send()
        .await
        .assert_status(StatusCode::CREATED);

    let resp = cli
        .get("/api/admin/calendar-entries")
        .header("X-Admin-Token", ADMIN_TOKEN)
        .query("from", &"2025-07-01")
        .query("to", &"2025-07-01")
        .send()
        .await;
    resp.assert_status_is_ok();
    resp.json().await.value().array().assert_len(1);
}

#[tokio::test]
async fn test_seed_twice_creates_nothing_new() {
    let cli = client(setup_app_data().await);

    let first = cli
        .post("/api/admin/seed/test-data")
        .header("X-Admin-Token", ADMIN_TOKEN)
        .send()
        .await;
    first.assert_status_is_ok();
    assert!(first.json().await.value().object().get("totalCreated").i64() > 0);

    let second = cli
        .post("/api/admin/seed/test-data")
        .header("X-Admin-Token", ADMIN_TOKEN)
        .send()
        .await;
    second.assert_status_is_ok();
    second.json().await.value().object().get("totalCreated").assert_i64(0);
}

#[tokio::test]
async fn test_admin_rate_limit() {
    let cli = client(setup_app_data_with(&[("ADMIN_RATE_LIMIT", "2")]).await);

    for _ in 0..2 {
        cli.get("/api/admin/positions")
            .header("X-Admin-Token", ADMIN_TOKEN)
            .send()
            .await
            .assert_status_is_ok();
    }

    let resp = cli
        .get("/api/admin/positions")
        .header("X-Admin-Token", ADMIN_TOKEN)
        .send()
        .await;
    resp.assert_status(StatusCode::TOO_MANY_REQUESTS);
    resp.json().await.value().object().get("statusCode").assert_i64(429);

    // Only admin routes are limited
    cli.get("/api/health").send().await.assert_status_is_ok();
}

#[tokio::test]
async fn test_rate_limit_ignores_forwarded_for_by_default() {
    let cli = client(setup_app_data_with(&[("ADMIN_RATE_LIMIT", "2")]).await);

    let mut statuses = Vec::new();
    for i in 0..5 {
        let resp = cli
            .get("/api/admin/positions")
            .header("X-Admin-Token", ADMIN_TOKEN)
            .header("X-Forwarded-For", format!("203.0.113.{}", i))
            .send()
            .await;
        statuses.push(resp.0.status());
    }

    assert_eq!(statuses[..2], [StatusCode::OK, StatusCode::OK]);
    assert!(statuses[2..].iter().all(|s| *s == StatusCode::TOO_MANY_REQUESTS));
}

#[tokio::test]
async fn test_rate_limit_keys_on_forwarded_for_when_trusted() {
    let cli = client(
        setup_app_data_with(&[("ADMIN_RATE_LIMIT", "1"), ("TRUST_PROXY_HEADERS", "true")]).await,
    );

    for i in 0..3 {
        cli.get("/api/admin/positions")
            .header("X-Admin-Token", ADMIN_TOKEN)
            .header("X-Forwarded-For", format!("203.0.113.{}", i))
            .send()
            .await
            .assert_status_is_ok();
    }

    cli.get("/api/admin/positions")
        .header("X-Admin-Token", ADMIN_TOKEN)
        .header("X-Forwarded-For", "203.0.113.0")
        .send()
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);
}
