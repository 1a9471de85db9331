mod common;

use common::{bearer, client, create_user, login, setup_app_data};
use dsc_timesheet::types::internal::RoleName;
use poem::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_health_reports_database() {
    let cli = client(setup_app_data().await);

    let resp = cli.get("/api/health").send().await;
    resp.assert_status_is_ok();

    let json = resp.json().await;
    let body = json.value().object();
    body.get("status").assert_string("healthy");
    body.get("database").assert_string("connected");
}

#[tokio::test]
async fn test_login_returns_bearer_token_and_role() {
    let app_data = setup_app_data().await;
    create_user(&app_data, "mgr", RoleName::Manager).await;
    let cli = client(app_data);

    let resp = cli
        .post("/api/auth/login")
        .body_json(&json!({ "username": "mgr", "password": common::PASSWORD }))
        .send()
        .await;
    resp.assert_status_is_ok();

    let json = resp.json().await;
    let body = json.value().object();
    body.get("tokenType").assert_string("Bearer");
    body.get("roleName").assert_string("Manager");
    body.get("user").object().get("username").assert_string("mgr");
    assert!(!body.get("accessToken").string().is_empty());
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let app_data = setup_app_data().await;
    create_user(&app_data, "jdoe", RoleName::User).await;
    let cli = client(app_data);

    let resp = cli
        .post("/api/auth/login")
        .body_json(&json!({ "username": "jdoe", "password": "not-the-password" }))
        .send()
        .await;
    resp.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_requires_valid_token() {
    let app_data = setup_app_data().await;
    create_user(&app_data, "jdoe", RoleName::User).await;
    let cli = client(app_data);

    cli.get("/api/auth/me").send().await.assert_status(StatusCode::UNAUTHORIZED);
    cli.get("/api/auth/me")
        .header("Authorization", "Bearer garbage")
        .send()
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let token = login(&cli, "jdoe").await;
    let resp = cli.get("/api/auth/me").header("Authorization", bearer(&token)).send().await;
    resp.assert_status_is_ok();
    resp.json().await.value().object().get("username").assert_string("jdoe");
}

#[tokio::test]
async fn test_user_lookup_by_id() {
    let app_data = setup_app_data().await;
    let jdoe = create_user(&app_data, "jdoe", RoleName::User).await;
    let boss = create_user(&app_data, "boss", RoleName::Director).await;
    let cli = client(app_data);

    let user_token = login(&cli, "jdoe").await;
    cli.get(format!("/api/auth/user/{}", jdoe))
        .header("Authorization", bearer(&user_token))
        .send()
        .await
        .assert_status_is_ok();
    cli.get(format!("/api/auth/user/{}", boss))
        .header("Authorization", bearer(&user_token))
        .send()
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let boss_token = login(&cli, "boss").await;
    cli.get(format!("/api/auth/user/{}", jdoe))
        .header("Authorization", bearer(&boss_token))
        .send()
        .await
        .assert_status_is_ok();
    cli.get("/api/auth/user/missing")
        .header("Authorization", bearer(&boss_token))
        .send()
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deactivated_user_cannot_log_in() {
    let app_data = setup_app_data().await;
    let id = create_user(&app_data, "leaver", RoleName::User).await;
    let cli = client(app_data);

    let token = login(&cli, "leaver").await;

    cli.put(format!("/api/admin/users/{}", id))
        .header("X-Admin-Token", common::ADMIN_TOKEN)
        .body_json(&json!({ "isActive": false }))
        .send()
        .await
        .assert_status_is_ok();

    cli.post("/api/auth/login")
        .body_json(&json!({ "username": "leaver", "password": common::PASSWORD }))
        .send()
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    // Tokens issued before deactivation stop working too
    cli.get("/api/auth/me")
        .header("Authorization", bearer(&token))
        .send()
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}
