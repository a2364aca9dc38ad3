mod common;

use common::TestApp;
use login_service::config::AuthConfig;
use reqwest::header;
use reqwest::StatusCode;
use serde_json::json;
use serde_json::Value;

#[tokio::test]
async fn test_login_issues_token_pair() {
    let app = TestApp::spawn().await;
    let id = app.seed_user("alice", "correct-horse").await;

    let response = app.login("alice", "correct-horse").await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("refresh cookie")
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("refresh_token="));
    assert!(cookie.contains("HttpOnly"));

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["id"], id);
    assert_eq!(body["data"]["username"], "alice");

    let access = app
        .tokens
        .validate_access_token(body["data"]["accessToken"].as_str().unwrap())
        .expect("access token verifies with the access key");
    assert_eq!(access.sub, id.to_string());
    assert_eq!(access.name, "alice");
    assert_eq!(access.iss, "portfolio-api");
    assert_eq!(access.aud, "portfolio-web");

    let refresh = app
        .tokens
        .validate_refresh_token(body["data"]["refreshToken"].as_str().unwrap())
        .expect("refresh token verifies with the refresh key");
    assert_eq!(refresh.sub, access.sub);
    assert_eq!(refresh.name, access.name);
}

#[tokio::test]
async fn test_tokens_do_not_cross_keys() {
    let app = TestApp::spawn().await;
    app.seed_user("alice", "correct-horse").await;

    let body: Value = app.login("alice", "correct-horse").await.json().await.unwrap();
    let access_token = body["data"]["accessToken"].as_str().unwrap();
    let refresh_token = body["data"]["refreshToken"].as_str().unwrap();

    assert!(app.tokens.validate_refresh_token(access_token).is_err());
    assert!(app.tokens.validate_access_token(refresh_token).is_err());

    // A refresh token is not a bearer credential
    let response = app
        .get_authenticated("/api/login/me", refresh_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // An access token cannot be exchanged
    let response = app
        .post_without_cookies("/api/login/refresh")
        .json(&json!({ "refreshToken": access_token }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_wrong_password_and_unknown_user_look_alike() {
    let app = TestApp::spawn().await;
    app.seed_user("alice", "correct-horse").await;

    let wrong_password = app.login("alice", "wrong").await;
    let unknown_user = app.login("mallory", "correct-horse").await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);

    let wrong_password: Value = wrong_password.json().await.unwrap();
    let unknown_user: Value = unknown_user.json().await.unwrap();
    assert_eq!(wrong_password, unknown_user);
    assert_eq!(wrong_password["data"]["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_login_trims_username_but_not_password() {
    let app = TestApp::spawn().await;
    app.seed_user("alice", "correct-horse").await;

    let response = app.login("  alice ", "correct-horse").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.login("alice", " correct-horse").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.login("Alice", "correct-horse").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_with_cookie() {
    let app = TestApp::spawn().await;
    let id = app.seed_user("alice", "correct-horse").await;

    let response = app.login("alice", "correct-horse").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .post("/api/login/refresh")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    let claims = app
        .tokens
        .validate_access_token(body["data"]["token"].as_str().unwrap())
        .expect("refreshed token is an access token");
    assert_eq!(claims.sub, id.to_string());
    assert_eq!(claims.name, "alice");
}

#[tokio::test]
async fn test_refresh_token_reusable_until_expiry() {
    let app = TestApp::spawn().await;
    app.seed_user("alice", "correct-horse").await;

    let body: Value = app.login("alice", "correct-horse").await.json().await.unwrap();
    let refresh_token = body["data"]["refreshToken"].as_str().unwrap().to_string();

    let mut issued = Vec::new();
    for _ in 0..2 {
        let response = app
            .post_without_cookies("/api/login/refresh")
            .json(&json!({ "refreshToken": refresh_token }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = response.json().await.unwrap();
        issued.push(body["data"]["token"].as_str().unwrap().to_string());
    }

    assert_ne!(issued[0], issued[1]);
}

#[tokio::test]
async fn test_refresh_after_user_deleted() {
    let app = TestApp::spawn().await;
    app.seed_user("alice", "correct-horse").await;

    let body: Value = app.login("alice", "correct-horse").await.json().await.unwrap();
    let refresh_token = body["data"]["refreshToken"].as_str().unwrap().to_string();

    sqlx::query("DELETE FROM users WHERE username = $1")
        .bind("alice")
        .execute(&app.db.pool)
        .await
        .expect("Failed to delete user");

    let response = app
        .post_without_cookies("/api/login/refresh")
        .json(&json!({ "refreshToken": refresh_token }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_after_username_reassigned() {
    let app = TestApp::spawn().await;
    app.seed_user("alice", "correct-horse").await;

    let body: Value = app.login("alice", "correct-horse").await.json().await.unwrap();
    let refresh_token = body["data"]["refreshToken"].as_str().unwrap().to_string();

    sqlx::query("DELETE FROM users WHERE username = $1")
        .bind("alice")
        .execute(&app.db.pool)
        .await
        .expect("Failed to delete user");
    app.seed_user("alice", "another-horse").await;

    let response = app
        .post_without_cookies("/api/login/refresh")
        .json(&json!({ "refreshToken": refresh_token }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_without_token() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/login/refresh")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_and_logout() {
    let app = TestApp::spawn().await;
    let id = app.seed_user("alice", "correct-horse").await;

    let body: Value = app.login("alice", "correct-horse").await.json().await.unwrap();
    let access_token = body["data"]["accessToken"].as_str().unwrap().to_string();

    let response = app
        .get_authenticated("/api/login/me", &access_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let me: Value = response.json().await.unwrap();
    assert_eq!(me["data"]["id"], id);
    assert_eq!(me["data"]["username"], "alice");

    let response = app
        .post_authenticated("/api/login/logout", &access_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Cookie is gone, so the cookie-only refresh now fails
    let response = app
        .post("/api/login/refresh")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // The access token itself stays valid until expiry
    let response = app
        .get_authenticated("/api/login/me", &access_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_signup_disabled_by_default() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/login/signup")
        .json(&json!({ "username": "bob", "password": "hunter22" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_signup_then_login() {
    let app = TestApp::spawn_with(AuthConfig {
        allow_signup: true,
        cookie_secure: false,
    })
    .await;

    let response = app
        .post("/api/login/signup")
        .json(&json!({ "username": "bob", "password": "hunter22" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["username"], "bob");
    assert!(app
        .tokens
        .validate_access_token(body["data"]["accessToken"].as_str().unwrap())
        .is_ok());

    let stored: (i32,) =
        sqlx::query_as("SELECT password_iterations FROM users WHERE username = 'bob'")
            .fetch_one(&app.db.pool)
            .await
            .expect("Failed to read user");
    assert!(stored.0 > 0);

    let response = app.login("bob", "hunter22").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .post("/api/login/signup")
        .json(&json!({ "username": "bob", "password": "hunter22" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
