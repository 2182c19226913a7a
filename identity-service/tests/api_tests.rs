mod common;

use auth::SessionData;
use auth::TokenManager;
use auth::TokenSettings;
use common::TestApp;
use common::STUB_ACCESS_TOKEN;
use identity_service::session::models::ExternalProfile;
use reqwest::header;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_signup_success() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/signup")
        .json(&json!({
            "email": "a@b.com",
            "password": "secret123",
            "password2": "secret123"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    let access = body["accessToken"].as_str().unwrap();
    let refresh = body["refreshToken"].as_str().unwrap();
    assert!(!access.is_empty());
    assert!(!refresh.is_empty());
    assert_ne!(access, refresh);
    assert_eq!(access.split('.').count(), 3);
    assert_eq!(refresh.split('.').count(), 3);
}

#[tokio::test]
async fn test_signup_duplicate_email() {
    let app = TestApp::spawn().await;
    app.signup("a@b.com", "secret123").await;

    let response = app
        .post("/signup")
        .json(&json!({
            "email": "a@b.com",
            "password": "another123",
            "password2": "another123"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Invalid email or password");
    assert_eq!(app.store.user_count(), 1);
}

#[tokio::test]
async fn test_signup_password_mismatch() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/signup")
        .json(&json!({
            "email": "a@b.com",
            "password": "secret123",
            "password2": "secret124"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Passwords do not match");
    assert_eq!(app.store.user_count(), 0);
}

#[tokio::test]
async fn test_signup_malformed_body() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/signup")
        .header(header::CONTENT_TYPE, "application/json")
        .body(r#"{"email": "a@b.com""#)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::spawn().await;
    let signup = app.signup("a@b.com", "secret123").await;

    let response = app
        .post("/login")
        .json(&json!({
            "email": "a@b.com",
            "password": "secret123"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    let access = body["accessToken"].as_str().unwrap();
    assert_ne!(access, signup["accessToken"].as_str().unwrap());

    let me: serde_json::Value = app
        .get_authenticated("/me", access)
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(me, json!({ "id": 1 }));
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::spawn().await;
    app.signup("a@b.com", "secret123").await;

    let response = app
        .post("/login")
        .json(&json!({
            "email": "a@b.com",
            "password": "wrong-password"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body,
        json!({ "message": "Invalid email or password", "status": 401 })
    );
}

#[tokio::test]
async fn test_login_unknown_email_matches_wrong_password() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/login")
        .json(&json!({
            "email": "nobody@b.com",
            "password": "secret123"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body,
        json!({ "message": "Invalid email or password", "status": 401 })
    );
}

#[tokio::test]
async fn test_me_requires_access_token() {
    let app = TestApp::spawn().await;
    let tokens = app.signup("a@b.com", "secret123").await;
    let refresh = tokens["refreshToken"].as_str().unwrap();

    let session = SessionData::new(1, "user");
    let expired = TokenManager::new(TokenSettings {
        access_lifetime: chrono::Duration::seconds(-120),
        ..common::token_settings()
    })
    .encode_access(&session)
    .unwrap();
    let wrong_secret = TokenManager::new(TokenSettings {
        access_secret: "some-other-access-secret-32-bytes-long".to_string(),
        ..common::token_settings()
    })
    .encode_access(&session)
    .unwrap();

    let missing = app.get("/me").send().await.unwrap();
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let cases = [
        ("no bearer prefix", tokens["accessToken"].as_str().unwrap().to_string()),
        ("malformed", "Bearer not-a-token".to_string()),
        ("expired", format!("Bearer {}", expired)),
        ("wrong secret", format!("Bearer {}", wrong_secret)),
        ("refresh token", format!("Bearer {}", refresh)),
    ];

    for (case, authorization) in cases {
        let response = app
            .get("/me")
            .header(header::AUTHORIZATION, authorization)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", case);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["status"], 401, "{}", case);
        assert!(body.get("id").is_none(), "{}", case);
    }
}

#[tokio::test]
async fn test_refresh_rotates_tokens() {
    let app = TestApp::spawn().await;
    let tokens = app.signup("a@b.com", "secret123").await;
    let original = tokens["refreshToken"].as_str().unwrap();

    let first: serde_json::Value = app
        .post_authenticated("/refresh", original)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let second: serde_json::Value = app
        .post_authenticated("/refresh", original)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let first_refresh = first["refreshToken"].as_str().unwrap();
    let second_refresh = second["refreshToken"].as_str().unwrap();
    assert_ne!(first_refresh, second_refresh);
    assert_ne!(first_refresh, original);
    assert_ne!(second_refresh, original);

    let me = app
        .get_authenticated("/me", first["accessToken"].as_str().unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!(me.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_rejects_access_token_and_missing_header() {
    let app = TestApp::spawn().await;
    let tokens = app.signup("a@b.com", "secret123").await;

    let with_access = app
        .post_authenticated("/refresh", tokens["accessToken"].as_str().unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!(with_access.status(), StatusCode::UNAUTHORIZED);

    let without_header = app.post("/refresh").send().await.unwrap();
    assert_eq!(without_header.status(), StatusCode::UNAUTHORIZED);
}

/// Start a round trip and return (state, cookie header) for the callback.
async fn begin_round_trip(app: &TestApp) -> (String, String) {
    let response = app.get("/oauth/google").send().await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);

    let cookies: Vec<_> = response.cookies().collect();
    let state_cookie = cookies.iter().find(|c| c.name() == "oauth_state").unwrap();
    let verifier_cookie = cookies.iter().find(|c| c.name() == "oauth_verifier").unwrap();
    assert!(state_cookie.http_only());
    assert!(state_cookie.same_site_lax());
    assert_eq!(state_cookie.path(), Some("/oauth"));
    assert_eq!(state_cookie.max_age(), Some(std::time::Duration::from_secs(300)));

    let location = response.headers()[header::LOCATION].to_str().unwrap();
    let url = reqwest::Url::parse(location).unwrap();
    let state = url
        .query_pairs()
        .find(|(key, _)| key == "state")
        .map(|(_, value)| value.into_owned())
        .unwrap();
    assert_eq!(state, state_cookie.value());
    assert!(!location.contains(verifier_cookie.value()));

    let cookie_header = format!(
        "oauth_state={}; oauth_verifier={}",
        state_cookie.value(),
        verifier_cookie.value()
    );
    (state, cookie_header)
}

#[tokio::test]
async fn test_oauth_new_user_then_linked_login() {
    let app = TestApp::spawn().await;

    let (state, cookie_header) = begin_round_trip(&app).await;
    let response = app
        .get(&format!("/oauth/google/callback?code=valid-code&state={}", state))
        .header(header::COOKIE, &cookie_header)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cleared: Vec<_> = response
        .cookies()
        .filter(|c| c.name().starts_with("oauth_") && c.value().is_empty())
        .collect();
    assert_eq!(cleared.len(), 2);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["email"], "jane@example.com");
    assert_eq!(body["user"]["role"], "user");
    assert_eq!(body["token"]["accessToken"], STUB_ACCESS_TOKEN);
    assert_eq!(body["token"]["expiresIn"], 3599);
    let user_id = body["user"]["id"].as_i64().unwrap();

    let me: serde_json::Value = app
        .get_authenticated("/me", body["jwt"]["accessToken"].as_str().unwrap())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(me["id"], user_id);

    // Same identity again takes the linked path
    let (state, cookie_header) = begin_round_trip(&app).await;
    let response = app
        .get(&format!("/oauth/google/callback?code=valid-code&state={}", state))
        .header(header::COOKIE, &cookie_header)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["user"]["id"].as_i64().unwrap(), user_id);
    assert_eq!(app.store.user_count(), 1);
    assert_eq!(app.store.accounts().len(), 1);
    assert_eq!(app.provider.exchanges(), 2);
}

#[tokio::test]
async fn test_oauth_state_rejected_before_exchange() {
    let app = TestApp::spawn().await;
    let (state, cookie_header) = begin_round_trip(&app).await;

    let mismatched = app
        .get("/oauth/google/callback?code=valid-code&state=forged-state")
        .header(header::COOKIE, &cookie_header)
        .send()
        .await
        .unwrap();
    assert_eq!(mismatched.status(), StatusCode::BAD_REQUEST);

    let missing_query = app
        .get("/oauth/google/callback?code=valid-code")
        .header(header::COOKIE, &cookie_header)
        .send()
        .await
        .unwrap();
    assert_eq!(missing_query.status(), StatusCode::BAD_REQUEST);

    let missing_cookie = app
        .get(&format!("/oauth/google/callback?code=valid-code&state={}", state))
        .send()
        .await
        .unwrap();
    assert_eq!(missing_cookie.status(), StatusCode::BAD_REQUEST);

    let missing_verifier = app
        .get(&format!("/oauth/google/callback?code=valid-code&state={}", state))
        .header(header::COOKIE, format!("oauth_state={}", state))
        .send()
        .await
        .unwrap();
    assert_eq!(missing_verifier.status(), StatusCode::BAD_REQUEST);

    assert_eq!(app.provider.exchanges(), 0);
    assert_eq!(app.store.user_count(), 0);
}

#[tokio::test]
async fn test_oauth_does_not_link_existing_password_user() {
    let app = TestApp::spawn().await;
    app.signup("jane@example.com", "secret123").await;

    let (state, cookie_header) = begin_round_trip(&app).await;
    let response = app
        .get(&format!("/oauth/google/callback?code=valid-code&state={}", state))
        .header(header::COOKIE, &cookie_header)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(app.store.accounts().is_empty());
    assert_eq!(app.store.user_count(), 1);
}

#[tokio::test]
async fn test_oauth_account_conflict_leaves_no_user() {
    let app = TestApp::spawn().await;

    let (state, cookie_header) = begin_round_trip(&app).await;
    let first = app
        .get(&format!("/oauth/google/callback?code=valid-code&state={}", state))
        .header(header::COOKIE, &cookie_header)
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    // Same subject under a new email: the user insert succeeds, the account insert conflicts
    app.provider.set_profile(ExternalProfile {
        subject: "stub-subject-1".to_string(),
        email: Some("renamed@example.com".to_string()),
        email_verified: true,
    });

    let (state, cookie_header) = begin_round_trip(&app).await;
    let response = app
        .get(&format!("/oauth/google/callback?code=valid-code&state={}", state))
        .header(header::COOKIE, &cookie_header)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(app.store.user_count(), 1);
    assert_eq!(app.store.accounts().len(), 1);
}

#[tokio::test]
async fn test_oauth_unverified_email_rejected() {
    let app = TestApp::spawn().await;
    app.provider.set_profile(ExternalProfile {
        subject: "stub-subject-2".to_string(),
        email: Some("mallory@example.com".to_string()),
        email_verified: false,
    });

    let (state, cookie_header) = begin_round_trip(&app).await;
    let response = app
        .get(&format!("/oauth/google/callback?code=valid-code&state={}", state))
        .header(header::COOKIE, &cookie_header)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(app.store.user_count(), 0);
}

#[tokio::test]
async fn test_oauth_provider_failure_is_opaque() {
    let app = TestApp::spawn().await;

    let (state, cookie_header) = begin_round_trip(&app).await;
    let response = app
        .get(&format!("/oauth/google/callback?code=expired-code&state={}", state))
        .header(header::COOKIE, &cookie_header)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "message": "Internal Server Error", "status": 500 })
    );
}

#[tokio::test]
async fn test_oauth_unknown_provider() {
    let app = TestApp::spawn().await;

    let response = app.get("/oauth/github").send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let callback = app
        .get("/oauth/github/callback?code=valid-code&state=s")
        .header(header::COOKIE, "oauth_state=s; oauth_verifier=v")
        .send()
        .await
        .unwrap();
    assert_eq!(callback.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_request_id_header() {
    let app = TestApp::spawn().await;

    let generated = app.get("/me").send().await.unwrap();
    let id = generated.headers()["x-request-id"].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());

    let echoed = app
        .get("/me")
        .header("x-request-id", "client-supplied-id")
        .send()
        .await
        .unwrap();
    assert_eq!(echoed.headers()["x-request-id"], "client-supplied-id");
}
