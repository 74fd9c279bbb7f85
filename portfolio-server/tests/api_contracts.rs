//! Router-level contract tests over the in-process store.

mod support;

use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, StatusCode};
use portfolio_core::models::User;
use portfolio_core::Document;
use portfolio_server::auth::Auth;
use portfolio_server::db::{ConnectionCache, Connector, Filter, StoreError, StoreHandle};
use portfolio_server::ServerConfig;
use serde_json::{json, Value};
use support::{TestApp, ADMIN_EMAIL, ADMIN_PASSWORD};

/// Never finishes connecting within any test's time budget
struct StalledConnector;

#[async_trait]
impl Connector for StalledConnector {
    async fn connect(&self, uri: &str) -> Result<StoreHandle, StoreError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Err(StoreError::Connection(format!("{uri} never answered")))
    }
}

async fn submit_message(app: &TestApp, subject: &str) -> String {
    let response = app
        .post(
            "/api/messages",
            json!({"name": "V", "email": "v@example.com", "subject": subject, "message": "Hello"}),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    response.data()["_id"].as_str().unwrap().to_string()
}

fn subjects(response: &support::TestResponse) -> Vec<String> {
    let mut out: Vec<String> = response
        .data()
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["subject"].as_str().unwrap().to_string())
        .collect();
    out.sort();
    out
}

fn project(title: &str, order: i64) -> Value {
    json!({
        "title": title,
        "description": "A thing I built",
        "type": "Web",
        "technologies": ["Rust"],
        "status": "Published",
        "order": order
    })
}

#[tokio::test]
async fn health_reports_local_memory_store() {
    let app = TestApp::new();
    let response = app.get("/api/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.data()["status"], "ok");
    assert_eq!(response.data()["target"], "local");
    assert_eq!(response.data()["backend"], "memory");
}

#[tokio::test]
async fn writes_require_a_session() {
    let app = TestApp::new();

    let response = app.post("/api/projects", project("Site", 0), None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["success"], false);

    let response = app
        .post("/api/projects", project("Site", 0), Some("portfolio_session=bogus"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app.get("/api/messages", None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn project_lifecycle() {
    let app = TestApp::new();
    let cookie = app.login_admin().await;

    let created = app
        .post("/api/projects", project("Portfolio", 1), Some(&cookie))
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.data()["_id"].as_str().unwrap().to_string();
    let created_at = created.data()["createdAt"].clone();

    let fetched = app.get(&format!("/api/projects/{id}"), None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.data()["title"], "Portfolio");

    let updated = app
        .put(
            &format!("/api/projects/{id}"),
            json!({"title": "Portfolio v2", "featured": true, "createdAt": "2000-01-01T00:00:00.000Z"}),
            Some(&cookie),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.data()["title"], "Portfolio v2");
    assert_eq!(updated.data()["featured"], true);
    assert_eq!(updated.data()["description"], "A thing I built");
    assert_eq!(updated.data()["createdAt"], created_at);

    let deleted = app.delete(&format!("/api/projects/{id}"), Some(&cookie)).await;
    assert_eq!(deleted.status, StatusCode::OK);

    let missing = app.get(&format!("/api/projects/{id}"), None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.error(), "Project not found");
}

#[tokio::test]
async fn project_list_filters_and_orders() {
    let app = TestApp::new();
    let cookie = app.login_admin().await;
    app.post("/api/projects", project("Second", 2), Some(&cookie)).await;
    app.post("/api/projects", project("First", 1), Some(&cookie)).await;
    let mut draft = project("Draft", 0);
    draft["status"] = json!("Draft");
    app.post("/api/projects", draft, Some(&cookie)).await;

    let published = app.get("/api/projects?status=Published", None).await;
    let titles: Vec<_> = published
        .data()
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["First", "Second"]);

    let bad = app.get("/api/projects?status=Unknown", None).await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_input_is_a_400_envelope() {
    let app = TestApp::new();
    let cookie = app.login_admin().await;

    let blank = app.post("/api/projects", project("  ", 0), Some(&cookie)).await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);
    assert_eq!(blank.error(), "title is required");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/projects")
        .header(CONTENT_TYPE, "application/json")
        .header("cookie", &cookie)
        .body(Body::from("{not json"))
        .unwrap();
    let malformed = app.send_request(request).await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
    assert_eq!(malformed.body["success"], false);

    let bad_id = app.get("/api/projects/not-a-uuid", None).await;
    assert_eq!(bad_id.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_id.error(), "Invalid id");
}

#[tokio::test]
async fn current_role_cannot_have_end_date() {
    let app = TestApp::new();
    let cookie = app.login_admin().await;

    let response = app
        .post(
            "/api/experiences",
            json!({
                "title": "Engineer",
                "company": "Acme",
                "startDate": "2020-01-01",
                "endDate": "2022-01-01",
                "current": true
            }),
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "endDate must be empty when current is true");
}

#[tokio::test]
async fn experiences_sorted_by_start_date_desc() {
    let app = TestApp::new();
    let cookie = app.login_admin().await;
    for (title, start) in [("Old", "2015-03-01"), ("New", "2021-06-01"), ("Mid", "2018-01-01")] {
        let response = app
            .post(
                "/api/experiences",
                json!({"title": title, "company": "Acme", "startDate": start}),
                Some(&cookie),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    let list = app.get("/api/experiences", None).await;
    let titles: Vec<_> = list
        .data()
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["New", "Mid", "Old"]);
}

#[tokio::test]
async fn social_link_order_defaults_to_max_plus_one() {
    let app = TestApp::new();
    let cookie = app.login_admin().await;

    let first = app
        .post(
            "/api/social-links",
            json!({"platform": "GitHub", "url": "https://github.com/ada"}),
            Some(&cookie),
        )
        .await;
    assert_eq!(first.status, StatusCode::CREATED);
    assert_eq!(first.data()["order"], 1);

    app.post(
        "/api/social-links",
        json!({"platform": "Mastodon", "url": "https://hachyderm.io/@ada", "order": 5}),
        Some(&cookie),
    )
    .await;
    let next = app
        .post(
            "/api/social-links",
            json!({"platform": "LinkedIn", "url": "https://linkedin.com/in/ada"}),
            Some(&cookie),
        )
        .await;
    assert_eq!(next.data()["order"], 6);

    let listed = app.get("/api/social-links", None).await;
    let orders: Vec<_> = listed
        .data()
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["order"].as_i64().unwrap())
        .collect();
    assert_eq!(orders, vec![1, 5, 6]);
}

#[tokio::test]
async fn clear_all_archives_exactly_the_unarchived() {
    let app = TestApp::new();
    let cookie = app.login_admin().await;

    let mut ids = Vec::new();
    for subject in ["one", "two", "three"] {
        let response = app
            .post(
                "/api/messages",
                json!({
                    "name": "Visitor",
                    "email": "visitor@example.com",
                    "subject": subject,
                    "message": "Hello!"
                }),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        ids.push(response.data()["_id"].as_str().unwrap().to_string());
    }

    let archived = app
        .put(&format!("/api/messages/{}", ids[0]), json!({"archived": true}), Some(&cookie))
        .await;
    assert_eq!(archived.status, StatusCode::OK);
    assert_eq!(archived.data()["read"], false);

    let cleared = app.post("/api/messages/clear-all", json!({}), Some(&cookie)).await;
    assert_eq!(cleared.status, StatusCode::OK);
    assert_eq!(cleared.data()["modifiedCount"], 2);

    let all = app.get("/api/messages", Some(&cookie)).await;
    for message in all.data().as_array().unwrap() {
        assert_eq!(message["archived"], true);
        let expect_read = message["_id"] != json!(ids[0]);
        assert_eq!(message["read"], expect_read);
    }

    let again = app.post("/api/messages/clear-all", json!({}), Some(&cookie)).await;
    assert_eq!(again.data()["modifiedCount"], 0);
}

#[tokio::test]
async fn reply_marks_message_replied() {
    let app = TestApp::new();
    let cookie = app.login_admin().await;
    let created = app
        .post(
            "/api/messages",
            json!({"name": "V", "email": "v@example.com", "subject": "Hi", "message": "Hello"}),
            None,
        )
        .await;
    let id = created.data()["_id"].as_str().unwrap().to_string();

    let replied = app
        .post(
            &format!("/api/messages/{id}/reply"),
            json!({"message": "Thanks for reaching out"}),
            Some(&cookie),
        )
        .await;
    assert_eq!(replied.status, StatusCode::OK);
    assert_eq!(replied.data()["replied"], true);
    assert_eq!(replied.data()["read"], true);
    assert_eq!(replied.data()["replies"].as_array().unwrap().len(), 1);

    let unread = app.get("/api/messages?read=false", Some(&cookie)).await;
    assert!(unread.data().as_array().unwrap().is_empty());
}

#[tokio::test]
async fn delete_account_requires_the_code() {
    let app = TestApp::new();
    let cookie = app.login_admin().await;
    let store = app.store().await;
    let all = Filter::all();
    let admins = || store.count(User::COLLECTION, &all);

    let wrong = app
        .post("/api/auth/delete-account", json!({"otpCode": "000000"}), Some(&cookie))
        .await;
    assert_eq!(wrong.status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong.error(), "Invalid verification code");
    assert_eq!(admins().await.unwrap(), 1);

    let right = app
        .post("/api/auth/delete-account", json!({"otpCode": "123456"}), Some(&cookie))
        .await;
    assert_eq!(right.status, StatusCode::OK);
    assert_eq!(admins().await.unwrap(), 0);
    let cleared = right.set_cookie().unwrap();
    assert!(cleared.starts_with("portfolio_session=;"));
    assert!(cleared.contains("Max-Age=0"));

    let me = app.get("/api/auth/me", Some(&cookie)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_put_upserts_one_document() {
    let app = TestApp::new();
    let cookie = app.login_admin().await;

    let first = app
        .put("/api/profile", json!({"name": "Ada Lovelace"}), Some(&cookie))
        .await;
    assert_eq!(first.status, StatusCode::OK);
    let second = app
        .put("/api/profile", json!({"title": "Engineer"}), Some(&cookie))
        .await;
    assert_eq!(second.status, StatusCode::OK);

    assert_eq!(first.data()["_id"], second.data()["_id"]);
    assert_eq!(second.data()["name"], "Ada Lovelace");
    assert_eq!(second.data()["title"], "Engineer");

    let read = app.get("/api/profile", None).await;
    assert_eq!(read.data()["_id"], first.data()["_id"]);
}

#[tokio::test]
async fn profile_is_created_on_first_read() {
    let app = TestApp::new();
    let first = app.get("/api/profile", None).await;
    let second = app.get("/api/profile", None).await;

    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.data()["_id"], second.data()["_id"]);
    assert_eq!(first.data()["key"], "primary");
}

#[tokio::test]
async fn content_sections_upsert_and_lookup() {
    let app = TestApp::new();
    let cookie = app.login_admin().await;

    let saved = app
        .post(
            "/api/content",
            json!({"section": "hero", "data": {"headline": "Hi, I'm Ada"}}),
            Some(&cookie),
        )
        .await;
    assert_eq!(saved.status, StatusCode::OK);

    let hero = app.get("/api/content?section=hero", None).await;
    assert_eq!(hero.data()["data"]["headline"], "Hi, I'm Ada");

    let about = app.get("/api/content?section=about", None).await;
    assert_eq!(about.status, StatusCode::NOT_FOUND);

    let all = app.get("/api/content", None).await;
    assert_eq!(all.data().as_array().unwrap().len(), 1);

    let not_object = app
        .post("/api/content", json!({"section": "footer", "data": 3}), Some(&cookie))
        .await;
    assert_eq!(not_object.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_logout_and_me() {
    let app = TestApp::new();
    let cookie = app.login_admin().await;

    let me = app.get("/api/auth/me", Some(&cookie)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.data()["email"], ADMIN_EMAIL);
    assert!(me.data().get("passwordHash").is_none());

    let bad = app
        .post(
            "/api/auth/login",
            json!({"email": ADMIN_EMAIL, "password": "wrong-password"}),
            None,
        )
        .await;
    assert_eq!(bad.status, StatusCode::UNAUTHORIZED);
    assert_eq!(bad.error(), "Invalid email or password");

    let out = app.post("/api/auth/logout", json!({}), Some(&cookie)).await;
    assert_eq!(out.status, StatusCode::OK);
    assert!(out.set_cookie().unwrap().contains("Max-Age=0"));

    let me = app.get("/api/auth/me", Some(&cookie)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn forgot_password_answer_does_not_reveal_accounts() {
    let app = TestApp::new();
    app.login_admin().await;

    let known = app
        .post("/api/auth/forgot-password", json!({"email": ADMIN_EMAIL}), None)
        .await;
    let unknown = app
        .post("/api/auth/forgot-password", json!({"email": "ghost@example.com"}), None)
        .await;
    assert_eq!(known.status, StatusCode::OK);
    assert_eq!(known.body, unknown.body);

    let reset = app
        .post(
            "/api/auth/reset-password",
            json!({"token": "deadbeef", "password": "new-password-1"}),
            None,
        )
        .await;
    assert_eq!(reset.status, StatusCode::BAD_REQUEST);
    assert_eq!(reset.error(), "Invalid or expired reset token");
}

#[tokio::test(start_paused = true)]
async fn slow_database_answers_with_timeout_envelope() {
    let cache = ConnectionCache::new(StalledConnector, "mongodb://stalled", None);
    let config = ServerConfig {
        request_timeout: Duration::from_secs(1),
        ..ServerConfig::default()
    };
    let app = TestApp::with_cache(cache, &config);

    let response = app.get("/api/health", None).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.error(), "Request timed out");
}

#[tokio::test]
async fn reset_password_replaces_credentials() {
    let app = TestApp::new();
    let cookie = app.login_admin().await;
    let store = app.store().await;
    let token = Auth::new(store.as_ref(), &app.state.auth)
        .issue_reset_token(ADMIN_EMAIL)
        .await
        .unwrap()
        .unwrap();

    let reset = app
        .post(
            "/api/auth/reset-password",
            json!({"token": token, "password": "fresh-password-9"}),
            None,
        )
        .await;
    assert_eq!(reset.status, StatusCode::OK);
    assert_eq!(reset.body["success"], true);

    // Existing sessions are closed
    let me = app.get("/api/auth/me", Some(&cookie)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);

    let old = app
        .post(
            "/api/auth/login",
            json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD}),
            None,
        )
        .await;
    assert_eq!(old.status, StatusCode::UNAUTHORIZED);
    let new = app
        .post(
            "/api/auth/login",
            json!({"email": ADMIN_EMAIL, "password": "fresh-password-9"}),
            None,
        )
        .await;
    assert_eq!(new.status, StatusCode::OK);

    let reused = app
        .post(
            "/api/auth/reset-password",
            json!({"token": token, "password": "another-password-9"}),
            None,
        )
        .await;
    assert_eq!(reused.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn message_list_filters_by_flags() {
    let app = TestApp::new();
    let cookie = app.login_admin().await;
    let starred = submit_message(&app, "starred").await;
    let archived = submit_message(&app, "archived").await;
    let read = submit_message(&app, "read").await;

    for (id, flags) in [
        (&starred, json!({"starred": true})),
        (&archived, json!({"archived": true})),
        (&read, json!({"read": true})),
    ] {
        let response = app
            .put(&format!("/api/messages/{id}"), flags, Some(&cookie))
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let only_starred = app.get("/api/messages?starred=true", Some(&cookie)).await;
    assert_eq!(subjects(&only_starred), vec!["starred"]);

    let inbox = app.get("/api/messages?archived=false", Some(&cookie)).await;
    assert_eq!(subjects(&inbox), vec!["read", "starred"]);

    let unread_inbox = app
        .get("/api/messages?read=false&archived=false", Some(&cookie))
        .await;
    assert_eq!(subjects(&unread_inbox), vec!["starred"]);

    let bad = app.get("/api/messages?read=maybe", Some(&cookie)).await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn education_by_id_routes() {
    let app = TestApp::new();
    let cookie = app.login_admin().await;

    let created = app
        .post(
            "/api/education",
            json!({"degree": "BSc", "institution": "Uni", "startDate": "2010-09-01", "endDate": "2013-06-30"}),
            Some(&cookie),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.data()["_id"].as_str().unwrap().to_string();
    let uri = format!("/api/education/{id}");

    let fetched = app.get(&uri, None).await;
    assert_eq!(fetched.data()["institution"], "Uni");

    let updated = app
        .put(&uri, json!({"degree": "MSc", "grade": "Distinction"}), Some(&cookie))
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.data()["degree"], "MSc");
    assert_eq!(updated.data()["grade"], "Distinction");

    let contradictory = app
        .put(&uri, json!({"current": true}), Some(&cookie))
        .await;
    assert_eq!(contradictory.status, StatusCode::BAD_REQUEST);

    let unauthenticated = app.delete(&uri, None).await;
    assert_eq!(unauthenticated.status, StatusCode::UNAUTHORIZED);

    let deleted = app.delete(&uri, Some(&cookie)).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(app.get(&uri, None).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn social_link_by_id_routes() {
    let app = TestApp::new();
    let cookie = app.login_admin().await;

    let created = app
        .post(
            "/api/social-links",
            json!({"platform": "GitHub", "url": "https://github.com/ada"}),
            Some(&cookie),
        )
        .await;
    let id = created.data()["_id"].as_str().unwrap().to_string();
    let uri = format!("/api/social-links/{id}");

    assert_eq!(app.get(&uri, None).await.data()["platform"], "GitHub");

    let hidden = app.put(&uri, json!({"isActive": false}), Some(&cookie)).await;
    assert_eq!(hidden.status, StatusCode::OK);
    let active = app.get("/api/social-links?active=true", None).await;
    assert!(active.data().as_array().unwrap().is_empty());

    let deleted = app.delete(&uri, Some(&cookie)).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(app.get(&uri, None).await.status, StatusCode::NOT_FOUND);
}
