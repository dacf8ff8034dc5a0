//! 链接管理与统计接口测试

mod common;

use actix_web::App;
use actix_web::http::StatusCode;
use actix_web::http::header::{AUTHORIZATION, USER_AGENT};
use actix_web::test::{self, TestRequest};
use chrono::Utc;
use serde_json::{Value, json};

use linklytics::api::configure_routes;
use linklytics::storage::User;

use common::{CHROME_DESKTOP, FIREFOX_LINUX, SAFARI_IPHONE, TestEnv, setup};

async fn user_token(env: &TestEnv, email: &str) -> (User, String) {
    let user = env
        .services
        .auth
        .create_user(email, "password-123")
        .await
        .unwrap();
    let token = env.services.jwt.generate_token(&user).unwrap();
    (user, format!("Bearer {}", token))
}

fn create_request(token: &str, body: Value) -> TestRequest {
    TestRequest::post()
        .uri("/api/links")
        .insert_header((AUTHORIZATION, token.to_string()))
        .set_json(body)
}

#[actix_rt::test]
async fn test_requires_bearer_token() {
    let env = setup().await;
    let services = env.services.clone();
    let app = test::init_service(App::new().configure(|cfg| configure_routes(cfg, &services))).await;

    let resp = test::call_service(&app, TestRequest::get().uri("/api/links").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1001);

    let req = TestRequest::get()
        .uri("/api/links")
        .insert_header((AUTHORIZATION, "Bearer not.a.token"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_create_link_returns_created_view() {
    let env = setup().await;
    let (user, token) = user_token(&env, "owner@example.com").await;
    let services = env.services.clone();
    let app = test::init_service(App::new().configure(|cfg| configure_routes(cfg, &services))).await;

    let req = create_request(
        &token,
        json!({ "originalUrl": "https://example.com", "customAlias": "demo1" }),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["shortCode"], "demo1");
    assert_eq!(body["shortUrl"], "https://sho.rt/demo1");
    assert_eq!(body["originalUrl"], "https://example.com");
    assert_eq!(body["ownerId"], user.id.as_str());
    assert_eq!(body["totalClicks"], 0);
    assert_eq!(body["isExpired"], false);
    assert!(body["expiresAt"].is_null());
    assert!(body["id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[actix_rt::test]
async fn test_create_link_expiration_formats() {
    let env = setup().await;
    let (_, token) = user_token(&env, "owner@example.com").await;
    let services = env.services.clone();
    let app = test::init_service(App::new().configure(|cfg| configure_routes(cfg, &services))).await;

    let req = create_request(
        &token,
        json!({ "originalUrl": "https://example.com/a", "expirationDays": "" }),
    )
    .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["expiresAt"].is_null());

    let req = create_request(
        &token,
        json!({ "originalUrl": "https://example.com/b", "expirationDays": "7" }),
    )
    .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let created: chrono::DateTime<Utc> = body["createdAt"].as_str().unwrap().parse().unwrap();
    let expires: chrono::DateTime<Utc> = body["expiresAt"].as_str().unwrap().parse().unwrap();
    assert_eq!(expires - created, chrono::Duration::days(7));

    let req = create_request(
        &token,
        json!({ "originalUrl": "https://example.com/c", "expirationDays": 5000 }),
    )
    .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_create_link_error_codes() {
    let env = setup().await;
    let (_, token) = user_token(&env, "owner@example.com").await;
    let services = env.services.clone();
    let app = test::init_service(App::new().configure(|cfg| configure_routes(cfg, &services))).await;

    let req = create_request(
        &token,
        json!({ "originalUrl": "https://example.com", "customAlias": "dup01" }),
    )
    .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = create_request(
        &token,
        json!({ "originalUrl": "https://example.com/2", "customAlias": "dup01" }),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 3001);

    let req = create_request(&token, json!({ "originalUrl": "javascript:alert(1)" })).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1000);

    let req = create_request(&token, json!({ "customAlias": "nourl" })).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_list_links_only_returns_own_links() {
    let env = setup().await;
    let (_, alice) = user_token(&env, "alice@example.com").await;
    let (_, bob) = user_token(&env, "bob@example.com").await;
    let services = env.services.clone();
    let app = test::init_service(App::new().configure(|cfg| configure_routes(cfg, &services))).await;

    for (token, alias) in [(&alice, "alice1"), (&alice, "alice2"), (&bob, "bob01")] {
        let req = create_request(
            token,
            json!({ "originalUrl": "https://example.com", "customAlias": alias }),
        )
        .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let resp = test::call_service(&app, TestRequest::get().uri("/alice1").to_request()).await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let req = TestRequest::get()
        .uri("/api/links")
        .insert_header((AUTHORIZATION, alice.clone()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 2);

    let alice1 = items.iter().find(|l| l["shortCode"] == "alice1").unwrap();
    let alice2 = items.iter().find(|l| l["shortCode"] == "alice2").unwrap();
    assert_eq!(alice1["totalClicks"], 1);
    assert_eq!(alice2["totalClicks"], 0);
    assert!(items.iter().all(|l| l["shortCode"] != "bob01"));
}

#[actix_rt::test]
async fn test_link_analytics_breakdown() {
    let env = setup().await;
    let (_, token) = user_token(&env, "owner@example.com").await;
    let services = env.services.clone();
    let app = test::init_service(App::new().configure(|cfg| configure_routes(cfg, &services))).await;

    let req = create_request(
        &token,
        json!({ "originalUrl": "https://example.com", "customAlias": "stats1" }),
    )
    .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let link_id = created["id"].as_str().unwrap().to_string();

    for ua in [CHROME_DESKTOP, CHROME_DESKTOP, SAFARI_IPHONE, FIREFOX_LINUX] {
        let req = TestRequest::get()
            .uri("/stats1")
            .insert_header((USER_AGENT, ua))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FOUND);
    }

    let req = TestRequest::get()
        .uri(&format!("/api/links/{}/analytics", link_id))
        .insert_header((AUTHORIZATION, token.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;

    assert_eq!(body["link"]["shortCode"], "stats1");
    assert_eq!(body["link"]["totalClicks"], 4);

    let analytics = &body["analytics"];
    assert_eq!(analytics["totalClicks"], 4);

    let today = Utc::now().format("%Y-%m-%d").to_string();
    assert_eq!(
        analytics["clicksByDate"],
        json!([{ "date": today, "count": 4 }])
    );
    assert_eq!(
        analytics["devices"],
        json!([
            { "device": "desktop", "count": 3 },
            { "device": "mobile", "count": 1 },
        ])
    );
    assert_eq!(
        analytics["browsers"],
        json!([
            { "browser": "chrome", "count": 2 },
            { "browser": "firefox", "count": 1 },
            { "browser": "safari", "count": 1 },
        ])
    );
}

#[actix_rt::test]
async fn test_link_analytics_range_and_ownership() {
    let env = setup().await;
    let (_, alice) = user_token(&env, "alice@example.com").await;
    let (_, bob) = user_token(&env, "bob@example.com").await;
    let services = env.services.clone();
    let app = test::init_service(App::new().configure(|cfg| configure_routes(cfg, &services))).await;

    let req = create_request(
        &alice,
        json!({ "originalUrl": "https://example.com", "customAlias": "range1" }),
    )
    .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let link_id = created["id"].as_str().unwrap().to_string();

    let resp = test::call_service(&app, TestRequest::get().uri("/range1").to_request()).await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    // 其他用户的链接与不存在一样
    let req = TestRequest::get()
        .uri(&format!("/api/links/{}/analytics", link_id))
        .insert_header((AUTHORIZATION, bob.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // 范围外：统计为空，但链接总点击数不变
    let req = TestRequest::get()
        .uri(&format!(
            "/api/links/{}/analytics?start=2000-01-01&end=2000-01-31",
            link_id
        ))
        .insert_header((AUTHORIZATION, alice.clone()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["analytics"]["totalClicks"], 0);
    assert_eq!(body["analytics"]["clicksByDate"], json!([]));
    assert_eq!(body["link"]["totalClicks"], 1);

    let req = TestRequest::get()
        .uri(&format!(
            "/api/links/{}/analytics?start=2024-02-01&end=2024-01-01",
            link_id
        ))
        .insert_header((AUTHORIZATION, alice.clone()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = TestRequest::get()
        .uri(&format!("/api/links/{}/analytics?start=yesterday", link_id))
        .insert_header((AUTHORIZATION, alice.clone()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}
