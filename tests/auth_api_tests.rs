//! 登录接口测试

mod common;

use actix_web::App;
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::test::{self, TestRequest};
use serde_json::{Value, json};

use linklytics::api::configure_routes;
use linklytics::api::jwt::JwtService;

use common::{JWT_SECRET, setup};

fn login_request(email: &str, password: &str, peer: &str) -> TestRequest {
    TestRequest::post()
        .uri("/api/auth/login")
        .peer_addr(peer.parse().unwrap())
        .set_json(json!({ "email": email, "password": password }))
}

#[actix_rt::test]
async fn test_login_returns_token_for_valid_credentials() {
    let env = setup().await;
    let user = env
        .services
        .auth
        .create_user("Alice@Example.com", "correct-horse")
        .await
        .unwrap();
    let services = env.services.clone();
    let app = test::init_service(App::new().configure(|cfg| configure_routes(cfg, &services))).await;

    // 邮箱不区分大小写
    let resp = test::call_service(
        &app,
        login_request("ALICE@example.com", "correct-horse", "203.0.113.1:5000").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["id"], user.id.as_str());
    assert_eq!(body["user"]["email"], "alice@example.com");

    let token = body["token"].as_str().unwrap();
    let claims = JwtService::new(JWT_SECRET, 60).validate_token(token).unwrap();
    assert_eq!(claims.sub, user.id);

    // token 可直接访问受保护接口
    let req = TestRequest::get()
        .uri("/api/links")
        .insert_header((AUTHORIZATION, format!("Bearer {}", token)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_login_rejects_bad_credentials_uniformly() {
    let env = setup().await;
    env.services
        .auth
        .create_user("bob@example.com", "s3cret-pass")
        .await
        .unwrap();
    let services = env.services.clone();
    let app = test::init_service(App::new().configure(|cfg| configure_routes(cfg, &services))).await;

    let wrong_password = test::call_service(
        &app,
        login_request("bob@example.com", "not-the-password", "203.0.113.2:5000").to_request(),
    )
    .await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    let wrong_password: Value = test::read_body_json(wrong_password).await;

    let unknown_user = test::call_service(
        &app,
        login_request("nobody@example.com", "s3cret-pass", "203.0.113.3:5000").to_request(),
    )
    .await;
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
    let unknown_user: Value = test::read_body_json(unknown_user).await;

    assert_eq!(wrong_password["code"], 2000);
    assert_eq!(wrong_password, unknown_user);
}

#[actix_rt::test]
async fn test_login_validates_body() {
    let env = setup().await;
    let services = env.services.clone();
    let app = test::init_service(App::new().configure(|cfg| configure_routes(cfg, &services))).await;

    let resp = test::call_service(&app, login_request("", "", "203.0.113.4:5000").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = TestRequest::post()
        .uri("/api/auth/login")
        .peer_addr("203.0.113.5:5000".parse().unwrap())
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1000);
}

#[actix_rt::test]
async fn test_login_is_rate_limited_per_client() {
    let env = setup().await;
    let services = env.services.clone();
    let app = test::init_service(App::new().configure(|cfg| configure_routes(cfg, &services))).await;

    // 空凭据在密码校验前即被拒绝，但同样消耗限流配额
    for _ in 0..5 {
        let resp = test::call_service(
            &app,
            login_request("", "", "198.51.100.7:6000").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    let resp = test::call_service(
        &app,
        login_request("", "", "198.51.100.7:6001").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

    // 其他客户端不受影响
    let resp = test::call_service(
        &app,
        login_request("", "", "198.51.100.8:6000").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_login_rate_limit_is_shared_across_workers() {
    let env = setup().await;
    // 每个 worker 各自构建 App，但共享同一份 AppServices
    let first_services = env.services.clone();
    let first = test::init_service(
        App::new().configure(|cfg| configure_routes(cfg, &first_services)),
    )
    .await;
    let second_services = env.services.clone();
    let second = test::init_service(
        App::new().configure(|cfg| configure_routes(cfg, &second_services)),
    )
    .await;

    for _ in 0..3 {
        let resp =
            test::call_service(&first, login_request("", "", "192.0.2.44:7000").to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
    for _ in 0..2 {
        let resp =
            test::call_service(&second, login_request("", "", "192.0.2.44:7001").to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    let resp =
        test::call_service(&second, login_request("", "", "192.0.2.44:7002").to_request()).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
}
