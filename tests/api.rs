use actix_web::{App, test, web};
use serde_json::{Value, json};

use alusatu_backend::config::RateLimitConfig;
use alusatu_backend::external::DeliveryGateway;
use alusatu_backend::handlers;
use alusatu_backend::middlewares::RateLimiter;
use alusatu_backend::services::VerificationService;
use alusatu_backend::storage::{CodeStore, UserDirectory};

fn temp_users_file() -> std::path::PathBuf {
    std::env::temp_dir().join(format!("users-{}.json", uuid::Uuid::new_v4()))
}

/// 不配置投递渠道的服务实例；测试经由共享的 CodeStore 取得验证码
fn build_service(path: &std::path::Path) -> (VerificationService, CodeStore) {
    let store = CodeStore::new();
    let directory = UserDirectory::new(path);
    let gateway = DeliveryGateway::new(None, None);
    let service = VerificationService::new(store.clone(), directory, gateway, 600);
    (service, store)
}

#[actix_web::test]
async fn test_send_code_requires_method_and_to() {
    let path = temp_users_file();
    let (service, _store) = build_service(&path);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(service))
            .configure(handlers::verification_config),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/send-code")
        .set_json(json!({ "to": "a@x.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["code"], json!("VALIDATION_ERROR"));
}

#[actix_web::test]
async fn test_send_code_rejects_unknown_method() {
    let path = temp_users_file();
    let (service, _store) = build_service(&path);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(service))
            .configure(handlers::verification_config),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/send-code")
        .set_json(json!({ "method": "pigeon", "to": "a@x.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], json!("UNSUPPORTED_METHOD"));
}

#[actix_web::test]
async fn test_send_code_unconfigured_channel_is_500() {
    let path = temp_users_file();
    let (service, store) = build_service(&path);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(service))
            .configure(handlers::verification_config),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/send-code")
        .set_json(json!({
            "method": "email",
            "to": "a@x.com",
            "username": "bob",
            "password": "secret1"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 500);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], json!("CHANNEL_UNAVAILABLE"));

    // 投递失败不影响已入库的验证码
    assert!(store.get("a@x.com").await.is_some());
}

#[actix_web::test]
async fn test_verify_code_without_pending_entry() {
    let path = temp_users_file();
    let (service, _store) = build_service(&path);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(service))
            .configure(handlers::verification_config),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/verify-code")
        .set_json(json!({ "to": "a@x.com", "code": "000000" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], json!("NO_PENDING_CODE"));
}

#[actix_web::test]
async fn test_full_registration_flow() {
    let path = temp_users_file();
    let (service, store) = build_service(&path);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(service))
            .configure(handlers::verification_config),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/send-code")
        .set_json(json!({
            "method": "email",
            "to": "a@x.com",
            "username": "bob",
            "password": "secret1"
        }))
        .to_request();
    // 渠道未配置，投递报 500，但验证码已挂起
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 500);

    let code = store.get("a@x.com").await.unwrap().code;

    let req = test::TestRequest::post()
        .uri("/api/verify-code")
        .set_json(json!({ "to": "a@x.com", "code": code }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["user"]["username"], json!("bob"));
    assert_eq!(body["user"]["email"], json!("a@x.com"));
    assert!(body["user"]["id"].is_string());
    // 凭据绝不回显
    assert!(body["user"].get("secret").is_none());

    // 验证码一次性消费
    let req = test::TestRequest::post()
        .uri("/api/verify-code")
        .set_json(json!({ "to": "a@x.com", "code": code }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], json!("NO_PENDING_CODE"));

    let _ = std::fs::remove_file(path);
}

#[actix_web::test]
async fn test_rate_limiter_returns_429_per_client() {
    let path = temp_users_file();
    let (service, _store) = build_service(&path);
    let limiter = RateLimiter::new(&RateLimitConfig {
        max_requests: 3,
        window_secs: 60,
    });
    let app = test::init_service(
        App::new()
            .wrap(limiter)
            .app_data(web::Data::new(service))
            .configure(handlers::verification_config),
    )
    .await;

    for _ in 0..3 {
        let req = test::TestRequest::post()
            .uri("/api/verify-code")
            .insert_header(("X-Forwarded-For", "10.0.0.1"))
            .set_json(json!({ "to": "a@x.com", "code": "000000" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    // 同一客户端超出窗口配额
    let req = test::TestRequest::post()
        .uri("/api/verify-code")
        .insert_header(("X-Forwarded-For", "10.0.0.1"))
        .set_json(json!({ "to": "a@x.com", "code": "000000" }))
        .to_request();
    let result = test::try_call_service(&app, req).await;
    let err = result.expect_err("request over the limit must be rejected");
    assert_eq!(
        err.as_response_error().status_code(),
        actix_web::http::StatusCode::TOO_MANY_REQUESTS
    );

    // 其他客户端不受影响
    let req = test::TestRequest::post()
        .uri("/api/verify-code")
        .insert_header(("X-Forwarded-For", "10.0.0.2"))
        .set_json(json!({ "to": "a@x.com", "code": "000000" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}
