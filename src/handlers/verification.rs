use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::models::*;
use crate::services::VerificationService;

#[utoipa::path(
    post,
    path = "/api/send-code",
    tag = "verification",
    request_body = SendCodeRequest,
    responses(
        (status = 200, description = "验证码已发送"),
        (status = 400, description = "缺少字段或未知投递渠道"),
        (status = 500, description = "渠道未配置或发送失败")
    )
)]
pub async fn send_code(
    verification_service: web::Data<VerificationService>,
    request: web::Json<SendCodeRequest>,
) -> Result<HttpResponse> {
    match verification_service.send_code(request.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/verify-code",
    tag = "verification",
    request_body = VerifyCodeRequest,
    responses(
        (status = 200, description = "验证成功，用户已创建", body = UserResponse),
        (status = 400, description = "缺少字段、无挂起验证码、已过期、码错误或用户已存在"),
        (status = 500, description = "存储不可用")
    )
)]
pub async fn verify_code(
    verification_service: web::Data<VerificationService>,
    request: web::Json<VerifyCodeRequest>,
) -> Result<HttpResponse> {
    match verification_service.verify_code(request.into_inner()).await {
        Ok(user) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "user": user
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn verification_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/send-code", web::post().to(send_code))
            .route("/verify-code", web::post().to(verify_code)),
    );
}
