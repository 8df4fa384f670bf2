use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::verification::send_code,
        handlers::verification::verify_code,
    ),
    components(
        schemas(
            SendCodeRequest,
            VerifyCodeRequest,
            User,
            UserResponse,
            ApiError,
        )
    ),
    tags(
        (name = "verification", description = "Verification code API"),
    ),
    info(
        title = "Alu-Satu Backend API",
        version = "1.0.0",
        description = "Alu-Satu verification helper REST API documentation",
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
