use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use alusatu_backend::{
    config::Config,
    external::{DeliveryGateway, MailerService, TwilioService},
    handlers,
    middlewares::{RateLimiter, create_cors},
    services::VerificationService,
    storage::{CodeStore, UserDirectory},
    swagger::swagger_config,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml().expect("Failed to load configuration file");

    // 创建投递渠道，未配置的渠道保持禁用
    let mailer = config.smtp.clone().map(MailerService::new);
    let twilio = config.twilio.clone().map(TwilioService::new);
    if mailer.is_none() {
        log::warn!("Email channel disabled: SMTP not configured");
    }
    if twilio.is_none() {
        log::warn!("SMS channel disabled: Twilio not configured");
    }
    let gateway = DeliveryGateway::new(mailer, twilio);

    // 创建存储与核心服务
    let code_store = CodeStore::new();
    let user_directory = UserDirectory::new(&config.verification.users_file);
    let verification_service = VerificationService::new(
        code_store,
        user_directory,
        gateway,
        config.verification.code_ttl,
    );

    // 限流计数表在所有 worker 间共享
    let rate_limiter = RateLimiter::new(&config.rate_limit);

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .wrap(rate_limiter.clone())
            .app_data(web::Data::new(verification_service.clone()))
            .configure(swagger_config)
            .configure(handlers::verification_config)
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
