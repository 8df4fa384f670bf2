use crate::config::SmtpConfig;
use crate::error::{AppError, AppResult};
use reqwest::Client;
use serde_json::json;

/// 通过 HTTP 邮件中转接口发送验证码邮件。
/// 中转端监听 smtp.host:smtp.port，凭据走 basic auth。
#[derive(Clone)]
pub struct MailerService {
    client: Client,
    config: SmtpConfig,
}

impl MailerService {
    pub fn new(config: SmtpConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub async fn send_verification_code(&self, email: &str, code: &str) -> AppResult<()> {
        let url = format!("https://{}:{}/send", self.config.host, self.config.port);

        let message = json!({
            "from": self.config.username,
            "to": email,
            "subject": "Alu-Satu: код подтверждения",
            "text": format!("Ваш код подтверждения: {code}"),
        });

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .json(&message)
            .send()
            .await
            .map_err(|e| AppError::DeliveryFailed(format!("Mail request failed: {e}")))?;

        if response.status().is_success() {
            log::info!("Verification code email sent successfully: {}", email);
            Ok(())
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            log::error!(
                "Verification code email failed to send: {}, Error: {}",
                email,
                error_text
            );
            Err(AppError::DeliveryFailed(format!(
                "Email sending failed: {error_text}"
            )))
        }
    }
}
