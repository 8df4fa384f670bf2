use crate::config::TwilioConfig;
use crate::error::{AppError, AppResult};
use reqwest::Client;

#[derive(Clone)]
pub struct TwilioService {
    client: Client,
    config: TwilioConfig,
}

impl TwilioService {
    pub fn new(config: TwilioConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub async fn send_verification_code(&self, phone: &str, code: &str) -> AppResult<()> {
        let url = format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            self.config.account_sid
        );

        let body = format!("Alu-Satu код подтверждения: {code}");

        let params = [
            ("To", phone),
            ("From", &self.config.from_phone),
            ("Body", &body),
        ];

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::DeliveryFailed(format!("SMS request failed: {e}")))?;

        if response.status().is_success() {
            log::info!("Verification code SMS sent successfully: {}", phone);
            Ok(())
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            log::error!(
                "Verification code SMS failed to send: {}, Error: {}",
                phone,
                error_text
            );
            Err(AppError::DeliveryFailed(format!(
                "SMS sending failed: {error_text}"
            )))
        }
    }
}
