use crate::error::{AppError, AppResult};
use crate::models::DeliveryMethod;

use super::{MailerService, TwilioService};

/// 投递网关：按渠道分发，未配置的渠道直接报不可用。
/// 单次尝试，不重试；失败原样上抛由调用方决定是否重发。
#[derive(Clone)]
pub struct DeliveryGateway {
    mailer: Option<MailerService>,
    twilio: Option<TwilioService>,
}

impl DeliveryGateway {
    pub fn new(mailer: Option<MailerService>, twilio: Option<TwilioService>) -> Self {
        Self { mailer, twilio }
    }

    pub async fn deliver(
        &self,
        method: DeliveryMethod,
        destination: &str,
        code: &str,
    ) -> AppResult<()> {
        match method {
            DeliveryMethod::Email => match &self.mailer {
                Some(mailer) => mailer.send_verification_code(destination, code).await,
                None => Err(AppError::ChannelUnavailable(
                    "Email not configured on server".to_string(),
                )),
            },
            DeliveryMethod::Sms => match &self.twilio {
                Some(twilio) => twilio.send_verification_code(destination, code).await,
                None => Err(AppError::ChannelUnavailable(
                    "SMS not configured on server".to_string(),
                )),
            },
        }
    }
}
