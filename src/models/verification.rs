use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

/// 验证码投递渠道
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMethod {
    Email,
    Sms,
}

impl DeliveryMethod {
    pub fn parse(method: &str) -> Result<Self, AppError> {
        match method {
            "email" => Ok(DeliveryMethod::Email),
            "sms" => Ok(DeliveryMethod::Sms),
            other => Err(AppError::UnsupportedMethod(other.to_string())),
        }
    }
}

impl std::fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryMethod::Email => write!(f, "email"),
            DeliveryMethod::Sms => write!(f, "sms"),
        }
    }
}

/// 待验证的注册数据，验证通过后据此创建用户
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationPayload {
    pub username: String,
    pub password: String,
    pub to: String,
}

/// 某个目标地址（邮箱或手机号）当前挂起的验证码，同一地址最多一条
#[derive(Debug, Clone)]
pub struct PendingVerification {
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub payload: RegistrationPayload,
}

impl PendingVerification {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SendCodeRequest {
    #[schema(example = "email")]
    pub method: Option<String>,
    #[schema(example = "a@x.com")]
    pub to: Option<String>,
    #[schema(example = "bob")]
    pub username: Option<String>,
    #[schema(example = "secret1")]
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerifyCodeRequest {
    #[schema(example = "a@x.com")]
    pub to: Option<String>,
    #[schema(example = "482913")]
    pub code: Option<String>,
}
