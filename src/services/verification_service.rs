use chrono::{Duration, Utc};

use crate::error::{AppError, AppResult};
use crate::external::DeliveryGateway;
use crate::models::*;
use crate::storage::{CodeStore, UserDirectory};
use crate::utils::generate_verification_code;

/// 验证码生命周期的编排：生成 → 存储 → 投递 → 校验 → 落盘用户。
///
/// 每个地址的状态机：无挂起 → 挂起（send）→ 验证成功/过期/取消后删除；
/// 码不匹配保留条目允许重试；重发覆盖旧条目并重置有效期。
#[derive(Clone)]
pub struct VerificationService {
    store: CodeStore,
    directory: UserDirectory,
    gateway: DeliveryGateway,
    code_ttl: Duration,
}

impl VerificationService {
    pub fn new(
        store: CodeStore,
        directory: UserDirectory,
        gateway: DeliveryGateway,
        code_ttl_secs: i64,
    ) -> Self {
        Self {
            store,
            directory,
            gateway,
            code_ttl: Duration::seconds(code_ttl_secs),
        }
    }

    pub async fn send_code(&self, request: SendCodeRequest) -> AppResult<()> {
        let method = request.method.as_deref().filter(|s| !s.is_empty());
        let to = request.to.as_deref().filter(|s| !s.is_empty());
        let (Some(method), Some(to)) = (method, to) else {
            return Err(AppError::ValidationError("method and to required".to_string()));
        };

        // 未知渠道在入库前拒绝
        let method = DeliveryMethod::parse(method)?;

        let payload = RegistrationPayload {
            username: request.username.unwrap_or_default(),
            password: request.password.unwrap_or_default(),
            to: to.to_string(),
        };

        // 先入库后投递：投递失败时条目保留，调用方重发即重新生成并覆盖
        let code = generate_verification_code();
        self.store.put(to, code.clone(), self.code_ttl, payload).await;

        self.gateway.deliver(method, to, &code).await?;

        log::info!("Verification code issued for {} via {}", to, method);
        Ok(())
    }

    pub async fn verify_code(&self, request: VerifyCodeRequest) -> AppResult<UserResponse> {
        let to = request.to.as_deref().filter(|s| !s.is_empty());
        let code = request.code.as_deref().filter(|s| !s.is_empty());
        let (Some(to), Some(code)) = (to, code) else {
            return Err(AppError::ValidationError("to and code required".to_string()));
        };

        let Some(entry) = self.store.get(to).await else {
            return Err(AppError::NoPendingCode);
        };

        if entry.is_expired(Utc::now()) {
            self.store.remove(to).await;
            return Err(AppError::CodeExpired);
        }

        if entry.code != code.trim() {
            // 条目保留，允许继续重试
            return Err(AppError::CodeMismatch);
        }

        let payload = entry.payload;
        if self
            .directory
            .find_by_username_or_email(&payload.username, to)
            .is_some()
        {
            // 注册失败也要消费掉验证码，防止重放
            self.store.remove(to).await;
            return Err(AppError::UserAlreadyExists);
        }

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            username: payload.username,
            email: to.to_string(),
            secret: payload.password,
        };
        self.directory.append(user.clone())?;
        self.store.remove(to).await;

        log::info!("User registered after verification: {}", user.username);
        Ok(user.into())
    }

    /// 无条件清除挂起条目，幂等
    pub async fn cancel_pending(&self, destination: &str) {
        self.store.remove(destination).await;
    }
}
