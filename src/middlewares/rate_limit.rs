use std::{
    collections::HashMap,
    future::{Ready, ready},
    rc::Rc,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use actix_web::{
    Error,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorTooManyRequests,
};
use futures_util::future::LocalBoxFuture;
use serde_json::json;

use crate::config::RateLimitConfig;

/// 全端点统一的进程内限流：每个客户端 IP 在固定窗口内最多 N 次请求。
/// 单进程演示规模，无需外部存储；窗口到期即重置计数。
/// 克隆的实例共享同一张计数表，跨 worker 生效。
#[derive(Clone)]
pub struct RateLimiter {
    windows: Arc<Mutex<HashMap<String, ClientWindow>>>,
    max_requests: u32,
    window: Duration,
}

#[derive(Debug, Clone, Copy)]
struct ClientWindow {
    started_at: Instant,
    count: u32,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            windows: Arc::new(Mutex::new(HashMap::new())),
            max_requests: config.max_requests,
            window: Duration::from_secs(config.window_secs.max(1) as u64),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimiter
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimiterMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimiterMiddleware {
            service: Rc::new(service),
            windows: self.windows.clone(),
            max_requests: self.max_requests,
            window: self.window,
        }))
    }
}

pub struct RateLimiterMiddleware<S> {
    service: Rc<S>,
    windows: Arc<Mutex<HashMap<String, ClientWindow>>>,
    max_requests: u32,
    window: Duration,
}

impl<S, B> Service<ServiceRequest> for RateLimiterMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let windows = self.windows.clone();
        let max_requests = self.max_requests;
        let window = self.window;

        Box::pin(async move {
            let client = get_client_ip(&req);
            let now = Instant::now();

            let exceeded = {
                let mut windows = windows.lock().unwrap_or_else(|e| e.into_inner());
                let entry = windows.entry(client.clone()).or_insert(ClientWindow {
                    started_at: now,
                    count: 0,
                });
                // 窗口过期则重新计数
                if now.duration_since(entry.started_at) >= window {
                    entry.started_at = now;
                    entry.count = 0;
                }
                entry.count += 1;
                entry.count > max_requests
            };

            if exceeded {
                log::warn!("Rate limit exceeded for client: {}", client);
                return Err(ErrorTooManyRequests(json!({
                    "success": false,
                    "error": {
                        "code": "RATE_LIMITED",
                        "message": "Too many requests, please slow down"
                    }
                })));
            }

            service.call(req).await
        })
    }
}

/// 反向代理场景下优先取转发头里的客户端地址
fn get_client_ip(req: &ServiceRequest) -> String {
    if let Some(forwarded_for) = req.headers().get("X-Forwarded-For")
        && let Ok(forwarded_str) = forwarded_for.to_str()
        && let Some(ip) = forwarded_str.split(',').next()
    {
        return ip.trim().to_string();
    }

    if let Some(real_ip) = req.headers().get("X-Real-IP")
        && let Ok(ip_str) = real_ip.to_str()
    {
        return ip_str.to_string();
    }

    req.connection_info()
        .peer_addr()
        .unwrap_or("unknown")
        .to_string()
}
