use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub verification: VerificationConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub smtp: Option<SmtpConfig>,
    #[serde(default)]
    pub twilio: Option<TwilioConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationConfig {
    /// 验证码有效期（秒）
    pub code_ttl: i64,
    /// 用户存储文件路径
    pub users_file: String,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_ttl: 600,
            users_file: "users.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window_secs: i64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_phone: String,
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件，如果不存在则完全依赖环境变量
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => {
                // 有配置文件：先解析再用环境变量覆盖
                toml::from_str(&config_str).map_err(|e| format!("解析配置文件失败: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // 无配置文件：使用环境变量与默认值构建
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 4000u16),
                    },
                    verification: VerificationConfig {
                        code_ttl: get_env_parse("CODE_TTL", 600i64),
                        users_file: get_env("USERS_FILE")
                            .unwrap_or_else(|| "users.json".to_string()),
                    },
                    rate_limit: RateLimitConfig {
                        max_requests: get_env_parse("RATE_LIMIT_MAX", 10u32),
                        window_secs: get_env_parse("RATE_LIMIT_WINDOW_SECS", 60i64),
                    },
                    // SMTP 主机与用户名齐全时才启用邮件通道
                    smtp: match (get_env("SMTP_HOST"), get_env("SMTP_USER")) {
                        (Some(host), Some(username)) => Some(SmtpConfig {
                            host,
                            port: get_env_parse("SMTP_PORT", 587u16),
                            username,
                            password: get_env("SMTP_PASS").unwrap_or_default(),
                        }),
                        _ => None,
                    },
                    // Twilio 凭据齐全时才启用短信通道
                    twilio: match (get_env("TWILIO_ACCOUNT_SID"), get_env("TWILIO_AUTH_TOKEN")) {
                        (Some(account_sid), Some(auth_token)) => Some(TwilioConfig {
                            account_sid,
                            auth_token,
                            from_phone: get_env("TWILIO_FROM").unwrap_or_default(),
                        }),
                        _ => None,
                    },
                }
            }
            Err(e) => {
                return Err(format!("无法读取配置文件 {config_path}: {e}").into());
            }
        };

        // 环境变量覆盖（即便文件存在时也覆盖）
        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            config.server.port = p;
        }
        if let Ok(v) = env::var("CODE_TTL")
            && let Ok(n) = v.parse()
        {
            config.verification.code_ttl = n;
        }
        if let Ok(v) = env::var("USERS_FILE") {
            config.verification.users_file = v;
        }
        if let Ok(v) = env::var("RATE_LIMIT_MAX")
            && let Ok(n) = v.parse()
        {
            config.rate_limit.max_requests = n;
        }
        if let Ok(v) = env::var("RATE_LIMIT_WINDOW_SECS")
            && let Ok(n) = v.parse()
        {
            config.rate_limit.window_secs = n;
        }
        if let Ok(host) = env::var("SMTP_HOST") {
            let smtp = config.smtp.get_or_insert(SmtpConfig {
                host: String::new(),
                port: 587,
                username: String::new(),
                password: String::new(),
            });
            smtp.host = host;
        }
        if let Some(smtp) = config.smtp.as_mut() {
            if let Ok(v) = env::var("SMTP_PORT")
                && let Ok(p) = v.parse()
            {
                smtp.port = p;
            }
            if let Ok(v) = env::var("SMTP_USER") {
                smtp.username = v;
            }
            if let Ok(v) = env::var("SMTP_PASS") {
                smtp.password = v;
            }
        }
        if let Ok(sid) = env::var("TWILIO_ACCOUNT_SID") {
            let twilio = config.twilio.get_or_insert(TwilioConfig {
                account_sid: String::new(),
                auth_token: String::new(),
                from_phone: String::new(),
            });
            twilio.account_sid = sid;
        }
        if let Some(twilio) = config.twilio.as_mut() {
            if let Ok(v) = env::var("TWILIO_AUTH_TOKEN") {
                twilio.auth_token = v;
            }
            if let Ok(v) = env::var("TWILIO_FROM") {
                twilio.from_phone = v;
            }
        }

        Ok(config)
    }
}
