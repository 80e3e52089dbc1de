//! 中继配置
//!
//! 配置文件为可选的 TOML，每个字段都有默认值；命令行参数可覆盖其中的监听地址、
//! 端口和日志级别。

use crate::relay::http_client::validate_proxy_url;
use crate::relay::RelayError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// 硅基流动 OpenAI 兼容补全地址
pub const DEFAULT_COMPLETIONS_URL: &str = "https://api.siliconflow.cn/v1/chat/completions";
/// 请求未指定模型时使用
pub const DEFAULT_MODEL: &str = "Qwen/Qwen2.5-7B-Instruct";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
/// RAGFlow 请求体中的占位模型名
pub const DEFAULT_RAGFLOW_MODEL: &str = "ragflow";
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_LISTEN_PORT: u16 = 8080;

const LOG_LEVELS: &[&str] = &["off", "error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub logging: LoggingConfig,
}

/// 监听配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 监听地址
    pub listen_address: String,
    /// 监听端口（0 表示由系统分配）
    pub listen_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: "0.0.0.0".to_string(),
            listen_port: DEFAULT_LISTEN_PORT,
        }
    }
}

/// 上游调用参数
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// 固定地址路径的补全接口
    pub completions_url: String,
    pub default_model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub ragflow_model: String,
    /// RAGFlow 资源探测的超时（秒）
    pub probe_timeout_secs: u64,
    /// 最终补全请求的超时（秒），0 表示不限制
    pub request_timeout_secs: u64,
    /// 出站代理，空字符串表示直连
    pub proxy_url: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            completions_url: DEFAULT_COMPLETIONS_URL.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            ragflow_model: DEFAULT_RAGFLOW_MODEL.to_string(),
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
            request_timeout_secs: 0,
            proxy_url: String::new(),
        }
    }
}

impl UpstreamConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    pub fn proxy(&self) -> Option<&str> {
        Some(self.proxy_url.trim()).filter(|s| !s.is_empty())
    }

    /// 请求中的模型名为空时回落到默认模型
    pub fn resolve_model<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(&self.default_model)
    }

    pub fn validate(&self) -> Result<(), RelayError> {
        url::Url::parse(&self.completions_url).map_err(|e| {
            RelayError::Config(format!(
                "upstream.completions_url 不是合法 URL ({}): {e}",
                self.completions_url
            ))
        })?;
        if self.default_model.trim().is_empty() {
            return Err(RelayError::Config(
                "upstream.default_model 不能为空".to_string(),
            ));
        }
        if self.probe_timeout_secs == 0 {
            return Err(RelayError::Config(
                "upstream.probe_timeout_secs 不能为 0".to_string(),
            ));
        }
        if let Some(proxy) = self.proxy() {
            validate_proxy_url(proxy)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// off / error / warn / info / debug / trace
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), RelayError> {
        let level = self.level.trim().to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(RelayError::Config(format!(
                "logging.level 无效: {}（可选: {}）",
                self.level,
                LOG_LEVELS.join(", ")
            )));
        }
        Ok(())
    }
}

impl RelayConfig {
    pub fn load(path: &Path) -> Result<Self, RelayError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| RelayError::Config(format!("读取配置失败 {}: {e}", path.display())))?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, RelayError> {
        toml::from_str(text).map_err(|e| RelayError::Config(format!("解析 TOML 配置失败: {e}")))
    }

    /// 命令行参数覆盖配置文件
    pub fn apply_overrides(
        &mut self,
        host: Option<String>,
        port: Option<u16>,
        log_level: Option<String>,
    ) {
        if let Some(host) = host {
            self.server.listen_address = host;
        }
        if let Some(port) = port {
            self.server.listen_port = port;
        }
        if let Some(level) = log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), RelayError> {
        if self.server.listen_address.trim().is_empty() {
            return Err(RelayError::Config(
                "server.listen_address 不能为空".to_string(),
            ));
        }
        self.upstream.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
