//! Provider Adapter Trait
//!
//! 定义供应商适配器的统一接口，抽象不同上游供应商的请求/响应方言。

use super::auth::AuthInfo;
use crate::relay::error::RelayError;
use crate::relay::types::ChatMessage;
use reqwest::{header::AUTHORIZATION, RequestBuilder, StatusCode};
use serde_json::Value;

/// 供应商适配器 Trait
///
/// 所有供应商适配器都需要实现此 trait，提供统一的接口来处理：
/// - URL 构建
/// - 认证头注入
/// - 请求体构建
/// - 响应体归一化
/// - 非 200 状态码到错误的映射
///
/// 网络 I/O 不在适配器内完成，由 `RequestForwarder` 统一执行。
pub trait ProviderAdapter: Send + Sync {
    /// 适配器名称（用于日志和错误信息）
    fn name(&self) -> &'static str;

    /// 构建请求 URL
    ///
    /// # Arguments
    /// * `base_url` - 基础 URL（允许带一个尾部斜杠）
    /// * `endpoint` - 请求端点（如 `/api/v1/chat/completions`）
    fn build_url(&self, base_url: &str, endpoint: &str) -> String {
        let base = base_url.strip_suffix('/').unwrap_or(base_url);
        format!("{base}{endpoint}")
    }

    /// 添加认证头到请求
    fn add_auth_headers(&self, request: RequestBuilder, auth: &AuthInfo) -> RequestBuilder {
        request.header(AUTHORIZATION, auth.bearer())
    }

    /// 构建补全请求体
    ///
    /// # Arguments
    /// * `messages` - 按原顺序转发的消息
    /// * `model` - 已解析的模型名（固定占位模型的上游会忽略该参数）
    fn build_request_body(&self, messages: &[ChatMessage], model: &str) -> Value;

    /// 将 200 响应体归一为一段纯文本回复
    fn extract_reply(&self, body: &Value) -> Result<String, RelayError>;

    /// 将非 200 状态码映射为错误
    ///
    /// 默认实现统一返回 `UpstreamStatus`，保留状态码和响应体。
    fn map_status_error(&self, status: StatusCode, _url: &str, body: String) -> RelayError {
        RelayError::UpstreamStatus {
            provider: self.name(),
            status: status.as_u16(),
            body,
        }
    }
}
