//! 请求转发器
//!
//! 负责与上游的全部 HTTP 交互：资源探测（GET）与最终补全调用（POST）。
//! 不做重试，单次请求失败即返回错误。

use super::{
    log_codes::fwd,
    providers::{AuthInfo, ProviderAdapter},
    RelayError,
};
use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use serde_json::Value;
use std::time::{Duration, Instant};

/// 日志中响应体预览的最大字符数
const BODY_PREVIEW_CHARS: usize = 2000;

pub struct RequestForwarder {
    client: Client,
}

impl RequestForwarder {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// 发送补全请求并把响应归一为纯文本回复
    ///
    /// # Arguments
    /// * `adapter` - 决定认证头、状态码映射和响应解析方式
    /// * `url` - 完整的补全地址
    /// * `auth` - 调用方凭证
    /// * `body` - 已构建好的请求体
    pub async fn forward(
        &self,
        adapter: &dyn ProviderAdapter,
        url: &str,
        auth: &AuthInfo,
        body: &Value,
    ) -> Result<String, RelayError> {
        log::info!(
            "[{}] 转发请求 -> {url} (key: {})",
            adapter.name(),
            auth.masked_key()
        );

        let start = Instant::now();
        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .json(body);
        let response = adapter
            .add_auth_headers(request, auth)
            .send()
            .await
            .map_err(|e| map_send_error(adapter.name(), e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            log::error!(
                "[{}] [{}] 读取响应体失败: {e}",
                adapter.name(),
                fwd::READ_BODY_FAILED
            );
            RelayError::ForwardFailed(format!("读取响应体失败: {e}"))
        })?;

        log::info!(
            "[{}] 上游响应 {} - {}ms",
            adapter.name(),
            status.as_u16(),
            start.elapsed().as_millis()
        );
        log::debug!("[{}] 原始响应: {}", adapter.name(), preview(&text));

        if status != StatusCode::OK {
            log::warn!(
                "[{}] [{}] 上游返回 {}: {}",
                adapter.name(),
                fwd::UPSTREAM_STATUS,
                status.as_u16(),
                preview(&text)
            );
            return Err(adapter.map_status_error(status, url, text));
        }

        let json: Value = serde_json::from_str(&text).map_err(|e| {
            log::warn!(
                "[{}] [{}] 响应不是合法 JSON: {e}",
                adapter.name(),
                fwd::MALFORMED_BODY
            );
            RelayError::malformed(format!("响应不是合法 JSON: {e}"))
        })?;

        adapter.extract_reply(&json)
    }

    /// 带超时的 GET 探测，返回 200 响应的 JSON
    ///
    /// 用于资源发现，调用方负责把错误降级为"未找到"。
    pub async fn fetch_json(
        &self,
        adapter: &dyn ProviderAdapter,
        url: &str,
        auth: &AuthInfo,
        timeout: Duration,
    ) -> Result<Value, RelayError> {
        log::debug!("[{}] 探测 {url}", adapter.name());

        let request = self.client.get(url).timeout(timeout);
        let response = adapter
            .add_auth_headers(request, auth)
            .send()
            .await
            .map_err(|e| map_send_error(adapter.name(), e))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(RelayError::UpstreamStatus {
                provider: adapter.name(),
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| RelayError::malformed(format!("探测响应不是合法 JSON: {e}")))
    }
}

fn map_send_error(provider: &str, e: reqwest::Error) -> RelayError {
    if e.is_timeout() {
        log::warn!("[{provider}] [{}] 请求超时: {e}", fwd::TIMEOUT);
        RelayError::Timeout(e.to_string())
    } else {
        log::warn!("[{provider}] [{}] 请求发送失败: {e}", fwd::SEND_FAILED);
        RelayError::ForwardFailed(e.to_string())
    }
}

/// 截断过长的响应体用于日志输出
fn preview(text: &str) -> String {
    let total = text.chars().count();
    if total > BODY_PREVIEW_CHARS {
        let head: String = text.chars().take(BODY_PREVIEW_CHARS).collect();
        format!("{head}...[截断，总长度: {total} 字符]")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_text_unchanged() {
        assert_eq!(preview("ok"), "ok");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let text = "字".repeat(BODY_PREVIEW_CHARS + 10);
        let out = preview(&text);
        assert!(out.starts_with(&"字".repeat(BODY_PREVIEW_CHARS)));
        assert!(out.contains(&format!("{}", BODY_PREVIEW_CHARS + 10)));
    }
}
