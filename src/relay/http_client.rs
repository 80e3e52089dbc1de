//! HTTP 客户端模块
//!
//! 构建访问上游的 reqwest 客户端，支持可选的出站代理。
//! 客户端在服务启动时创建一次，之后只读共享。

use super::RelayError;
use reqwest::Client;
use std::time::Duration;

/// 构建 HTTP 客户端
///
/// # Arguments
/// * `request_timeout` - 整体请求超时，`None` 表示不限制（与最终补全调用的语义一致）
/// * `proxy_url` - 出站代理，如 `http://127.0.0.1:7890` 或 `socks5://127.0.0.1:1080`；
///   `None` 或空字符串表示直连
pub fn build_client(
    request_timeout: Option<Duration>,
    proxy_url: Option<&str>,
) -> Result<Client, RelayError> {
    let mut builder = Client::builder()
        .pool_max_idle_per_host(10)
        .tcp_keepalive(Duration::from_secs(60));

    if let Some(timeout) = request_timeout {
        builder = builder.timeout(timeout);
    }

    match proxy_url.filter(|s| !s.trim().is_empty()) {
        Some(url) => {
            validate_proxy_url(url)?;
            let proxy = reqwest::Proxy::all(url).map_err(|e| {
                RelayError::Config(format!("Invalid proxy URL '{}': {e}", mask_url(url)))
            })?;
            builder = builder.proxy(proxy);
            log::debug!("[HttpClient] Proxy configured: {}", mask_url(url));
        }
        None => {
            builder = builder.no_proxy();
            log::debug!("[HttpClient] Direct connection (no proxy)");
        }
    }

    builder
        .build()
        .map_err(|e| RelayError::Config(format!("Failed to build HTTP client: {e}")))
}

/// 验证代理 URL 的格式和 scheme（不构建客户端）
pub fn validate_proxy_url(url: &str) -> Result<(), RelayError> {
    let parsed = url::Url::parse(url)
        .map_err(|e| RelayError::Config(format!("Invalid proxy URL '{}': {e}", mask_url(url))))?;

    let scheme = parsed.scheme();
    if !["http", "https", "socks5", "socks5h"].contains(&scheme) {
        return Err(RelayError::Config(format!(
            "Invalid proxy scheme '{}' in URL '{}'. Supported: http, https, socks5, socks5h",
            scheme,
            mask_url(url)
        )));
    }
    Ok(())
}

/// 隐藏 URL 中的敏感信息（用于日志）
pub fn mask_url(url: &str) -> String {
    if let Ok(parsed) = url::Url::parse(url) {
        // 隐藏用户名和密码，保留 scheme、host 和端口
        let host = parsed.host_str().unwrap_or("?");
        match parsed.port() {
            Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
            None => format!("{}://{}", parsed.scheme(), host),
        }
    } else {
        let head: String = url.chars().take(20).collect();
        if head.len() < url.len() {
            format!("{head}...")
        } else {
            head
        }
    }
}
