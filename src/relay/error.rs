use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    /// 缺少必要参数（凭证、Base URL、内容、消息列表等），在发起任何网络请求前抛出
    #[error("{0}")]
    Precondition(String),

    #[error("{provider} 请求失败，状态码 {status}: {body}")]
    UpstreamStatus {
        provider: &'static str,
        status: u16,
        body: String,
    },

    /// RAGFlow 最终补全接口返回 404
    #[error("RAGFlow 接口路径未找到，请检查 Base URL 是否正确 (例如: http://localhost:9380)，请求地址: {url}")]
    UpstreamNotFound { url: String },

    #[error("上游响应解析失败: {0}")]
    MalformedResponse(String),

    #[error("请求转发失败: {0}")]
    ForwardFailed(String),

    #[error("超时: {0}")]
    Timeout(String),

    #[error("仅支持 POST 请求")]
    MethodNotAllowed,

    #[error("配置错误: {0}")]
    Config(String),

    #[error("地址绑定失败: {0}")]
    BindFailed(String),

    #[error("服务器已在运行")]
    AlreadyRunning,

    #[error("服务器未运行")]
    NotRunning,

    #[error("停止超时")]
    StopTimeout,
}

impl RelayError {
    /// 将错误映射到返回给调用方的 HTTP 状态码
    ///
    /// 映射规则：
    /// - 参数错误：400
    /// - 上游错误 / 上游 404 / 响应无法解析 / 连接失败：502
    /// - 超时：504
    /// - 其他：500
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::Precondition(_) => StatusCode::BAD_REQUEST,
            RelayError::UpstreamStatus { .. }
            | RelayError::UpstreamNotFound { .. }
            | RelayError::MalformedResponse(_)
            | RelayError::ForwardFailed(_) => StatusCode::BAD_GATEWAY,
            RelayError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            RelayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::Config(_)
            | RelayError::BindFailed(_)
            | RelayError::AlreadyRunning
            | RelayError::NotRunning
            | RelayError::StopTimeout => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn precondition(message: impl Into<String>) -> Self {
        RelayError::Precondition(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        RelayError::MalformedResponse(message.into())
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = json!({
            "error": self.to_string(),
            "success": false,
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_maps_to_bad_request() {
        let error = RelayError::precondition("API Key 未提供");
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(error.to_string(), "API Key 未提供");
    }

    #[test]
    fn test_upstream_status_keeps_code_and_body() {
        let error = RelayError::UpstreamStatus {
            provider: "RAGFlow",
            status: 500,
            body: "Internal Server Error".to_string(),
        };
        assert_eq!(error.status_code(), StatusCode::BAD_GATEWAY);
        let msg = error.to_string();
        assert!(msg.contains("RAGFlow"));
        assert!(msg.contains("500"));
        assert!(msg.contains("Internal Server Error"));
    }

    #[test]
    fn test_not_found_carries_base_url_hint() {
        let error = RelayError::UpstreamNotFound {
            url: "http://localhost:9380/api/v1/chat/completions".to_string(),
        };
        assert_eq!(error.status_code(), StatusCode::BAD_GATEWAY);
        assert!(error.to_string().contains("Base URL"));
    }

    #[test]
    fn test_timeout_maps_to_gateway_timeout() {
        let error = RelayError::Timeout("Request timeout".to_string());
        assert_eq!(error.status_code(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_stop_timeout_is_internal_error() {
        assert_eq!(
            RelayError::StopTimeout.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(RelayError::StopTimeout.to_string(), "停止超时");
    }

    #[test]
    fn test_method_not_allowed() {
        assert_eq!(
            RelayError::MethodNotAllowed.status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }
}
