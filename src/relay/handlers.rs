//! 请求处理器
//!
//! 请求体按原始字节接收后自行解析，保证格式错误也返回统一的
//! `{error, success: false}` 结构。

use super::{
    server::RelayState,
    types::{ChatPayload, ChatReply, ChatRequest, SummarisePayload, SummariseRequest, SummaryReply},
    RelayError,
};
use axum::{body::Bytes, extract::State, Json};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Instant;
use uuid::Uuid;

/// 健康检查
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// 处理 /chat 请求
pub async fn handle_chat(
    State(state): State<RelayState>,
    body: Bytes,
) -> Result<Json<ChatReply>, RelayError> {
    let request_id = Uuid::new_v4();
    let start = Instant::now();

    let request = parse_body::<ChatPayload>(&body).and_then(ChatRequest::try_from);
    let result = match request {
        Ok(request) => {
            log::info!(
                "[Chat] [{request_id}] provider={}, 消息数={}",
                request.provider,
                request.messages.len()
            );
            state.chat.chat(&request).await
        }
        Err(e) => Err(e),
    };

    finish("Chat", request_id, start, &result);
    result.map(|reply| {
        Json(ChatReply {
            reply,
            success: true,
        })
    })
}

/// 处理 /summarise 请求
pub async fn handle_summarise(
    State(state): State<RelayState>,
    body: Bytes,
) -> Result<Json<SummaryReply>, RelayError> {
    let request_id = Uuid::new_v4();
    let start = Instant::now();

    let result = match parse_body::<SummarisePayload>(&body).and_then(SummariseRequest::try_from)
    {
        Ok(request) => {
            log::info!(
                "[Summarise] [{request_id}] 内容长度={}",
                request.content.chars().count()
            );
            state.summarise.summarise(&request).await
        }
        Err(e) => Err(e),
    };

    finish("Summarise", request_id, start, &result);
    result.map(|summary| {
        Json(SummaryReply {
            summary,
            success: true,
        })
    })
}

/// /chat 与 /summarise 的非 POST 请求
pub async fn method_not_allowed() -> RelayError {
    RelayError::MethodNotAllowed
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, RelayError> {
    serde_json::from_slice(body)
        .map_err(|e| RelayError::precondition(format!("请求体不是合法 JSON: {e}")))
}

fn finish(tag: &str, request_id: Uuid, start: Instant, result: &Result<String, RelayError>) {
    let latency_ms = start.elapsed().as_millis();
    match result {
        Ok(reply) => log::info!(
            "[{tag}] [{request_id}] 完成 - {latency_ms}ms, 回复长度={}",
            reply.chars().count()
        ),
        Err(e) => log::warn!(
            "[{tag}] [{request_id}] 失败 ({}) - {latency_ms}ms: {e}",
            e.status_code().as_u16()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_body_rejects_invalid_json() {
        let err = parse_body::<ChatPayload>(b"{not json").unwrap_err();
        assert!(matches!(err, RelayError::Precondition(_)));
    }

    #[test]
    fn test_parse_body_rejects_wrong_field_type() {
        let err = parse_body::<ChatPayload>(br#"{"messages": "hi"}"#).unwrap_err();
        assert!(matches!(err, RelayError::Precondition(_)));
    }

    #[test]
    fn test_parse_body_accepts_empty_object() {
        let payload = parse_body::<SummarisePayload>(b"{}").unwrap();
        assert!(payload.content.is_none());
    }
}
