//! RAGFlow Provider Adapter
//!
//! RAGFlow 不同版本暴露的补全接口不一致，需要先探测可用的会话资源：
//!
//! 1. `GET /api/v1/chats?page=1&page_size=1`，取第一个 chat 的 id
//!    → `POST /api/v1/chats_openai/{id}/chat/completions`
//! 2. `GET /api/v1/agents?page=1&page_size=1`，取第一个 agent 的 id
//!    → `POST /api/v1/agents_openai/{id}/chat/completions`
//! 3. 都没有时使用 `POST /api/v1/chat/completions`（部分版本不存在，会 404）
//!
//! 探测失败（非 200、连接错误、超时、响应格式不对）只记录日志并进入下一级，
//! 不会让整个请求失败。每次请求都重新探测，不做缓存。

use super::normalize::normalize_reply;
use super::{AuthInfo, ProviderAdapter};
use crate::relay::forwarder::RequestForwarder;
use crate::relay::log_codes::dsc;
use crate::relay::types::ChatMessage;
use crate::relay::RelayError;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;

/// 没有任何 chat / agent 时使用的通用补全路径
pub const GENERIC_COMPLETIONS_PATH: &str = "/api/v1/chat/completions";

/// 资源列表只需要第一条
const LIST_QUERY: &str = "?page=1&page_size=1";

/// 发现到的资源类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    ChatSession,
    Agent,
    None,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::ChatSession => "chat",
            ResourceKind::Agent => "agent",
            ResourceKind::None => "none",
        }
    }
}

/// 本次请求解析出的补全地址
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoint {
    pub url: String,
    pub resource_kind: ResourceKind,
    pub resource_id: Option<String>,
}

/// 一级资源探测：列表接口 + 对应的补全接口前缀
struct ResourceProbe {
    kind: ResourceKind,
    list_path: &'static str,
    completions_prefix: &'static str,
}

/// 探测顺序即优先级
const RESOURCE_PROBES: [ResourceProbe; 2] = [
    ResourceProbe {
        kind: ResourceKind::ChatSession,
        list_path: "/api/v1/chats",
        completions_prefix: "/api/v1/chats_openai",
    },
    ResourceProbe {
        kind: ResourceKind::Agent,
        list_path: "/api/v1/agents",
        completions_prefix: "/api/v1/agents_openai",
    },
];

impl ResourceProbe {
    fn list_endpoint(&self) -> String {
        format!("{}{LIST_QUERY}", self.list_path)
    }

    fn completions_endpoint(&self, id: &str) -> String {
        format!("{}/{id}/chat/completions", self.completions_prefix)
    }
}

/// RAGFlow 适配器
pub struct RagFlowAdapter {
    /// 请求体中的 `model` 占位值，RAGFlow 的模型在服务端配置
    model: String,
}

impl RagFlowAdapter {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }

    /// 按优先级探测 chat / agent 资源，解析出本次请求的补全地址
    ///
    /// 该函数不会失败：任何探测错误都只会让它退到下一级。
    pub async fn discover_endpoint(
        &self,
        forwarder: &RequestForwarder,
        base_url: &str,
        auth: &AuthInfo,
        probe_timeout: Duration,
    ) -> ResolvedEndpoint {
        for probe in &RESOURCE_PROBES {
            let list_url = self.build_url(base_url, &probe.list_endpoint());
            let outcome = forwarder
                .fetch_json(self, &list_url, auth, probe_timeout)
                .await
                .and_then(|body| first_resource_id(&body));

            match outcome {
                Ok(Some(id)) => {
                    log::info!(
                        "[{}] 发现 RAGFlow {} 资源: {id}",
                        dsc::RESOURCE_FOUND,
                        probe.kind.as_str()
                    );
                    return ResolvedEndpoint {
                        url: self.build_url(base_url, &probe.completions_endpoint(&id)),
                        resource_kind: probe.kind,
                        resource_id: Some(id),
                    };
                }
                Ok(None) => {
                    log::info!(
                        "[{}] RAGFlow 未返回任何 {} 资源",
                        dsc::PROBE_EMPTY,
                        probe.kind.as_str()
                    );
                }
                Err(e) => {
                    log::warn!(
                        "[{}] 获取 RAGFlow {} 列表失败: {e}",
                        dsc::PROBE_FAILED,
                        probe.kind.as_str()
                    );
                }
            }
        }

        let url = self.build_url(base_url, GENERIC_COMPLETIONS_PATH);
        log::info!(
            "[{}] 未找到 chat 或 agent，使用默认地址: {url}",
            dsc::FALLBACK_GENERIC
        );
        ResolvedEndpoint {
            url,
            resource_kind: ResourceKind::None,
            resource_id: None,
        }
    }
}

impl ProviderAdapter for RagFlowAdapter {
    fn name(&self) -> &'static str {
        "RAGFlow"
    }

    fn build_request_body(&self, messages: &[ChatMessage], _model: &str) -> Value {
        json!({
            "stream": false,
            "messages": messages,
            "model": self.model,
        })
    }

    fn extract_reply(&self, body: &Value) -> Result<String, RelayError> {
        normalize_reply(body)
    }

    fn map_status_error(&self, status: StatusCode, url: &str, body: String) -> RelayError {
        if status == StatusCode::NOT_FOUND {
            return RelayError::UpstreamNotFound {
                url: url.to_string(),
            };
        }
        RelayError::UpstreamStatus {
            provider: self.name(),
            status: status.as_u16(),
            body,
        }
    }
}

/// 从资源列表响应中取第一条的 id
///
/// - `Ok(Some(id))`：找到资源
/// - `Ok(None)`：`data` 缺失、为 null 或为空数组
/// - `Err(_)`：`data` 不是数组，或第一条没有字符串 `id`
pub fn first_resource_id(body: &Value) -> Result<Option<String>, RelayError> {
    let data = match body.get("data") {
        None | Some(Value::Null) => return Ok(None),
        Some(data) => data,
    };
    let entries = data
        .as_array()
        .ok_or_else(|| RelayError::malformed("资源列表 data 不是数组"))?;

    match entries.first() {
        None => Ok(None),
        Some(entry) => entry
            .get("id")
            .and_then(Value::as_str)
            .map(|id| Some(id.to_string()))
            .ok_or_else(|| RelayError::malformed("资源列表第一项缺少 id")),
    }
}
