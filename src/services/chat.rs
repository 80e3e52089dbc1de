//! 对话服务
//!
//! 按供应商把一次对话请求发往固定地址的 OpenAI 兼容接口，或先做 RAGFlow
//! 资源发现再发往对应的补全接口。凭证缺失时不会发出任何网络请求。

use crate::config::UpstreamConfig;
use crate::relay::forwarder::RequestForwarder;
use crate::relay::http_client;
use crate::relay::providers::{
    AuthInfo, OpenAiCompatAdapter, ProviderAdapter, ProviderKind, RagFlowAdapter,
};
use crate::relay::types::{ChatMessage, ChatRequest};
use crate::relay::RelayError;
use std::sync::Arc;

const MISSING_API_KEY: &str = "API Key 未提供";
const MISSING_RAGFLOW_API_KEY: &str = "RAGFlow API Key 未提供";
const MISSING_RAGFLOW_BASE_URL: &str = "RAGFlow Base URL 未提供";

#[derive(Clone)]
pub struct ChatService {
    forwarder: Arc<RequestForwarder>,
    config: Arc<UpstreamConfig>,
}

impl ChatService {
    pub fn new(forwarder: Arc<RequestForwarder>, config: Arc<UpstreamConfig>) -> Self {
        Self { forwarder, config }
    }

    /// 按上游配置构建独立的 HTTP 客户端
    pub fn from_config(config: UpstreamConfig) -> Result<Self, RelayError> {
        let client = http_client::build_client(config.request_timeout(), config.proxy())?;
        Ok(Self::new(
            Arc::new(RequestForwarder::new(client)),
            Arc::new(config),
        ))
    }

    pub async fn chat(&self, request: &ChatRequest) -> Result<String, RelayError> {
        match request.provider {
            ProviderKind::SiliconFlow => {
                self.chat_openai_compatible(
                    &request.messages,
                    request.credential.as_deref(),
                    request.target.as_deref(),
                )
                .await
            }
            ProviderKind::RagFlow => {
                self.chat_ragflow(
                    &request.messages,
                    request.credential.as_deref(),
                    request.target.as_deref(),
                )
                .await
            }
        }
    }

    /// 固定地址路径
    ///
    /// 模型为空时使用默认模型；回复取 `choices[0].message.content`。
    pub async fn chat_openai_compatible(
        &self,
        messages: &[ChatMessage],
        api_key: Option<&str>,
        model: Option<&str>,
    ) -> Result<String, RelayError> {
        let auth = AuthInfo::require(api_key, MISSING_API_KEY)?;
        let model = self.config.resolve_model(model);
        let adapter = OpenAiCompatAdapter::from_config(&self.config);

        log::debug!(
            "[Chat] {} 消息数: {}, 模型: {model}",
            adapter.name(),
            messages.len()
        );

        let body = adapter.build_request_body(messages, model);
        self.forwarder
            .forward(&adapter, &self.config.completions_url, &auth, &body)
            .await
    }

    /// RAGFlow 路径：先发现 chat / agent 资源，再调用对应的补全接口
    pub async fn chat_ragflow(
        &self,
        messages: &[ChatMessage],
        api_key: Option<&str>,
        base_url: Option<&str>,
    ) -> Result<String, RelayError> {
        let auth = AuthInfo::require(api_key, MISSING_RAGFLOW_API_KEY)?;
        let base_url = base_url
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| RelayError::precondition(MISSING_RAGFLOW_BASE_URL))?;

        let adapter = RagFlowAdapter::new(self.config.ragflow_model.clone());
        let endpoint = adapter
            .discover_endpoint(&self.forwarder, base_url, &auth, self.config.probe_timeout())
            .await;

        log::info!(
            "[Chat] RAGFlow 使用 {} 资源 {} -> {}",
            endpoint.resource_kind.as_str(),
            endpoint.resource_id.as_deref().unwrap_or("-"),
            endpoint.url
        );

        let body = adapter.build_request_body(messages, &self.config.ragflow_model);
        self.forwarder
            .forward(&adapter, &endpoint.url, &auth, &body)
            .await
    }
}
