use serde::{Deserialize, Serialize};

use super::providers::ProviderKind;
use super::RelayError;

/// 单条对话消息，按调用方给定的顺序原样转发
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }
}

/// `/chat` 请求体（客户端字段为 camelCase）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatPayload {
    pub messages: Option<Vec<ChatMessage>>,
    pub provider: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub ragflow_api_key: Option<String>,
    pub ragflow_base_url: Option<String>,
}

/// `/summarise` 请求体
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarisePayload {
    pub content: Option<String>,
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
}

/// 单次对话调用的内部请求
///
/// `credential` 与 `target` 的含义取决于 `provider`：
/// - SiliconFlow：API Key 与模型名
/// - RAGFlow：RAGFlow API Key 与 Base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub provider: ProviderKind,
    pub credential: Option<String>,
    pub target: Option<String>,
}

impl TryFrom<ChatPayload> for ChatRequest {
    type Error = RelayError;

    fn try_from(payload: ChatPayload) -> Result<Self, Self::Error> {
        let messages = payload
            .messages
            .ok_or_else(|| RelayError::precondition("messages 未提供"))?;
        let provider = ProviderKind::from_request(payload.provider.as_deref());

        let (credential, target) = match provider {
            ProviderKind::SiliconFlow => (payload.api_key, payload.model),
            ProviderKind::RagFlow => (payload.ragflow_api_key, payload.ragflow_base_url),
        };

        Ok(Self {
            messages,
            provider,
            credential,
            target,
        })
    }
}

/// 网页总结请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummariseRequest {
    pub content: String,
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
}

impl TryFrom<SummarisePayload> for SummariseRequest {
    type Error = RelayError;

    fn try_from(payload: SummarisePayload) -> Result<Self, Self::Error> {
        let content = payload
            .content
            .ok_or_else(|| RelayError::precondition("content 未提供"))?;

        Ok(Self {
            content,
            url: payload.url,
            api_key: payload.api_key,
            model: payload.model,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub reply: String,
    pub success: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryReply {
    pub summary: String,
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_payload_defaults_to_siliconflow() {
        let payload: ChatPayload = serde_json::from_value(json!({
            "messages": [{"role": "user", "content": "hi"}],
            "apiKey": "sk-test",
            "model": "Qwen/Qwen2.5-7B-Instruct"
        }))
        .unwrap();

        let request = ChatRequest::try_from(payload).unwrap();
        assert_eq!(request.provider, ProviderKind::SiliconFlow);
        assert_eq!(request.credential.as_deref(), Some("sk-test"));
        assert_eq!(request.target.as_deref(), Some("Qwen/Qwen2.5-7B-Instruct"));
        assert_eq!(request.messages, vec![ChatMessage::user("hi")]);
    }

    #[test]
    fn test_chat_payload_ragflow_uses_ragflow_fields() {
        let payload: ChatPayload = serde_json::from_value(json!({
            "messages": [],
            "provider": "ragflow",
            "apiKey": "sk-ignored",
            "ragflowApiKey": "rf-key",
            "ragflowBaseUrl": "http://localhost:9380/"
        }))
        .unwrap();

        let request = ChatRequest::try_from(payload).unwrap();
        assert_eq!(request.provider, ProviderKind::RagFlow);
        assert_eq!(request.credential.as_deref(), Some("rf-key"));
        assert_eq!(request.target.as_deref(), Some("http://localhost:9380/"));
    }

    #[test]
    fn test_chat_payload_without_messages_is_rejected() {
        let payload = ChatPayload {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        };
        let err = ChatRequest::try_from(payload).unwrap_err();
        assert!(matches!(err, RelayError::Precondition(_)));
    }

    #[test]
    fn test_message_order_is_preserved() {
        let payload: ChatPayload = serde_json::from_value(json!({
            "messages": [
                {"role": "system", "content": "s"},
                {"role": "user", "content": "u1"},
                {"role": "assistant", "content": "a1"},
                {"role": "user", "content": "u2"}
            ]
        }))
        .unwrap();
        let request = ChatRequest::try_from(payload).unwrap();
        let roles: Vec<_> = request.messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, ["system", "user", "assistant", "user"]);
    }

    #[test]
    fn test_summarise_payload_requires_content() {
        let payload: SummarisePayload =
            serde_json::from_value(json!({"apiKey": "sk-test"})).unwrap();
        let err = SummariseRequest::try_from(payload).unwrap_err();
        assert!(matches!(err, RelayError::Precondition(_)));
    }

    #[test]
    fn test_replies_serialize_with_success_flag() {
        let reply = serde_json::to_value(ChatReply {
            reply: "ok".to_string(),
            success: true,
        })
        .unwrap();
        assert_eq!(reply, json!({"reply": "ok", "success": true}));

        let summary = serde_json::to_value(SummaryReply {
            summary: "s".to_string(),
            success: true,
        })
        .unwrap();
        assert_eq!(summary, json!({"summary": "s", "success": true}));
    }
}
