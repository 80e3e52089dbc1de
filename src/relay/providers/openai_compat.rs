//! OpenAI 兼容适配器（SiliconFlow）
//!
//! 固定补全地址，单次 POST，只认 `choices[0].message.content`。

use super::normalize::extract_choices;
use super::ProviderAdapter;
use crate::config::UpstreamConfig;
use crate::relay::types::ChatMessage;
use crate::relay::RelayError;
use serde_json::{json, Value};

/// OpenAI 兼容适配器
pub struct OpenAiCompatAdapter {
    max_tokens: u32,
    temperature: f64,
}

impl OpenAiCompatAdapter {
    pub fn new(max_tokens: u32, temperature: f64) -> Self {
        Self {
            max_tokens,
            temperature,
        }
    }

    pub fn from_config(config: &UpstreamConfig) -> Self {
        Self::new(config.max_tokens, config.temperature)
    }
}

impl ProviderAdapter for OpenAiCompatAdapter {
    fn name(&self) -> &'static str {
        "SiliconFlow"
    }

    fn build_request_body(&self, messages: &[ChatMessage], model: &str) -> Value {
        json!({
            "model": model,
            "stream": false,
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
            "messages": messages,
        })
    }

    fn extract_reply(&self, body: &Value) -> Result<String, RelayError> {
        body.as_object()
            .and_then(extract_choices)
            .unwrap_or_else(|| Err(RelayError::malformed("响应缺少 choices 字段")))
    }
}
