//! 网页总结服务
//!
//! 把网页内容拼成一条用户提示词，走固定地址路径完成补全。

use super::chat::ChatService;
use crate::relay::types::{ChatMessage, SummariseRequest};
use crate::relay::RelayError;

const SUMMARY_INSTRUCTION: &str = "请总结以下网页内容，提取关键信息，控制在200字以内：\n\n";

#[derive(Clone)]
pub struct SummariseService {
    chat: ChatService,
}

impl SummariseService {
    pub fn new(chat: ChatService) -> Self {
        Self { chat }
    }

    pub async fn summarise(&self, request: &SummariseRequest) -> Result<String, RelayError> {
        let prompt = build_summary_prompt(&request.content, request.url.as_deref());
        log::debug!(
            "[Summarise] 内容长度: {} 字符, url: {}",
            request.content.chars().count(),
            request.url.as_deref().unwrap_or("-")
        );

        let reply = self
            .chat
            .chat_openai_compatible(
                &[ChatMessage::user(prompt)],
                request.api_key.as_deref(),
                request.model.as_deref(),
            )
            .await?;
        Ok(reply.trim().to_string())
    }
}

/// 构建总结提示词，`url` 为空时省略网址行
pub fn build_summary_prompt(content: &str, url: Option<&str>) -> String {
    let mut prompt = String::from(SUMMARY_INSTRUCTION);
    if let Some(url) = url.filter(|u| !u.is_empty()) {
        prompt.push_str(&format!("网址：{url}\n\n"));
    }
    prompt.push_str(&format!("内容：\n{content}"));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UpstreamConfig;

    #[test]
    fn test_prompt_with_url() {
        assert_eq!(
            build_summary_prompt("hello", Some("https://e.co")),
            "请总结以下网页内容，提取关键信息，控制在200字以内：\n\n网址：https://e.co\n\n内容：\nhello"
        );
    }

    #[test]
    fn test_prompt_without_url() {
        let expected = "请总结以下网页内容，提取关键信息，控制在200字以内：\n\n内容：\nhello";
        assert_eq!(build_summary_prompt("hello", None), expected);
        assert_eq!(build_summary_prompt("hello", Some("")), expected);
    }

    #[tokio::test]
    async fn test_summarise_requires_api_key() {
        let chat = ChatService::from_config(UpstreamConfig {
            completions_url: "http://127.0.0.1:1/v1/chat/completions".to_string(),
            ..Default::default()
        })
        .unwrap();
        let request = SummariseRequest {
            content: "hello".to_string(),
            url: None,
            api_key: None,
            model: None,
        };
        let err = SummariseService::new(chat)
            .summarise(&request)
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::Precondition(_)));
    }
}
