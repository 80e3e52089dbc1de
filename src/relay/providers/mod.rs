//! Provider Adapters Module
//!
//! 供应商适配器模块，把统一的对话请求映射到不同上游的请求格式，
//! 并把上游各异的响应结构归一为一段纯文本回复。
//!
//! ## 模块结构
//! - `adapter`: 定义 `ProviderAdapter` trait
//! - `auth`: 认证信息
//! - `openai_compat`: 固定地址的 OpenAI 兼容适配器（SiliconFlow）
//! - `ragflow`: RAGFlow 适配器与资源发现
//! - `normalize`: 响应归一化

mod adapter;
mod auth;
pub mod normalize;
mod openai_compat;
pub mod ragflow;

pub use adapter::ProviderAdapter;
pub use auth::AuthInfo;
pub use openai_compat::OpenAiCompatAdapter;
pub use ragflow::{RagFlowAdapter, ResolvedEndpoint, ResourceKind};

/// 供应商类型枚举
///
/// 由请求中的 `provider` 字段决定走固定地址路径还是 RAGFlow 发现路径。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProviderKind {
    /// 硅基流动（OpenAI 兼容接口，固定地址）
    #[default]
    SiliconFlow,
    /// 自托管 RAGFlow（需要先发现 chat / agent 资源）
    RagFlow,
}

impl ProviderKind {
    /// 从请求字段解析供应商
    ///
    /// 未提供或无法识别的值都回落到默认供应商。
    pub fn from_request(value: Option<&str>) -> Self {
        match value {
            None => Self::default(),
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                log::debug!("[Router] 未知 provider '{raw}'，使用默认供应商");
                Self::default()
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::SiliconFlow => "siliconflow",
            ProviderKind::RagFlow => "ragflow",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "siliconflow" => Ok(ProviderKind::SiliconFlow),
            "ragflow" => Ok(ProviderKind::RagFlow),
            _ => Err(format!("Invalid provider: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_from_str() {
        assert_eq!(
            "siliconflow".parse::<ProviderKind>().unwrap(),
            ProviderKind::SiliconFlow
        );
        assert_eq!(
            "ragflow".parse::<ProviderKind>().unwrap(),
            ProviderKind::RagFlow
        );
        assert!("openai".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_provider_kind_from_request_falls_back_to_default() {
        assert_eq!(ProviderKind::from_request(None), ProviderKind::SiliconFlow);
        assert_eq!(
            ProviderKind::from_request(Some("something-else")),
            ProviderKind::SiliconFlow
        );
        // 与原有客户端保持一致：大小写敏感
        assert_eq!(
            ProviderKind::from_request(Some("RAGFlow")),
            ProviderKind::SiliconFlow
        );
        assert_eq!(
            ProviderKind::from_request(Some("ragflow")),
            ProviderKind::RagFlow
        );
    }

    #[test]
    fn test_provider_kind_display() {
        assert_eq!(ProviderKind::RagFlow.to_string(), "ragflow");
        assert_eq!(ProviderKind::SiliconFlow.to_string(), "siliconflow");
    }
}
