//! Authentication Types
//!
//! 调用方随请求传入的凭证。所有上游都使用 `Authorization: Bearer <api_key>`。

use crate::relay::RelayError;

/// 认证信息
#[derive(Debug, Clone)]
pub struct AuthInfo {
    /// API Key
    pub api_key: String,
}

impl AuthInfo {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    /// 从请求中的可选凭证构造认证信息
    ///
    /// 凭证缺失或为空白时返回 `RelayError::Precondition(missing_message)`，
    /// 调用方据此在发起任何网络请求之前失败。
    /// 只含空白的凭证同样视为缺失。
    pub fn require(credential: Option<&str>, missing_message: &str) -> Result<Self, RelayError> {
        match credential {
            Some(key) if !key.trim().is_empty() => Ok(Self::new(key)),
            _ => Err(RelayError::precondition(missing_message)),
        }
    }

    /// `Authorization` 头的值
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.api_key)
    }

    /// 返回遮蔽后的 API Key（用于日志输出）
    ///
    /// 显示前4位和后4位，中间用 `...` 代替
    /// 如果 key 长度不足8位，则返回 `***`
    pub fn masked_key(&self) -> String {
        if self.api_key.chars().count() > 8 {
            let prefix: String = self.api_key.chars().take(4).collect();
            let suffix: String = self
                .api_key
                .chars()
                .rev()
                .take(4)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            format!("{prefix}...{suffix}")
        } else {
            "***".to_string()
        }
    }
}
