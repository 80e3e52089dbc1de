//! 网页对话与总结的本地中继
//!
//! 接收浏览器侧的 `/chat` 与 `/summarise` 请求，转发到硅基流动的 OpenAI 兼容接口，
//! 或经过资源发现转发到自托管的 RAGFlow，并把上游响应归一为纯文本回复。

pub mod config;
pub mod logging;
pub mod relay;
pub mod services;

pub use config::RelayConfig;
pub use relay::{RelayError, RelayServer, RelayServerInfo, RelayState};
pub use services::{ChatService, SummariseService};
