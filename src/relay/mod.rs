//! 中继服务器模块
//!
//! 提供本地 HTTP 中继，把对话和网页总结请求转发到硅基流动或自托管的 RAGFlow

pub mod error;
pub mod forwarder;
mod handlers;
pub mod http_client;
pub mod log_codes;
pub mod providers;
pub mod server;
pub mod types;

pub use error::RelayError;
pub use forwarder::RequestForwarder;
pub use providers::ProviderKind;
pub use server::{build_router, RelayServer, RelayServerInfo, RelayState};
pub use types::{ChatMessage, ChatRequest, SummariseRequest};
