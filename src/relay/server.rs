//! HTTP 中继服务器
//!
//! 基于 Axum 的 HTTP 服务器，暴露 /chat、/summarise 与 /health

use super::{handlers, log_codes::srv, RelayError};
use crate::config::{ServerConfig, UpstreamConfig};
use crate::services::{ChatService, SummariseService};
use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, RwLock};
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};

/// 中继服务器状态（共享）
#[derive(Clone)]
pub struct RelayState {
    pub chat: ChatService,
    pub summarise: SummariseService,
}

impl RelayState {
    pub fn new(chat: ChatService) -> Self {
        Self {
            summarise: SummariseService::new(chat.clone()),
            chat,
        }
    }

    pub fn from_config(upstream: UpstreamConfig) -> Result<Self, RelayError> {
        Ok(Self::new(ChatService::from_config(upstream)?))
    }
}

/// 中继服务器信息
#[derive(Debug, Clone)]
pub struct RelayServerInfo {
    pub address: String,
    /// 实际监听端口（配置为 0 时由系统分配）
    pub port: u16,
    pub started_at: String,
}

/// 等待进行中的请求完成的最长时间
const STOP_TIMEOUT: Duration = Duration::from_secs(30);

pub fn build_router(state: RelayState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/chat",
            post(handlers::handle_chat).fallback(handlers::method_not_allowed),
        )
        .route(
            "/summarise",
            post(handlers::handle_summarise).fallback(handlers::method_not_allowed),
        )
        .layer(cors)
        .with_state(state)
}

/// 中继 HTTP 服务器
pub struct RelayServer {
    config: ServerConfig,
    state: RelayState,
    shutdown_tx: Arc<RwLock<Option<oneshot::Sender<()>>>>,
    server_handle: Arc<RwLock<Option<JoinHandle<()>>>>,
}

impl RelayServer {
    pub fn new(config: ServerConfig, state: RelayState) -> Self {
        Self {
            config,
            state,
            shutdown_tx: Arc::new(RwLock::new(None)),
            server_handle: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn start(&self) -> Result<RelayServerInfo, RelayError> {
        // 检查是否已在运行
        if self.shutdown_tx.read().await.is_some() {
            return Err(RelayError::AlreadyRunning);
        }

        let addr: SocketAddr =
            format!("{}:{}", self.config.listen_address, self.config.listen_port)
                .parse()
                .map_err(|e| RelayError::BindFailed(format!("无效的地址: {e}")))?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let app = build_router(self.state.clone());

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| RelayError::BindFailed(e.to_string()))?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| RelayError::BindFailed(e.to_string()))?;

        log::info!("[{}] 中继服务器启动于 {local_addr}", srv::STARTED);

        *self.shutdown_tx.write().await = Some(shutdown_tx);

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
            {
                log::error!("[{}] 服务器任务异常退出: {e}", srv::TASK_ERROR);
            }
            log::info!("[{}] 中继服务器已停止", srv::STOPPED);
        });
        *self.server_handle.write().await = Some(handle);

        Ok(RelayServerInfo {
            address: local_addr.ip().to_string(),
            port: local_addr.port(),
            started_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    /// 停止接收新连接，并等待进行中的请求完成
    pub async fn stop(&self) -> Result<(), RelayError> {
        self.stop_with_timeout(STOP_TIMEOUT).await
    }

    pub async fn stop_with_timeout(&self, timeout: Duration) -> Result<(), RelayError> {
        let tx = self
            .shutdown_tx
            .write()
            .await
            .take()
            .ok_or(RelayError::NotRunning)?;
        let _ = tx.send(());

        let Some(mut handle) = self.server_handle.write().await.take() else {
            return Ok(());
        };
        match tokio::time::timeout(timeout, &mut handle).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                log::error!("[{}] 服务器任务异常退出: {e}", srv::TASK_ERROR);
                Ok(())
            }
            Err(_) => {
                log::warn!(
                    "[{}] 等待请求完成超时 ({}s)，强制关闭",
                    srv::TASK_ERROR,
                    timeout.as_secs()
                );
                handle.abort();
                Err(RelayError::StopTimeout)
            }
        }
    }

    pub async fn is_running(&self) -> bool {
        self.shutdown_tx.read().await.is_some()
    }
}
