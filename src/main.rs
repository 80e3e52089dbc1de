use std::path::PathBuf;

use anyhow::Context;
use chat_relay::{logging, RelayConfig, RelayServer, RelayState};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "chat-relay", version, about = "网页对话与总结的本地中继")]
struct Args {
    /// 监听端口（默认 8080）
    port: Option<u16>,

    /// 监听地址
    #[arg(long, value_name = "ADDR")]
    host: Option<String>,

    /// TOML 配置文件
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// 日志级别：off / error / warn / info / debug / trace
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => RelayConfig::load(path)
            .with_context(|| format!("加载配置失败: {}", path.display()))?,
        None => RelayConfig::default(),
    };
    config.apply_overrides(args.host, args.port, args.log_level);
    config.validate().context("配置校验失败")?;

    logging::init(&config.logging)?;

    let state = RelayState::from_config(config.upstream.clone())?;
    let server = RelayServer::new(config.server.clone(), state);
    let info = server.start().await?;
    log::info!(
        "中继已就绪: http://{}:{} (上游: {}, 默认模型: {})",
        info.address,
        info.port,
        config.upstream.completions_url,
        config.upstream.default_model
    );

    tokio::signal::ctrl_c()
        .await
        .context("等待退出信号失败")?;
    log::info!("收到退出信号，正在关闭");
    server.stop().await?;

    Ok(())
}
