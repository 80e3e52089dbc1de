//! 日志初始化
//!
//! 代码中统一使用 `log` 门面，终端输出由 simplelog 负责。

use crate::config::LoggingConfig;
use crate::relay::RelayError;
use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

pub fn parse_level(level: &str) -> Result<LevelFilter, RelayError> {
    match level.trim().to_lowercase().as_str() {
        "off" => Ok(LevelFilter::Off),
        "error" => Ok(LevelFilter::Error),
        "warn" => Ok(LevelFilter::Warn),
        "info" => Ok(LevelFilter::Info),
        "debug" => Ok(LevelFilter::Debug),
        "trace" => Ok(LevelFilter::Trace),
        other => Err(RelayError::Config(format!("无效的日志级别: {other}"))),
    }
}

/// 初始化全局日志，只能调用一次
///
/// 只输出本 crate 的日志，屏蔽 hyper / reqwest 等依赖的内部日志。
pub fn init(config: &LoggingConfig) -> Result<(), RelayError> {
    let level = parse_level(&config.level)?;
    let log_config = ConfigBuilder::new()
        .add_filter_allow_str("chat_relay")
        .build();

    TermLogger::init(level, log_config, TerminalMode::Mixed, ColorChoice::Auto)
        .map_err(|e| RelayError::Config(format!("日志初始化失败: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("info").unwrap(), LevelFilter::Info);
        assert_eq!(parse_level(" DEBUG ").unwrap(), LevelFilter::Debug);
        assert_eq!(parse_level("off").unwrap(), LevelFilter::Off);
        assert!(parse_level("loud").is_err());
    }
}
