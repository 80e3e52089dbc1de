//! 中继模块日志码定义
//!
//! 格式: [模块-编号] 消息
//! - SRV: Server (服务器)
//! - FWD: Forwarder (转发器)
//! - DSC: Discovery (RAGFlow 资源发现)
//! - NRM: Normalize (响应归一化)

/// 服务器日志码
pub mod srv {
    pub const STARTED: &str = "SRV-001";
    pub const STOPPED: &str = "SRV-002";
    pub const TASK_ERROR: &str = "SRV-003";
}

/// 转发器日志码
pub mod fwd {
    pub const SEND_FAILED: &str = "FWD-001";
    pub const TIMEOUT: &str = "FWD-002";
    pub const READ_BODY_FAILED: &str = "FWD-003";
    pub const UPSTREAM_STATUS: &str = "FWD-004";
    pub const MALFORMED_BODY: &str = "FWD-005";
}

/// 资源发现日志码
pub mod dsc {
    pub const RESOURCE_FOUND: &str = "DSC-001";
    pub const PROBE_EMPTY: &str = "DSC-002";
    pub const PROBE_FAILED: &str = "DSC-003";
    pub const FALLBACK_GENERIC: &str = "DSC-004";
}

/// 响应归一化日志码
pub mod nrm {
    pub const SHAPE_MATCHED: &str = "NRM-001";
    pub const PASSTHROUGH: &str = "NRM-002";
}
