// ==========================================
// 牛只排放因子计算系统 - 配置层
// ==========================================
// 职责: 引擎容差与告警阈值,支持覆写
// 来源: 默认值 / JSON 文件 / config_kv 表
// ==========================================

pub mod config_manager;
pub mod engine_config;

// 重导出核心配置
pub use config_manager::{config_keys, ConfigManager, GLOBAL_SCOPE};
pub use engine_config::EngineConfig;
