// ==========================================
// 牛只排放因子计算系统 - 核心库
// ==========================================
// 方法: IPCC Tier 2 生物能量学
// 产出: 肠道发酵 / 粪便管理 CH4 排放因子
// 技术栈: Rust + SQLite
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 画像、参考记录、计算结果
pub mod domain;

// 数据仓储层 - 参考数据
pub mod repository;

// 引擎层 - 计算链
pub mod engine;

// 导入层 - 畜群记录文件
pub mod importer;

// 配置层 - 容差与阈值
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AnimalType, EnergyComponent, ManureSystem, ProductionSystem};

// 领域实体
pub use domain::{
    AnimalProfile, CategoryCoefficients, DataQualityWarning, EmissionReport, FeedComposition,
    ProfileInput, ReferenceData, ValidationError,
};

// 引擎
pub use engine::{BatchEvaluator, BatchRecord, BatchSummary, EmissionEngine, EngineError, EngineResult};

// 参考数据
pub use repository::{
    InMemoryReferenceProvider, ReferenceDataProvider, RepositoryError, SqliteReferenceRepository,
};

// 配置
pub use config::{ConfigManager, EngineConfig};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "牛只排放因子计算系统";
