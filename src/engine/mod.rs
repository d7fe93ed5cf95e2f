// ==========================================
// 牛只排放因子计算系统 - 引擎层
// ==========================================
// 职责: IPCC Tier 2 生物能量学计算链
// 红线: 引擎不持有数据库连接,不做 I/O
// ==========================================

pub mod batch;
pub mod diet_energy;
pub mod dispatcher;
pub mod enteric;
pub mod error;
pub mod intake;
pub mod manure;
pub mod mcf;
pub mod orchestrator;

// 重导出核心引擎
pub use batch::{BatchEvaluator, BatchRecord, BatchRowResult, BatchSummary, RowOutcome};
pub use diet_energy::DietEnergyModel;
pub use dispatcher::{CategoryBudget, DAYS_PER_YEAR, PRE_WEANING_DAYS_PER_YEAR};
pub use enteric::EntericModel;
pub use error::{EngineError, EngineResult};
pub use manure::ManureModel;
pub use mcf::methane_conversion_factor;
pub use orchestrator::EmissionEngine;
