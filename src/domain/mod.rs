// ==========================================
// 牛只排放因子计算系统 - 领域层
// ==========================================
// 职责: 输入画像、参考数据记录、计算结果
// ==========================================

pub mod emission;
pub mod error;
pub mod profile;
pub mod reference;
pub mod types;

// 重导出核心类型
pub use emission::{
    DataQualityWarning, EmissionReport, EnergyBudget, EnergyComponents, EntericFermentation,
    IntakeCheck, ManureManagement, WeightedFiber,
};
pub use error::{DomainResult, ValidationError};
pub use profile::{AnimalProfile, ProfileInput, DAIRY_BREED_CATEGORY_ID, DEFAULT_SHARE_TOLERANCE};
pub use reference::{
    default_max_methane_capacity, CategoryCoefficients, FeedComposition, ReferenceData,
};
pub use types::{AnimalType, EnergyComponent, ManureSystem, ProductionSystem};
