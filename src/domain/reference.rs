// ==========================================
// 牛只排放因子计算系统 - 参考数据记录
// ==========================================
// 来源: 参考数据提供方（SQLite / 内存）
// 红线: 引擎只接收已解析的记录,不持有连接
// ==========================================

use crate::domain::types::{AnimalType, ProductionSystem};
use serde::{Deserialize, Serialize};

/// 动物类别系数 (categoria_animal)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryCoefficients {
    /// 维持净能系数 a1 (MJ/天/kg^0.75)
    pub a1: f64,
    /// 舒适温度 tc (°C)
    pub tc: f64,
    /// 采食量温度修正系数 rcms (%/°C)
    pub rcms: f64,
    /// 体况指数 bi
    pub bi: f64,
}

/// 饲料/牧草营养成分 (variedad_pasto)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeedComposition {
    /// 可消化能 (MJ/kg DM)
    pub digestible_energy: f64,
    /// 总能 (MJ/kg DM)
    pub gross_energy: f64,
    /// 中性洗涤纤维 (%)
    pub ndf_pct: f64,
    /// 酸性洗涤纤维 (%)
    pub adf_pct: f64,
    /// 维持净能 (MJ/kg DM)
    pub net_energy_maintenance: f64,
    /// 灰分 (%)
    pub ash_pct: f64,
    /// 粗蛋白 (%)
    pub crude_protein_pct: f64,
}

/// 单次计算所需的全部参考数据（已按画像解析）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceData {
    pub category: CategoryCoefficients,
    pub forage: FeedComposition,
    pub supplement: FeedComposition,
    /// 活动系数 Ca
    pub activity_coefficient: f64,
    /// 妊娠系数 Cp
    pub pregnancy_coefficient: f64,
    /// 性别/去势系数 fcs
    pub sexual_condition_factor: f64,
    /// Bo (m³ CH4 / kg VS)
    pub max_methane_capacity: f64,
    /// 系统 A 的粪便流向比例 (0..1)
    pub manure_fraction_a: f64,
    /// 系统 B 的粪便流向比例 (0..1)
    pub manure_fraction_b: f64,
}

/// IPCC 默认 Bo 表 (m³ CH4 / kg VS)
///
/// 高产奶牛在高生产力系统下取 0.24,其余类别在高生产力系统下取 0.18,
/// 其它生产系统一律 0.13。
pub fn default_max_methane_capacity(animal_type: AnimalType, production_system: ProductionSystem) -> f64 {
    match (animal_type, production_system) {
        (AnimalType::HighProducingDairyCow, ProductionSystem::HighProductivity) => 0.24,
        (_, ProductionSystem::HighProductivity) => 0.18,
        (_, ProductionSystem::Other) => 0.13,
    }
}
