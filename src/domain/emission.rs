// ==========================================
// 牛只排放因子计算系统 - 计算结果
// ==========================================
// 职责: 引擎对外暴露的派生量与排放因子
// 红线: 引擎内部不做四舍五入（展示层负责）
// ==========================================

use crate::domain::types::{AnimalType, EnergyComponent, ManureSystem};
use crate::i18n::t_with_args;
use serde::{Deserialize, Serialize};

/// 六项能量需求分量 (MJ/天)
///
/// 不属于该类别预算的分量不计算，记为 0。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EnergyComponents {
    pub maintenance: f64,
    pub activity: f64,
    pub lactation: f64,
    pub pregnancy: f64,
    pub growth: f64,
    pub work: f64,
}

impl EnergyComponents {
    pub fn get(&self, component: EnergyComponent) -> f64 {
        match component {
            EnergyComponent::Maintenance => self.maintenance,
            EnergyComponent::Activity => self.activity,
            EnergyComponent::Lactation => self.lactation,
            EnergyComponent::Pregnancy => self.pregnancy,
            EnergyComponent::Growth => self.growth,
            EnergyComponent::Work => self.work,
        }
    }

    pub fn sum(&self) -> f64 {
        self.maintenance + self.activity + self.lactation + self.pregnancy + self.growth + self.work
    }
}

/// 能量模型输出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyBudget {
    /// 日粮消化率 dep (%)
    pub diet_digestibility: f64,
    /// 维持净能/消化能比 rem
    pub maintenance_energy_ratio: f64,
    /// 生长净能/消化能比 reg（类别不含生长分量时为 None）
    pub growth_energy_ratio: Option<f64>,
    pub components: EnergyComponents,
    /// 犊牛哺乳摄入的总能 (MJ/天)，非犊牛为 0
    pub milk_energy_intake: f64,
    /// 总能需求 tge (MJ/天)
    pub total_gross_energy: f64,
}

/// 加权纤维
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedFiber {
    /// 中性洗涤纤维 (%)
    pub ndf_pct: f64,
    /// 酸性洗涤纤维 (%)
    pub adf_pct: f64,
}

/// 干物质采食量交叉校核
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntakeCheck {
    /// 实际采食量 cms (kg/天)
    pub consumed: f64,
    /// 潜在采食量 cpms (kg/天)
    pub potential: f64,
    /// consumed - potential
    pub difference: f64,
    /// (consumed - potential) / potential × 100
    pub relative_deviation_pct: f64,
}

/// 肠道发酵模型输出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntericFermentation {
    pub fiber: WeightedFiber,
    /// 日粮加权总能密度 (MJ/kg DM)
    pub diet_energy_density: f64,
    /// 干物质采食量 (kg/天)
    pub dry_matter_intake: f64,
    /// 干物质采食量占活重比例
    pub dry_matter_intake_live_weight_ratio: f64,
    /// 牧草采食量 (kg/天)
    pub forage_intake: f64,
    /// 补充料采食量 (kg/天)
    pub supplement_intake: f64,
    /// 3.5% 乳脂校正奶 (kg/天)
    pub fat_corrected_milk: f64,
    /// 潜在采食量无定义（维持净能或结果非正）时为 None
    pub intake_check: Option<IntakeCheck>,
    /// Ym (%)
    pub methane_conversion_ratio: f64,
    /// 年化天数（犊牛 273.75，其余 365）
    pub days_per_year: f64,
    /// kg CH4 / 头 / 年
    pub emission_factor: f64,
}

/// 粪便管理模型输出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManureManagement {
    /// 尿能项 UEf（粗蛋白与采食量的线性函数）
    pub urinary_energy_fraction: f64,
    /// 加权灰分 (%)
    pub weighted_ash_pct: f64,
    /// 挥发性固体 (kg DM/天)
    pub volatile_solids: f64,
    /// Bo (m³ CH4 / kg VS)
    pub max_methane_capacity: f64,
    pub system_a: ManureSystem,
    pub system_b: ManureSystem,
    /// 系统 A/B 的 MCF (%)
    pub mcf_a: f64,
    pub mcf_b: f64,
    /// 加权 MCF (%)
    pub weighted_mcf: f64,
    /// 加权粪便流向比例 (0..1)
    pub weighted_manure_fraction: f64,
    /// kg CH4 / 头 / 年
    pub emission_factor: f64,
}

/// 数据质量告警（不阻断计算）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataQualityWarning {
    YmOutOfBand { value: f64, min: f64, max: f64 },
    IntakeExceedsCapacity {
        consumed: f64,
        potential: f64,
        deviation_pct: f64,
    },
    PotentialIntakeUndefined { quantity: String, message: String },
}

impl DataQualityWarning {
    /// 按当前语言渲染告警文本
    pub fn message(&self) -> String {
        match self {
            DataQualityWarning::YmOutOfBand { value, min, max } => t_with_args(
                "warning.ym_out_of_band",
                &[
                    ("value", &format!("{:.3}", value)),
                    ("min", &min.to_string()),
                    ("max", &max.to_string()),
                ],
            ),
            DataQualityWarning::IntakeExceedsCapacity {
                consumed,
                potential,
                deviation_pct,
            } => t_with_args(
                "warning.intake_exceeds_capacity",
                &[
                    ("consumed", &format!("{:.3}", consumed)),
                    ("potential", &format!("{:.3}", potential)),
                    ("deviation", &format!("{:.1}", deviation_pct)),
                ],
            ),
            DataQualityWarning::PotentialIntakeUndefined { quantity, message } => t_with_args(
                "warning.potential_intake_undefined",
                &[("quantity", quantity.as_str()), ("message", message.as_str())],
            ),
        }
    }
}

/// 单次查询的完整结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionReport {
    pub animal_type: AnimalType,
    pub energy: EnergyBudget,
    pub enteric: EntericFermentation,
    pub manure: ManureManagement,
    pub warnings: Vec<DataQualityWarning>,
}

impl EmissionReport {
    pub fn total_gross_energy(&self) -> f64 {
        self.energy.total_gross_energy
    }

    pub fn diet_digestibility(&self) -> f64 {
        self.energy.diet_digestibility
    }

    pub fn methane_conversion_ratio(&self) -> f64 {
        self.enteric.methane_conversion_ratio
    }

    pub fn dry_matter_intake(&self) -> f64 {
        self.enteric.dry_matter_intake
    }

    pub fn potential_dry_matter_intake(&self) -> Option<f64> {
        self.enteric.intake_check.map(|check| check.potential)
    }

    pub fn enteric_emission_factor(&self) -> f64 {
        self.enteric.emission_factor
    }

    pub fn volatile_solids(&self) -> f64 {
        self.manure.volatile_solids
    }

    pub fn weighted_methane_conversion_factor(&self) -> f64 {
        self.manure.weighted_mcf
    }

    pub fn manure_emission_factor(&self) -> f64 {
        self.manure.emission_factor
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
