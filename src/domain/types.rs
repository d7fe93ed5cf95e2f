// ==========================================
// 牛只排放因子计算系统 - 领域类型定义
// ==========================================
// 依据: IPCC 2006/2019 Vol.4 Ch.10 - 3A1a 牛只分类
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 动物类型 (Animal Type)
// ==========================================
// 编号与参考库 animal_tipo 表一致 (1..7)
// 红线: 封闭枚举,新增类别必须在所有 match 中补齐
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnimalType {
    HighProducingDairyCow, // 3A1ai 高产奶牛
    LowProducingDairyCow,  // 3A1aii 低产奶牛
    BeefCow,               // 3A1aiii 肉用母牛
    BreedingBull,          // 3A1aiv 种公牛
    PreWeanedCalf,         // 3A1av 断奶前犊牛
    ReplacementHeifer,     // 3A1avi 后备母牛
    FeedlotCattle,         // 3A1avii 育肥牛
}

impl AnimalType {
    pub const ALL: [AnimalType; 7] = [
        AnimalType::HighProducingDairyCow,
        AnimalType::LowProducingDairyCow,
        AnimalType::BeefCow,
        AnimalType::BreedingBull,
        AnimalType::PreWeanedCalf,
        AnimalType::ReplacementHeifer,
        AnimalType::FeedlotCattle,
    ];

    /// 参考库中的编号
    pub fn id(&self) -> u8 {
        match self {
            AnimalType::HighProducingDairyCow => 1,
            AnimalType::LowProducingDairyCow => 2,
            AnimalType::BeefCow => 3,
            AnimalType::BreedingBull => 4,
            AnimalType::PreWeanedCalf => 5,
            AnimalType::ReplacementHeifer => 6,
            AnimalType::FeedlotCattle => 7,
        }
    }

    /// IPCC 清单类别代码
    pub fn ipcc_code(&self) -> &'static str {
        match self {
            AnimalType::HighProducingDairyCow => "3A1ai",
            AnimalType::LowProducingDairyCow => "3A1aii",
            AnimalType::BeefCow => "3A1aiii",
            AnimalType::BreedingBull => "3A1aiv",
            AnimalType::PreWeanedCalf => "3A1av",
            AnimalType::ReplacementHeifer => "3A1avi",
            AnimalType::FeedlotCattle => "3A1avii",
        }
    }

    /// 是否要求 牧草% + 补充料% = 100
    ///
    /// 断奶前犊牛部分能量来自哺乳，日粮比例只设上限。
    pub fn has_closed_diet(&self) -> bool {
        !matches!(self, AnimalType::PreWeanedCalf)
    }
}

impl TryFrom<u8> for AnimalType {
    type Error = String;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        AnimalType::ALL
            .iter()
            .copied()
            .find(|t| t.id() == id)
            .ok_or_else(|| format!("未知动物类型编号: {} (允许 1..7)", id))
    }
}

impl fmt::Display for AnimalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ipcc_code())
    }
}

// ==========================================
// 生产体系 (Production System)
// ==========================================
// 用于选择 Bo（粪便最大产甲烷能力）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductionSystem {
    HighProductivity, // 1 高生产力体系
    Other,            // 2 其他体系
}

impl ProductionSystem {
    pub const ALL: [ProductionSystem; 2] = [ProductionSystem::HighProductivity, ProductionSystem::Other];

    pub fn id(&self) -> u8 {
        match self {
            ProductionSystem::HighProductivity => 1,
            ProductionSystem::Other => 2,
        }
    }
}

impl TryFrom<u8> for ProductionSystem {
    type Error = String;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            1 => Ok(ProductionSystem::HighProductivity),
            2 => Ok(ProductionSystem::Other),
            other => Err(format!("未知生产体系编号: {} (允许 1 或 2)", other)),
        }
    }
}

impl fmt::Display for ProductionSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductionSystem::HighProductivity => write!(f, "HIGH_PRODUCTIVITY"),
            ProductionSystem::Other => write!(f, "OTHER"),
        }
    }
}

// ==========================================
// 粪便管理系统 (AWMS)
// ==========================================
// 每个系统对应一条温度响应 MCF 曲线
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ManureSystem {
    Pasture,         // 1 放牧/草场
    DailySpread,     // 2 每日撒施
    SolidStorage,    // 3 固体储存
    DryLot,          // 4 干燥圈舍
    LiquidSlurry,    // 5 液体/浆液
    AnaerobicLagoon, // 6 厌氧塘
}

impl ManureSystem {
    pub const ALL: [ManureSystem; 6] = [
        ManureSystem::Pasture,
        ManureSystem::DailySpread,
        ManureSystem::SolidStorage,
        ManureSystem::DryLot,
        ManureSystem::LiquidSlurry,
        ManureSystem::AnaerobicLagoon,
    ];

    pub fn id(&self) -> u8 {
        match self {
            ManureSystem::Pasture => 1,
            ManureSystem::DailySpread => 2,
            ManureSystem::SolidStorage => 3,
            ManureSystem::DryLot => 4,
            ManureSystem::LiquidSlurry => 5,
            ManureSystem::AnaerobicLagoon => 6,
        }
    }
}

impl TryFrom<u8> for ManureSystem {
    type Error = String;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        ManureSystem::ALL
            .iter()
            .copied()
            .find(|s| s.id() == id)
            .ok_or_else(|| format!("未知粪便管理系统编号: {} (允许 1..6)", id))
    }
}

impl fmt::Display for ManureSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManureSystem::Pasture => write!(f, "PASTURE"),
            ManureSystem::DailySpread => write!(f, "DAILY_SPREAD"),
            ManureSystem::SolidStorage => write!(f, "SOLID_STORAGE"),
            ManureSystem::DryLot => write!(f, "DRY_LOT"),
            ManureSystem::LiquidSlurry => write!(f, "LIQUID_SLURRY"),
            ManureSystem::AnaerobicLagoon => write!(f, "ANAEROBIC_LAGOON"),
        }
    }
}

// ==========================================
// 能量分量 (Energy Component)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyComponent {
    Maintenance, // 维持
    Activity,    // 活动
    Lactation,   // 泌乳
    Pregnancy,   // 妊娠
    Growth,      // 生长
    Work,        // 役用
}

impl fmt::Display for EnergyComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnergyComponent::Maintenance => write!(f, "maintenance"),
            EnergyComponent::Activity => write!(f, "activity"),
            EnergyComponent::Lactation => write!(f, "lactation"),
            EnergyComponent::Pregnancy => write!(f, "pregnancy"),
            EnergyComponent::Growth => write!(f, "growth"),
            EnergyComponent::Work => write!(f, "work"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_calf_has_open_diet() {
        for t in AnimalType::ALL {
            assert_eq!(t.has_closed_diet(), t != AnimalType::PreWeanedCalf, "{}", t);
        }
    }

    #[test]
    fn test_animal_type_id_roundtrip() {
        for t in AnimalType::ALL {
            assert_eq!(AnimalType::try_from(t.id()), Ok(t));
        }
        assert!(AnimalType::try_from(0).is_err());
        assert!(AnimalType::try_from(8).is_err());
    }

    #[test]
    fn test_manure_system_rejects_unknown_id() {
        assert_eq!(ManureSystem::try_from(6), Ok(ManureSystem::AnaerobicLagoon));
        assert!(ManureSystem::try_from(7).is_err());
    }

    #[test]
    fn test_display_uses_ipcc_code() {
        assert_eq!(AnimalType::PreWeanedCalf.to_string(), "3A1av");
        assert_eq!(ProductionSystem::Other.to_string(), "OTHER");
    }
}
