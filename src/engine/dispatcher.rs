// ==========================================
// 牛只排放因子计算系统 - 类别分派
// ==========================================
// 职责: 按动物类型确定能量分量组合与年化天数
// 红线: 只用 match 分派,新增类别由编译器检查穷尽
// ==========================================

use crate::domain::types::{AnimalType, EnergyComponent};

/// 一年天数
pub const DAYS_PER_YEAR: f64 = 365.0;

/// 断奶前犊牛的年化天数（断奶前约 9 个月）
pub const PRE_WEANING_DAYS_PER_YEAR: f64 = 273.75;

/// 类别能量预算规则
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryBudget {
    /// 参与求和的能量分量
    pub components: &'static [EnergyComponent],
    /// 是否扣除哺乳摄入能量
    pub subtract_milk_energy: bool,
    /// 肠道排放年化天数
    pub days_per_year: f64,
}

const COW_COMPONENTS: &[EnergyComponent] = &[
    EnergyComponent::Maintenance,
    EnergyComponent::Activity,
    EnergyComponent::Lactation,
    EnergyComponent::Pregnancy,
    EnergyComponent::Work,
];

const BULL_COMPONENTS: &[EnergyComponent] = &[
    EnergyComponent::Maintenance,
    EnergyComponent::Activity,
    EnergyComponent::Work,
];

const GROWING_COMPONENTS: &[EnergyComponent] = &[
    EnergyComponent::Maintenance,
    EnergyComponent::Activity,
    EnergyComponent::Growth,
    EnergyComponent::Work,
];

impl CategoryBudget {
    pub fn for_type(animal_type: AnimalType) -> Self {
        match animal_type {
            AnimalType::HighProducingDairyCow
            | AnimalType::LowProducingDairyCow
            | AnimalType::BeefCow => CategoryBudget {
                components: COW_COMPONENTS,
                subtract_milk_energy: false,
                days_per_year: DAYS_PER_YEAR,
            },
            AnimalType::BreedingBull => CategoryBudget {
                components: BULL_COMPONENTS,
                subtract_milk_energy: false,
                days_per_year: DAYS_PER_YEAR,
            },
            // 犊牛部分能量来自哺乳，总能扣除哺乳摄入
            AnimalType::PreWeanedCalf => CategoryBudget {
                components: GROWING_COMPONENTS,
                subtract_milk_energy: true,
                days_per_year: PRE_WEANING_DAYS_PER_YEAR,
            },
            AnimalType::ReplacementHeifer | AnimalType::FeedlotCattle => CategoryBudget {
                components: GROWING_COMPONENTS,
                subtract_milk_energy: false,
                days_per_year: DAYS_PER_YEAR,
            },
        }
    }

    pub fn includes(&self, component: EnergyComponent) -> bool {
        self.components.contains(&component)
    }
}
