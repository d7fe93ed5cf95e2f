// ==========================================
// 牛只排放因子计算系统 - 动物画像
// ==========================================
// 职责: 单头（单类）动物的物理/日粮/粪便管理输入
// 红线: 构造时一次性校验,越界直接拒绝,不做截断
// ==========================================

use crate::domain::error::{DomainResult, ValidationError};
use crate::domain::types::{AnimalType, ManureSystem, ProductionSystem};
use serde::{Deserialize, Serialize};

/// 乳用品种（Bos taurus）在 categoria_animal 中的编号
pub const DAIRY_BREED_CATEGORY_ID: u32 = 1;

/// 比例合计 = 100 的默认容差 (百分点)
pub const DEFAULT_SHARE_TOLERANCE: f64 = 1e-6;

/// 原始输入（未校验）
///
/// 字段单位:
/// - 体重: kg
/// - 温度: °C
/// - 比例: %
/// - 产奶量: L/年
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileInput {
    pub animal_type_id: u8,
    pub category_id: u32,
    pub live_weight_kg: f64,
    pub adult_weight_kg: f64,
    pub ambient_temp_c: f64,
    pub forage_pct: f64,
    pub supplement_pct: f64,
    pub forage_id: u32,
    pub supplement_id: u32,
    pub activity_id: u32,
    pub pregnancy_id: u32,
    pub sexual_condition_id: u32,
    /// 日增重 (kg/天)
    #[serde(default)]
    pub weight_gain_kg_day: f64,
    #[serde(default)]
    pub milk_l_year: f64,
    #[serde(default)]
    pub milk_fat_pct: f64,
    /// 每日役用小时
    #[serde(default)]
    pub work_hours: f64,
    pub production_system_id: u8,
    pub manure_system_a_id: u8,
    pub manure_share_a_pct: f64,
    pub manure_system_b_id: u8,
    pub manure_share_b_pct: f64,
}

impl Default for ProfileInput {
    /// 参考算例：500 kg 高产奶牛，13 °C，全放牧日粮
    fn default() -> Self {
        Self {
            animal_type_id: 1,
            category_id: DAIRY_BREED_CATEGORY_ID,
            live_weight_kg: 500.0,
            adult_weight_kg: 550.0,
            ambient_temp_c: 13.0,
            forage_pct: 100.0,
            supplement_pct: 0.0,
            forage_id: 1,
            supplement_id: 40,
            activity_id: 2,
            pregnancy_id: 2,
            sexual_condition_id: 1,
            weight_gain_kg_day: 0.0,
            milk_l_year: 3660.0,
            milk_fat_pct: 3.2,
            work_hours: 0.0,
            production_system_id: 1,
            manure_system_a_id: 1,
            manure_share_a_pct: 100.0,
            manure_system_b_id: 3,
            manure_share_b_pct: 0.0,
        }
    }
}

/// 已校验的动物画像（构造后不可变）
#[derive(Debug, Clone, PartialEq)]
pub struct AnimalProfile {
    input: ProfileInput,
    animal_type: AnimalType,
    production_system: ProductionSystem,
    manure_system_a: ManureSystem,
    manure_system_b: ManureSystem,
}

impl AnimalProfile {
    /// 校验并构造
    ///
    /// # 参数
    /// - share_tolerance: 比例合计与 100 的允许偏差
    ///
    /// # 错误
    /// - ValidationError: 任一字段越界
    pub fn new(input: ProfileInput, share_tolerance: f64) -> DomainResult<Self> {
        let animal_type = AnimalType::try_from(input.animal_type_id)
            .map_err(|e| ValidationError::new("animal_type_id", e))?;
        let production_system = ProductionSystem::try_from(input.production_system_id)
            .map_err(|e| ValidationError::new("production_system_id", e))?;
        let manure_system_a = ManureSystem::try_from(input.manure_system_a_id)
            .map_err(|e| ValidationError::new("manure_system_a_id", e))?;
        let manure_system_b = ManureSystem::try_from(input.manure_system_b_id)
            .map_err(|e| ValidationError::new("manure_system_b_id", e))?;

        check_range("ambient_temp_c", input.ambient_temp_c, -10.0, 50.0)?;
        check_positive("live_weight_kg", input.live_weight_kg)?;
        check_positive("adult_weight_kg", input.adult_weight_kg)?;
        check_range("milk_l_year", input.milk_l_year, 0.0, f64::MAX)?;
        check_range("milk_fat_pct", input.milk_fat_pct, 0.0, 100.0)?;
        check_range("weight_gain_kg_day", input.weight_gain_kg_day, 0.0, f64::MAX)?;
        check_range("work_hours", input.work_hours, 0.0, 24.0)?;

        // 日粮比例
        check_range("forage_pct", input.forage_pct, 0.0, 100.0)?;
        check_range("supplement_pct", input.supplement_pct, 0.0, 100.0)?;
        let diet_sum = input.forage_pct + input.supplement_pct;
        if animal_type.has_closed_diet() {
            check_sum_100("forage_pct+supplement_pct", diet_sum, share_tolerance)?;
        } else {
            check_sum_at_most_100("forage_pct+supplement_pct", diet_sum, share_tolerance)?;
        }

        // 粪便管理比例
        check_range("manure_share_a_pct", input.manure_share_a_pct, 0.0, 100.0)?;
        check_range("manure_share_b_pct", input.manure_share_b_pct, 0.0, 100.0)?;
        check_sum_100(
            "manure_share_a_pct+manure_share_b_pct",
            input.manure_share_a_pct + input.manure_share_b_pct,
            share_tolerance,
        )?;

        if animal_type == AnimalType::HighProducingDairyCow {
            validate_high_producing_dairy(&input)?;
        }

        Ok(Self {
            input,
            animal_type,
            production_system,
            manure_system_a,
            manure_system_b,
        })
    }

    pub fn input(&self) -> &ProfileInput {
        &self.input
    }

    pub fn animal_type(&self) -> AnimalType {
        self.animal_type
    }

    pub fn production_system(&self) -> ProductionSystem {
        self.production_system
    }

    pub fn manure_system_a(&self) -> ManureSystem {
        self.manure_system_a
    }

    pub fn manure_system_b(&self) -> ManureSystem {
        self.manure_system_b
    }

    /// 日产奶量 (kg/天)
    pub fn daily_milk(&self) -> f64 {
        self.input.milk_l_year / 365.0
    }
}

impl TryFrom<ProfileInput> for AnimalProfile {
    type Error = ValidationError;

    fn try_from(input: ProfileInput) -> Result<Self, Self::Error> {
        AnimalProfile::new(input, DEFAULT_SHARE_TOLERANCE)
    }
}

// ==========================================
// 校验辅助
// ==========================================

/// 3A1ai 高产奶牛的品种范围
fn validate_high_producing_dairy(input: &ProfileInput) -> DomainResult<()> {
    check_range("live_weight_kg", input.live_weight_kg, 250.0, 700.0)?;
    check_range("milk_l_year", input.milk_l_year, 2440.0, 15250.0)?;
    check_range("milk_fat_pct", input.milk_fat_pct, 2.0, 6.0)?;
    if input.category_id != DAIRY_BREED_CATEGORY_ID {
        return Err(ValidationError::new(
            "category_id",
            format!(
                "高产奶牛只能属于乳用品种类别 ({}), 实际 {}",
                DAIRY_BREED_CATEGORY_ID, input.category_id
            ),
        ));
    }
    Ok(())
}

// NaN 不满足任何比较，自然落入错误分支
fn check_range(field: &str, value: f64, min: f64, max: f64) -> DomainResult<()> {
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(ValidationError::new(
            field,
            format!("值 {} 超出范围 [{}, {}]", value, min, max),
        ))
    }
}

fn check_positive(field: &str, value: f64) -> DomainResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::new(
            field,
            format!("必须为正数, 实际 {}", value),
        ))
    }
}

fn check_sum_100(field: &str, sum: f64, tolerance: f64) -> DomainResult<()> {
    if (sum - 100.0).abs() <= tolerance {
        Ok(())
    } else {
        Err(ValidationError::new(
            field,
            format!("比例合计必须为 100, 实际 {}", sum),
        ))
    }
}

fn check_sum_at_most_100(field: &str, sum: f64, tolerance: f64) -> DomainResult<()> {
    if sum <= 100.0 + tolerance {
        Ok(())
    } else {
        Err(ValidationError::new(
            field,
            format!("比例合计不能超过 100, 实际 {}", sum),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(input: ProfileInput) -> DomainResult<AnimalProfile> {
        AnimalProfile::new(input, DEFAULT_SHARE_TOLERANCE)
    }

    #[test]
    fn test_default_input_is_valid() {
        let profile = build(ProfileInput::default()).unwrap();
        assert_eq!(profile.animal_type(), AnimalType::HighProducingDairyCow);
        assert_eq!(profile.manure_system_a(), ManureSystem::Pasture);
        assert!((profile.daily_milk() - 10.027397260273972).abs() < 1e-12);
    }

    #[test]
    fn test_temperature_bounds_inclusive() {
        let mut input = ProfileInput::default();
        input.ambient_temp_c = -10.0;
        assert!(build(input.clone()).is_ok());
        input.ambient_temp_c = 50.0;
        assert!(build(input.clone()).is_ok());
        input.ambient_temp_c = 50.1;
        let err = build(input).unwrap_err();
        assert_eq!(err.field, "ambient_temp_c");
    }

    #[test]
    fn test_nan_weight_rejected() {
        let mut input = ProfileInput::default();
        input.animal_type_id = 6;
        input.live_weight_kg = f64::NAN;
        assert_eq!(build(input).unwrap_err().field, "live_weight_kg");
    }

    #[test]
    fn test_open_diet_allowed_for_calf_only() {
        let mut input = ProfileInput::default();
        input.animal_type_id = 5;
        input.forage_pct = 60.0;
        input.supplement_pct = 30.0;
        assert!(build(input.clone()).is_ok());

        input.animal_type_id = 6;
        assert_eq!(build(input).unwrap_err().field, "forage_pct+supplement_pct");
    }

    #[test]
    fn test_open_diet_sum_capped_at_100() {
        let mut input = ProfileInput::default();
        input.animal_type_id = 5;
        input.category_id = 2;
        input.forage_pct = 100.0;
        input.supplement_pct = 30.0;
        let err = build(input.clone()).unwrap_err();
        assert_eq!(err.field, "forage_pct+supplement_pct");

        input.supplement_pct = 0.0;
        assert!(build(input).is_ok());
    }

    #[test]
    fn test_unknown_manure_system_rejected() {
        let mut input = ProfileInput::default();
        input.manure_system_b_id = 9;
        let err = build(input).unwrap_err();
        assert_eq!(err.field, "manure_system_b_id");
    }
}
