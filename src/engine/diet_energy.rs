// ==========================================
// 牛只排放因子计算系统 - 日粮与能量模型
// ==========================================
// 依据: IPCC 2019 Vol.4 Ch.10 式 10.3 ~ 10.16
// ==========================================
// 职责: 日粮消化率、能量转化比、六项能量分量、总能需求
// 输入: 动物画像 + 类别系数 + 两种饲料成分
// 输出: EnergyBudget
// ==========================================

use crate::config::EngineConfig;
use crate::domain::emission::{EnergyBudget, EnergyComponents};
use crate::domain::profile::AnimalProfile;
use crate::domain::reference::{CategoryCoefficients, FeedComposition, ReferenceData};
use crate::domain::types::EnergyComponent;
use crate::engine::dispatcher::CategoryBudget;
use crate::engine::error::{ensure_finite, ensure_positive, EngineError, EngineResult};

/// 维持净能温度修正系数 (MJ/天/kg^0.75/°C)
const TEMPERATURE_COEFFICIENT: f64 = 0.0029288;

/// 生长净能常数 22.02
const GROWTH_CONSTANT: f64 = 22.02;

/// 生长净能增重指数
const GROWTH_GAIN_EXPONENT: f64 = 1.097;

/// 代谢体重指数
const METABOLIC_EXPONENT: f64 = 0.75;

// ==========================================
// 日粮消化率
// ==========================================

/// 日粮消化率 dep (%)
///
/// `dep = (DEf·100/GEf)·pf/100 + (DEs·100/GEs)·ps/100`
///
/// 任一饲料总能非正即报错（不产生 NaN）。
pub fn diet_digestibility(
    forage: &FeedComposition,
    supplement: &FeedComposition,
    forage_pct: f64,
    supplement_pct: f64,
) -> EngineResult<f64> {
    let ge_f = ensure_positive("forage.gross_energy", forage.gross_energy)?;
    let ge_s = ensure_positive("supplement.gross_energy", supplement.gross_energy)?;

    let dep = (forage.digestible_energy * 100.0 / ge_f) * forage_pct / 100.0
        + (supplement.digestible_energy * 100.0 / ge_s) * supplement_pct / 100.0;

    if !(dep > 0.0 && dep <= 100.0) {
        return Err(EngineError::computation(
            "diet_digestibility",
            format!("消化率必须在 (0, 100] 内, 实际 {}", dep),
        ));
    }
    Ok(dep)
}

// ==========================================
// 能量转化比
// ==========================================

fn check_digestibility_floor(quantity: &str, dep: f64, min_dep: f64) -> EngineResult<()> {
    if dep < min_dep || !dep.is_finite() {
        return Err(EngineError::computation(
            quantity,
            format!("消化率 {} 低于多项式适用下限 {}", dep, min_dep),
        ));
    }
    Ok(())
}

/// 维持净能/消化能比 rem
///
/// `rem = 1.123 − 4.092e-3·dep + 1.126e-5·dep² − 25.4/dep`
pub fn maintenance_energy_ratio(dep: f64, min_dep: f64) -> EngineResult<f64> {
    check_digestibility_floor("maintenance_energy_ratio", dep, min_dep)?;
    Ok((1.123 - (4.092 * 0.001 * dep) + (1.126 * 0.00001 * dep.powi(2))) - (25.4 / dep))
}

/// 生长净能/消化能比 reg
///
/// `reg = 1.164 − 5.16e-3·dep + 1.308e-5·dep² − 37.4/dep`
pub fn growth_energy_ratio(dep: f64, min_dep: f64) -> EngineResult<f64> {
    check_digestibility_floor("growth_energy_ratio", dep, min_dep)?;
    Ok(1.164 - (5.16 * 0.001 * dep) + (1.308 * 0.00001 * dep.powi(2)) - (37.4 / dep))
}

// ==========================================
// 能量分量 (MJ/天)
// ==========================================

/// 维持净能基数 `W^0.75·(a1 + 0.0029288·(tc − ta))`
pub fn net_energy_base(live_weight_kg: f64, category: &CategoryCoefficients, ambient_temp_c: f64) -> f64 {
    live_weight_kg.powf(METABOLIC_EXPONENT)
        * (category.a1 + TEMPERATURE_COEFFICIENT * (category.tc - ambient_temp_c))
}

/// 净能 → 总能：除以 rem 与 dep/100
fn to_gross_energy(quantity: &str, net_energy: f64, ratio: f64, dep: f64) -> EngineResult<f64> {
    let ratio = ensure_positive(quantity, ratio)?;
    let digestible_fraction = ensure_positive(quantity, dep / 100.0)?;
    ensure_finite(quantity, net_energy / ratio / digestible_fraction)
}

pub fn maintenance(base: f64, rem: f64, dep: f64) -> EngineResult<f64> {
    to_gross_energy("maintenance", base, rem, dep)
}

pub fn activity(base: f64, activity_coefficient: f64, rem: f64, dep: f64) -> EngineResult<f64> {
    to_gross_energy("activity", base * activity_coefficient, rem, dep)
}

pub fn pregnancy(base: f64, pregnancy_coefficient: f64, rem: f64, dep: f64) -> EngineResult<f64> {
    to_gross_energy("pregnancy", base * pregnancy_coefficient, rem, dep)
}

pub fn work(base: f64, work_hours: f64, rem: f64, dep: f64) -> EngineResult<f64> {
    to_gross_energy("work", base * 0.1 * work_hours, rem, dep)
}

/// 泌乳: `(milk/365)·(1.47 + 0.4·fat) / rem / (dep/100)`
pub fn lactation(daily_milk: f64, milk_fat_pct: f64, rem: f64, dep: f64) -> EngineResult<f64> {
    to_gross_energy("lactation", daily_milk * (1.47 + 0.4 * milk_fat_pct), rem, dep)
}

/// 生长: `22.02·(W/(fcs·adultW))^0.75·gain^1.097 / reg / (dep/100)`
pub fn growth(
    live_weight_kg: f64,
    adult_weight_kg: f64,
    sexual_condition_factor: f64,
    weight_gain_kg_day: f64,
    reg: f64,
    dep: f64,
) -> EngineResult<f64> {
    let reference_weight = ensure_positive("growth", sexual_condition_factor * adult_weight_kg)?;
    let net_energy = GROWTH_CONSTANT
        * (live_weight_kg / reference_weight).powf(METABOLIC_EXPONENT)
        * weight_gain_kg_day.powf(GROWTH_GAIN_EXPONENT);
    to_gross_energy("growth", net_energy, reg, dep)
}

/// 犊牛哺乳摄入的总能: `(milk/365)·((44.01·fat + 163.56)·4.184/0.4536)·0.001`
pub fn milk_energy_intake(daily_milk: f64, milk_fat_pct: f64) -> f64 {
    daily_milk * ((44.01 * milk_fat_pct + 163.56) * 4.184 / 0.4536) * 0.001
}

// ==========================================
// DietEnergyModel - 总能需求
// ==========================================
pub struct DietEnergyModel<'a> {
    config: &'a EngineConfig,
}

impl<'a> DietEnergyModel<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    /// 计算总能需求
    ///
    /// # 流程
    /// 1. dep → rem（→ reg，仅含生长分量的类别）
    /// 2. 按类别预算逐项计算能量分量
    /// 3. 求和（犊牛扣除哺乳摄入）
    pub fn compute(&self, profile: &AnimalProfile, refs: &ReferenceData) -> EngineResult<EnergyBudget> {
        let input = profile.input();
        let budget = CategoryBudget::for_type(profile.animal_type());
        let min_dep = self.config.min_digestibility_pct;

        // 1. 消化率与转化比
        let dep = diet_digestibility(
            &refs.forage,
            &refs.supplement,
            input.forage_pct,
            input.supplement_pct,
        )?;
        let rem = maintenance_energy_ratio(dep, min_dep)?;
        let reg = if budget.includes(EnergyComponent::Growth) {
            Some(growth_energy_ratio(dep, min_dep)?)
        } else {
            None
        };

        // 2. 能量分量
        let base = net_energy_base(input.live_weight_kg, &refs.category, input.ambient_temp_c);
        let mut components = EnergyComponents::default();
        for component in budget.components {
            match component {
                EnergyComponent::Maintenance => {
                    components.maintenance = maintenance(base, rem, dep)?;
                }
                EnergyComponent::Activity => {
                    components.activity = activity(base, refs.activity_coefficient, rem, dep)?;
                }
                EnergyComponent::Pregnancy => {
                    components.pregnancy = pregnancy(base, refs.pregnancy_coefficient, rem, dep)?;
                }
                EnergyComponent::Work => {
                    components.work = work(base, input.work_hours, rem, dep)?;
                }
                EnergyComponent::Lactation => {
                    components.lactation =
                        lactation(profile.daily_milk(), input.milk_fat_pct, rem, dep)?;
                }
                EnergyComponent::Growth => {
                    let reg = reg.ok_or_else(|| {
                        EngineError::computation("growth", "缺少生长能量转化比 reg")
                    })?;
                    components.growth = growth(
                        input.live_weight_kg,
                        input.adult_weight_kg,
                        refs.sexual_condition_factor,
                        input.weight_gain_kg_day,
                        reg,
                        dep,
                    )?;
                }
            }
        }

        // 3. 总能
        let milk_energy = if budget.subtract_milk_energy {
            milk_energy_intake(profile.daily_milk(), input.milk_fat_pct)
        } else {
            0.0
        };
        let tge = ensure_positive("total_gross_energy", components.sum() - milk_energy)?;

        tracing::debug!(
            animal_type = %profile.animal_type(),
            dep,
            rem,
            tge,
            "能量预算计算完成"
        );

        Ok(EnergyBudget {
            diet_digestibility: dep,
            maintenance_energy_ratio: rem,
            growth_energy_ratio: reg,
            components,
            milk_energy_intake: milk_energy,
            total_gross_energy: tge,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(de: f64, ge: f64) -> FeedComposition {
        FeedComposition {
            digestible_energy: de,
            gross_energy: ge,
            ndf_pct: 50.0,
            adf_pct: 25.0,
            net_energy_maintenance: 5.0,
            ash_pct: 8.0,
            crude_protein_pct: 10.0,
        }
    }

    #[test]
    fn test_digestibility_zero_gross_energy_is_error() {
        let err = diet_digestibility(&feed(10.0, 18.0), &feed(10.0, 0.0), 100.0, 0.0).unwrap_err();
        assert!(err.is_computation());
    }

    #[test]
    fn test_digestibility_blend_of_identical_feeds() {
        let f = feed(11.7, 18.0);
        for pf in [0.0, 12.5, 50.0, 87.5, 100.0] {
            let dep = diet_digestibility(&f, &f, pf, 100.0 - pf).unwrap();
            assert!((dep - 65.0).abs() < 1e-9, "pf={} dep={}", pf, dep);
        }
    }

    #[test]
    fn test_ratio_below_floor_is_error() {
        assert!(maintenance_energy_ratio(9.99, 10.0).unwrap_err().is_computation());
        assert!(growth_energy_ratio(5.0, 10.0).is_err());
    }

    #[test]
    fn test_rem_polynomial_value() {
        let rem = maintenance_energy_ratio(60.0, 10.0).unwrap();
        let expected = 1.123 - 0.004092 * 60.0 + 0.00001126 * 3600.0 - 25.4 / 60.0;
        assert!((rem - expected).abs() < 1e-12);
    }

    #[test]
    fn test_non_positive_rem_rejected_by_component() {
        // dep = 20 → rem < 0
        let rem = maintenance_energy_ratio(20.0, 10.0).unwrap();
        assert!(rem < 0.0);
        assert!(maintenance(30.0, rem, 20.0).unwrap_err().is_computation());
    }

    #[test]
    fn test_zero_gain_gives_zero_growth() {
        let g = growth(300.0, 550.0, 0.8, 0.0, 0.2, 60.0).unwrap();
        assert_eq!(g, 0.0);
    }

    #[test]
    fn test_milk_energy_intake_constant() {
        // 1 kg/天, 4% 乳脂
        let me = milk_energy_intake(1.0, 4.0);
        let expected = (44.01 * 4.0 + 163.56) * 4.184 / 0.4536 * 0.001;
        assert!((me - expected).abs() < 1e-12);
        assert_eq!(milk_energy_intake(0.0, 4.0), 0.0);
    }
}
