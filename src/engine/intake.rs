// ==========================================
// 牛只排放因子计算系统 - 潜在干物质采食量
// ==========================================
// 依据: NRC 2001 / NASEM 2016 经验式（按类别分式）
// 职责: 乳脂校正奶、温度修正、体脂修正、潜在采食量
// 用途: 与能量反推的采食量交叉校核,只产生告警
// ==========================================

use crate::domain::emission::{DataQualityWarning, IntakeCheck};
use crate::domain::profile::AnimalProfile;
use crate::domain::reference::ReferenceData;
use crate::domain::types::AnimalType;
use crate::engine::error::{ensure_positive, EngineResult};

/// NEm 单位换算 (Mcal → MJ)
const MCAL_TO_MJ: f64 = 4.184;

/// 空腹体重系数
const SHRUNK_BODY_WEIGHT_FACTOR: f64 = 0.96;

/// 泌乳早期修正阈值 (kg/天)
const EARLY_LACTATION_MILK_THRESHOLD: f64 = 11.5;

/// 泌乳早期修正量 (kg/天)
const EARLY_LACTATION_ADJUSTMENT: f64 = 1.7;

/// 体脂修正适用的最小活重 (kg)
const BODY_FAT_ADJUSTMENT_MIN_WEIGHT: f64 = 350.0;

/// 3.5% 乳脂校正奶 FCM (kg/天)
pub fn fat_corrected_milk(daily_milk: f64, milk_fat_pct: f64) -> f64 {
    0.4324 * daily_milk + 16.216 * daily_milk * (milk_fat_pct / 100.0)
}

/// 温度修正系数 `TF = 1 − (rcms/100)·(ta − tc)`
pub fn temperature_factor(rcms: f64, ambient_temp_c: f64, comfort_temp_c: f64) -> f64 {
    1.0 - (rcms / 100.0) * (ambient_temp_c - comfort_temp_c)
}

/// 泌乳早期修正 AJL
pub fn early_lactation_adjustment(daily_milk: f64) -> f64 {
    if daily_milk >= EARLY_LACTATION_MILK_THRESHOLD {
        EARLY_LACTATION_ADJUSTMENT
    } else {
        0.0
    }
}

/// 体脂修正系数 BFAF
///
/// 活重不超过 350 kg 时为 1。
pub fn body_fat_adjustment(live_weight_kg: f64, adult_weight_kg: f64) -> f64 {
    if live_weight_kg <= BODY_FAT_ADJUSTMENT_MIN_WEIGHT {
        return 1.0;
    }
    let shrunk = live_weight_kg * SHRUNK_BODY_WEIGHT_FACTOR;
    let adult_shrunk = adult_weight_kg * SHRUNK_BODY_WEIGHT_FACTOR;
    let equivalent_weight = shrunk * 400.0 / adult_shrunk;
    0.7714 + 0.00196 * (shrunk * equivalent_weight) / adult_shrunk
        - 0.000000371 * (shrunk * equivalent_weight) / adult_shrunk.powi(2)
}

/// 日粮加权维持净能 (Mcal/kg DM)
pub fn weighted_net_energy_maintenance(refs: &ReferenceData, forage_pct: f64, supplement_pct: f64) -> f64 {
    (refs.forage.net_energy_maintenance * forage_pct / 100.0
        + refs.supplement.net_energy_maintenance * supplement_pct / 100.0)
        / MCAL_TO_MJ
}

/// 潜在干物质采食量 cpms (kg/天)
///
/// 维持净能或结果非正时返回 Computation 错误，肠道模型将其降级为告警。
pub fn potential_dry_matter_intake(profile: &AnimalProfile, refs: &ReferenceData) -> EngineResult<f64> {
    let input = profile.input();
    let w = input.live_weight_kg;
    let shrunk = w * SHRUNK_BODY_WEIGHT_FACTOR;
    let daily_milk = profile.daily_milk();
    let tf = temperature_factor(refs.category.rcms, input.ambient_temp_c, refs.category.tc);
    let fcm = fat_corrected_milk(daily_milk, input.milk_fat_pct);

    let potential = match profile.animal_type() {
        AnimalType::HighProducingDairyCow => (0.0185 * w + 0.305 * fcm) * tf,
        AnimalType::LowProducingDairyCow => {
            let nem = ensure_positive(
                "net_energy_maintenance",
                weighted_net_energy_maintenance(refs, input.forage_pct, input.supplement_pct),
            )?;
            (w.powf(0.75) * (0.14652 * nem) - 0.0517 * nem.powi(2) - 0.0074
                + 0.305 * fcm
                + early_lactation_adjustment(daily_milk))
                * tf
        }
        AnimalType::BeefCow => {
            let nem = ensure_positive(
                "net_energy_maintenance",
                weighted_net_energy_maintenance(refs, input.forage_pct, input.supplement_pct),
            )?;
            (shrunk.powf(0.75) * (0.04997 * nem.powi(2) + 0.04631) / nem) * tf + 0.2 * daily_milk
        }
        AnimalType::BreedingBull => (3.83 + 0.0143 * shrunk) * tf,
        AnimalType::PreWeanedCalf | AnimalType::ReplacementHeifer | AnimalType::FeedlotCattle => {
            let nem = ensure_positive(
                "net_energy_maintenance",
                weighted_net_energy_maintenance(refs, input.forage_pct, input.supplement_pct),
            )?;
            let intercept = if profile.animal_type() == AnimalType::PreWeanedCalf {
                0.1128
            } else {
                0.0869
            };
            shrunk.powf(0.75)
                * ((0.2435 * nem - 0.0466 * nem.powi(2) - intercept) / nem)
                * body_fat_adjustment(w, input.adult_weight_kg)
                * refs.category.bi
                * tf
        }
    };

    ensure_positive("potential_dry_matter_intake", potential)
}

/// 实际与潜在采食量比较
///
/// 实际超出潜在的相对偏差大于阈值时返回告警。
pub fn check_intake(
    consumed: f64,
    potential: f64,
    warn_threshold_pct: f64,
) -> (IntakeCheck, Option<DataQualityWarning>) {
    let difference = consumed - potential;
    let relative_deviation_pct = difference / potential * 100.0;
    let check = IntakeCheck {
        consumed,
        potential,
        difference,
        relative_deviation_pct,
    };
    let warning = if relative_deviation_pct > warn_threshold_pct {
        Some(DataQualityWarning::IntakeExceedsCapacity {
            consumed,
            potential,
            deviation_pct: relative_deviation_pct,
        })
    } else {
        None
    };
    (check, warning)
}
