// ==========================================
// 牛只排放因子计算系统 - 肠道发酵模型
// ==========================================
// 依据: IPCC 2019 Vol.4 Ch.10 式 10.21 (Tier 2)
// 职责: 日粮纤维、干物质采食量、Ym、肠道 CH4 排放因子
// 输入: EnergyBudget + 参考数据
// 输出: EntericFermentation + 告警
// ==========================================

use crate::config::EngineConfig;
use crate::domain::emission::{DataQualityWarning, EnergyBudget, EntericFermentation, WeightedFiber};
use crate::domain::profile::AnimalProfile;
use crate::domain::reference::{FeedComposition, ReferenceData};
use crate::engine::dispatcher::CategoryBudget;
use crate::engine::error::{ensure_finite, ensure_positive, EngineError, EngineResult};
use crate::engine::intake;

/// 甲烷能值 (MJ/kg CH4)
pub const METHANE_ENERGY_CONTENT: f64 = 55.65;

/// 按日粮比例加权的纤维含量
pub fn weighted_fiber(
    forage: &FeedComposition,
    supplement: &FeedComposition,
    forage_pct: f64,
    supplement_pct: f64,
) -> WeightedFiber {
    WeightedFiber {
        ndf_pct: forage.ndf_pct * forage_pct / 100.0 + supplement.ndf_pct * supplement_pct / 100.0,
        adf_pct: forage.adf_pct * forage_pct / 100.0 + supplement.adf_pct * supplement_pct / 100.0,
    }
}

/// 日粮加权总能密度 (MJ/kg DM)
pub fn diet_energy_density(
    forage: &FeedComposition,
    supplement: &FeedComposition,
    forage_pct: f64,
    supplement_pct: f64,
) -> f64 {
    forage.gross_energy * forage_pct / 100.0 + supplement.gross_energy * supplement_pct / 100.0
}

/// 干物质采食量 `cms = tge / 能量密度`
pub fn dry_matter_intake(total_gross_energy: f64, energy_density: f64) -> EngineResult<f64> {
    let density = ensure_positive("diet_energy_density", energy_density)?;
    ensure_finite("dry_matter_intake", total_gross_energy / density)
}

/// 甲烷转化率 Ym (%)
///
/// `Ym = (3.41 + 0.52·cms − 0.996·cms·fda/100 + 1.15·cms·fdn/100) · 100 / tge`
pub fn methane_conversion_ratio(
    dry_matter_intake: f64,
    fiber: &WeightedFiber,
    total_gross_energy: f64,
) -> EngineResult<f64> {
    let tge = ensure_positive("total_gross_energy", total_gross_energy)?;
    let methane_energy = 3.41 + 0.52 * dry_matter_intake
        - 0.996 * (dry_matter_intake * fiber.adf_pct / 100.0)
        + 1.15 * (dry_matter_intake * fiber.ndf_pct / 100.0);
    ensure_finite("methane_conversion_ratio", methane_energy * 100.0 / tge)
}

/// 肠道排放因子 `EF = tge · Ym/100 · days / 55.65` (kg CH4/头/年)
pub fn emission_factor(total_gross_energy: f64, ym_pct: f64, days_per_year: f64) -> f64 {
    total_gross_energy * (ym_pct / 100.0) * days_per_year / METHANE_ENERGY_CONTENT
}

/// Ym 超出合理区间时返回告警（不截断）
pub fn check_ym_band(ym_pct: f64, config: &EngineConfig) -> Option<DataQualityWarning> {
    if ym_pct < config.ym_band_min_pct || ym_pct > config.ym_band_max_pct {
        Some(DataQualityWarning::YmOutOfBand {
            value: ym_pct,
            min: config.ym_band_min_pct,
            max: config.ym_band_max_pct,
        })
    } else {
        None
    }
}

// ==========================================
// EntericModel
// ==========================================
pub struct EntericModel<'a> {
    config: &'a EngineConfig,
}

impl<'a> EntericModel<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    pub fn compute(
        &self,
        profile: &AnimalProfile,
        refs: &ReferenceData,
        energy: &EnergyBudget,
        warnings: &mut Vec<DataQualityWarning>,
    ) -> EngineResult<EntericFermentation> {
        let input = profile.input();
        let (pf, ps) = (input.forage_pct, input.supplement_pct);
        let tge = energy.total_gross_energy;

        let fiber = weighted_fiber(&refs.forage, &refs.supplement, pf, ps);
        let density = diet_energy_density(&refs.forage, &refs.supplement, pf, ps);
        let cms = dry_matter_intake(tge, density)?;

        let ym = methane_conversion_ratio(cms, &fiber, tge)?;
        if let Some(warning) = check_ym_band(ym, self.config) {
            tracing::warn!(ym, "Ym 超出合理区间");
            warnings.push(warning);
        }

        let days_per_year = CategoryBudget::for_type(profile.animal_type()).days_per_year;
        let ef = emission_factor(tge, ym, days_per_year);

        // 采食量交叉校核: 潜在采食量无定义时只告警, 排放因子照常输出
        let intake_check = match intake::potential_dry_matter_intake(profile, refs) {
            Ok(potential) => {
                let (check, intake_warning) =
                    intake::check_intake(cms, potential, self.config.intake_deviation_warn_pct);
                if let Some(warning) = intake_warning {
                    tracing::warn!(
                        consumed = cms,
                        potential,
                        deviation_pct = check.relative_deviation_pct,
                        "采食量超出潜在采食能力"
                    );
                    warnings.push(warning);
                }
                Some(check)
            }
            Err(EngineError::Computation { quantity, message }) => {
                tracing::warn!(%quantity, %message, "潜在采食量无定义, 跳过交叉校核");
                warnings.push(DataQualityWarning::PotentialIntakeUndefined { quantity, message });
                None
            }
            Err(err) => return Err(err),
        };

        tracing::debug!(cms, ym, ef, "肠道发酵计算完成");

        Ok(EntericFermentation {
            fiber,
            diet_energy_density: density,
            dry_matter_intake: cms,
            dry_matter_intake_live_weight_ratio: cms / input.live_weight_kg,
            forage_intake: cms * pf / 100.0,
            supplement_intake: cms * ps / 100.0,
            fat_corrected_milk: intake::fat_corrected_milk(profile.daily_milk(), input.milk_fat_pct),
            intake_check,
            methane_conversion_ratio: ym,
            days_per_year,
            emission_factor: ef,
        })
    }
}
