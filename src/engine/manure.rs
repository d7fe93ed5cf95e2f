// ==========================================
// 牛只排放因子计算系统 - 粪便管理模型
// ==========================================
// 依据: IPCC 2019 Vol.4 Ch.10 式 10.23 / 10.24
// 职责: 尿能、挥发性固体、Bo、MCF 加权、粪便 CH4 排放因子
// 输入: EnergyBudget (tge, dep) + 干物质采食量 + 参考数据
// 输出: ManureManagement
// ==========================================

use crate::domain::emission::{EnergyBudget, ManureManagement};
use crate::domain::profile::AnimalProfile;
use crate::domain::reference::ReferenceData;
use crate::engine::dispatcher::DAYS_PER_YEAR;
use crate::engine::error::{ensure_finite, ensure_positive, EngineResult};
use crate::engine::mcf;

/// 甲烷密度 (kg CH4 / m³)
pub const METHANE_DENSITY: f64 = 0.67;

/// 挥发性固体能值 (MJ/kg)
const VOLATILE_SOLIDS_ENERGY: f64 = 18.45;

/// 尿能项 UEf
///
/// `UEf = −2.71 + 0.028·(10·CP%) + 0.589·cms`
///
/// 粗蛋白与干物质采食量的线性函数，直接代入 VS 式，不除以 tge。
pub fn urinary_energy_fraction(crude_protein_pct: f64, dry_matter_intake: f64) -> f64 {
    -2.71 + 0.028 * (10.0 * crude_protein_pct) + 0.589 * dry_matter_intake
}

/// 挥发性固体 VS (kg DM/天)
///
/// `VS = (tge·(1 − dep/100 + UEf))·((1 − ash/100)/18.45)`
pub fn volatile_solids(
    total_gross_energy: f64,
    diet_digestibility: f64,
    urinary_energy_fraction: f64,
    ash_pct: f64,
) -> EngineResult<f64> {
    let vs = (total_gross_energy * (1.0 - diet_digestibility / 100.0 + urinary_energy_fraction))
        * ((1.0 - ash_pct / 100.0) / VOLATILE_SOLIDS_ENERGY);
    ensure_positive("volatile_solids", vs)
}

/// 按使用比例加权两系统的粪便流向比例
pub fn weighted_manure_fraction(fraction_a: f64, share_a_pct: f64, fraction_b: f64, share_b_pct: f64) -> f64 {
    fraction_a * share_a_pct / 100.0 + fraction_b * share_b_pct / 100.0
}

/// 粪便排放因子 (kg CH4/头/年)
pub fn emission_factor(
    volatile_solids: f64,
    max_methane_capacity: f64,
    weighted_mcf_pct: f64,
    weighted_manure_fraction: f64,
) -> f64 {
    volatile_solids
        * DAYS_PER_YEAR
        * max_methane_capacity
        * METHANE_DENSITY
        * (weighted_mcf_pct / 100.0)
        * weighted_manure_fraction
}

// ==========================================
// ManureModel
// ==========================================
#[derive(Default)]
pub struct ManureModel;

impl ManureModel {
    pub fn new() -> Self {
        Self
    }

    pub fn compute(
        &self,
        profile: &AnimalProfile,
        refs: &ReferenceData,
        energy: &EnergyBudget,
        dry_matter_intake: f64,
    ) -> EngineResult<ManureManagement> {
        let input = profile.input();
        let (pf, ps) = (input.forage_pct, input.supplement_pct);
        let tge = energy.total_gross_energy;

        // 1. 挥发性固体
        let crude_protein =
            refs.forage.crude_protein_pct * pf / 100.0 + refs.supplement.crude_protein_pct * ps / 100.0;
        let weighted_ash = refs.forage.ash_pct * pf / 100.0 + refs.supplement.ash_pct * ps / 100.0;
        let uef = urinary_energy_fraction(crude_protein, dry_matter_intake);
        let vs = volatile_solids(tge, energy.diet_digestibility, uef, weighted_ash)?;

        // 2. MCF 加权
        let (share_a, share_b) = (input.manure_share_a_pct, input.manure_share_b_pct);
        let mcf_a = mcf::methane_conversion_factor(profile.manure_system_a(), input.ambient_temp_c);
        let mcf_b = mcf::methane_conversion_factor(profile.manure_system_b(), input.ambient_temp_c);
        let weighted_mcf = mcf::weighted_methane_conversion_factor(mcf_a, share_a, mcf_b, share_b);
        let weighted_fraction =
            weighted_manure_fraction(refs.manure_fraction_a, share_a, refs.manure_fraction_b, share_b);

        // 3. 排放因子
        let ef = ensure_finite(
            "manure_emission_factor",
            emission_factor(vs, refs.max_methane_capacity, weighted_mcf, weighted_fraction),
        )?;

        tracing::debug!(
            vs,
            weighted_mcf,
            weighted_fraction,
            ef,
            "粪便管理计算完成"
        );

        Ok(ManureManagement {
            urinary_energy_fraction: uef,
            weighted_ash_pct: weighted_ash,
            volatile_solids: vs,
            max_methane_capacity: refs.max_methane_capacity,
            system_a: profile.manure_system_a(),
            system_b: profile.manure_system_b(),
            mcf_a,
            mcf_b,
            weighted_mcf,
            weighted_manure_fraction: weighted_fraction,
            emission_factor: ef,
        })
    }
}
