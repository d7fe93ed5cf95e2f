// ==========================================
// 牛只排放因子计算系统 - 甲烷转化系数 (MCF)
// ==========================================
// 依据: IPCC 2019 Vol.4 Table 10.17 (按年均温度)
// 职责: 六种粪便管理系统的温度响应曲线
// 红线: 区间端点返回常数,端点处与端点外取值一致
// ==========================================

use crate::domain::types::ManureSystem;

// 气候分档阈值 (°C): 冷 ≤ 15 < 温 < 25 ≤ 暖
const COOL_CLIMATE_MAX_C: f64 = 15.0;
const WARM_CLIMATE_MIN_C: f64 = 25.0;

// 连续曲线定义域 (°C)
const STORAGE_CURVE_MIN_C: f64 = 10.0;
const STORAGE_CURVE_MAX_C: f64 = 28.0;
const LAGOON_CURVE_MIN_C: f64 = 0.0;
const LAGOON_CURVE_MAX_C: f64 = 30.0;

// 端点常数 (%)
const SLURRY_MCF_COLD: f64 = 17.0;
const SLURRY_MCF_HOT: f64 = 80.0;

/// 逻辑斯蒂曲线参数（定义域外取端点处的曲线值）
const LAGOON_LOGISTIC_RATE: f64 = 0.1394;
const LAGOON_LOGISTIC_SHIFT: f64 = 1.12;

/// 按系统与年均温度取 MCF (%)
pub fn methane_conversion_factor(system: ManureSystem, ambient_temp_c: f64) -> f64 {
    match system {
        ManureSystem::Pasture => climate_step(ambient_temp_c, 1.0, 1.5, 2.0),
        ManureSystem::DailySpread => climate_step(ambient_temp_c, 0.1, 0.5, 1.0),
        ManureSystem::SolidStorage => storage_linear(ambient_temp_c, 2.0, 5.0),
        ManureSystem::DryLot => storage_linear(ambient_temp_c, 1.0, 2.0),
        ManureSystem::LiquidSlurry => liquid_slurry(ambient_temp_c),
        ManureSystem::AnaerobicLagoon => anaerobic_lagoon(ambient_temp_c),
    }
}

/// 按使用比例加权两系统的 MCF
pub fn weighted_methane_conversion_factor(mcf_a: f64, share_a_pct: f64, mcf_b: f64, share_b_pct: f64) -> f64 {
    mcf_a * share_a_pct / 100.0 + mcf_b * share_b_pct / 100.0
}

fn climate_step(ta: f64, cool: f64, temperate: f64, warm: f64) -> f64 {
    if ta <= COOL_CLIMATE_MAX_C {
        cool
    } else if ta >= WARM_CLIMATE_MIN_C {
        warm
    } else {
        temperate
    }
}

fn storage_linear(ta: f64, cold: f64, hot: f64) -> f64 {
    if ta <= STORAGE_CURVE_MIN_C {
        cold
    } else if ta >= STORAGE_CURVE_MAX_C {
        hot
    } else {
        cold + (hot - cold) * (ta - STORAGE_CURVE_MIN_C) / (STORAGE_CURVE_MAX_C - STORAGE_CURVE_MIN_C)
    }
}

fn liquid_slurry(ta: f64) -> f64 {
    if ta <= STORAGE_CURVE_MIN_C {
        SLURRY_MCF_COLD
    } else if ta >= STORAGE_CURVE_MAX_C {
        SLURRY_MCF_HOT
    } else {
        17.0 - 1.25 * ta + 0.125 * ta.powi(2)
    }
}

fn anaerobic_lagoon(ta: f64) -> f64 {
    let ta = ta.clamp(LAGOON_CURVE_MIN_C, LAGOON_CURVE_MAX_C);
    80.0 / (1.0 + (-LAGOON_LOGISTIC_RATE * (ta + LAGOON_LOGISTIC_SHIFT)).exp())
}
