// ==========================================
// 牛只排放因子计算系统 - 引擎配置
// ==========================================
// 职责: 校验容差与数据质量告警阈值
// 来源: 默认值 / JSON 文件 / config_kv 表
// ==========================================

use crate::domain::profile::DEFAULT_SHARE_TOLERANCE;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::Path;

/// 引擎配置（不可变，按查询传入）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// 日粮消化率下限（%），低于该值 rem/reg 多项式不可用
    pub min_digestibility_pct: f64,

    /// Ym 合理区间下限（%）
    pub ym_band_min_pct: f64,

    /// Ym 合理区间上限（%）
    pub ym_band_max_pct: f64,

    /// 实际采食量超出潜在采食量的告警阈值（%）
    pub intake_deviation_warn_pct: f64,

    /// 比例合计 = 100 的绝对容差
    pub share_tolerance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_digestibility_pct: 10.0,
            ym_band_min_pct: 2.0,
            ym_band_max_pct: 12.0,
            intake_deviation_warn_pct: 20.0,
            share_tolerance: DEFAULT_SHARE_TOLERANCE,
        }
    }
}

impl EngineConfig {
    /// 从 JSON 文件加载（缺省字段取默认值）
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: EngineConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// 配置自检
    pub fn validate(&self) -> Result<(), String> {
        if !(self.min_digestibility_pct > 0.0 && self.min_digestibility_pct < 100.0) {
            return Err(format!(
                "min_digestibility_pct 必须在 (0, 100) 内: {}",
                self.min_digestibility_pct
            ));
        }
        if self.ym_band_min_pct >= self.ym_band_max_pct {
            return Err(format!(
                "Ym 区间无效: [{}, {}]",
                self.ym_band_min_pct, self.ym_band_max_pct
            ));
        }
        if self.intake_deviation_warn_pct < 0.0 {
            return Err(format!(
                "intake_deviation_warn_pct 不能为负: {}",
                self.intake_deviation_warn_pct
            ));
        }
        if !(self.share_tolerance >= 0.0 && self.share_tolerance < 1.0) {
            return Err(format!("share_tolerance 无效: {}", self.share_tolerance));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"ym_band_max_pct": 10.5}}"#).unwrap();

        let config = EngineConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.ym_band_max_pct, 10.5);
        assert_eq!(config.ym_band_min_pct, 2.0);
        assert_eq!(config.min_digestibility_pct, 10.0);
    }

    #[test]
    fn test_inverted_ym_band_rejected() {
        let config = EngineConfig {
            ym_band_min_pct: 9.0,
            ym_band_max_pct: 3.0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
