// ==========================================
// 牛只排放因子计算系统 - 引擎编排器
// ==========================================
// 用途: 协调三大模型的执行顺序
// 流程: 画像 + 参考数据 → 能量模型 → {肠道发酵, 粪便管理}
// 红线: 所有 I/O 在纯计算开始前完成
// ==========================================

use crate::config::EngineConfig;
use crate::domain::emission::EmissionReport;
use crate::domain::profile::{AnimalProfile, ProfileInput};
use crate::domain::reference::ReferenceData;
use crate::engine::diet_energy::DietEnergyModel;
use crate::engine::enteric::EntericModel;
use crate::engine::error::EngineResult;
use crate::engine::manure::ManureModel;
use crate::repository::ReferenceDataProvider;
use tracing::{debug, instrument};

// ==========================================
// EmissionEngine - 排放因子引擎
// ==========================================

/// 无状态引擎,可在多线程间共享
#[derive(Debug, Clone, Default)]
pub struct EmissionEngine {
    config: EngineConfig,
}

impl EmissionEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// 校验原始输入并构造画像
    pub fn build_profile(&self, input: ProfileInput) -> EngineResult<AnimalProfile> {
        Ok(AnimalProfile::new(input, self.config.share_tolerance)?)
    }

    /// 对已解析的参考数据执行完整计算
    ///
    /// # 流程
    /// 1. 能量模型 → tge, dep
    /// 2. 肠道发酵 → cms, Ym, 肠道 EF（含采食量交叉校核）
    /// 3. 粪便管理 → VS, MCF, 粪便 EF
    pub fn evaluate(&self, profile: &AnimalProfile, refs: &ReferenceData) -> EngineResult<EmissionReport> {
        let mut warnings = Vec::new();

        let energy = DietEnergyModel::new(&self.config).compute(profile, refs)?;
        let enteric = EntericModel::new(&self.config).compute(profile, refs, &energy, &mut warnings)?;
        let manure = ManureModel::new().compute(profile, refs, &energy, enteric.dry_matter_intake)?;

        debug!(
            animal_type = %profile.animal_type(),
            enteric_ef = enteric.emission_factor,
            manure_ef = manure.emission_factor,
            warnings = warnings.len(),
            "排放因子计算完成"
        );

        Ok(EmissionReport {
            animal_type: profile.animal_type(),
            energy,
            enteric,
            manure,
            warnings,
        })
    }

    /// 先从提供方解析参考数据,再计算
    ///
    /// 查询失败以 EngineError::ReferenceData 返回。
    #[instrument(skip_all, fields(animal_type = %profile.animal_type()))]
    pub fn evaluate_with_provider<P>(&self, profile: &AnimalProfile, provider: &P) -> EngineResult<EmissionReport>
    where
        P: ReferenceDataProvider + ?Sized,
    {
        let refs = provider.resolve(profile)?;
        self.evaluate(profile, &refs)
    }

    /// 原始输入 → 校验 → 解析参考数据 → 计算
    pub fn evaluate_input<P>(&self, input: ProfileInput, provider: &P) -> EngineResult<EmissionReport>
    where
        P: ReferenceDataProvider + ?Sized,
    {
        let profile = self.build_profile(input)?;
        self.evaluate_with_provider(&profile, provider)
    }
}
