// ==========================================
// 牛只排放因子计算系统 - 参考数据提供方接口
// ==========================================
// 职责: 按编号查询系数表,返回固定结构的记录
// 红线: 只读; 查询不到返回 NotFound,不给默认值
// ==========================================

use crate::domain::profile::AnimalProfile;
use crate::domain::reference::{CategoryCoefficients, FeedComposition, ReferenceData};
use crate::domain::types::{AnimalType, ManureSystem, ProductionSystem};
use crate::repository::error::{RepositoryError, RepositoryResult};

/// 参考数据提供方
///
/// 实现必须可在线程间共享（批量计算并发调用）。
pub trait ReferenceDataProvider: Send + Sync {
    /// 类别系数 (categoria_animal)
    fn category_coefficients(&self, category_id: u32) -> RepositoryResult<CategoryCoefficients>;

    /// 饲料成分 (variedad_pasto)
    fn feed_composition(&self, variety_id: u32) -> RepositoryResult<FeedComposition>;

    /// 活动系数 Ca
    fn activity_coefficient(&self, id: u32) -> RepositoryResult<f64>;

    /// 妊娠系数 Cp
    fn pregnancy_coefficient(&self, id: u32) -> RepositoryResult<f64>;

    /// 性别/去势系数
    fn sexual_condition_factor(&self, id: u32) -> RepositoryResult<f64>;

    /// Bo (m³ CH4 / kg VS)
    fn max_methane_capacity(
        &self,
        animal_type: AnimalType,
        production_system: ProductionSystem,
    ) -> RepositoryResult<f64>;

    /// 粪便流向比例 (0..1)
    fn manure_fraction(&self, animal_type: AnimalType, system: ManureSystem) -> RepositoryResult<f64>;

    /// 一次性解析画像所需的全部参考数据
    fn resolve(&self, profile: &AnimalProfile) -> RepositoryResult<ReferenceData> {
        let input = profile.input();
        let animal_type = profile.animal_type();

        Ok(ReferenceData {
            category: self.category_coefficients(input.category_id)?,
            forage: self.feed_composition(input.forage_id)?,
            supplement: self.feed_composition(input.supplement_id)?,
            activity_coefficient: self.activity_coefficient(input.activity_id)?,
            pregnancy_coefficient: self.pregnancy_coefficient(input.pregnancy_id)?,
            sexual_condition_factor: self.sexual_condition_factor(input.sexual_condition_id)?,
            max_methane_capacity: self.max_methane_capacity(animal_type, profile.production_system())?,
            manure_fraction_a: self.manure_fraction(animal_type, profile.manure_system_a())?,
            manure_fraction_b: self.manure_fraction(animal_type, profile.manure_system_b())?,
        })
    }
}

// ==========================================
// 记录校验（两种提供方共用）
// ==========================================

fn invalid(entity: &str, field: &str, message: String) -> RepositoryError {
    RepositoryError::InvalidValue {
        entity: entity.to_string(),
        field: field.to_string(),
        message,
    }
}

fn check_pct(entity: &str, field: &str, value: f64) -> RepositoryResult<()> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(entity, field, format!("百分比超出 [0, 100]: {}", value)))
    }
}

/// 饲料成分记录校验
pub(crate) fn validate_feed_composition(feed: &FeedComposition) -> RepositoryResult<()> {
    const ENTITY: &str = "variedad_pasto";
    if !(feed.gross_energy.is_finite() && feed.gross_energy > 0.0) {
        return Err(invalid(ENTITY, "gross_energy", format!("总能必须为正: {}", feed.gross_energy)));
    }
    if !(feed.digestible_energy >= 0.0 && feed.digestible_energy <= feed.gross_energy) {
        return Err(invalid(
            ENTITY,
            "digestible_energy",
            format!(
                "可消化能必须在 [0, 总能] 内: {} (总能 {})",
                feed.digestible_energy, feed.gross_energy
            ),
        ));
    }
    if !(feed.net_energy_maintenance.is_finite() && feed.net_energy_maintenance >= 0.0) {
        return Err(invalid(
            ENTITY,
            "net_energy_maintenance",
            format!("维持净能不能为负: {}", feed.net_energy_maintenance),
        ));
    }
    check_pct(ENTITY, "ndf_pct", feed.ndf_pct)?;
    check_pct(ENTITY, "adf_pct", feed.adf_pct)?;
    check_pct(ENTITY, "ash_pct", feed.ash_pct)?;
    check_pct(ENTITY, "crude_protein_pct", feed.crude_protein_pct)?;
    Ok(())
}

/// 粪便流向比例校验 (0..1)
pub(crate) fn validate_manure_fraction(value: f64) -> RepositoryResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid("fraccion_estiercol", "fraction", format!("比例超出 [0, 1]: {}", value)))
    }
}

/// Bo 校验
pub(crate) fn validate_max_methane_capacity(value: f64) -> RepositoryResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid("capacidad_metano", "bo", format!("Bo 必须为正: {}", value)))
    }
}
