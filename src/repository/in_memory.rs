// ==========================================
// 牛只排放因子计算系统 - 内存参考数据
// ==========================================
// 用途: 启动时一次性加载,之后只读
// 场景: 单元测试 / 无数据库运行 / 初始化 SQLite 种子数据
// ==========================================

use crate::domain::reference::{default_max_methane_capacity, CategoryCoefficients, FeedComposition};
use crate::domain::types::{AnimalType, ManureSystem, ProductionSystem};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::reference_provider::{
    validate_feed_composition, validate_manure_fraction, validate_max_methane_capacity,
    ReferenceDataProvider,
};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct InMemoryReferenceProvider {
    categories: BTreeMap<u32, CategoryCoefficients>,
    feeds: BTreeMap<u32, FeedComposition>,
    activity: BTreeMap<u32, f64>,
    pregnancy: BTreeMap<u32, f64>,
    sexual_condition: BTreeMap<u32, f64>,
    methane_capacity: BTreeMap<(u8, u8), f64>,
    manure_fraction: BTreeMap<(u8, u8), f64>,
}

impl InMemoryReferenceProvider {
    /// 空数据集
    pub fn new() -> Self {
        Self::default()
    }

    /// 内置参考数据集
    ///
    /// 粪便流向比例默认全部为 1（全部粪便进入所选系统）。
    pub fn with_defaults() -> Self {
        let mut provider = Self::new();

        provider.categories.insert(
            1,
            CategoryCoefficients { a1: 0.386, tc: 20.0, rcms: 0.5, bi: 1.0 },
        );
        provider.categories.insert(
            2,
            CategoryCoefficients { a1: 0.322, tc: 20.0, rcms: 0.5, bi: 1.0 },
        );
        provider.categories.insert(
            3,
            CategoryCoefficients { a1: 0.370, tc: 25.0, rcms: 0.6, bi: 0.9 },
        );

        let feeds = [
            // 禾本科牧草
            (1, 10.5, 18.0, 65.0, 35.0, 5.0, 9.0, 8.0),
            // 豆科牧草
            (2, 11.8, 18.3, 48.0, 32.0, 5.8, 10.0, 17.0),
            // 青贮玉米
            (15, 11.2, 18.1, 45.0, 26.0, 6.4, 5.0, 8.5),
            // 精料补充料
            (40, 14.0, 18.5, 25.0, 10.0, 7.5, 6.0, 18.0),
        ];
        for (id, de, ge, ndf, adf, nem, ash, cp) in feeds {
            provider.feeds.insert(
                id,
                FeedComposition {
                    digestible_energy: de,
                    gross_energy: ge,
                    ndf_pct: ndf,
                    adf_pct: adf,
                    net_energy_maintenance: nem,
                    ash_pct: ash,
                    crude_protein_pct: cp,
                },
            );
        }

        // 舍饲 / 放牧 / 大范围放牧
        provider.activity.extend([(1, 0.0), (2, 0.17), (3, 0.36)]);
        // 未孕 / 妊娠
        provider.pregnancy.extend([(1, 0.0), (2, 0.10)]);
        // 母牛 / 阉牛 / 公牛
        provider.sexual_condition.extend([(1, 0.8), (2, 1.0), (3, 1.2)]);

        for animal_type in AnimalType::ALL {
            for production_system in ProductionSystem::ALL {
                provider.methane_capacity.insert(
                    (animal_type.id(), production_system.id()),
                    default_max_methane_capacity(animal_type, production_system),
                );
            }
            for system in ManureSystem::ALL {
                provider.manure_fraction.insert((animal_type.id(), system.id()), 1.0);
            }
        }

        provider
    }

    // ==========================================
    // 写入（加载阶段使用）
    // ==========================================

    pub fn insert_category(&mut self, id: u32, coefficients: CategoryCoefficients) {
        self.categories.insert(id, coefficients);
    }

    pub fn insert_feed(&mut self, id: u32, feed: FeedComposition) -> RepositoryResult<()> {
        validate_feed_composition(&feed)?;
        self.feeds.insert(id, feed);
        Ok(())
    }

    pub fn insert_activity_coefficient(&mut self, id: u32, value: f64) {
        self.activity.insert(id, value);
    }

    pub fn insert_pregnancy_coefficient(&mut self, id: u32, value: f64) {
        self.pregnancy.insert(id, value);
    }

    pub fn insert_sexual_condition_factor(&mut self, id: u32, value: f64) {
        self.sexual_condition.insert(id, value);
    }

    pub fn insert_max_methane_capacity(
        &mut self,
        animal_type: AnimalType,
        production_system: ProductionSystem,
        value: f64,
    ) -> RepositoryResult<()> {
        validate_max_methane_capacity(value)?;
        self.methane_capacity
            .insert((animal_type.id(), production_system.id()), value);
        Ok(())
    }

    pub fn insert_manure_fraction(
        &mut self,
        animal_type: AnimalType,
        system: ManureSystem,
        value: f64,
    ) -> RepositoryResult<()> {
        validate_manure_fraction(value)?;
        self.manure_fraction.insert((animal_type.id(), system.id()), value);
        Ok(())
    }

    // ==========================================
    // 遍历（导出到 SQLite 使用）
    // ==========================================

    pub fn categories(&self) -> impl Iterator<Item = (u32, &CategoryCoefficients)> {
        self.categories.iter().map(|(id, c)| (*id, c))
    }

    pub fn feeds(&self) -> impl Iterator<Item = (u32, &FeedComposition)> {
        self.feeds.iter().map(|(id, f)| (*id, f))
    }

    pub fn activity_coefficients(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.activity.iter().map(|(id, v)| (*id, *v))
    }

    pub fn pregnancy_coefficients(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.pregnancy.iter().map(|(id, v)| (*id, *v))
    }

    pub fn sexual_condition_factors(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.sexual_condition.iter().map(|(id, v)| (*id, *v))
    }

    /// ((动物类型编号, 生产体系编号), Bo)
    pub fn max_methane_capacities(&self) -> impl Iterator<Item = ((u8, u8), f64)> + '_ {
        self.methane_capacity.iter().map(|(k, v)| (*k, *v))
    }

    /// ((动物类型编号, 粪便系统编号), 比例)
    pub fn manure_fractions(&self) -> impl Iterator<Item = ((u8, u8), f64)> + '_ {
        self.manure_fraction.iter().map(|(k, v)| (*k, *v))
    }
}

fn lookup<K, V>(map: &BTreeMap<K, V>, key: &K, entity: &str, id: impl ToString) -> RepositoryResult<V>
where
    K: Ord,
    V: Copy,
{
    map.get(key)
        .copied()
        .ok_or_else(|| RepositoryError::not_found(entity, id))
}

impl ReferenceDataProvider for InMemoryReferenceProvider {
    fn category_coefficients(&self, category_id: u32) -> RepositoryResult<CategoryCoefficients> {
        lookup(&self.categories, &category_id, "categoria_animal", category_id)
    }

    fn feed_composition(&self, variety_id: u32) -> RepositoryResult<FeedComposition> {
        lookup(&self.feeds, &variety_id, "variedad_pasto", variety_id)
    }

    fn activity_coefficient(&self, id: u32) -> RepositoryResult<f64> {
        lookup(&self.activity, &id, "coeficiente_actividad", id)
    }

    fn pregnancy_coefficient(&self, id: u32) -> RepositoryResult<f64> {
        lookup(&self.pregnancy, &id, "coeficiente_prenez", id)
    }

    fn sexual_condition_factor(&self, id: u32) -> RepositoryResult<f64> {
        lookup(&self.sexual_condition, &id, "condicion_sexual", id)
    }

    fn max_methane_capacity(
        &self,
        animal_type: AnimalType,
        production_system: ProductionSystem,
    ) -> RepositoryResult<f64> {
        let key = (animal_type.id(), production_system.id());
        lookup(
            &self.methane_capacity,
            &key,
            "capacidad_metano",
            format!("{}/{}", key.0, key.1),
        )
    }

    fn manure_fraction(&self, animal_type: AnimalType, system: ManureSystem) -> RepositoryResult<f64> {
        let key = (animal_type.id(), system.id());
        lookup(
            &self.manure_fraction,
            &key,
            "fraccion_estiercol",
            format!("{}/{}", key.0, key.1),
        )
    }
}
