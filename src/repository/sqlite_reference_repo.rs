// ==========================================
// 牛只排放因子计算系统 - SQLite 参考数据仓储
// ==========================================
// 职责: 参考系数表的读取与种子数据写入
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

use crate::db::{init_reference_schema, open_sqlite_connection};
use crate::domain::reference::{CategoryCoefficients, FeedComposition};
use crate::domain::types::{AnimalType, ManureSystem, ProductionSystem};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::in_memory::InMemoryReferenceProvider;
use crate::repository::reference_provider::{
    validate_feed_composition, validate_manure_fraction, validate_max_methane_capacity,
    ReferenceDataProvider,
};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

/// 单值系数表（id → valor）
const SCALAR_TABLES: [&str; 3] = ["coeficiente_actividad", "coeficiente_prenez", "condicion_sexual"];

pub struct SqliteReferenceRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteReferenceRepository {
    /// 打开数据库并确保表存在
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        let repo = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        repo.init_schema()?;
        Ok(repo)
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let repo = Self { conn };
        repo.init_schema()?;
        Ok(repo)
    }

    /// 共享连接（供 ConfigManager 复用）
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn init_schema(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        init_reference_schema(&conn)?;
        Ok(())
    }

    // ==========================================
    // 写入
    // ==========================================

    /// 将内存数据集整体写入（UPSERT，单事务）
    ///
    /// # 返回
    /// 写入的记录数
    pub fn import_from(&self, source: &InMemoryReferenceProvider) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        let mut count = 0;

        for (id, c) in source.categories() {
            count += tx.execute(
                "INSERT INTO categoria_animal (id, a1, tc, rcms, bi) VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(id) DO UPDATE SET
                    a1 = excluded.a1, tc = excluded.tc, rcms = excluded.rcms, bi = excluded.bi",
                params![id, c.a1, c.tc, c.rcms, c.bi],
            )?;
        }

        for (id, f) in source.feeds() {
            count += tx.execute(
                "INSERT INTO variedad_pasto (id, ed, eb, fdn, fda, enm, cen, pc)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 ON CONFLICT(id) DO UPDATE SET
                    ed = excluded.ed, eb = excluded.eb, fdn = excluded.fdn, fda = excluded.fda,
                    enm = excluded.enm, cen = excluded.cen, pc = excluded.pc",
                params![
                    id,
                    f.digestible_energy,
                    f.gross_energy,
                    f.ndf_pct,
                    f.adf_pct,
                    f.net_energy_maintenance,
                    f.ash_pct,
                    f.crude_protein_pct,
                ],
            )?;
        }

        let scalar_sources: [Vec<(u32, f64)>; 3] = [
            source.activity_coefficients().collect(),
            source.pregnancy_coefficients().collect(),
            source.sexual_condition_factors().collect(),
        ];
        for (table, rows) in SCALAR_TABLES.iter().zip(scalar_sources.iter()) {
            // 表名来自常量,值走参数绑定
            let sql = format!(
                "INSERT INTO {} (id, valor) VALUES (?1, ?2)
                 ON CONFLICT(id) DO UPDATE SET valor = excluded.valor",
                table
            );
            for (id, value) in rows {
                count += tx.execute(&sql, params![id, value])?;
            }
        }

        for ((at, sp), bo) in source.max_methane_capacities() {
            count += tx.execute(
                "INSERT INTO capacidad_metano (id_at, id_sp, bo) VALUES (?1, ?2, ?3)
                 ON CONFLICT(id_at, id_sp) DO UPDATE SET bo = excluded.bo",
                params![at, sp, bo],
            )?;
        }

        for ((at, system), fraction) in source.manure_fractions() {
            count += tx.execute(
                "INSERT INTO fraccion_estiercol (id_at, id_gestion, fraccion) VALUES (?1, ?2, ?3)
                 ON CONFLICT(id_at, id_gestion) DO UPDATE SET fraccion = excluded.fraccion",
                params![at, system, fraction],
            )?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        info!(records = count, "参考数据写入完成");
        Ok(count)
    }

    // ==========================================
    // 读取
    // ==========================================

    fn scalar(&self, table: &str, id: u32) -> RepositoryResult<f64> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT valor FROM {} WHERE id = ?1", table);
        conn.query_row(&sql, params![id], |row| row.get::<_, f64>(0))
            .optional()?
            .ok_or_else(|| RepositoryError::not_found(table, id))
    }

    /// 整库加载为内存数据集（批量计算前一次性读取）
    pub fn snapshot(&self) -> RepositoryResult<InMemoryReferenceProvider> {
        let conn = self.get_conn()?;
        let mut provider = InMemoryReferenceProvider::new();

        let mut stmt = conn.prepare("SELECT id, a1, tc, rcms, bi FROM categoria_animal")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, u32>(0)?,
                CategoryCoefficients {
                    a1: row.get(1)?,
                    tc: row.get(2)?,
                    rcms: row.get(3)?,
                    bi: row.get(4)?,
                },
            ))
        })?;
        for row in rows {
            let (id, c) = row?;
            provider.insert_category(id, c);
        }

        let mut stmt = conn.prepare("SELECT id, ed, eb, fdn, fda, enm, cen, pc FROM variedad_pasto")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, u32>(0)?, feed_from_row(row, 1)?)))?;
        for row in rows {
            let (id, feed) = row?;
            provider.insert_feed(id, feed)?;
        }

        for table in SCALAR_TABLES {
            let mut stmt = conn.prepare(&format!("SELECT id, valor FROM {}", table))?;
            let rows = stmt.query_map([], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, f64>(1)?)))?;
            for row in rows {
                let (id, value) = row?;
                match table {
                    "coeficiente_actividad" => provider.insert_activity_coefficient(id, value),
                    "coeficiente_prenez" => provider.insert_pregnancy_coefficient(id, value),
                    _ => provider.insert_sexual_condition_factor(id, value),
                }
            }
        }

        let mut stmt = conn.prepare("SELECT id_at, id_sp, bo FROM capacidad_metano")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, u8>(0)?, row.get::<_, u8>(1)?, row.get::<_, f64>(2)?))
        })?;
        for row in rows {
            let (at, sp, bo) = row?;
            let animal_type = AnimalType::try_from(at).map_err(RepositoryError::InternalError)?;
            let production_system = ProductionSystem::try_from(sp).map_err(RepositoryError::InternalError)?;
            provider.insert_max_methane_capacity(animal_type, production_system, bo)?;
        }

        let mut stmt = conn.prepare("SELECT id_at, id_gestion, fraccion FROM fraccion_estiercol")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, u8>(0)?, row.get::<_, u8>(1)?, row.get::<_, f64>(2)?))
        })?;
        for row in rows {
            let (at, system, fraction) = row?;
            let animal_type = AnimalType::try_from(at).map_err(RepositoryError::InternalError)?;
            let system = ManureSystem::try_from(system).map_err(RepositoryError::InternalError)?;
            provider.insert_manure_fraction(animal_type, system, fraction)?;
        }

        debug!("参考数据快照加载完成");
        Ok(provider)
    }
}

fn feed_from_row(row: &rusqlite::Row<'_>, offset: usize) -> rusqlite::Result<FeedComposition> {
    Ok(FeedComposition {
        digestible_energy: row.get(offset)?,
        gross_energy: row.get(offset + 1)?,
        ndf_pct: row.get(offset + 2)?,
        adf_pct: row.get(offset + 3)?,
        net_energy_maintenance: row.get(offset + 4)?,
        ash_pct: row.get(offset + 5)?,
        crude_protein_pct: row.get(offset + 6)?,
    })
}

impl ReferenceDataProvider for SqliteReferenceRepository {
    fn category_coefficients(&self, category_id: u32) -> RepositoryResult<CategoryCoefficients> {
        let conn = self.get_conn()?;
        conn.query_row(
            "SELECT a1, tc, rcms, bi FROM categoria_animal WHERE id = ?1",
            params![category_id],
            |row| {
                Ok(CategoryCoefficients {
                    a1: row.get(0)?,
                    tc: row.get(1)?,
                    rcms: row.get(2)?,
                    bi: row.get(3)?,
                })
            },
        )
        .optional()?
        .ok_or_else(|| RepositoryError::not_found("categoria_animal", category_id))
    }

    fn feed_composition(&self, variety_id: u32) -> RepositoryResult<FeedComposition> {
        let feed = {
            let conn = self.get_conn()?;
            conn.query_row(
                "SELECT ed, eb, fdn, fda, enm, cen, pc FROM variedad_pasto WHERE id = ?1",
                params![variety_id],
                |row| feed_from_row(row, 0),
            )
            .optional()?
            .ok_or_else(|| RepositoryError::not_found("variedad_pasto", variety_id))?
        };
        validate_feed_composition(&feed)?;
        Ok(feed)
    }

    fn activity_coefficient(&self, id: u32) -> RepositoryResult<f64> {
        self.scalar("coeficiente_actividad", id)
    }

    fn pregnancy_coefficient(&self, id: u32) -> RepositoryResult<f64> {
        self.scalar("coeficiente_prenez", id)
    }

    fn sexual_condition_factor(&self, id: u32) -> RepositoryResult<f64> {
        self.scalar("condicion_sexual", id)
    }

    fn max_methane_capacity(
        &self,
        animal_type: AnimalType,
        production_system: ProductionSystem,
    ) -> RepositoryResult<f64> {
        let bo = {
            let conn = self.get_conn()?;
            conn.query_row(
                "SELECT bo FROM capacidad_metano WHERE id_at = ?1 AND id_sp = ?2",
                params![animal_type.id(), production_system.id()],
                |row| row.get::<_, f64>(0),
            )
            .optional()?
            .ok_or_else(|| {
                RepositoryError::not_found(
                    "capacidad_metano",
                    format!("{}/{}", animal_type.id(), production_system.id()),
                )
            })?
        };
        validate_max_methane_capacity(bo)?;
        Ok(bo)
    }

    fn manure_fraction(&self, animal_type: AnimalType, system: ManureSystem) -> RepositoryResult<f64> {
        let fraction = {
            let conn = self.get_conn()?;
            conn.query_row(
                "SELECT fraccion FROM fraccion_estiercol WHERE id_at = ?1 AND id_gestion = ?2",
                params![animal_type.id(), system.id()],
                |row| row.get::<_, f64>(0),
            )
            .optional()?
            .ok_or_else(|| {
                RepositoryError::not_found(
                    "fraccion_estiercol",
                    format!("{}/{}", animal_type.id(), system.id()),
                )
            })?
        };
        validate_manure_fraction(fraction)?;
        Ok(fraction)
    }
}
