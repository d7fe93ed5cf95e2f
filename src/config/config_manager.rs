// ==========================================
// 牛只排放因子计算系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::engine_config::EngineConfig;
use crate::db::open_sqlite_connection;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

/// 全局配置作用域
pub const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径（需已建表）
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![GLOBAL_SCOPE, key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at) VALUES (?1, ?2, ?3, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![GLOBAL_SCOPE, key, value],
        )?;
        Ok(())
    }

    /// 获取所有 global 配置的快照（JSON格式）
    ///
    /// 用途: 批量运行结果中记录当时生效的配置
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt = conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    /// 读取引擎配置
    ///
    /// 未配置的键取默认值; 已配置但无法解析的键直接报错。
    pub fn load_engine_config(&self) -> Result<EngineConfig, Box<dyn Error>> {
        let mut config = EngineConfig::default();

        let fields: [(&str, &mut f64); 5] = [
            (config_keys::MIN_DIGESTIBILITY_PCT, &mut config.min_digestibility_pct),
            (config_keys::YM_BAND_MIN_PCT, &mut config.ym_band_min_pct),
            (config_keys::YM_BAND_MAX_PCT, &mut config.ym_band_max_pct),
            (config_keys::INTAKE_DEVIATION_WARN_PCT, &mut config.intake_deviation_warn_pct),
            (config_keys::SHARE_TOLERANCE, &mut config.share_tolerance),
        ];

        for (key, slot) in fields {
            if let Some(raw) = self.get_global_config_value(key)? {
                *slot = raw
                    .trim()
                    .parse::<f64>()
                    .map_err(|e| format!("配置项 {} 解析失败 (value={}): {}", key, raw, e))?;
                tracing::debug!(config_key = key, value = *slot, "读取配置覆写");
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// 保存引擎配置（单事务写入全部键）
    pub fn save_engine_config(&self, config: &EngineConfig) -> Result<usize, Box<dyn Error>> {
        config.validate()?;

        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let tx = conn.unchecked_transaction()?;

        let entries = [
            (config_keys::MIN_DIGESTIBILITY_PCT, config.min_digestibility_pct),
            (config_keys::YM_BAND_MIN_PCT, config.ym_band_min_pct),
            (config_keys::YM_BAND_MAX_PCT, config.ym_band_max_pct),
            (config_keys::INTAKE_DEVIATION_WARN_PCT, config.intake_deviation_warn_pct),
            (config_keys::SHARE_TOLERANCE, config.share_tolerance),
        ];

        let mut count = 0;
        for (key, value) in entries {
            count += tx.execute(
                "INSERT INTO config_kv (scope_id, key, value, updated_at) VALUES (?1, ?2, ?3, datetime('now'))
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![GLOBAL_SCOPE, key, value.to_string()],
            )?;
        }

        tx.commit()?;
        Ok(count)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 多项式适用下限
    pub const MIN_DIGESTIBILITY_PCT: &str = "min_digestibility_pct";

    // Ym 合理区间
    pub const YM_BAND_MIN_PCT: &str = "ym_band_min_pct";
    pub const YM_BAND_MAX_PCT: &str = "ym_band_max_pct";

    // 采食量交叉校核
    pub const INTAKE_DEVIATION_WARN_PCT: &str = "intake_deviation_warn_pct";

    // 比例合计容差
    pub const SHARE_TOLERANCE: &str = "share_tolerance";
}
