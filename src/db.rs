// ==========================================
// 牛只排放因子计算系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发读写时的偶发 busy 错误
// - 参考数据库建表（幂等）
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::path::PathBuf;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "AFOLU_EF_DB_PATH";

/// 参考数据库建表语句
///
/// 表名沿用参考数据来源的原始命名。
pub const REFERENCE_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS config_kv (
    scope_id TEXT NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (scope_id, key)
);

CREATE TABLE IF NOT EXISTS categoria_animal (
    id INTEGER PRIMARY KEY,
    a1 REAL NOT NULL,
    tc REAL NOT NULL,
    rcms REAL NOT NULL,
    bi REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS variedad_pasto (
    id INTEGER PRIMARY KEY,
    ed REAL NOT NULL,
    eb REAL NOT NULL,
    fdn REAL NOT NULL,
    fda REAL NOT NULL,
    enm REAL NOT NULL,
    cen REAL NOT NULL,
    pc REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS coeficiente_actividad (
    id INTEGER PRIMARY KEY,
    valor REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS coeficiente_prenez (
    id INTEGER PRIMARY KEY,
    valor REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS condicion_sexual (
    id INTEGER PRIMARY KEY,
    valor REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS capacidad_metano (
    id_at INTEGER NOT NULL,
    id_sp INTEGER NOT NULL,
    bo REAL NOT NULL CHECK (bo > 0),
    PRIMARY KEY (id_at, id_sp)
);

CREATE TABLE IF NOT EXISTS fraccion_estiercol (
    id_at INTEGER NOT NULL,
    id_gestion INTEGER NOT NULL,
    fraccion REAL NOT NULL CHECK (fraccion >= 0 AND fraccion <= 1),
    PRIMARY KEY (id_at, id_gestion)
);
"#;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建表并记录 schema_version（幂等）
pub fn init_reference_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(REFERENCE_SCHEMA_SQL)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 默认数据库路径
///
/// 优先级: 环境变量 AFOLU_EF_DB_PATH > 用户数据目录 > 当前目录
pub fn default_db_path() -> PathBuf {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    match dirs::data_dir() {
        Some(data_dir) => data_dir.join("afolu-ef").join("reference.db"),
        None => PathBuf::from("./afolu_ef_reference.db"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        assert_eq!(read_schema_version(&conn).unwrap(), None);

        init_reference_schema(&conn).unwrap();
        init_reference_schema(&conn).unwrap();
        assert_eq!(read_schema_version(&conn).unwrap(), Some(CURRENT_SCHEMA_VERSION));
    }

    #[test]
    fn test_fraction_check_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        init_reference_schema(&conn).unwrap();
        let result = conn.execute(
            "INSERT INTO fraccion_estiercol (id_at, id_gestion, fraccion) VALUES (1, 1, 1.5)",
            [],
        );
        assert!(result.is_err());
    }
}
