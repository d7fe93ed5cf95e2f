// 建表并写入内置参考数据集与默认引擎配置。
//
// Usage:
//   cargo run --bin seed_reference_db -- [db_path]
//
// 重复执行是幂等的（UPSERT）。

use afolu_ef::config::{ConfigManager, EngineConfig};
use afolu_ef::db::{default_db_path, read_schema_version};
use afolu_ef::repository::{InMemoryReferenceProvider, SqliteReferenceRepository};
use anyhow::{anyhow, Context};
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    afolu_ef::logging::init();

    let db_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(default_db_path);

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("无法创建目录 {}", parent.display()))?;
        }
    }

    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow!("数据库路径不是有效 UTF-8: {}", db_path.display()))?;

    let repo = SqliteReferenceRepository::new(db_path_str)?;
    let written = repo.import_from(&InMemoryReferenceProvider::with_defaults())?;

    let config_manager =
        ConfigManager::from_connection(repo.connection()).map_err(|e| anyhow!("{}", e))?;
    config_manager
        .save_engine_config(&EngineConfig::default())
        .map_err(|e| anyhow!("{}", e))?;

    let version = {
        let conn = repo.connection();
        let guard = conn.lock().map_err(|e| anyhow!("锁获取失败: {}", e))?;
        read_schema_version(&guard)?
    };

    println!(
        "db={} records={} schema_version={}",
        db_path.display(),
        written,
        version.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
    );
    Ok(())
}
