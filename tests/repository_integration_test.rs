// ==========================================
// 参考数据仓储 / 配置集成测试
// ==========================================
// 职责: SQLite 写入-快照、与内存数据集计算一致、配置读写
// ==========================================

mod test_helpers;

use afolu_ef::config::{config_keys, ConfigManager, EngineConfig};
use afolu_ef::db::{read_schema_version, CURRENT_SCHEMA_VERSION};
use afolu_ef::engine::EmissionEngine;
use afolu_ef::repository::{ReferenceDataProvider, RepositoryError, SqliteReferenceRepository};
use afolu_ef::{AnimalType, ManureSystem, ProductionSystem};
use test_helpers::{calf_input, create_seeded_repo, create_test_db, dairy_input, reference_provider};

#[test]
fn test_schema_created_with_version() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let repo = SqliteReferenceRepository::new(&db_path).expect("reopen should succeed");

    let conn = repo.connection();
    let guard = conn.lock().unwrap();
    assert_eq!(read_schema_version(&guard).unwrap(), Some(CURRENT_SCHEMA_VERSION));
}

#[test]
fn test_import_is_idempotent() {
    let (_temp_file, repo) = create_seeded_repo().expect("Failed to seed repo");
    let written = repo.import_from(&reference_provider()).unwrap();

    // 3 类别 + 4 饲料 + 8 系数 + 14 Bo + 42 流向比例
    assert_eq!(written, 71);

    let conn = repo.connection();
    let guard = conn.lock().unwrap();
    let feeds: i64 = guard
        .query_row("SELECT COUNT(*) FROM variedad_pasto", [], |row| row.get(0))
        .unwrap();
    assert_eq!(feeds, 4);
}

#[test]
fn test_snapshot_matches_seed_data() {
    let (_temp_file, repo) = create_seeded_repo().expect("Failed to seed repo");
    let snapshot = repo.snapshot().unwrap();
    let seed = reference_provider();

    assert_eq!(
        snapshot.categories().collect::<Vec<_>>(),
        seed.categories().collect::<Vec<_>>()
    );
    assert_eq!(snapshot.feeds().collect::<Vec<_>>(), seed.feeds().collect::<Vec<_>>());
    assert_eq!(
        snapshot.max_methane_capacities().collect::<Vec<_>>(),
        seed.max_methane_capacities().collect::<Vec<_>>()
    );
    assert_eq!(
        snapshot.manure_fractions().collect::<Vec<_>>(),
        seed.manure_fractions().collect::<Vec<_>>()
    );
}

#[test]
fn test_sqlite_and_in_memory_providers_agree() {
    let (_temp_file, repo) = create_seeded_repo().expect("Failed to seed repo");
    let engine = EmissionEngine::default();
    let memory = reference_provider();

    for input in [dairy_input(), calf_input()] {
        let from_db = engine.evaluate_input(input.clone(), &repo).unwrap();
        let from_memory = engine.evaluate_input(input, &memory).unwrap();
        assert_eq!(from_db, from_memory);
    }
}

#[test]
fn test_sqlite_lookups() {
    let (_temp_file, repo) = create_seeded_repo().expect("Failed to seed repo");

    assert_eq!(repo.activity_coefficient(3).unwrap(), 0.36);
    assert_eq!(repo.sexual_condition_factor(3).unwrap(), 1.2);
    assert_eq!(
        repo.max_methane_capacity(AnimalType::HighProducingDairyCow, ProductionSystem::Other)
            .unwrap(),
        0.13
    );
    assert_eq!(
        repo.manure_fraction(AnimalType::BeefCow, ManureSystem::DryLot).unwrap(),
        1.0
    );

    let err = repo.feed_composition(777).unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { ref entity, ref id }
        if entity == "variedad_pasto" && id == "777"));
}

#[test]
fn test_out_of_range_feed_row_rejected_on_read() {
    let (_temp_file, repo) = create_seeded_repo().expect("Failed to seed repo");
    {
        let conn = repo.connection();
        let guard = conn.lock().unwrap();
        guard
            .execute(
                "INSERT INTO variedad_pasto (id, ed, eb, fdn, fda, enm, cen, pc)
                 VALUES (90, 10.0, 18.0, 120.0, 30.0, 5.0, 8.0, 9.0)",
                [],
            )
            .unwrap();
    }

    let err = repo.feed_composition(90).unwrap_err();
    assert!(matches!(err, RepositoryError::InvalidValue { .. }), "{}", err);
}

#[test]
fn test_missing_bo_row_surfaces_as_reference_data_error() {
    let (_temp_file, repo) = create_seeded_repo().expect("Failed to seed repo");
    {
        let conn = repo.connection();
        let guard = conn.lock().unwrap();
        guard
            .execute("DELETE FROM capacidad_metano WHERE id_at = 1", [])
            .unwrap();
    }

    let err = EmissionEngine::default()
        .evaluate_input(dairy_input(), &repo)
        .unwrap_err();
    assert!(err.is_reference_data());
    assert_eq!(err.kind(), "reference_data");
}

// ==========================================
// ConfigManager
// ==========================================

#[test]
fn test_engine_config_defaults_when_table_empty() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let manager = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");
    assert_eq!(manager.load_engine_config().unwrap(), EngineConfig::default());
}

#[test]
fn test_engine_config_round_trip_through_config_kv() {
    let (_temp_file, repo) = create_seeded_repo().expect("Failed to seed repo");
    let manager = ConfigManager::from_connection(repo.connection()).unwrap();

    let config = EngineConfig {
        ym_band_max_pct: 10.0,
        intake_deviation_warn_pct: 30.0,
        ..EngineConfig::default()
    };
    assert_eq!(manager.save_engine_config(&config).unwrap(), 5);
    assert_eq!(manager.load_engine_config().unwrap(), config);

    // 30% 阈值下参考奶牛不再告警
    let report = EmissionEngine::new(manager.load_engine_config().unwrap())
        .evaluate_input(dairy_input(), &repo)
        .unwrap();
    assert!(!report.has_warnings());
}

#[test]
fn test_unparsable_config_value_is_error() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let manager = ConfigManager::new(&db_path).unwrap();
    manager
        .set_global_config_value(config_keys::YM_BAND_MIN_PCT, "abc")
        .unwrap();
    assert!(manager.load_engine_config().is_err());
}

#[test]
fn test_inconsistent_ym_band_rejected() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let manager = ConfigManager::new(&db_path).unwrap();
    manager
        .set_global_config_value(config_keys::YM_BAND_MIN_PCT, "15")
        .unwrap();
    assert!(manager.load_engine_config().is_err());
}

#[test]
fn test_config_snapshot_lists_saved_keys() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let manager = ConfigManager::new(&db_path).unwrap();
    manager.save_engine_config(&EngineConfig::default()).unwrap();

    let snapshot: serde_json::Value = serde_json::from_str(&manager.get_config_snapshot().unwrap()).unwrap();
    assert_eq!(snapshot[config_keys::YM_BAND_MAX_PCT], "12");
    assert_eq!(snapshot.as_object().unwrap().len(), 5);
}
