// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库、参考数据集、标准画像、CSV 夹具
// ==========================================

#![allow(dead_code)]

use afolu_ef::domain::ProfileInput;
use afolu_ef::repository::{InMemoryReferenceProvider, SqliteReferenceRepository};
use std::error::Error;
use std::io::Write;
use tempfile::NamedTempFile;

/// 相对误差容差
pub const REL_TOLERANCE: f64 = 1e-6;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().ok_or("非 UTF-8 路径")?.to_string();

    // new() 内部建表
    SqliteReferenceRepository::new(&db_path)?;

    Ok((temp_file, db_path))
}

/// 创建并写入内置参考数据集的仓储
pub fn create_seeded_repo() -> Result<(NamedTempFile, SqliteReferenceRepository), Box<dyn Error>> {
    let (temp_file, db_path) = create_test_db()?;
    let repo = SqliteReferenceRepository::new(&db_path)?;
    repo.import_from(&InMemoryReferenceProvider::with_defaults())?;
    Ok((temp_file, repo))
}

pub fn reference_provider() -> InMemoryReferenceProvider {
    InMemoryReferenceProvider::with_defaults()
}

/// 参考算例: 500 kg 高产奶牛，全放牧
pub fn dairy_input() -> ProfileInput {
    ProfileInput::default()
}

/// 参考算例: 120 kg 断奶前犊牛，60% 牧草 + 30% 补充料，其余来自哺乳
pub fn calf_input() -> ProfileInput {
    ProfileInput {
        animal_type_id: 5,
        category_id: 2,
        live_weight_kg: 120.0,
        adult_weight_kg: 550.0,
        forage_pct: 60.0,
        supplement_pct: 30.0,
        pregnancy_id: 1,
        sexual_condition_id: 2,
        weight_gain_kg_day: 0.6,
        milk_l_year: 800.0,
        milk_fat_pct: 3.5,
        ..ProfileInput::default()
    }
}

/// 育肥牛: 350 kg，牧草 + 精料各半
pub fn feedlot_input() -> ProfileInput {
    ProfileInput {
        animal_type_id: 7,
        category_id: 2,
        live_weight_kg: 350.0,
        adult_weight_kg: 550.0,
        forage_pct: 50.0,
        supplement_pct: 50.0,
        activity_id: 1,
        pregnancy_id: 1,
        sexual_condition_id: 2,
        weight_gain_kg_day: 1.0,
        milk_l_year: 0.0,
        milk_fat_pct: 0.0,
        ..ProfileInput::default()
    }
}

/// 相对误差断言
pub fn assert_close(actual: f64, expected: f64, label: &str) {
    let scale = expected.abs().max(f64::MIN_POSITIVE);
    let rel = (actual - expected).abs() / scale;
    assert!(
        rel <= REL_TOLERANCE,
        "{}: actual={} expected={} rel_err={}",
        label,
        actual,
        expected,
        rel
    );
}

/// 写入临时 CSV 文件
pub fn write_csv(content: &str) -> Result<NamedTempFile, Box<dyn Error>> {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile()?;
    file.write_all(content.as_bytes())?;
    file.flush()?;
    Ok(file)
}
