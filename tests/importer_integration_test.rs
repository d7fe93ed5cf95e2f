// ==========================================
// 畜群文件导入集成测试
// ==========================================
// 职责: CSV → 批量计算输入 → 批量计算
// 场景: 西班牙语列名、小数逗号、行级错误收集
// ==========================================

mod test_helpers;

use afolu_ef::engine::{BatchEvaluator, EmissionEngine};
use afolu_ef::importer::{ImportError, ProfileImporter};
use std::sync::Arc;
use test_helpers::{calf_input, dairy_input, reference_provider, write_csv};

const SPANISH_HEADER: &str = "codigo,id_at,id_ca,peso,adult_peso,temp,por_pasto,por_suple,id_pasto,id_suple,id_coe_acti,id_cp,id_cs,gn_peso,leche,grasa,ht,id_prod_metano,id_gestion_est1,por_gestion1,id_gestion_est2,por_gestion2";

#[test]
fn test_import_spanish_headers() {
    let content = format!(
        "{}\n{}\n{}\n",
        SPANISH_HEADER,
        "HATO-01,1,1,500,550,13,100,0,1,40,2,2,1,0,3660,3.2,0,1,1,100,3,0",
        "TERNERO-07,5,2,120,550,13,60,30,1,40,2,1,2,0.6,800,3.5,0,1,1,100,3,0",
    );
    let file = write_csv(&content).expect("Failed to write csv");

    let outcome = ProfileImporter::new().import_file(file.path()).unwrap();
    assert!(outcome.rejected.is_empty());
    assert_eq!(outcome.records.len(), 2);

    assert_eq!(outcome.records[0].row, 1);
    assert_eq!(outcome.records[0].label.as_deref(), Some("HATO-01"));
    assert_eq!(outcome.records[0].input, dairy_input());
    assert_eq!(outcome.records[1].input, calf_input());
}

#[test]
fn test_import_collects_row_errors() {
    let content = format!(
        "{}\n{}\n{}\n{}\n",
        SPANISH_HEADER,
        "A,1,1,500,550,13,100,0,1,40,2,2,1,0,3660,3.2,0,1,1,100,3,0",
        "B,1,1,quinientos,550,13,100,0,1,40,2,2,1,0,3660,3.2,0,1,1,100,3,0",
        "C,1,1,500,550,,100,0,1,40,2,2,1,0,3660,3.2,0,1,1,100,3,0",
    );
    let file = write_csv(&content).expect("Failed to write csv");

    let outcome = ProfileImporter::new().import_file(file.path()).unwrap();
    assert_eq!(outcome.total_rows(), 3);
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.rejected.len(), 2);

    assert!(matches!(
        outcome.rejected[0],
        ImportError::TypeConversionError { row: 2, ref field, .. } if field == "live_weight_kg"
    ));
    assert!(matches!(
        outcome.rejected[1],
        ImportError::MissingField { row: 3, ref field } if field == "ambient_temp_c"
    ));
}

#[test]
fn test_canonical_headers_and_optional_columns() {
    let content = "\u{feff}label,animal_type_id,category_id,live_weight_kg,adult_weight_kg,ambient_temp_c,forage_pct,supplement_pct,forage_id,supplement_id,activity_id,pregnancy_id,sexual_condition_id,production_system_id,manure_system_a_id,manure_share_a_pct,manure_system_b_id,manure_share_b_pct\n\
                   TORO-3,4,2,600,650,\"13,5\",100,0,1,40,1,1,3,2,3,100,6,0\n";
    let file = write_csv(content).expect("Failed to write csv");

    let outcome = ProfileImporter::new().import_file(file.path()).unwrap();
    assert!(outcome.rejected.is_empty(), "{:?}", outcome.rejected);
    let input = &outcome.records[0].input;
    assert_eq!(input.animal_type_id, 4);
    assert_eq!(input.ambient_temp_c, 13.5);
    assert_eq!(input.milk_l_year, 0.0);
    assert_eq!(input.work_hours, 0.0);
    assert_eq!(input.manure_system_b_id, 6);
}

#[test]
fn test_unsupported_and_missing_files() {
    let importer = ProfileImporter::new();

    let err = importer.import_file("/nonexistent/herd.csv").unwrap_err();
    assert!(matches!(err, ImportError::FileNotFound(_)));

    let txt = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    let err = importer.import_file(txt.path()).unwrap_err();
    assert!(matches!(err, ImportError::UnsupportedFormat(ref ext) if ext == "txt"));
}

#[tokio::test]
async fn test_import_then_batch_evaluate() {
    let content = format!(
        "{}\n{}\n{}\n",
        SPANISH_HEADER,
        "HATO-01,1,1,500,550,13,100,0,1,40,2,2,1,0,3660,3.2,0,1,1,100,3,0",
        // 高产奶牛体重越界: 导入成功, 计算失败
        "HATO-02,1,1,200,550,13,100,0,1,40,2,2,1,0,3660,3.2,0,1,1,100,3,0",
    );
    let file = write_csv(&content).expect("Failed to write csv");
    let outcome = ProfileImporter::new().import_file(file.path()).unwrap();
    assert_eq!(outcome.records.len(), 2);

    let summary = BatchEvaluator::new(
        Arc::new(EmissionEngine::default()),
        Arc::new(reference_provider()),
    )
    .run(outcome.records)
    .await;

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.rows[1].label.as_deref(), Some("HATO-02"));
    assert!(!summary.rows[1].is_success());
}
