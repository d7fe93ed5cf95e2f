// ==========================================
// 牛只排放因子计算系统 - 字段映射器
// ==========================================
// 职责: 源字段 → ProfileInput 映射 + 类型转换
// 列名: 标准英文名,兼容参考数据库的西班牙语列名
// ==========================================

use crate::domain::profile::ProfileInput;
use crate::engine::batch::BatchRecord;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawRecord;

/// 字段别名表: (标准名, 别名...)
const FIELD_ALIASES: &[(&str, &[&str])] = &[
    ("label", &["id", "codigo"]),
    ("animal_type_id", &["id_at"]),
    ("category_id", &["id_ca"]),
    ("live_weight_kg", &["peso"]),
    ("adult_weight_kg", &["adult_peso"]),
    ("ambient_temp_c", &["temp"]),
    ("forage_pct", &["por_pasto"]),
    ("supplement_pct", &["por_suple"]),
    ("forage_id", &["id_pasto"]),
    ("supplement_id", &["id_suple"]),
    ("activity_id", &["id_coe_acti"]),
    ("pregnancy_id", &["id_cp"]),
    ("sexual_condition_id", &["id_cs"]),
    ("weight_gain_kg_day", &["gn_peso"]),
    ("milk_l_year", &["leche"]),
    ("milk_fat_pct", &["grasa"]),
    ("work_hours", &["ht"]),
    ("production_system_id", &["id_prod_metano"]),
    ("manure_system_a_id", &["id_gestion_est1"]),
    ("manure_share_a_pct", &["por_gestion1"]),
    ("manure_system_b_id", &["id_gestion_est2"]),
    ("manure_share_b_pct", &["por_gestion2"]),
];

pub struct ProfileFieldMapper;

impl ProfileFieldMapper {
    /// 原始记录 → 批量计算输入
    ///
    /// 只做字段定位与类型转换; 取值范围由 AnimalProfile 校验。
    pub fn map_to_record(&self, raw: &RawRecord) -> ImportResult<BatchRecord> {
        let row = raw.row_number;
        let input = ProfileInput {
            animal_type_id: self.parse_id(raw, "animal_type_id")?,
            category_id: self.parse_id(raw, "category_id")?,
            live_weight_kg: self.parse_f64(raw, "live_weight_kg")?,
            adult_weight_kg: self.parse_f64(raw, "adult_weight_kg")?,
            ambient_temp_c: self.parse_f64(raw, "ambient_temp_c")?,
            forage_pct: self.parse_f64(raw, "forage_pct")?,
            supplement_pct: self.parse_f64(raw, "supplement_pct")?,
            forage_id: self.parse_id(raw, "forage_id")?,
            supplement_id: self.parse_id(raw, "supplement_id")?,
            activity_id: self.parse_id(raw, "activity_id")?,
            pregnancy_id: self.parse_id(raw, "pregnancy_id")?,
            sexual_condition_id: self.parse_id(raw, "sexual_condition_id")?,
            weight_gain_kg_day: self.parse_f64_or_zero(raw, "weight_gain_kg_day")?,
            milk_l_year: self.parse_f64_or_zero(raw, "milk_l_year")?,
            milk_fat_pct: self.parse_f64_or_zero(raw, "milk_fat_pct")?,
            work_hours: self.parse_f64_or_zero(raw, "work_hours")?,
            production_system_id: self.parse_id(raw, "production_system_id")?,
            manure_system_a_id: self.parse_id(raw, "manure_system_a_id")?,
            manure_share_a_pct: self.parse_f64(raw, "manure_share_a_pct")?,
            manure_system_b_id: self.parse_id(raw, "manure_system_b_id")?,
            manure_share_b_pct: self.parse_f64(raw, "manure_share_b_pct")?,
        };

        Ok(BatchRecord {
            row,
            label: self.get_string(raw, "label"),
            input,
        })
    }

    /// 提取字符串字段，按标准名 → 别名依次查找
    fn get_string(&self, raw: &RawRecord, key: &str) -> Option<String> {
        let aliases = FIELD_ALIASES
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, aliases)| *aliases)
            .unwrap_or(&[]);

        std::iter::once(key)
            .chain(aliases.iter().copied())
            .filter_map(|name| raw.fields.get(name))
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
            .map(str::to_string)
    }

    fn require(&self, raw: &RawRecord, key: &str) -> ImportResult<String> {
        self.get_string(raw, key).ok_or_else(|| ImportError::MissingField {
            row: raw.row_number,
            field: key.to_string(),
        })
    }

    /// 解析浮点数（兼容小数逗号，如 "3,5"）
    fn parse_number(&self, raw: &RawRecord, key: &str, value: &str) -> ImportResult<f64> {
        let normalized = if value.contains(',') && !value.contains('.') {
            value.replace(',', ".")
        } else {
            value.to_string()
        };
        normalized
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ImportError::TypeConversionError {
                row: raw.row_number,
                field: key.to_string(),
                message: format!("无法解析为浮点数: {}", value),
            })
    }

    fn parse_f64(&self, raw: &RawRecord, key: &str) -> ImportResult<f64> {
        let value = self.require(raw, key)?;
        self.parse_number(raw, key, &value)
    }

    /// 可选数值字段，缺省为 0
    fn parse_f64_or_zero(&self, raw: &RawRecord, key: &str) -> ImportResult<f64> {
        match self.get_string(raw, key) {
            None => Ok(0.0),
            Some(value) => self.parse_number(raw, key, &value),
        }
    }

    /// 解析编号（Excel 数值单元格可能带 ".0"）
    fn parse_id<T>(&self, raw: &RawRecord, key: &str) -> ImportResult<T>
    where
        T: TryFrom<u64>,
    {
        let value = self.require(raw, key)?;
        let conversion_error = || ImportError::TypeConversionError {
            row: raw.row_number,
            field: key.to_string(),
            message: format!("无法解析为编号: {}", value),
        };

        let integral = match value.parse::<u64>() {
            Ok(v) => v,
            Err(_) => {
                let f = value.parse::<f64>().map_err(|_| conversion_error())?;
                if f.fract() != 0.0 || f < 0.0 || !f.is_finite() {
                    return Err(conversion_error());
                }
                f as u64
            }
        };
        T::try_from(integral).map_err(|_| conversion_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn raw(pairs: &[(&str, &str)]) -> RawRecord {
        RawRecord {
            row_number: 7,
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        }
    }

    fn spanish_row() -> Vec<(&'static str, &'static str)> {
        vec![
            ("id", "HATO-01"),
            ("id_at", "1"),
            ("id_ca", "1"),
            ("peso", "500"),
            ("adult_peso", "550"),
            ("temp", "13"),
            ("por_pasto", "100"),
            ("por_suple", "0"),
            ("id_pasto", "1"),
            ("id_suple", "40"),
            ("id_coe_acti", "2"),
            ("id_cp", "2"),
            ("id_cs", "1"),
            ("leche", "3660"),
            ("grasa", "3,2"),
            ("id_prod_metano", "1"),
            ("id_gestion_est1", "1"),
            ("por_gestion1", "100"),
            ("id_gestion_est2", "3.0"),
            ("por_gestion2", "0"),
        ]
    }

    #[test]
    fn test_spanish_aliases_map_to_default_profile() {
        let record = ProfileFieldMapper.map_to_record(&raw(&spanish_row())).unwrap();
        assert_eq!(record.row, 7);
        assert_eq!(record.label.as_deref(), Some("HATO-01"));
        assert_eq!(record.input, ProfileInput::default());
    }

    #[test]
    fn test_missing_required_field() {
        let mut pairs = spanish_row();
        pairs.retain(|(k, _)| *k != "peso");
        let err = ProfileFieldMapper.map_to_record(&raw(&pairs)).unwrap_err();
        assert!(matches!(err, ImportError::MissingField { row: 7, ref field } if field == "live_weight_kg"));
    }

    #[test]
    fn test_fractional_id_rejected() {
        let mut pairs = spanish_row();
        pairs.retain(|(k, _)| *k != "id_at");
        pairs.push(("id_at", "1.5"));
        let err = ProfileFieldMapper.map_to_record(&raw(&pairs)).unwrap_err();
        assert!(matches!(err, ImportError::TypeConversionError { ref field, .. } if field == "animal_type_id"));
        assert_eq!(err.row(), Some(7));
    }

    #[test]
    fn test_canonical_name_wins_over_alias() {
        let mut pairs = spanish_row();
        pairs.push(("live_weight_kg", "480"));
        let record = ProfileFieldMapper.map_to_record(&raw(&pairs)).unwrap();
        assert_eq!(record.input.live_weight_kg, 480.0);
    }
}
