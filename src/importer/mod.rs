// ==========================================
// 牛只排放因子计算系统 - 导入层
// ==========================================
// 职责: 畜群记录文件 → 批量计算输入
// 支持: Excel, CSV
// 红线: 单行映射失败只记录该行,不中断整个文件
// ==========================================

pub mod error;
pub mod field_mapper;
pub mod file_parser;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use field_mapper::ProfileFieldMapper;
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawRecord, UniversalFileParser};

use crate::engine::batch::BatchRecord;
use std::path::Path;
use tracing::{info, warn};

/// 一个文件的导入结果
#[derive(Debug, Default)]
pub struct ImportOutcome {
    pub records: Vec<BatchRecord>,
    /// 行级映射错误
    pub rejected: Vec<ImportError>,
}

impl ImportOutcome {
    pub fn total_rows(&self) -> usize {
        self.records.len() + self.rejected.len()
    }
}

// ==========================================
// ProfileImporter
// ==========================================
pub struct ProfileImporter {
    parser: UniversalFileParser,
    mapper: ProfileFieldMapper,
}

impl Default for ProfileImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileImporter {
    pub fn new() -> Self {
        Self {
            parser: UniversalFileParser,
            mapper: ProfileFieldMapper,
        }
    }

    /// 解析文件并逐行映射
    ///
    /// # 错误
    /// 文件级错误（不存在/格式不支持/解析失败）直接返回; 行级错误收集在 rejected。
    pub fn import_file<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<ImportOutcome> {
        let path = file_path.as_ref();
        let raw_records = self.parser.parse(path)?;

        let mut outcome = ImportOutcome::default();
        for raw in &raw_records {
            match self.mapper.map_to_record(raw) {
                Ok(record) => outcome.records.push(record),
                Err(e) => {
                    warn!(file = %path.display(), row = raw.row_number, error = %e, "行映射失败");
                    outcome.rejected.push(e);
                }
            }
        }

        info!(
            file = %path.display(),
            total = outcome.total_rows(),
            accepted = outcome.records.len(),
            rejected = outcome.rejected.len(),
            "文件导入完成"
        );
        Ok(outcome)
    }
}
