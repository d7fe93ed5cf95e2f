// ==========================================
// 牛只排放因子计算系统 - 引擎层错误类型
// ==========================================
// 三类错误互不混淆:
// - Validation: 输入越界（调用方/数据问题，不重试）
// - ReferenceData: 参考数据缺失或不可达（可由调用方重试）
// - Computation: 分母非正或结果非有限
// ==========================================

use crate::domain::error::ValidationError;
use crate::repository::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("输入校验失败 (field={field}): {message}")]
    Validation { field: String, message: String },

    #[error("参考数据不可用: {0}")]
    ReferenceData(#[from] RepositoryError),

    #[error("计算失败 ({quantity}): {message}")]
    Computation { quantity: String, message: String },
}

impl EngineError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        EngineError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn computation(quantity: &str, message: impl Into<String>) -> Self {
        EngineError::Computation {
            quantity: quantity.to_string(),
            message: message.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, EngineError::Validation { .. })
    }

    pub fn is_reference_data(&self) -> bool {
        matches!(self, EngineError::ReferenceData(_))
    }

    pub fn is_computation(&self) -> bool {
        matches!(self, EngineError::Computation { .. })
    }

    /// 错误族标识（批量输出用）
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::Validation { .. } => "validation",
            EngineError::ReferenceData(_) => "reference_data",
            EngineError::Computation { .. } => "computation",
        }
    }

    /// 仅参考数据的瞬时故障允许重试
    pub fn is_retryable(&self) -> bool {
        match self {
            EngineError::ReferenceData(inner) => inner.is_transient(),
            _ => false,
        }
    }
}

impl From<ValidationError> for EngineError {
    fn from(err: ValidationError) -> Self {
        EngineError::Validation {
            field: err.field,
            message: err.message,
        }
    }
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;

/// 除法前检查分母为正
pub(crate) fn ensure_positive(quantity: &str, value: f64) -> EngineResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(EngineError::computation(
            quantity,
            format!("分母必须为正的有限值, 实际 {}", value),
        ))
    }
}

/// 结果必须为有限值
pub(crate) fn ensure_finite(quantity: &str, value: f64) -> EngineResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EngineError::computation(
            quantity,
            format!("结果非有限值: {}", value),
        ))
    }
}
