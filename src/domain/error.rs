// ==========================================
// 牛只排放因子计算系统 - 领域层错误类型
// ==========================================
// 画像构造只会因输入越界失败
// 引擎层通过 From 转为 EngineError::Validation
// ==========================================

use thiserror::Error;

/// 输入校验错误
#[derive(Error, Debug, Clone, PartialEq)]
#[error("输入校验失败 (field={field}): {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Result 类型别名
pub type DomainResult<T> = Result<T, ValidationError>;
