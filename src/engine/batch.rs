// ==========================================
// 牛只排放因子计算系统 - 批量计算
// ==========================================
// 职责: 多条画像并发计算,逐行返回结果
// 红线: 单行失败只影响该行,不取消其它行
// ==========================================

use crate::domain::emission::EmissionReport;
use crate::domain::profile::ProfileInput;
use crate::engine::orchestrator::EmissionEngine;
use crate::repository::ReferenceDataProvider;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

/// 批量输入中的一行
#[derive(Debug, Clone)]
pub struct BatchRecord {
    /// 源文件行号（从 1 开始，不含表头）
    pub row: usize,
    /// 可选的行标识（如畜群编号）
    pub label: Option<String>,
    pub input: ProfileInput,
}

/// 单行计算结果
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RowOutcome {
    Success {
        report: EmissionReport,
    },
    Failed {
        error_kind: String,
        message: String,
        retryable: bool,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchRowResult {
    pub row: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(flatten)]
    pub outcome: RowOutcome,
}

impl BatchRowResult {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, RowOutcome::Success { .. })
    }

    pub fn report(&self) -> Option<&EmissionReport> {
        match &self.outcome {
            RowOutcome::Success { report } => Some(report),
            RowOutcome::Failed { .. } => None,
        }
    }
}

/// 一次批量运行的汇总
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// 成功但带告警的行数
    pub warned: usize,
    pub rows: Vec<BatchRowResult>,
}

// ==========================================
// BatchEvaluator
// ==========================================
pub struct BatchEvaluator<P>
where
    P: ReferenceDataProvider + 'static,
{
    engine: Arc<EmissionEngine>,
    provider: Arc<P>,
}

impl<P> BatchEvaluator<P>
where
    P: ReferenceDataProvider + 'static,
{
    pub fn new(engine: Arc<EmissionEngine>, provider: Arc<P>) -> Self {
        Self { engine, provider }
    }

    /// 并发计算所有行
    ///
    /// 每行在 tokio 阻塞线程池上执行（SQLite 查询为同步调用）。
    pub async fn run(&self, records: Vec<BatchRecord>) -> BatchSummary {
        let run_id = Uuid::new_v4().to_string();
        let started_at = Utc::now();
        info!(run_id = %run_id, count = records.len(), "开始批量计算");

        let tasks = records.into_iter().map(|record| {
            let engine = Arc::clone(&self.engine);
            let provider = Arc::clone(&self.provider);
            async move {
                let BatchRecord { row, label, input } = record;
                let joined = tokio::task::spawn_blocking(move || {
                    engine.evaluate_input(input, provider.as_ref())
                })
                .await;

                let outcome = match joined {
                    Ok(Ok(report)) => RowOutcome::Success { report },
                    Ok(Err(e)) => {
                        error!(row, kind = e.kind(), error = %e, "行计算失败");
                        RowOutcome::Failed {
                            error_kind: e.kind().to_string(),
                            message: e.to_string(),
                            retryable: e.is_retryable(),
                        }
                    }
                    Err(e) => {
                        error!(row, error = %e, "计算任务执行失败");
                        RowOutcome::Failed {
                            error_kind: "internal".to_string(),
                            message: format!("任务执行失败: {}", e),
                            retryable: false,
                        }
                    }
                };
                BatchRowResult { row, label, outcome }
            }
        });

        let rows = join_all(tasks).await;

        let succeeded = rows.iter().filter(|r| r.is_success()).count();
        let warned = rows
            .iter()
            .filter_map(|r| r.report())
            .filter(|report| report.has_warnings())
            .count();
        let summary = BatchSummary {
            run_id,
            started_at,
            finished_at: Utc::now(),
            total: rows.len(),
            succeeded,
            failed: rows.len() - succeeded,
            warned,
            rows,
        };

        info!(
            run_id = %summary.run_id,
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            warned = summary.warned,
            "批量计算完成"
        );
        summary
    }
}
