//! 题目存储服务 - 业务能力层
//!
//! 只负责"把一批已打标签的题目写入存储"的能力

use crate::error::AppResult;
use crate::models::TaggedQuestion;
use crate::traits::{QuestionStore, WriteFailure};
use crate::utils::logging::preview;
use tracing::{debug, error};

/// 一次写入的统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistOutcome {
    /// 成功确认的文档数（新增 + 更新）
    pub acknowledged: usize,
    /// 新增的文档数
    pub inserted: usize,
    /// 写入失败的文档数
    pub failed: usize,
}

impl PersistOutcome {
    /// 更新的文档数
    pub fn updated(&self) -> usize {
        self.acknowledged - self.inserted
    }
}

/// 题目存储服务
///
/// 职责：
/// - 空批次直接返回，不访问存储
/// - 一次批量 upsert，单条失败不影响其它文档
/// - 整批失败以 `Err` 返回，由流程层记录并跳过
pub struct QuestionPersister;

impl QuestionPersister {
    pub fn new() -> Self {
        Self
    }

    /// 写入一批题目
    ///
    /// # 参数
    /// - `store`: 已连接的存储
    /// - `questions`: 已打标签的题目
    pub async fn persist<S: QuestionStore>(
        &self,
        store: &S,
        questions: &[TaggedQuestion],
    ) -> AppResult<PersistOutcome> {
        if questions.is_empty() {
            return Ok(PersistOutcome::default());
        }

        let result = store.upsert_batch(questions).await?;

        for failure in &result.failures {
            log_write_failure(failure);
        }

        let outcome = PersistOutcome {
            acknowledged: result.acknowledged(),
            inserted: result.inserted,
            failed: result.failures.len(),
        };

        debug!(
            "写入完成: 确认 {}, 新增 {}, 失败 {}",
            outcome.acknowledged, outcome.inserted, outcome.failed
        );

        Ok(outcome)
    }
}

impl Default for QuestionPersister {
    fn default() -> Self {
        Self::new()
    }
}

fn log_write_failure(failure: &WriteFailure) {
    error!(
        "❌ 第 {} 条写入失败 ({} {}): {} | 题干: {}",
        failure.index,
        failure.key.subject,
        failure.key.year,
        failure.message,
        preview(&failure.key.question, 60)
    );
}
