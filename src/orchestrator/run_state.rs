//! 运行状态与统计
//!
//! 只存在于单次运行期间，由遍历控制器独占，不持久化

use crate::orchestrator::progress::ProgressSnapshot;
use crate::workflow::CombinationResult;
use chrono::{DateTime, Local};
use std::time::Duration;
use tokio::time::Instant;

/// 运行计数器
#[derive(Debug, Clone)]
pub struct RunState {
    started_at: Instant,
    started_wall: DateTime<Local>,
    pub total_combinations: usize,
    /// 已处理的组合数（0..=total_combinations，单调递增）
    pub processed_combinations: usize,
    /// 拉取到的题目总数（不去重）
    pub total_questions_processed: usize,
    pub inserted: usize,
    pub updated: usize,
    pub empty_combinations: usize,
    pub failed_combinations: usize,
}

impl RunState {
    pub fn new(total_combinations: usize) -> Self {
        Self {
            started_at: Instant::now(),
            started_wall: Local::now(),
            total_combinations,
            processed_combinations: 0,
            total_questions_processed: 0,
            inserted: 0,
            updated: 0,
            empty_combinations: 0,
            failed_combinations: 0,
        }
    }

    pub fn started_wall(&self) -> DateTime<Local> {
        self.started_wall
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// 记录一个组合的结果
    pub fn record(&mut self, result: &CombinationResult) {
        self.processed_combinations += 1;
        self.total_questions_processed += result.fetched();

        match result {
            CombinationResult::Stored { outcome, .. } => {
                self.inserted += outcome.inserted;
                self.updated += outcome.updated();
            }
            CombinationResult::Empty => self.empty_combinations += 1,
            CombinationResult::FetchFailed { .. } | CombinationResult::PersistFailed { .. } => {}
        }

        if result.is_failure() {
            self.failed_combinations += 1;
        }
    }

    /// 当前进度
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot::compute(
            self.processed_combinations,
            self.total_combinations,
            self.total_questions_processed,
            self.elapsed(),
        )
    }
}

/// 运行结束状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// 全部组合处理完毕
    Completed,
    /// 收到中断信号，提前结束
    Cancelled,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Completed => "completed",
            RunStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunStatus::Cancelled)
    }
}

/// 运行汇总
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub status: RunStatus,
    pub total_combinations: usize,
    pub processed_combinations: usize,
    pub total_questions_processed: usize,
    pub inserted: usize,
    pub updated: usize,
    pub empty_combinations: usize,
    pub failed_combinations: usize,
    /// 结束时存储中的文档总数（查询失败时为 None）
    pub stored_documents: Option<u64>,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn from_state(state: &RunState, status: RunStatus, stored_documents: Option<u64>) -> Self {
        Self {
            status,
            total_combinations: state.total_combinations,
            processed_combinations: state.processed_combinations,
            total_questions_processed: state.total_questions_processed,
            inserted: state.inserted,
            updated: state.updated,
            empty_combinations: state.empty_combinations,
            failed_combinations: state.failed_combinations,
            stored_documents,
            elapsed: state.elapsed(),
        }
    }

    /// 汇总时的进度
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot::compute(
            self.processed_combinations,
            self.total_combinations,
            self.total_questions_processed,
            self.elapsed,
        )
    }
}
