//! 进度与统计上报
//!
//! 遍历控制器在每个组合结束和运行边界处上报事件。
//! 上报器是纯副作用的接收端：不返回错误，也不影响遍历的正确性。

use crate::orchestrator::run_state::RunSummary;
use crate::utils::logging::{format_minutes, print_final_stats};
use crate::workflow::{CombinationCtx, CombinationResult};
use chrono::{DateTime, Local};
use std::time::Duration;
use tracing::{error, info, warn};

/// 进度快照
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSnapshot {
    pub processed: usize,
    pub total: usize,
    /// 完成百分比 = 100 * processed / total
    pub percent: f64,
    /// 已用时间（分钟）
    pub elapsed_minutes: f64,
    /// 吞吐量（题/分钟）
    pub questions_per_minute: f64,
}

impl ProgressSnapshot {
    pub fn compute(processed: usize, total: usize, questions: usize, elapsed: Duration) -> Self {
        let percent = if total == 0 {
            100.0
        } else {
            100.0 * processed as f64 / total as f64
        };
        let elapsed_minutes = elapsed.as_millis() as f64 / 60_000.0;
        let questions_per_minute = if elapsed_minutes > 0.0 {
            questions as f64 / elapsed_minutes
        } else {
            0.0
        };

        Self {
            processed,
            total,
            percent,
            elapsed_minutes,
            questions_per_minute,
        }
    }
}

/// 遍历事件
#[derive(Debug, Clone, Copy)]
pub enum TraversalEvent<'a> {
    /// 连接成功，开始遍历
    RunStarted {
        total_combinations: usize,
        started_at: DateTime<Local>,
    },
    /// 一个组合处理完毕（成功或失败）
    CombinationFinished {
        ctx: &'a CombinationCtx,
        result: &'a CombinationResult,
        progress: ProgressSnapshot,
    },
    /// 收到中断信号，不再开始新的组合
    CancelRequested { processed: usize, total: usize },
    /// 运行结束汇总
    RunFinished { summary: &'a RunSummary },
}

/// 进度上报器
pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: TraversalEvent<'_>);
}

/// 基于 tracing 的上报器
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn report(&self, event: TraversalEvent<'_>) {
        match event {
            TraversalEvent::RunStarted {
                total_combinations,
                started_at,
            } => {
                info!(
                    "▶️ 开始遍历 {} 个组合 ({})",
                    total_combinations,
                    started_at.format("%Y-%m-%d %H:%M:%S")
                );
            }
            TraversalEvent::CombinationFinished {
                ctx,
                result,
                progress,
            } => log_combination(ctx, result, &progress),
            TraversalEvent::CancelRequested { processed, total } => {
                warn!(
                    "🛑 收到中断信号，停止遍历 (已处理 {}/{})",
                    processed, total
                );
            }
            TraversalEvent::RunFinished { summary } => print_final_stats(summary),
        }
    }
}

fn log_combination(ctx: &CombinationCtx, result: &CombinationResult, progress: &ProgressSnapshot) {
    let c = &ctx.combination;
    let percent = format!("{:.2}%", progress.percent);

    match result {
        CombinationResult::Stored { fetched, outcome } => info!(
            subject = %c.subject,
            year = c.year,
            exam_type = %c.exam_type,
            fetched = *fetched,
            inserted = outcome.inserted,
            updated = outcome.updated(),
            failed = outcome.failed,
            progress = %percent,
            "{} ✓ 拉取 {} 道题, 新增 {}, 更新 {} ({}, 已用 {})",
            ctx,
            fetched,
            outcome.inserted,
            outcome.updated(),
            percent,
            format_minutes(progress.elapsed_minutes)
        ),
        CombinationResult::Empty => info!(
            subject = %c.subject,
            year = c.year,
            exam_type = %c.exam_type,
            fetched = 0,
            progress = %percent,
            "{} 无题目 ({})",
            ctx,
            percent
        ),
        CombinationResult::FetchFailed { reason } => warn!(
            subject = %c.subject,
            year = c.year,
            exam_type = %c.exam_type,
            fetched = 0,
            progress = %percent,
            "{} ⚠️ 拉取失败，跳过: {} ({})",
            ctx,
            reason,
            percent
        ),
        CombinationResult::PersistFailed { fetched, reason } => error!(
            subject = %c.subject,
            year = c.year,
            exam_type = %c.exam_type,
            fetched = *fetched,
            progress = %percent,
            "{} ❌ 写入失败，跳过: {} ({})",
            ctx,
            reason,
            percent
        ),
    }
}
