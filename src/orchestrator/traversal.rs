//! 遍历控制器 - 编排层
//!
//! ## 职责
//!
//! 1. **连接存储**：运行开始时连接一次，失败是唯一的致命错误
//! 2. **三层遍历**：科目 → 年份 → 考试类型，严格串行
//! 3. **逐组合处理**：拉取 → 打标签 → 写入 → 限流等待
//! 4. **错误隔离**：单个组合的失败只记录，不终止遍历
//! 5. **优雅停止**：收到取消信号后不再开始新的组合
//! 6. **全局统计**：汇总并上报，最后释放存储连接
//!
//! ## 状态机
//!
//! ```text
//! Idle → Connecting → Running(s, y, t) → Draining → Done
//!            ↓
//!          Fatal
//! ```

use crate::error::AppResult;
use crate::infrastructure::RateLimiter;
use crate::models::{ParameterSpace, Position};
use crate::orchestrator::progress::{ProgressReporter, TraversalEvent};
use crate::orchestrator::run_state::{RunState, RunStatus, RunSummary};
use crate::services::FailureLog;
use crate::traits::{QuestionSource, QuestionStore, StoreConnector};
use crate::workflow::{CombinationCtx, CombinationFlow};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// 遍历状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalState {
    Idle,
    Connecting,
    Running(Position),
    Draining,
    Done,
    /// 存储连接失败
    Fatal,
}

/// 遍历选项
#[derive(Debug, Clone)]
pub struct TraversalOptions {
    pub space: ParameterSpace,
    /// 每个组合之后的固定等待
    pub request_delay: Duration,
    pub verbose_logging: bool,
}

impl Default for TraversalOptions {
    fn default() -> Self {
        Self {
            space: ParameterSpace::default(),
            request_delay: Duration::from_millis(500),
            verbose_logging: false,
        }
    }
}

/// 遍历控制器
///
/// # Type Parameters
///
/// * `Q` - 远程题库
/// * `C` - 存储连接器
/// * `R` - 进度上报器
pub struct Traversal<Q, C, R> {
    flow: CombinationFlow<Q>,
    connector: C,
    reporter: R,
    limiter: RateLimiter,
    space: ParameterSpace,
    failure_log: Option<FailureLog>,
    state: TraversalState,
}

impl<Q, C, R> Traversal<Q, C, R>
where
    Q: QuestionSource,
    C: StoreConnector,
    R: ProgressReporter,
{
    pub fn new(source: Q, connector: C, reporter: R, options: TraversalOptions) -> Self {
        Self {
            flow: CombinationFlow::new(source, options.verbose_logging),
            connector,
            reporter,
            limiter: RateLimiter::new(options.request_delay),
            space: options.space,
            failure_log: None,
            state: TraversalState::Idle,
        }
    }

    /// 记录失败组合到文件
    pub fn with_failure_log(mut self, failure_log: FailureLog) -> Self {
        self.failure_log = Some(failure_log);
        self
    }

    pub fn state(&self) -> TraversalState {
        self.state
    }

    pub fn source(&self) -> &Q {
        self.flow.source()
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// 运行一次完整遍历
    ///
    /// # 返回
    /// - `Ok(RunSummary)`：遍历完成或被取消
    /// - `Err`：存储连接失败（此时没有发出任何请求）
    pub async fn run(&mut self, cancel: CancellationToken) -> AppResult<RunSummary> {
        // ========== Connecting ==========
        self.transition(TraversalState::Connecting);

        let store = match self.connector.connect().await {
            Ok(store) => store,
            Err(e) => {
                self.transition(TraversalState::Fatal);
                error!("❌ 无法连接存储，终止运行: {}", e);
                return Err(e);
            }
        };

        // ========== Running ==========
        let total = self.space.len();
        let mut run_state = RunState::new(total);
        self.reporter.report(TraversalEvent::RunStarted {
            total_combinations: total,
            started_at: run_state.started_wall(),
        });

        let status = self.traverse(&store, &mut run_state, &cancel).await;

        // ========== Draining ==========
        self.transition(TraversalState::Draining);

        let stored_documents = match store.count().await {
            Ok(count) => Some(count),
            Err(e) => {
                warn!("⚠️ 无法统计存储中的文档数: {}", e);
                None
            }
        };

        let summary = RunSummary::from_state(&run_state, status, stored_documents);
        self.reporter
            .report(TraversalEvent::RunFinished { summary: &summary });

        store.close().await;

        self.transition(TraversalState::Done);
        Ok(summary)
    }

    /// 串行处理全部组合
    async fn traverse(
        &mut self,
        store: &C::Store,
        run_state: &mut RunState,
        cancel: &CancellationToken,
    ) -> RunStatus {
        let total = run_state.total_combinations;
        let combinations: Vec<_> = self.space.iter().collect();

        for (idx, (position, combination)) in combinations.into_iter().enumerate() {
            if cancel.is_cancelled() {
                self.reporter.report(TraversalEvent::CancelRequested {
                    processed: run_state.processed_combinations,
                    total,
                });
                return RunStatus::Cancelled;
            }

            self.transition(TraversalState::Running(position));
            let ctx = CombinationCtx::new(combination, position, idx + 1, total);

            let result = self.flow.run(store, &ctx).await;
            run_state.record(&result);

            self.reporter.report(TraversalEvent::CombinationFinished {
                ctx: &ctx,
                result: &result,
                progress: run_state.snapshot(),
            });

            if let (Some(log), Some(reason)) = (&self.failure_log, result.failure_reason()) {
                log.record(&ctx.combination, &reason).await;
            }

            // 无论成功失败都等待；等待期间收到取消信号则立即结束等待
            tokio::select! {
                _ = self.limiter.wait() => {}
                _ = cancel.cancelled() => {
                    debug!("{} 限流等待 {:?} 被中断", ctx, self.limiter.delay());
                }
            }
        }

        info!("✓ 全部 {} 个组合处理完毕", total);
        RunStatus::Completed
    }

    fn transition(&mut self, next: TraversalState) {
        debug!("遍历状态: {:?} → {:?}", self.state, next);
        self.state = next;
    }
}
