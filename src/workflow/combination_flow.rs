//! 组合处理流程 - 流程层
//!
//! 核心职责：定义"一个组合"的完整处理流程
//!
//! 流程顺序：
//! 1. 拉取题目
//! 2. 有题目 → 打标签 → 写入存储
//! 3. 无题目或拉取失败 → 跳过

use tracing::{error, info};

use crate::models::TaggedQuestion;
use crate::services::{FetchOutcome, PersistOutcome, QuestionFetcher, QuestionPersister};
use crate::traits::{QuestionSource, QuestionStore};
use crate::utils::logging::preview;
use crate::workflow::combination_ctx::CombinationCtx;

/// 组合处理结果
#[derive(Debug, Clone, PartialEq)]
pub enum CombinationResult {
    /// 拉取到题目并完成写入（可能有部分文档写入失败）
    Stored {
        fetched: usize,
        outcome: PersistOutcome,
    },
    /// 题库没有该组合的题目
    Empty,
    /// 拉取失败，按零结果处理
    FetchFailed { reason: String },
    /// 整批写入失败
    PersistFailed { fetched: usize, reason: String },
}

impl CombinationResult {
    /// 拉取到的题目数量
    pub fn fetched(&self) -> usize {
        match self {
            CombinationResult::Stored { fetched, .. }
            | CombinationResult::PersistFailed { fetched, .. } => *fetched,
            CombinationResult::Empty | CombinationResult::FetchFailed { .. } => 0,
        }
    }

    /// 失败原因（部分写入失败也算）
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            CombinationResult::FetchFailed { reason } => Some(format!("拉取失败: {}", reason)),
            CombinationResult::PersistFailed { reason, .. } => {
                Some(format!("写入失败: {}", reason))
            }
            CombinationResult::Stored { outcome, .. } if outcome.failed > 0 => {
                Some(format!("{} 条文档写入失败", outcome.failed))
            }
            _ => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.failure_reason().is_some()
    }
}

/// 组合处理流程
///
/// - 编排 拉取 → 打标签 → 写入
/// - 不持有存储连接（由编排层借给它）
/// - 从不向上抛错：所有失败都折叠进 `CombinationResult`
pub struct CombinationFlow<Q> {
    fetcher: QuestionFetcher<Q>,
    persister: QuestionPersister,
    verbose_logging: bool,
}

impl<Q: QuestionSource> CombinationFlow<Q> {
    /// 创建新的组合处理流程
    pub fn new(source: Q, verbose_logging: bool) -> Self {
        Self {
            fetcher: QuestionFetcher::new(source),
            persister: QuestionPersister::new(),
            verbose_logging,
        }
    }

    pub fn source(&self) -> &Q {
        self.fetcher.source()
    }

    pub async fn run<S: QuestionStore>(&self, store: &S, ctx: &CombinationCtx) -> CombinationResult {
        // ========== 1. 拉取 ==========
        let questions = match self.fetcher.fetch(&ctx.combination).await {
            FetchOutcome::Fetched(questions) => questions,
            FetchOutcome::Empty => return CombinationResult::Empty,
            FetchOutcome::Failed(reason) => return CombinationResult::FetchFailed { reason },
        };

        let fetched = questions.len();

        // ========== 2. 打标签 ==========
        let tagged = TaggedQuestion::tag_all(questions, &ctx.combination);

        if self.verbose_logging {
            self.log_first_question(ctx, &tagged);
        }

        // ========== 3. 写入 ==========
        match self.persister.persist(store, &tagged).await {
            Ok(outcome) => CombinationResult::Stored { fetched, outcome },
            Err(e) => {
                error!("{} ❌ 整批写入失败: {}", ctx, e);
                CombinationResult::PersistFailed {
                    fetched,
                    reason: e.to_string(),
                }
            }
        }
    }

    // ========== 日志辅助方法 ==========

    /// 显示第一道题的预览
    fn log_first_question(&self, ctx: &CombinationCtx, tagged: &[TaggedQuestion]) {
        if let Some(first) = tagged.first() {
            info!("{} {}", ctx, describe_question(first));
        }
    }
}

/// 题目的单行摘要：题干、选项数、答案、解析
fn describe_question(question: &TaggedQuestion) -> String {
    let raw = &question.raw;
    format!(
        "题干: {} | 选项: {} | 答案: {} | 解析: {}",
        preview(question.question_text(), 80),
        raw.options().len(),
        raw.answer().unwrap_or("-"),
        raw.explanation()
            .map(|text| preview(text, 40))
            .unwrap_or_else(|| "-".to_string())
    )
}
