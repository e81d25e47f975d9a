//! 题目拉取服务 - 业务能力层
//!
//! 只负责"拉取一个组合"的能力，所有错误在这一层被吸收

use crate::models::{Combination, RawQuestion};
use crate::traits::QuestionSource;
use tracing::debug;

/// 一次拉取的结果
///
/// 区分"题库没有题"和"请求失败"，但两者对遍历的影响相同：跳过该组合
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// 拉取到题目
    Fetched(Vec<RawQuestion>),
    /// 请求成功但没有题目
    Empty,
    /// 请求失败（超时、非 2xx、网络错误、响应格式错误）
    Failed(String),
}

impl FetchOutcome {
    /// 拉取到的题目数量
    pub fn count(&self) -> usize {
        match self {
            FetchOutcome::Fetched(questions) => questions.len(),
            FetchOutcome::Empty | FetchOutcome::Failed(_) => 0,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FetchOutcome::Failed(_))
    }
}

/// 题目拉取服务
///
/// 职责：
/// - 每个组合只发一次请求（超时由客户端保证）
/// - 把空结果和错误都归一化为 `FetchOutcome`，从不向上抛错
/// - 不关心打标签和存储
pub struct QuestionFetcher<Q> {
    source: Q,
}

impl<Q: QuestionSource> QuestionFetcher<Q> {
    pub fn new(source: Q) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &Q {
        &self.source
    }

    /// 拉取一个组合
    pub async fn fetch(&self, combination: &Combination) -> FetchOutcome {
        debug!("拉取组合: {}", combination);

        match self.source.fetch(combination).await {
            Ok(questions) if questions.is_empty() => FetchOutcome::Empty,
            Ok(questions) => FetchOutcome::Fetched(questions),
            Err(e) => FetchOutcome::Failed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ApiError, AppError};
    use crate::models::{ExamType, Subject};
    use serde_json::json;

    struct FixedSource(Result<usize, u16>);

    impl QuestionSource for FixedSource {
        async fn fetch(&self, _combination: &Combination) -> Result<Vec<RawQuestion>, AppError> {
            match self.0 {
                Ok(n) => Ok((0..n)
                    .map(|i| serde_json::from_value(json!({"question": format!("Q{}", i)})).unwrap())
                    .collect()),
                Err(status) => Err(ApiError::BadStatus {
                    endpoint: "http://test/m".to_string(),
                    status,
                    body: String::new(),
                }
                .into()),
            }
        }
    }

    fn combination() -> Combination {
        Combination::new(Subject::Biology, 2010, ExamType::Utme)
    }

    #[tokio::test]
    async fn test_fetched_questions() {
        let outcome = QuestionFetcher::new(FixedSource(Ok(3)))
            .fetch(&combination())
            .await;
        assert_eq!(outcome.count(), 3);
        assert!(!outcome.is_failed());
    }

    #[tokio::test]
    async fn test_empty_result_is_not_failure() {
        let outcome = QuestionFetcher::new(FixedSource(Ok(0)))
            .fetch(&combination())
            .await;
        assert_eq!(outcome, FetchOutcome::Empty);
    }

    #[tokio::test]
    async fn test_error_normalized_to_failed() {
        let outcome = QuestionFetcher::new(FixedSource(Err(503)))
            .fetch(&combination())
            .await;
        assert!(outcome.is_failed());
        assert_eq!(outcome.count(), 0);
        match outcome {
            FetchOutcome::Failed(reason) => assert!(reason.contains("503")),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
