//! 集成测试共用的 mock 实现
//!
//! 题库、存储、连接器和上报器全部在内存中实现，用于隔离验证遍历逻辑

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use aloc_scraper::error::{ApiError, AppError, StoreError};
use aloc_scraper::models::NaturalKey;
use aloc_scraper::orchestrator::TraversalEvent;
use aloc_scraper::traits::WriteFailure;
use aloc_scraper::{
    BatchWriteResult, Combination, CombinationResult, ExamType, ParameterSpace, ProgressReporter,
    QuestionSource, QuestionStore, RawQuestion, StoreConnector, Subject, TaggedQuestion,
};
use serde_json::json;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

// =============================================================================
// 参数空间
// =============================================================================

/// 2 科目 × 3 年 × 3 类型 = 18 个组合
pub fn small_space() -> ParameterSpace {
    ParameterSpace {
        subjects: vec![Subject::Mathematics, Subject::English],
        year_start: 2004,
        year_end: 2006,
        exam_types: ExamType::ALL.to_vec(),
    }
}

pub fn question(text: &str, answer: &str) -> RawQuestion {
    serde_json::from_value(json!({
        "question": text,
        "option": {"a": "1", "b": "2", "c": "3", "d": "4"},
        "answer": answer,
    }))
    .unwrap()
}

// =============================================================================
// MockSource
// =============================================================================

#[derive(Clone)]
enum MockResponse {
    Questions(Vec<RawQuestion>),
    Fail,
}

/// 可配置的内存题库
///
/// 默认每个组合返回 `per_combination` 道互不相同的题目
#[derive(Clone)]
pub struct MockSource {
    per_combination: usize,
    overrides: HashMap<Combination, MockResponse>,
    cancel_after: Option<(usize, CancellationToken)>,
    pub calls: Arc<Mutex<Vec<(Combination, Instant)>>>,
}

impl MockSource {
    pub fn new(per_combination: usize) -> Self {
        Self {
            per_combination,
            overrides: HashMap::new(),
            cancel_after: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// 该组合的请求失败
    pub fn failing(mut self, combination: Combination) -> Self {
        self.overrides.insert(combination, MockResponse::Fail);
        self
    }

    /// 该组合返回空结果
    pub fn empty(mut self, combination: Combination) -> Self {
        self.overrides
            .insert(combination, MockResponse::Questions(Vec::new()));
        self
    }

    /// 该组合返回指定题目
    pub fn with_questions(mut self, combination: Combination, questions: Vec<RawQuestion>) -> Self {
        self.overrides
            .insert(combination, MockResponse::Questions(questions));
        self
    }

    /// 第 n 次请求时触发取消
    pub fn cancel_after(mut self, n: usize, token: CancellationToken) -> Self {
        self.cancel_after = Some((n, token));
        self
    }

    pub fn called_combinations(&self) -> Vec<Combination> {
        self.calls.lock().unwrap().iter().map(|(c, _)| *c).collect()
    }

    pub fn call_instants(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(_, t)| *t).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl QuestionSource for MockSource {
    async fn fetch(&self, combination: &Combination) -> Result<Vec<RawQuestion>, AppError> {
        let n = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((*combination, Instant::now()));
            calls.len()
        };

        if let Some((after, token)) = &self.cancel_after {
            if n == *after {
                token.cancel();
            }
        }

        match self.overrides.get(combination) {
            Some(MockResponse::Fail) => Err(ApiError::Timeout {
                endpoint: "mock://questions/m".to_string(),
            }
            .into()),
            Some(MockResponse::Questions(questions)) => Ok(questions.clone()),
            None => Ok((0..self.per_combination)
                .map(|i| question(&format!("Q{} of {}", i, combination), "a"))
                .collect()),
        }
    }
}

// =============================================================================
// MockStore
// =============================================================================

/// 按自然键去重的内存存储
#[derive(Clone, Default)]
pub struct MockStore {
    pub documents: Arc<Mutex<HashMap<NaturalKey, serde_json::Value>>>,
    pub upsert_calls: Arc<AtomicUsize>,
    pub close_calls: Arc<AtomicUsize>,
    closed: Arc<AtomicBool>,
    fail_batches: bool,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 每一批写入都整体失败
    pub fn failing() -> Self {
        Self {
            fail_batches: true,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.documents.lock().unwrap().len()
    }

    pub fn get(&self, question: &str, year: u16, subject: Subject) -> Option<serde_json::Value> {
        self.documents
            .lock()
            .unwrap()
            .get(&NaturalKey {
                question: question.to_string(),
                year,
                subject,
            })
            .cloned()
    }

    pub fn upsert_count(&self) -> usize {
        self.upsert_calls.load(Ordering::SeqCst)
    }

    pub fn close_count(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }
}

impl QuestionStore for MockStore {
    async fn upsert_batch(
        &self,
        questions: &[TaggedQuestion],
    ) -> Result<BatchWriteResult, AppError> {
        self.upsert_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_batches || self.closed.load(Ordering::SeqCst) {
            return Err(StoreError::WriteFailed(sqlx::Error::PoolClosed).into());
        }

        let mut documents = self.documents.lock().unwrap();
        let mut result = BatchWriteResult::default();

        for (index, q) in questions.iter().enumerate() {
            if q.question_text().trim().is_empty() {
                result.failures.push(WriteFailure {
                    index,
                    key: q.natural_key(),
                    message: "empty question".to_string(),
                });
                continue;
            }
            match documents.insert(q.natural_key(), q.to_document()) {
                None => result.inserted += 1,
                Some(_) => result.updated += 1,
            }
        }

        Ok(result)
    }

    async fn count(&self) -> Result<u64, AppError> {
        Ok(self.len() as u64)
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.close_calls.fetch_add(1, Ordering::SeqCst);
    }
}

// =============================================================================
// MockConnector
// =============================================================================

#[derive(Clone)]
pub struct MockConnector {
    pub store: MockStore,
    fail: bool,
    pub connect_calls: Arc<AtomicUsize>,
}

impl MockConnector {
    pub fn new(store: MockStore) -> Self {
        Self {
            store,
            fail: false,
            connect_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            fail: true,
            ..Self::new(MockStore::new())
        }
    }
}

impl StoreConnector for MockConnector {
    type Store = MockStore;

    async fn connect(&self) -> Result<MockStore, AppError> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(StoreError::ConnectFailed {
                url: "mock://unreachable".to_string(),
                source: sqlx::Error::PoolTimedOut,
            }
            .into());
        }
        // 每次连接都是新的句柄，但共享同一份数据
        Ok(MockStore {
            closed: Arc::new(AtomicBool::new(false)),
            ..self.store.clone()
        })
    }
}

// =============================================================================
// RecordingReporter
// =============================================================================

/// 把事件记录成字符串的上报器
#[derive(Clone, Default)]
pub struct RecordingReporter {
    pub events: Arc<Mutex<Vec<String>>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn finished_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| e.starts_with("finished:"))
            .count()
    }
}

impl ProgressReporter for RecordingReporter {
    fn report(&self, event: TraversalEvent<'_>) {
        let line = match event {
            TraversalEvent::RunStarted {
                total_combinations, ..
            } => format!("started:{}", total_combinations),
            TraversalEvent::CombinationFinished { ctx, result, .. } => {
                let kind = match result {
                    CombinationResult::Stored { .. } => "stored",
                    CombinationResult::Empty => "empty",
                    CombinationResult::FetchFailed { .. } => "fetch_failed",
                    CombinationResult::PersistFailed { .. } => "persist_failed",
                };
                format!("finished:{}:{}", ctx.combination, kind)
            }
            TraversalEvent::CancelRequested { processed, .. } => format!("cancel:{}", processed),
            TraversalEvent::RunFinished { summary } => {
                format!("summary:{}", summary.status.as_str())
            }
        };
        self.events.lock().unwrap().push(line);
    }
}
