//! 外部依赖的抽象
//!
//! 遍历流程只依赖这些 trait，不依赖具体的 HTTP 客户端或数据库，
//! 测试中可以替换为内存实现。

use std::future::Future;

use crate::error::AppError;
use crate::models::{Combination, NaturalKey, RawQuestion, TaggedQuestion};

/// 远程题库
pub trait QuestionSource: Send + Sync {
    /// 拉取一个组合的全部题目
    ///
    /// 超时、非 2xx、网络错误、响应体格式错误都以 `Err` 返回
    fn fetch(
        &self,
        combination: &Combination,
    ) -> impl Future<Output = Result<Vec<RawQuestion>, AppError>> + Send;
}

/// 单条文档写入失败
#[derive(Debug, Clone, PartialEq)]
pub struct WriteFailure {
    /// 在批次中的下标
    pub index: usize,
    pub key: NaturalKey,
    pub message: String,
}

/// 批量写入结果
///
/// 批次不是原子的：单条失败不影响其它文档
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchWriteResult {
    /// 新插入的文档数
    pub inserted: usize,
    /// 命中自然键、原地更新的文档数
    pub updated: usize,
    pub failures: Vec<WriteFailure>,
}

impl BatchWriteResult {
    /// 成功确认的文档数
    pub fn acknowledged(&self) -> usize {
        self.inserted + self.updated
    }
}

/// 已连接的题目存储
pub trait QuestionStore: Send + Sync {
    /// 按自然键 (题干, 年份, 科目) 批量 upsert
    fn upsert_batch(
        &self,
        questions: &[TaggedQuestion],
    ) -> impl Future<Output = Result<BatchWriteResult, AppError>> + Send;

    /// 存储中的文档总数
    fn count(&self) -> impl Future<Output = Result<u64, AppError>> + Send;

    /// 释放连接
    fn close(&self) -> impl Future<Output = ()> + Send;
}

/// 存储连接器
///
/// 与 `QuestionStore` 分开，连接失败是整个运行唯一的致命错误
pub trait StoreConnector: Send + Sync {
    type Store: QuestionStore;

    fn connect(&self) -> impl Future<Output = Result<Self::Store, AppError>> + Send;
}
