//! # ALOC Scraper
//!
//! 遍历 (科目, 年份, 考试类型) 参数空间，从远程题库拉取题目并幂等写入存储
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure / Clients）
//! - `infrastructure/` - 持有稀缺资源（数据库连接），只暴露能力
//! - `SqliteQuestionStore` - 按自然键 upsert
//! - `RateLimiter` - 固定间隔等待
//! - `clients/AlocClient` - 题库 HTTP 客户端
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个组合
//! - `QuestionFetcher` - 拉取能力（吸收所有请求错误）
//! - `QuestionPersister` - 写入能力
//! - `FailureLog` - 记录失败组合
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个组合"的完整处理流程
//! - `CombinationCtx` - 上下文封装（组合 + 序号）
//! - `CombinationFlow` - 流程编排（fetch → tag → persist）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/traversal` - 遍历控制器，管理连接、顺序、限流和取消
//! - `orchestrator/app` - 根据配置组装依赖
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod traits;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::AlocClient;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{RateLimiter, SqliteConnector, SqliteQuestionStore};
pub use models::{Combination, ExamType, ParameterSpace, RawQuestion, Subject, TaggedQuestion};
pub use orchestrator::{
    App, ProgressReporter, RunStatus, RunSummary, TracingReporter, Traversal, TraversalEvent,
    TraversalOptions, TraversalState,
};
pub use traits::{BatchWriteResult, QuestionSource, QuestionStore, StoreConnector};
pub use workflow::{CombinationCtx, CombinationFlow, CombinationResult};
