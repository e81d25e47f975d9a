//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责遍历调度和统计，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 根据配置组装真实的题库客户端、SQLite 连接器和上报器
//!
//! ### `traversal` - 遍历控制器
//! - 持有唯一的存储连接（连接一次、释放一次）
//! - 按 科目 → 年份 → 考试类型 串行遍历
//! - 每个组合之后限流等待，响应取消信号
//!
//! ### `run_state` / `progress` - 运行统计与上报
//!
//! ## 层次关系
//!
//! ```text
//! app (组装依赖)
//!     ↓
//! traversal (处理全部组合)
//!     ↓
//! workflow::CombinationFlow (处理单个组合)
//!     ↓
//! services (能力层：fetch / persist / failure log)
//!     ↓
//! infrastructure / clients (SQLite、限流器、HTTP)
//! ```

pub mod app;
pub mod progress;
pub mod run_state;
pub mod traversal;

// 重新导出主要类型
pub use app::App;
pub use progress::{ProgressReporter, ProgressSnapshot, TracingReporter, TraversalEvent};
pub use run_state::{RunState, RunStatus, RunSummary};
pub use traversal::{Traversal, TraversalOptions, TraversalState};
