//! 组合处理上下文
//!
//! 封装"我正在处理第几个组合、它是哪一个"这一信息

use crate::models::{Combination, Position};
use std::fmt::Display;

/// 组合处理上下文
#[derive(Debug, Clone)]
pub struct CombinationCtx {
    pub combination: Combination,

    /// 三层循环中的下标
    pub position: Position,

    /// 组合序号（从1开始，仅用于日志显示）
    pub ordinal: usize,

    /// 组合总数
    pub total: usize,
}

impl CombinationCtx {
    /// 创建新的组合上下文
    pub fn new(combination: Combination, position: Position, ordinal: usize, total: usize) -> Self {
        Self {
            combination,
            position,
            ordinal,
            total,
        }
    }
}

impl Display for CombinationCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[组合 {}/{} {}]",
            self.ordinal, self.total, self.combination
        )
    }
}
