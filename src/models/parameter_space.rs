//! 参数空间：科目 × 年份 × 考试类型
//!
//! 遍历顺序固定为 科目（外层）→ 年份（中层）→ 考试类型（内层）

use crate::error::{AppError, AppResult};
use crate::models::{ExamType, Subject};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

/// 一个组合（遍历的最小工作单元）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Combination {
    pub subject: Subject,
    pub year: u16,
    pub exam_type: ExamType,
}

impl Combination {
    pub fn new(subject: Subject, year: u16, exam_type: ExamType) -> Self {
        Self {
            subject,
            year,
            exam_type,
        }
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.subject, self.year, self.exam_type)
    }
}

/// 组合在三层循环中的下标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub subject_idx: usize,
    pub year_idx: usize,
    pub type_idx: usize,
}

/// 参数空间
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpace {
    pub subjects: Vec<Subject>,
    pub year_start: u16,
    pub year_end: u16,
    pub exam_types: Vec<ExamType>,
}

impl Default for ParameterSpace {
    fn default() -> Self {
        Self {
            subjects: Subject::ALL.to_vec(),
            year_start: 2000,
            year_end: 2019,
            exam_types: ExamType::ALL.to_vec(),
        }
    }
}

impl ParameterSpace {
    /// 校验参数空间
    pub fn validate(&self) -> AppResult<()> {
        if self.subjects.is_empty() {
            return Err(AppError::invalid_parameter_space("科目列表为空"));
        }
        if self.exam_types.is_empty() {
            return Err(AppError::invalid_parameter_space("考试类型列表为空"));
        }
        if self.year_start > self.year_end {
            return Err(AppError::invalid_parameter_space(format!(
                "年份范围无效: {} > {}",
                self.year_start, self.year_end
            )));
        }
        // 重复项会让同一个组合被访问多次
        if let Some(subject) = first_duplicate(&self.subjects) {
            return Err(AppError::invalid_parameter_space(format!(
                "科目重复: {}",
                subject
            )));
        }
        if let Some(exam_type) = first_duplicate(&self.exam_types) {
            return Err(AppError::invalid_parameter_space(format!(
                "考试类型重复: {}",
                exam_type
            )));
        }
        Ok(())
    }

    /// 年份列表（连续区间）
    pub fn years(&self) -> Vec<u16> {
        (self.year_start..=self.year_end).collect()
    }

    /// 组合总数
    pub fn len(&self) -> usize {
        let years = if self.year_start > self.year_end {
            0
        } else {
            usize::from(self.year_end - self.year_start) + 1
        };
        self.subjects.len() * years * self.exam_types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 按固定嵌套顺序枚举全部组合
    pub fn iter(&self) -> impl Iterator<Item = (Position, Combination)> + '_ {
        let years = self.years();
        self.subjects
            .iter()
            .enumerate()
            .flat_map(move |(subject_idx, &subject)| {
                let years = years.clone();
                years
                    .into_iter()
                    .enumerate()
                    .flat_map(move |(year_idx, year)| {
                        self.exam_types
                            .iter()
                            .enumerate()
                            .map(move |(type_idx, &exam_type)| {
                                (
                                    Position {
                                        subject_idx,
                                        year_idx,
                                        type_idx,
                                    },
                                    Combination::new(subject, year, exam_type),
                                )
                            })
                    })
            })
    }
}

fn first_duplicate<T: Copy + Eq + Hash>(items: &[T]) -> Option<T> {
    let mut seen = HashSet::with_capacity(items.len());
    items.iter().copied().find(|item| !seen.insert(*item))
}
