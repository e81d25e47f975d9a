use serde::{Deserialize, Serialize};
use std::fmt;

/// 考试类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExamType {
    /// 统一大学入学考试
    Utme,
    /// 西非高中毕业考试
    Wassce,
    /// 大学自主入学考试
    PostUtme,
}

impl ExamType {
    /// 全部考试类型，按遍历顺序排列
    pub const ALL: [ExamType; 3] = [ExamType::Utme, ExamType::Wassce, ExamType::PostUtme];

    /// 获取 API 使用的 slug
    pub fn slug(self) -> &'static str {
        match self {
            ExamType::Utme => "utme",
            ExamType::Wassce => "wassce",
            ExamType::PostUtme => "post-utme",
        }
    }
}

impl fmt::Display for ExamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}
