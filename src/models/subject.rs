use serde::{Deserialize, Serialize};
use std::fmt;

/// 科目枚举
///
/// 序列化为题库 API 使用的 slug（kebab-case）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Subject {
    /// 数学
    Mathematics,
    /// 英语
    English,
    /// 物理
    Physics,
    /// 化学
    Chemistry,
    /// 生物
    Biology,
    /// 商业
    Commerce,
    /// 会计
    Accounting,
    /// 经济
    Economics,
    /// 政府
    Government,
    /// 文学
    Literature,
    /// 地理
    Geography,
    /// 基督教研究
    ChristianReligiousStudies,
}

impl Subject {
    /// 全部科目，按遍历顺序排列
    pub const ALL: [Subject; 12] = [
        Subject::Mathematics,
        Subject::English,
        Subject::Physics,
        Subject::Chemistry,
        Subject::Biology,
        Subject::Commerce,
        Subject::Accounting,
        Subject::Economics,
        Subject::Government,
        Subject::Literature,
        Subject::Geography,
        Subject::ChristianReligiousStudies,
    ];

    /// 获取 API 使用的 slug
    pub fn slug(self) -> &'static str {
        match self {
            Subject::Mathematics => "mathematics",
            Subject::English => "english",
            Subject::Physics => "physics",
            Subject::Chemistry => "chemistry",
            Subject::Biology => "biology",
            Subject::Commerce => "commerce",
            Subject::Accounting => "accounting",
            Subject::Economics => "economics",
            Subject::Government => "government",
            Subject::Literature => "literature",
            Subject::Geography => "geography",
            Subject::ChristianReligiousStudies => "christian-religious-studies",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}
