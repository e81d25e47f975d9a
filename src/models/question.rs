use crate::models::{Combination, ExamType, Subject};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};

/// 题库返回的原始题目
///
/// 结构不做严格校验，未知字段原样保留
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawQuestion(Map<String, JsonValue>);

impl RawQuestion {
    /// 从 JSON 对象创建
    pub fn new(fields: Map<String, JsonValue>) -> Self {
        Self(fields)
    }

    /// 题干
    pub fn question(&self) -> Option<&str> {
        self.0.get("question").and_then(|v| v.as_str())
    }

    /// 选项（按顺序）
    ///
    /// 数组形式按原顺序返回；对象形式（`{"a": .., "b": ..}`）按键排序返回
    pub fn options(&self) -> Vec<&str> {
        match self.0.get("option").or_else(|| self.0.get("options")) {
            Some(JsonValue::Array(items)) => items.iter().filter_map(|v| v.as_str()).collect(),
            Some(JsonValue::Object(map)) => {
                let mut keys: Vec<&String> = map.keys().collect();
                keys.sort();
                keys.into_iter()
                    .filter_map(|k| map.get(k).and_then(|v| v.as_str()))
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    /// 答案
    pub fn answer(&self) -> Option<&str> {
        self.0.get("answer").and_then(|v| v.as_str())
    }

    /// 解析
    pub fn explanation(&self) -> Option<&str> {
        self.0
            .get("explanation")
            .or_else(|| self.0.get("solution"))
            .and_then(|v| v.as_str())
    }

    /// 原始字段
    pub fn fields(&self) -> &Map<String, JsonValue> {
        &self.0
    }
}

impl From<Map<String, JsonValue>> for RawQuestion {
    fn from(fields: Map<String, JsonValue>) -> Self {
        Self(fields)
    }
}

/// 去重用的自然键：(题干, 年份, 科目)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NaturalKey {
    pub question: String,
    pub year: u16,
    pub subject: Subject,
}

/// 带有组合标签的题目
///
/// subject / year / type 以组合为准，覆盖题库回传的同名字段
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedQuestion {
    pub raw: RawQuestion,
    pub subject: Subject,
    pub year: u16,
    pub exam_type: ExamType,
}

impl TaggedQuestion {
    /// 用组合给题目打标签
    pub fn tag(raw: RawQuestion, combination: &Combination) -> Self {
        Self {
            raw,
            subject: combination.subject,
            year: combination.year,
            exam_type: combination.exam_type,
        }
    }

    /// 批量打标签
    pub fn tag_all(raws: Vec<RawQuestion>, combination: &Combination) -> Vec<Self> {
        raws.into_iter()
            .map(|raw| Self::tag(raw, combination))
            .collect()
    }

    /// 题干（缺失时为空串）
    pub fn question_text(&self) -> &str {
        self.raw.question().unwrap_or_default()
    }

    /// 自然键
    pub fn natural_key(&self) -> NaturalKey {
        NaturalKey {
            question: self.question_text().to_string(),
            year: self.year,
            subject: self.subject,
        }
    }

    /// 构建写入存储的完整文档
    pub fn to_document(&self) -> JsonValue {
        let mut doc = self.raw.fields().clone();
        doc.insert("subject".to_string(), json!(self.subject));
        doc.insert("year".to_string(), json!(self.year));
        doc.insert("type".to_string(), json!(self.exam_type));
        JsonValue::Object(doc)
    }
}
