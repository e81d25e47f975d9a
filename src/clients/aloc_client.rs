//! 题库 API 客户端
//!
//! 封装所有与远程题库 `GET {base}/m` 相关的调用逻辑

use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult};
use crate::models::{Combination, RawQuestion};
use crate::traits::QuestionSource;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::debug;

/// 错误响应体在日志中保留的最大长度
const MAX_ERROR_BODY_CHARS: usize = 200;

/// 题库 API 客户端
#[derive(Clone)]
pub struct AlocClient {
    http: reqwest::Client,
    base_url: String,
}

impl AlocClient {
    /// 根据配置创建客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        Self::with_settings(
            &config.aloc_api_base_url,
            &config.aloc_api_token,
            config.request_timeout,
        )
    }

    /// 创建客户端
    ///
    /// # 参数
    /// - `base_url`: API 根地址（不含 `/m`）
    /// - `token`: Bearer token
    /// - `timeout`: 单次请求超时
    pub fn with_settings(base_url: &str, token: &str, timeout: Duration) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| ApiError::ClientBuild(format!("无效的 token: {}", e)))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// 拉取题目的端点地址
    pub fn endpoint(&self) -> String {
        format!("{}/m", self.base_url)
    }

    /// 拉取一个组合的题目
    ///
    /// # 参数
    /// - `combination`: (科目, 年份, 考试类型)
    ///
    /// # 返回
    /// 返回题目列表（可能为空）
    pub async fn fetch_questions(&self, combination: &Combination) -> AppResult<Vec<RawQuestion>> {
        let endpoint = self.endpoint();
        let year = combination.year.to_string();

        debug!("请求题库: {} [{}]", endpoint, combination);

        let response = self
            .http
            .get(&endpoint)
            .query(&[
                ("subject", combination.subject.slug()),
                ("year", year.as_str()),
                ("type", combination.exam_type.slug()),
            ])
            .send()
            .await
            .map_err(|e| classify_transport_error(&endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::BadStatus {
                endpoint,
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            }
            .into());
        }

        let body: JsonValue = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout {
                    endpoint: endpoint.clone(),
                }
            } else {
                ApiError::MalformedBody {
                    endpoint: endpoint.clone(),
                    reason: e.to_string(),
                }
            }
        })?;

        let questions = parse_question_payload(body).map_err(|reason| {
            AppError::from(ApiError::MalformedBody {
                endpoint: endpoint.clone(),
                reason,
            })
        })?;

        debug!("题库返回 {} 道题 [{}]", questions.len(), combination);

        Ok(questions)
    }
}

impl QuestionSource for AlocClient {
    async fn fetch(&self, combination: &Combination) -> Result<Vec<RawQuestion>, AppError> {
        self.fetch_questions(combination).await
    }
}

fn classify_transport_error(endpoint: &str, err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        ApiError::Timeout {
            endpoint: endpoint.to_string(),
        }
        .into()
    } else {
        ApiError::RequestFailed {
            endpoint: endpoint.to_string(),
            source: err,
        }
        .into()
    }
}

/// 解析题库响应体
///
/// 支持两种形式：
/// - 直接返回题目数组 `[{...}, {...}]`
/// - 包装对象 `{"data": [...]}` 或 `{"data": {...}}`（单题）
pub fn parse_question_payload(body: JsonValue) -> Result<Vec<RawQuestion>, String> {
    match body {
        JsonValue::Array(items) => collect_questions(items),
        JsonValue::Object(mut envelope) => match envelope.remove("data") {
            Some(JsonValue::Array(items)) => collect_questions(items),
            Some(JsonValue::Object(single)) => Ok(vec![RawQuestion::new(single)]),
            Some(JsonValue::Null) => Ok(Vec::new()),
            Some(other) => Err(format!("data 字段类型不支持: {}", type_name(&other))),
            None => Err("响应对象缺少 data 字段".to_string()),
        },
        other => Err(format!("响应体类型不支持: {}", type_name(&other))),
    }
}

fn collect_questions(items: Vec<JsonValue>) -> Result<Vec<RawQuestion>, String> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            JsonValue::Object(fields) => Ok(RawQuestion::new(fields)),
            other => Err(format!("第 {} 项不是题目对象: {}", i, type_name(&other))),
        })
        .collect()
}

fn type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
