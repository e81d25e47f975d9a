//! 失败组合记录服务 - 业务能力层
//!
//! 只负责"把失败的组合追加写入文件"能力，方便之后单独重跑

use crate::error::{AppResult, FileError};
use crate::models::Combination;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// 失败组合记录
///
/// 职责：
/// - 每个失败的组合写一行：`subject | year | type | reason`
/// - 写文件失败只打警告，不影响遍历
pub struct FailureLog {
    file_path: String,
}

impl FailureLog {
    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            file_path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.file_path
    }

    /// 追加一条失败记录
    pub async fn write(&self, combination: &Combination, reason: &str) -> AppResult<()> {
        debug!("记录失败组合: {} ({})", combination, reason);

        let line = format!(
            "{} | {} | {} | {}\n",
            combination.subject,
            combination.year,
            combination.exam_type,
            reason.replace('\n', " ")
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)
            .await
            .map_err(|source| FileError::WriteFailed {
                path: self.file_path.clone(),
                source,
            })?;

        file.write_all(line.as_bytes())
            .await
            .map_err(|source| FileError::WriteFailed {
                path: self.file_path.clone(),
                source,
            })?;

        Ok(())
    }

    /// 追加一条失败记录，出错只记录警告
    pub async fn record(&self, combination: &Combination, reason: &str) {
        if let Err(e) = self.write(combination, reason).await {
            warn!("⚠️ 无法写入失败记录 {}: {}", self.file_path, e);
        }
    }
}
