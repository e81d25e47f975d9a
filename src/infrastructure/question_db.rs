//! 题目存储 - 基础设施层
//!
//! 持有唯一的数据库连接，只暴露"按自然键 upsert"的能力

use crate::error::{AppError, StoreError};
use crate::models::TaggedQuestion;
use crate::traits::{BatchWriteResult, QuestionStore, StoreConnector, WriteFailure};
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS questions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    question TEXT NOT NULL CHECK (length(trim(question)) > 0),
    year INTEGER NOT NULL,
    subject TEXT NOT NULL,
    exam_type TEXT NOT NULL,
    answer TEXT,
    document TEXT NOT NULL,
    revision INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE (question, year, subject)
)
"#;

const UPSERT: &str = r#"
INSERT INTO questions (question, year, subject, exam_type, answer, document, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
ON CONFLICT (question, year, subject) DO UPDATE SET
    exam_type = excluded.exam_type,
    answer = excluded.answer,
    document = excluded.document,
    revision = questions.revision + 1,
    updated_at = excluded.updated_at
RETURNING revision
"#;

/// SQLite 连接器
#[derive(Debug, Clone)]
pub struct SqliteConnector {
    database_url: String,
    acquire_timeout: Duration,
}

impl SqliteConnector {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

impl StoreConnector for SqliteConnector {
    type Store = SqliteQuestionStore;

    async fn connect(&self) -> Result<SqliteQuestionStore, AppError> {
        let connect_failed = |source: sqlx::Error| StoreError::ConnectFailed {
            url: self.database_url.clone(),
            source,
        };

        let options = SqliteConnectOptions::from_str(&self.database_url)
            .map_err(connect_failed)?
            .create_if_missing(true);

        // 单连接：整个运行只持有一个长连接，内存库也因此保持同一个实例
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .acquire_timeout(self.acquire_timeout)
            .connect_with(options)
            .await
            .map_err(connect_failed)?;

        sqlx::query(SCHEMA)
            .execute(&pool)
            .await
            .map_err(StoreError::SchemaFailed)?;

        info!("✓ 已连接题目存储: {}", self.database_url);

        Ok(SqliteQuestionStore { pool })
    }
}

/// 基于 SQLite 的题目存储
///
/// 单表 `questions`，自然键 (question, year, subject) 上有唯一约束
#[derive(Debug, Clone)]
pub struct SqliteQuestionStore {
    pool: SqlitePool,
}

impl SqliteQuestionStore {
    /// 按自然键读取已存储的文档
    pub async fn find_document(
        &self,
        question: &str,
        year: u16,
        subject: &str,
    ) -> Result<Option<serde_json::Value>, AppError> {
        let row: Option<String> = sqlx::query_scalar(
            "SELECT document FROM questions WHERE question = ?1 AND year = ?2 AND subject = ?3",
        )
        .bind(question)
        .bind(i64::from(year))
        .bind(subject)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::QueryFailed)?;

        match row {
            Some(doc) => {
                let value: serde_json::Value =
                    serde_json::from_str(&doc).map_err(StoreError::Serialize)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn upsert_one(
        conn: &mut SqliteConnection,
        question: &TaggedQuestion,
    ) -> Result<bool, StoreError> {
        let document = serde_json::to_string(&question.to_document())?;

        let revision: i64 = sqlx::query_scalar(UPSERT)
            .bind(question.question_text())
            .bind(i64::from(question.year))
            .bind(question.subject.slug())
            .bind(question.exam_type.slug())
            .bind(question.raw.answer())
            .bind(document)
            .bind(Utc::now())
            .fetch_one(&mut *conn)
            .await
            .map_err(StoreError::WriteFailed)?;

        Ok(revision == 1)
    }
}

async fn execute(conn: &mut SqliteConnection, sql: &str) -> Result<(), StoreError> {
    sqlx::query(sql)
        .execute(conn)
        .await
        .map(|_| ())
        .map_err(StoreError::WriteFailed)
}

impl QuestionStore for SqliteQuestionStore {
    async fn upsert_batch(
        &self,
        questions: &[TaggedQuestion],
    ) -> Result<BatchWriteResult, AppError> {
        if self.pool.is_closed() {
            return Err(StoreError::WriteFailed(sqlx::Error::PoolClosed).into());
        }

        let mut result = BatchWriteResult::default();
        let mut tx = self.pool.begin().await.map_err(StoreError::WriteFailed)?;

        // 整批一个事务；每条文档一个保存点，单条失败只回滚自己
        for (index, question) in questions.iter().enumerate() {
            execute(&mut tx, "SAVEPOINT document").await?;

            match Self::upsert_one(&mut tx, question).await {
                Ok(inserted) => {
                    execute(&mut tx, "RELEASE SAVEPOINT document").await?;
                    if inserted {
                        result.inserted += 1;
                    } else {
                        result.updated += 1;
                    }
                }
                Err(e) => {
                    execute(&mut tx, "ROLLBACK TO SAVEPOINT document").await?;
                    execute(&mut tx, "RELEASE SAVEPOINT document").await?;
                    debug!("第 {} 条文档写入失败: {}", index, e);
                    result.failures.push(WriteFailure {
                        index,
                        key: question.natural_key(),
                        message: e.to_string(),
                    });
                }
            }
        }

        tx.commit().await.map_err(StoreError::WriteFailed)?;

        Ok(result)
    }

    async fn count(&self) -> Result<u64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions")
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::QueryFailed)?;
        Ok(count.max(0) as u64)
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("✓ 题目存储连接已释放");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Combination, ExamType, RawQuestion, Subject};
    use serde_json::json;

    async fn memory_store() -> SqliteQuestionStore {
        SqliteConnector::new("sqlite::memory:")
            .connect()
            .await
            .expect("连接内存数据库失败")
    }

    fn tagged(question: &str, answer: &str, exam_type: ExamType) -> TaggedQuestion {
        let raw: RawQuestion =
            serde_json::from_value(json!({"question": question, "answer": answer})).unwrap();
        TaggedQuestion::tag(raw, &Combination::new(Subject::Mathematics, 2005, exam_type))
    }

    #[tokio::test]
    async fn test_second_upsert_updates_in_place() {
        let store = memory_store().await;

        let first = store
            .upsert_batch(&[tagged("1 + 1 = ?", "a", ExamType::Utme)])
            .await
            .unwrap();
        assert_eq!(first.inserted, 1);

        let second = store
            .upsert_batch(&[tagged("1 + 1 = ?", "c", ExamType::Wassce)])
            .await
            .unwrap();
        assert_eq!(second.inserted, 0);
        assert_eq!(second.updated, 1);

        assert_eq!(store.count().await.unwrap(), 1);
        let doc = store
            .find_document("1 + 1 = ?", 2005, "mathematics")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc["answer"], "c");
        assert_eq!(doc["type"], "wassce");
    }

    #[tokio::test]
    async fn test_repeated_batch_is_idempotent() {
        let store = memory_store().await;
        let batch = vec![
            tagged("Q1", "a", ExamType::Utme),
            tagged("Q2", "b", ExamType::Utme),
            tagged("Q3", "c", ExamType::Utme),
        ];

        store.upsert_batch(&batch).await.unwrap();
        let again = store.upsert_batch(&batch).await.unwrap();

        assert_eq!(again.inserted, 0);
        assert_eq!(again.acknowledged(), 3);
        assert_eq!(store.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_failed_member_does_not_discard_others() {
        let store = memory_store().await;
        let batch = vec![
            tagged("Q1", "a", ExamType::Utme),
            tagged("   ", "b", ExamType::Utme),
            tagged("Q3", "c", ExamType::Utme),
        ];

        let result = store.upsert_batch(&batch).await.unwrap();

        assert_eq!(result.inserted, 2);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].index, 1);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_batch_committed_once_with_failed_row_rolled_back() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("questions.db").display());

        let store = SqliteConnector::new(url.clone()).connect().await.unwrap();
        let batch = vec![
            tagged("Q1", "a", ExamType::Utme),
            tagged("", "b", ExamType::Utme),
            tagged("Q2", "c", ExamType::Utme),
            tagged("Q1", "d", ExamType::Wassce),
        ];
        let result = store.upsert_batch(&batch).await.unwrap();
        store.close().await;

        assert_eq!(result.inserted, 2);
        assert_eq!(result.updated, 1);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].index, 1);

        // 新连接能看到已提交的整批数据
        let reopened = SqliteConnector::new(url).connect().await.unwrap();
        assert_eq!(reopened.count().await.unwrap(), 2);
        let doc = reopened
            .find_document("Q1", 2005, "mathematics")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc["answer"], "d");
        reopened.close().await;
    }

    #[tokio::test]
    async fn test_closed_store_fails_whole_batch() {
        let store = memory_store().await;
        store.close().await;

        let result = store
            .upsert_batch(&[tagged("Q1", "a", ExamType::Utme)])
            .await;
        assert!(matches!(result, Err(AppError::Store(_))));
    }

    #[tokio::test]
    async fn test_connect_failure_reported() {
        let err = SqliteConnector::new("sqlite:/nonexistent-dir/sub/questions.db")
            .connect()
            .await
            .unwrap_err();
        assert!(err.is_connect_failure());
    }
}
