pub mod question_db;
pub mod rate_limiter;

pub use question_db::{SqliteConnector, SqliteQuestionStore};
pub use rate_limiter::RateLimiter;
