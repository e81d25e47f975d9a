pub mod failure_log;
pub mod question_fetcher;
pub mod question_persister;

pub use failure_log::FailureLog;
pub use question_fetcher::{FetchOutcome, QuestionFetcher};
pub use question_persister::{PersistOutcome, QuestionPersister};
