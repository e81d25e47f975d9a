//! 应用入口 - 编排层
//!
//! 根据配置组装真实依赖：题库客户端、SQLite 连接器、tracing 上报器、失败记录

use crate::clients::AlocClient;
use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::SqliteConnector;
use crate::orchestrator::progress::TracingReporter;
use crate::orchestrator::run_state::RunSummary;
use crate::orchestrator::traversal::{Traversal, TraversalOptions};
use crate::services::FailureLog;
use crate::utils::logging::log_startup;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// 应用主结构
pub struct App {
    traversal: Traversal<AlocClient, SqliteConnector, TracingReporter>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> AppResult<Self> {
        let space = config.parameter_space().await?;

        log_startup(&config, space.len());

        let client = AlocClient::new(&config)?;
        let connector = SqliteConnector::new(config.database_url.clone());

        let options = TraversalOptions {
            space,
            request_delay: config.request_delay,
            verbose_logging: config.verbose_logging,
        };

        let mut traversal = Traversal::new(client, connector, TracingReporter, options);

        if let Some(path) = &config.failure_log_file {
            let failure_log = FailureLog::with_path(path.clone());
            info!("📝 失败组合将记录到: {}", failure_log.path());
            traversal = traversal.with_failure_log(failure_log);
        }

        Ok(Self { traversal })
    }

    /// 运行应用主逻辑
    pub async fn run(mut self, cancel: CancellationToken) -> AppResult<RunSummary> {
        self.traversal.run(cancel).await
    }
}
