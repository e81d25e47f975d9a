use aloc_scraper::utils::logging;
use aloc_scraper::{App, Config};
use anyhow::Result;
use dotenvy::dotenv;
use tokio_util::sync::CancellationToken;
use tracing::warn;

#[tokio::main]
async fn main() -> Result<()> {
    // 读取 .env（文件不存在时忽略）
    dotenv().ok();

    // 初始化日志
    let verbose = std::env::var("VERBOSE_LOGGING")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false);
    logging::init(verbose);

    // 加载配置（缺少必需配置直接退出）
    let config = Config::from_env()?;

    // Ctrl-C：当前组合结束后停止
    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("🛑 收到中断信号，当前组合结束后停止...");
            signal_token.cancel();
        }
    });

    // 初始化并运行应用
    let summary = App::initialize(config).await?.run(cancel).await?;

    if summary.status.is_cancelled() {
        warn!("运行被中断，可重新运行以补全剩余组合");
    }

    Ok(())
}
