//! 日志工具模块
//!
//! 提供日志初始化、格式化和输出的辅助函数

use crate::config::Config;
use crate::orchestrator::RunSummary;
use regex::Regex;
use std::sync::LazyLock;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// HTML 标签
static HTML_TAG: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"<[^>]*>").ok());

/// 初始化日志
///
/// `RUST_LOG` 优先；否则默认 `info`，`verbose` 时为 `debug`
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // 重复初始化（例如测试中）直接忽略
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `config`: 配置
/// - `total_combinations`: 组合总数
pub fn log_startup(config: &Config, total_combinations: usize) {
    info!("{}", "=".repeat(60));
    info!(
        "🚀 程序启动 - 题库抓取 ({})",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("🌐 题库地址: {}", config.aloc_api_base_url);
    info!("📊 组合总数: {}", total_combinations);
    info!(
        "⏱️ 请求间隔: {:?}, 超时: {:?}",
        config.request_delay, config.request_timeout
    );
    info!("{}", "=".repeat(60));
}

/// 打印最终统计信息
pub fn print_final_stats(summary: &RunSummary) {
    for line in final_stats_lines(summary) {
        info!("{}", line);
    }
}

/// 最终统计的各行内容
fn final_stats_lines(summary: &RunSummary) -> Vec<String> {
    let progress = summary.snapshot();
    let banner = "=".repeat(60);

    let mut lines = vec![
        format!("\n{}", banner),
        format!("📊 遍历结束统计 ({})", summary.status.as_str()),
        format!(
            "完成时间: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ),
        banner.clone(),
        format!(
            "🧭 组合: {}/{} ({:.2}%)",
            summary.processed_combinations, summary.total_combinations, progress.percent
        ),
        format!("📥 拉取题目: {}", summary.total_questions_processed),
        format!("🆕 新增: {}, 🔁 更新: {}", summary.inserted, summary.updated),
        format!("∅ 无题目组合: {}", summary.empty_combinations),
        format!("❌ 失败组合: {}", summary.failed_combinations),
    ];
    if let Some(stored) = summary.stored_documents {
        lines.push(format!("🗄️ 存储中共 {} 道题", stored));
    }
    lines.push(format!(
        "⏱️ 用时: {} ({:.1} 题/分钟)",
        format_minutes(progress.elapsed_minutes),
        progress.questions_per_minute
    ));
    lines.push(banner);
    lines
}

/// 截断长文本用于日志显示，并去掉 HTML 标签
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（字符数）
///
/// # 返回
/// 返回截断后的文本
pub fn preview(text: &str, max_len: usize) -> String {
    let plain = match HTML_TAG.as_ref() {
        Some(re) => re.replace_all(text, "").into_owned(),
        None => text.to_string(),
    };
    let plain = plain.split_whitespace().collect::<Vec<_>>().join(" ");

    if plain.chars().count() > max_len {
        plain.chars().take(max_len).collect::<String>() + "..."
    } else {
        plain
    }
}

/// 格式化耗时（分钟）
pub fn format_minutes(minutes: f64) -> String {
    format!("{:.2} 分钟", minutes)
}
