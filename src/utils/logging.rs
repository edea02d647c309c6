/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::Config;
use crate::models::ResumeSection;

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - ATS 简历生成");
    info!("📄 输入文件: {}", config.input_path.display());
    info!("📝 输出文件: {}", config.output_path.display());
    info!("🤖 模型: {}", config.llm_model_name);
    info!(
        "🔍 网页搜索: {}",
        if config.web_search { "开启" } else { "关闭" }
    );
    info!("{}", "=".repeat(60));
}

/// 记录阶段开始
///
/// # 参数
/// - `step`: 当前阶段编号（从 1 开始）
/// - `total`: 阶段总数
/// - `name`: 阶段名称
pub fn log_stage(step: usize, total: usize, name: &str) {
    info!("[{}/{}] {}", step, total, name);
}

/// 打印最终统计信息
///
/// # 参数
/// - `output_path`: 输出文件路径
/// - `written`: 写入文档的章节
/// - `missing`: 缺失的章节
/// - `elapsed`: 总耗时
pub fn print_final_stats(
    output_path: &Path,
    written: &[ResumeSection],
    missing: &[ResumeSection],
    elapsed: Duration,
) {
    info!("\n{}", "=".repeat(60));
    info!("📊 处理完成");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 写入章节: {}/{}", written.len(), ResumeSection::ALL.len());
    if !missing.is_empty() {
        let names: Vec<_> = missing.iter().map(|s| s.heading()).collect();
        info!("❌ 缺失章节: {}", names.join(", "));
    }
    info!("⏱️ 耗时: {:.1}s", elapsed.as_secs_f64());
    info!("{}", "=".repeat(60));
    info!("\n文档已保存至: {}", output_path.display());
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
