use anyhow::Result;
use ats_resume_writer::{logger, App, Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    logger::init(config.verbose_logging);

    // 初始化并运行应用
    let summary = App::initialize(config)?.run().await.inspect_err(|e| {
        tracing::error!("❌ {}", e);
    })?;

    tracing::debug!("写入章节: {:?}", summary.sections);

    Ok(())
}
