use anyhow::Context;
use faang_app::logging::init_logging;
use faang_app::pipeline::Pipeline;
use faang_app::settings::load_config;
use faang_chart::png::PngPlotWriter;
use faang_core::common::time::RealTimeProvider;
use faang_feed::yahoo::YahooProvider;
use faang_store::csv_store::CsvSnapshotStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// # Summary
/// 应用启动入口，纯粹的 DI 容器。
/// 负责实例化所有具体实现组件并通过 Arc<dyn Trait> 注入到 Pipeline。
///
/// # Logic
/// 1. 加载配置并初始化全局日志。
/// 2. 安装 TLS 加密后端。
/// 3. 实例化基础设施层（Feed、Store、Plot、Clock）。
/// 4. 顺序执行抓取、保存、定位、解析、提取、绘图。
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // 1. 配置与日志
    let config = load_config().context("Failed to load configuration")?;
    let _guard = init_logging(&config.log)?;
    info!("FAANG snapshot starting...");

    // 2. reqwest 使用 rustls-no-provider，需要进程级安装一次
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        warn!("A rustls crypto provider was already installed");
    }

    // 3. 实例化基础设施层
    let provider = Arc::new(YahooProvider::new(Duration::from_secs(
        config.feed.timeout_secs,
    ))?);
    let store = Arc::new(CsvSnapshotStore::new(config.storage.data_dir.clone()));
    let plotter = Arc::new(PngPlotWriter::new(&config.plot));
    let clock = Arc::new(RealTimeProvider);

    // 4. 执行管线
    let pipeline = Pipeline::new(config, provider, store, plotter, clock);
    match pipeline.run().await? {
        Some(path) => info!("Done. Plot written to {}", path.display()),
        None => warn!("Done. No snapshot was available to plot"),
    }

    Ok(())
}
