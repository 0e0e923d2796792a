use anyhow::Context;
use chrono::{TimeDelta, Utc};
use faang_chart::render::render_chart;
use faang_core::chart::port::PlotWriter;
use faang_core::common::Instrument;
use faang_core::common::time::TimeProvider;
use faang_core::config::AppConfig;
use faang_core::market::port::MarketDataProvider;
use faang_core::snapshot::entity::SnapshotFile;
use faang_core::snapshot::port::SnapshotStore;
use faang_feed::download::download;
use faang_market::closing::extract_closing_prices;
use faang_store::dir::ensure_dir;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// # Summary
/// 快照管线，持有所有端口的具体实现。
///
/// 写路径 (`capture`) 与读路径 (`plot_latest`) 互不共享运行时状态，
/// 只通过快照目录衔接。
pub struct Pipeline {
    config: AppConfig,
    provider: Arc<dyn MarketDataProvider>,
    store: Arc<dyn SnapshotStore>,
    plotter: Arc<dyn PlotWriter>,
    clock: Arc<dyn TimeProvider>,
}

impl Pipeline {
    pub fn new(
        config: AppConfig,
        provider: Arc<dyn MarketDataProvider>,
        store: Arc<dyn SnapshotStore>,
        plotter: Arc<dyn PlotWriter>,
        clock: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            config,
            provider,
            store,
            plotter,
            clock,
        }
    }

    /// # Summary
    /// 写路径：抓取五只标的最近的行情并保存为新快照。
    ///
    /// # Logic
    /// 1. 以当前时刻为窗口终点，回溯 `feed.lookback_days` 天。
    /// 2. 依次抓取并合并为双层行情表。
    /// 3. 以当前本地墙钟时间命名快照并写入数据目录。
    pub async fn capture(&self) -> anyhow::Result<SnapshotFile> {
        let now = self.clock.now();
        let end = now.with_timezone(&Utc);
        let start = end - TimeDelta::days(i64::from(self.config.feed.lookback_days));

        let frame = download(
            self.provider.as_ref(),
            &Instrument::ALL,
            self.config.feed.interval,
            start,
            end,
        )
        .await
        .context("Failed to download market data")?;

        let file = self
            .store
            .save(&frame, now.naive_local())
            .context("Failed to save snapshot")?;
        info!(
            "Captured {} rows x {} columns into {}",
            frame.len(),
            frame.columns.len(),
            file.path.display()
        );
        Ok(file)
    }

    /// # Summary
    /// 读路径：为最新的快照绘制收盘价走势图。
    ///
    /// # Logic
    /// 1. 定位最近修改的快照；没有快照时返回 `Ok(None)`。
    /// 2. 恢复列结构并提取收盘价；无法识别结构时直接报错，不写任何图像。
    /// 3. 渲染图表，准备图表目录后写出 `<快照主干>.png`。
    ///
    /// # Returns
    /// 成功返回写出的图像路径。
    pub fn plot_latest(&self) -> anyhow::Result<Option<PathBuf>> {
        let Some(file) = self.store.latest().context("Failed to scan snapshots")? else {
            warn!("No snapshot available, nothing to plot");
            return Ok(None);
        };
        info!("Plotting latest snapshot {}", file.path.display());

        let table = self
            .store
            .load(&file)
            .with_context(|| format!("Failed to load {}", file.path.display()))?;
        let prices = extract_closing_prices(&table)
            .with_context(|| format!("Cannot extract closing prices from {}", file.stem))?;
        let chart = render_chart(&prices, &file.stem);

        let plots_dir = ensure_dir(&self.config.storage.plots_dir)
            .context("Failed to prepare plots directory")?;
        let path = self
            .plotter
            .write(&chart, &plots_dir)
            .context("Failed to write plot")?;
        Ok(Some(path))
    }

    /// 完整流程：先写快照，再为最新快照绘图。
    pub async fn run(&self) -> anyhow::Result<Option<PathBuf>> {
        self.capture().await?;
        self.plot_latest()
    }
}
