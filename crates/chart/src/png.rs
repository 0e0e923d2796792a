use chrono::{Duration, NaiveDateTime};
use faang_core::chart::entity::Chart;
use faang_core::chart::error::ChartError;
use faang_core::chart::port::PlotWriter;
use faang_core::config::PlotConfig;
use faang_core::snapshot::entity::PLOT_EXTENSION;
use plotters::coord::types::RangedDateTime;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use tracing::info;

const FONT: &str = "sans-serif";

fn render_error<E: std::fmt::Display>(err: E) -> ChartError {
    ChartError::Render(err.to_string())
}

/// PlotWriter 的 PNG 实现，基于 plotters 位图后端。
///
/// # Summary
/// 尺寸以英寸 × DPI 给出；字号、线宽、边距按 DPI 等比缩放，保证不同分辨率下版式一致。
pub struct PngPlotWriter {
    width: u32,
    height: u32,
    dpi: u32,
}

impl PngPlotWriter {
    pub fn new(config: &PlotConfig) -> Self {
        let (width, height) = config.pixels();
        Self {
            width,
            height,
            dpi: config.dpi,
        }
    }

    /// 图表在目录中的输出路径: `<title>.png`。
    pub fn plot_path(dir: &Path, chart: &Chart) -> PathBuf {
        dir.join(format!("{}.{PLOT_EXTENSION}", chart.title))
    }

    /// 磅值转像素。
    fn font(&self, points: u32) -> f64 {
        f64::from(points) * f64::from(self.dpi) / 72.0
    }

    /// 以 100 DPI 为基准缩放像素值。
    fn px(&self, base: u32) -> u32 {
        (base.saturating_mul(self.dpi) / 100).max(1)
    }

    fn draw(&self, chart: &Chart, path: &Path) -> Result<(), ChartError> {
        let (x0, x1) = x_bounds(chart);
        let (y0, y1) = y_bounds(chart);

        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let mut ctx = ChartBuilder::on(&root)
            .caption(&chart.title, (FONT, self.font(14)))
            .margin(self.px(10))
            .x_label_area_size(self.px(40))
            .y_label_area_size(self.px(60))
            .build_cartesian_2d(RangedDateTime::from(x0..x1), y0..y1)
            .map_err(render_error)?;

        ctx.configure_mesh()
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .x_label_formatter(&|ts: &NaiveDateTime| ts.format("%m-%d %H:%M").to_string())
            .label_style((FONT, self.font(9)))
            .axis_desc_style((FONT, self.font(10)))
            .draw()
            .map_err(render_error)?;

        let stroke = self.px(2);
        let legend_len = i32::try_from(self.px(20)).unwrap_or(20);
        for (i, series) in chart.series.iter().enumerate() {
            let color = Palette99::pick(i).to_rgba();
            for (n, segment) in series.segments.iter().enumerate() {
                let drawn = ctx
                    .draw_series(LineSeries::new(
                        segment.iter().copied(),
                        color.stroke_width(stroke),
                    ))
                    .map_err(render_error)?;
                // 只为第一段登记图例
                if n == 0 {
                    drawn.label(series.label.as_str()).legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + legend_len, y)], color.stroke_width(stroke))
                    });
                }
            }
        }

        if !chart.series.is_empty() {
            ctx.configure_series_labels()
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .label_font((FONT, self.font(9)))
                .draw()
                .map_err(render_error)?;
        }

        root.present().map_err(render_error)?;
        Ok(())
    }
}

impl PlotWriter for PngPlotWriter {
    /// # Summary
    /// 将图表写为 PNG。
    ///
    /// # Logic
    /// 1. 以图表标题生成文件名。
    /// 2. 计算坐标范围，空图表使用占位范围。
    /// 3. 绘制网格、折线与图例后落盘。
    fn write(&self, chart: &Chart, dir: &Path) -> Result<PathBuf, ChartError> {
        let path = Self::plot_path(dir, chart);
        self.draw(chart, &path)?;
        info!(
            "Plot saved at {} ({} series, {}x{} px)",
            path.display(),
            chart.series.len(),
            self.width,
            self.height
        );
        Ok(path)
    }
}

/// 横轴范围；范围为空或退化为一点时向后扩展一小时。
fn x_bounds(chart: &Chart) -> (NaiveDateTime, NaiveDateTime) {
    match chart.x_range {
        Some((lo, hi)) if lo < hi => (lo, hi),
        Some((lo, _)) => (lo, lo + Duration::hours(1)),
        None => {
            let epoch = NaiveDateTime::default();
            (epoch, epoch + Duration::hours(1))
        }
    }
}

/// 纵轴范围，上下各留 5% 余量。
fn y_bounds(chart: &Chart) -> (f64, f64) {
    match chart.y_range() {
        Some((lo, hi)) if hi > lo => {
            let pad = (hi - lo) * 0.05;
            (lo - pad, hi + pad)
        }
        Some((lo, _)) => (lo - 1.0, lo + 1.0),
        None => (0.0, 1.0),
    }
}
