use chrono::NaiveDateTime;
use faang_core::chart::entity::{Chart, ChartSeries};
use faang_core::market::entity::ClosingPrices;
use tracing::{info, warn};

/// 横轴标题
pub const X_LABEL: &str = "Datetime";

/// # Summary
/// 根据收盘价表构建内存中的折线图。
///
/// # Logic
/// 1. 每个至少有一个有效值的标的生成一条折线，图例为标的代码。
/// 2. 没有任何有效值的标的只告警，不参与绘制。
/// 3. 缺失值把折线切成多段。
/// 4. 横轴范围取时间索引的最小值与最大值；没有可绘制的标的时仍返回空图表。
///
/// # Arguments
/// * `prices`: 收盘价表。
/// * `title`: 图表标题，通常是快照文件名主干。
///
/// # Returns
/// 可供写出的图表。
pub fn render_chart(prices: &ClosingPrices, title: &str) -> Chart {
    let mut series = Vec::with_capacity(prices.series.len());
    for s in &prices.series {
        let segments = split_segments(&prices.index, &s.values);
        if segments.is_empty() {
            warn!(
                "{} has no usable '{}' values, leaving it off the chart",
                s.instrument, prices.field
            );
            continue;
        }
        series.push(ChartSeries {
            label: s.instrument.symbol().to_string(),
            segments,
        });
    }

    if series.is_empty() {
        warn!("No instrument has usable data, chart '{title}' will be empty");
    } else {
        info!("Charting {} instruments for '{title}'", series.len());
    }

    let x_range = prices
        .index
        .iter()
        .min()
        .zip(prices.index.iter().max())
        .map(|(lo, hi)| (*lo, *hi));

    Chart {
        title: title.to_string(),
        x_label: X_LABEL.to_string(),
        y_label: format!("{} price", prices.field),
        x_range,
        series,
    }
}

/// 按缺失值切分连续段。
fn split_segments(
    index: &[NaiveDateTime],
    values: &[Option<f64>],
) -> Vec<Vec<(NaiveDateTime, f64)>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for (ts, value) in index.iter().zip(values) {
        match value {
            Some(y) => current.push((*ts, *y)),
            None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}
