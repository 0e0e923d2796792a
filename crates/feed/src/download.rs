use chrono::{DateTime, NaiveDateTime, Utc};
use faang_core::common::{Instrument, TimeFrame};
use faang_core::market::entity::Candle;
use faang_core::market::error::MarketError;
use faang_core::market::port::MarketDataProvider;
use faang_core::snapshot::entity::{Column, ColumnKey, MarketFrame, PriceField};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};

/// # Summary
/// 依次抓取多个标的并合并为双层 (字段 × 标的) 行情表。
///
/// # Logic
/// 1. 按顺序逐个请求，任何时刻只有一个请求在途。
/// 2. 单个标的请求失败或返回空数据时记录告警并跳过该标的。
/// 3. 以所有标的时间戳的并集作为行索引，缺失处填 None。
/// 4. 字段按 `PriceField::WRITE_ORDER` 排列；只有存在复权价时才输出 `Adj Close`。
/// 5. 同一字段下标的按代码字母序排列。
///
/// # Arguments
/// * `provider`: 行情数据源。
/// * `instruments`: 待抓取的标的。
/// * `timeframe`: 采样周期。
/// * `start`, `end`: 时间窗口。
///
/// # Returns
/// 成功返回行情表；所有标的都没有拿到数据时返回最后一个错误或 `MarketError::NotFound`。
pub async fn download(
    provider: &dyn MarketDataProvider,
    instruments: &[Instrument],
    timeframe: TimeFrame,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<MarketFrame, MarketError> {
    let mut fetched: Vec<(Instrument, Vec<Candle>)> = Vec::new();
    let mut last_error = None;

    for instrument in instruments {
        match provider
            .fetch_candles(&instrument.to_stock(), timeframe, start, end)
            .await
        {
            Ok(candles) if candles.is_empty() => {
                warn!("No {timeframe} bars returned for {instrument}, omitting it");
            }
            Ok(candles) => {
                info!("Fetched {} {timeframe} bars for {instrument}", candles.len());
                fetched.push((*instrument, candles));
            }
            Err(e) => {
                warn!("Failed to download {instrument}: {e}");
                last_error = Some(e);
            }
        }
    }

    if fetched.is_empty() {
        return Err(last_error.unwrap_or(MarketError::NotFound));
    }

    fetched.sort_by_key(|(instrument, _)| instrument.symbol());
    Ok(merge(&fetched))
}

/// 将各标的的 K 线按时间戳对齐合并，行索引为 UTC 墙钟时间。
fn merge(fetched: &[(Instrument, Vec<Candle>)]) -> MarketFrame {
    let by_time: Vec<(Instrument, BTreeMap<NaiveDateTime, &Candle>)> = fetched
        .iter()
        .map(|(instrument, candles)| {
            let rows = candles.iter().map(|c| (c.time.naive_utc(), c)).collect();
            (*instrument, rows)
        })
        .collect();

    let index: Vec<NaiveDateTime> = by_time
        .iter()
        .flat_map(|(_, rows)| rows.keys().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let has_adj_close = fetched
        .iter()
        .any(|(_, candles)| candles.iter().any(|c| c.adj_close.is_some()));

    let mut columns = Vec::new();
    for field in PriceField::WRITE_ORDER {
        if field == PriceField::AdjClose && !has_adj_close {
            continue;
        }
        for (instrument, rows) in &by_time {
            let values = index
                .iter()
                .map(|ts| rows.get(ts).and_then(|c| field_value(c, field)))
                .collect();
            columns.push(Column {
                key: ColumnKey::new(field.label(), instrument.symbol()),
                values,
            });
        }
    }

    MarketFrame { index, columns }
}

fn field_value(candle: &Candle, field: PriceField) -> Option<f64> {
    match field {
        PriceField::Open => Some(candle.open),
        PriceField::High => Some(candle.high),
        PriceField::Low => Some(candle.low),
        PriceField::Close => Some(candle.close),
        PriceField::AdjClose => candle.adj_close,
        PriceField::Volume => Some(candle.volume),
    }
}
