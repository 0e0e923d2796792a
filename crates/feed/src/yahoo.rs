use async_trait::async_trait;
use chrono::{DateTime, Utc};
use faang_core::common::{Stock, TimeFrame};
use faang_core::market::entity::Candle;
use faang_core::market::error::MarketError;
use faang_core::market::port::MarketDataProvider;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const CHART_ENDPOINT: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

const BROWSER_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// # Summary
/// Yahoo Finance 行情提供者实现。
///
/// # Invariants
/// - 使用 `reqwest` 异步客户端进行通讯。
#[derive(Clone)]
pub struct YahooProvider {
    /// 内部使用的 HTTP 客户端
    client: Client,
}

impl YahooProvider {
    /// # Summary
    /// 创建一个新的 YahooProvider 实例。
    ///
    /// # Logic
    /// 1. 配置请求超时。
    /// 2. 设置伪装浏览器 Header (User-Agent) 以减少被拦截风险。
    /// 3. 初始化 reqwest 客户端。
    ///
    /// # Arguments
    /// * `timeout`: 单次请求超时。
    ///
    /// # Returns
    /// 返回初始化后的 YahooProvider；客户端构建失败时返回 `MarketError::Network`。
    pub fn new(timeout: Duration) -> Result<Self, MarketError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_UA));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| MarketError::Network(e.to_string()))?;

        Ok(Self { client })
    }
}

/// # Summary
/// Yahoo API 响应顶层结构。
///
/// # Invariants
/// - 映射自 Yahoo v8 chart 接口。
#[derive(Deserialize, Debug)]
struct YahooResponse {
    chart: YahooChart,
}

/// # Summary
/// Yahoo API 图表数据部分。
#[derive(Deserialize, Debug)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

/// # Summary
/// Yahoo API 错误详情。
#[derive(Deserialize, Debug)]
struct YahooError {
    description: String,
}

/// # Summary
/// Yahoo API 单个时间序列结果。区间内无成交时 `timestamp` 缺省。
#[derive(Deserialize, Debug)]
struct YahooResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: YahooIndicators,
}

/// # Summary
/// Yahoo API 指标容器。
#[derive(Deserialize, Debug)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
    // 调整后的价格数据
    adjclose: Option<Vec<YahooAdjClose>>,
}

/// # Summary
/// Yahoo API 调整后价格结构。
#[derive(Deserialize, Debug)]
struct YahooAdjClose {
    // 调整后的收盘价列表
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

/// # Summary
/// Yahoo API 原始报价数据。
#[derive(Deserialize, Debug)]
struct YahooQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// 将周期映射为 Yahoo 识别的 interval。
fn interval_param(timeframe: TimeFrame) -> &'static str {
    match timeframe {
        TimeFrame::Minute1 => "1m",
        TimeFrame::Minute5 => "5m",
        TimeFrame::Hour1 => "60m",
        TimeFrame::Day1 => "1d",
    }
}

/// # Summary
/// 校验并转换 Yahoo 响应为 K 线列表。
///
/// # Logic
/// 1. 上游报错或结果为空时返回对应错误。
/// 2. 校验每个报价数组与时间戳数组等长，不等长即视为契约变化，整体拒绝。
/// 3. 跳过 OHLCV 任一缺失的 K 线。
/// 4. 提取 adjclose 并与基础 OHLCV 合并。
fn into_candles(response: YahooResponse) -> Result<Vec<Candle>, MarketError> {
    if let Some(err) = response.chart.error {
        return Err(MarketError::Unknown(err.description));
    }

    let result = response
        .chart
        .result
        .ok_or(MarketError::NotFound)?
        .pop()
        .ok_or(MarketError::NotFound)?;

    let rows = result.timestamp.len();
    if rows == 0 {
        return Ok(Vec::new());
    }

    let quote = result
        .indicators
        .quote
        .first()
        .ok_or(MarketError::Parse("No quote data".into()))?;

    let columns = [
        ("open", quote.open.len()),
        ("high", quote.high.len()),
        ("low", quote.low.len()),
        ("close", quote.close.len()),
        ("volume", quote.volume.len()),
    ];
    if let Some((name, len)) = columns.iter().find(|(_, len)| *len != rows) {
        return Err(MarketError::Parse(format!(
            "quote.{name} has {len} values for {rows} timestamps"
        )));
    }

    let adj_close_list = result
        .indicators
        .adjclose
        .as_ref()
        .and_then(|v| v.first())
        .map(|v| &v.adjclose);
    if let Some(list) = adj_close_list.filter(|list| list.len() != rows) {
        return Err(MarketError::Parse(format!(
            "adjclose has {} values for {rows} timestamps",
            list.len()
        )));
    }

    let mut candles = Vec::with_capacity(rows);
    for (i, &ts) in result.timestamp.iter().enumerate() {
        if let (Some(o), Some(h), Some(l), Some(c), Some(v)) = (
            quote.open[i],
            quote.high[i],
            quote.low[i],
            quote.close[i],
            quote.volume[i],
        ) {
            let time = DateTime::from_timestamp(ts, 0)
                .ok_or_else(|| MarketError::Parse(format!("timestamp out of range: {ts}")))?;
            candles.push(Candle {
                time,
                open: o,
                high: h,
                low: l,
                close: c,
                adj_close: adj_close_list.and_then(|list| list[i]),
                volume: v,
            });
        }
    }

    Ok(candles)
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    /// # Summary
    /// 从 Yahoo Finance 抓取 K 线历史数据。
    ///
    /// # Logic
    /// 1. 映射 TimeFrame 周期为 Yahoo 识别的 interval。
    /// 2. 构建包含 period1, period2 的 API URL。
    /// 3. 发起异步请求并解析嵌套的 JSON 数据。
    /// 4. 校验响应形状并转换为 K 线。
    async fn fetch_candles(
        &self,
        stock: &Stock,
        timeframe: TimeFrame,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Candle>, MarketError> {
        let symbol = &stock.symbol;
        let url = format!("{CHART_ENDPOINT}/{symbol}");

        debug!("Requesting {symbol} {timeframe} bars from {start} to {end}");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("symbol", symbol.as_str()),
                ("period1", &start.timestamp().to_string()),
                ("period2", &end.timestamp().to_string()),
                ("interval", interval_param(timeframe)),
            ])
            .send()
            .await
            .map_err(|e| MarketError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(MarketError::Network(format!("HTTP {}", resp.status())));
        }

        let json: YahooResponse = resp
            .json()
            .await
            .map_err(|e| MarketError::Parse(e.to_string()))?;

        into_candles(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(body: &str) -> Result<Vec<Candle>, MarketError> {
        let response: YahooResponse = serde_json::from_str(body).unwrap();
        into_candles(response)
    }

    #[test]
    fn test_into_candles_skips_incomplete_bars() {
        let body = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1735740000, 1735743600, 1735747200],
                    "indicators": {
                        "quote": [{
                            "open":   [250.0, 251.0, null],
                            "high":   [252.0, 253.0, 254.0],
                            "low":    [249.0, 250.5, 251.0],
                            "close":  [251.5, 252.5, 253.0],
                            "volume": [1000, 1200, 900]
                        }],
                        "adjclose": [{ "adjclose": [251.4, null, 252.9] }]
                    }
                }],
                "error": null
            }
        }"#;

        let candles = decode(body).unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].time.timestamp(), 1735740000);
        assert_eq!(candles[0].close, 251.5);
        assert_eq!(candles[0].adj_close, Some(251.4));
        assert_eq!(candles[1].adj_close, None);
    }

    #[test]
    fn test_into_candles_rejects_misaligned_arrays() {
        let body = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1735740000, 1735743600],
                    "indicators": {
                        "quote": [{
                            "open": [1.0, 2.0], "high": [1.0, 2.0], "low": [1.0, 2.0],
                            "close": [1.0], "volume": [10, 20]
                        }]
                    }
                }],
                "error": null
            }
        }"#;

        let err = decode(body).unwrap_err();
        assert!(matches!(err, MarketError::Parse(msg) if msg.contains("quote.close")));
    }

    #[test]
    fn test_into_candles_surfaces_upstream_error() {
        let body = r#"{ "chart": { "result": null, "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" } } }"#;
        let err = decode(body).unwrap_err();
        assert!(matches!(err, MarketError::Unknown(msg) if msg.contains("delisted")));
    }

    #[test]
    fn test_into_candles_empty_window() {
        let body = r#"{ "chart": { "result": [{ "indicators": { "quote": [{}] } }], "error": null } }"#;
        assert!(decode(body).unwrap().is_empty());
    }
}
