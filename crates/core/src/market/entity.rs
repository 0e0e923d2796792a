use crate::common::Instrument;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// # Summary
/// 单根 K 线数据实体，记录特定时段内的行情波动。
///
/// # Invariants
/// - `high` 必须大于或等于 `low`, `open`, `close`。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    // K 线开始时间
    pub time: DateTime<Utc>,
    // 开盘价
    pub open: f64,
    // 最高价
    pub high: f64,
    // 最低价
    pub low: f64,
    // 收盘价
    pub close: f64,
    // 调整后收盘价 (用于处理分红、拆股等复权情况)
    pub adj_close: Option<f64>,
    // 成交量
    pub volume: f64,
}

/// # Summary
/// 单个标的的收盘价序列。
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub instrument: Instrument,
    // 与 `ClosingPrices::index` 逐行对齐，`None` 表示缺失值
    pub values: Vec<Option<f64>>,
}

impl PriceSeries {
    /// 非缺失值的数量。
    pub fn present(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}

/// # Summary
/// 收盘价表：与恢复后的快照共享同一时间索引，每个可用标的一列。
///
/// # Invariants
/// - 每条 `series` 的长度等于 `index` 的长度。
/// - `series` 按 `Instrument::ALL` 的顺序排列。
/// - 一个标的要么出现在 `series`，要么出现在 `unavailable`，二者互斥。
#[derive(Debug, Clone, PartialEq)]
pub struct ClosingPrices {
    pub index: Vec<NaiveDateTime>,
    // 实际命中的价格字段标签 (例如 "Close" 或 "Adj Close")
    pub field: String,
    pub series: Vec<PriceSeries>,
    pub unavailable: Vec<Instrument>,
}

impl ClosingPrices {
    /// 按标的查找序列。
    pub fn get(&self, instrument: Instrument) -> Option<&PriceSeries> {
        self.series.iter().find(|s| s.instrument == instrument)
    }
}
