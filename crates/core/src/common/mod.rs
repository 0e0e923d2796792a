pub mod time;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// # Summary
/// 证券标的实体，作为行情提供者的请求身份。
///
/// # Invariants
/// - `symbol` 必须是合法的交易代码。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stock {
    // 股票代码 (例如: AAPL)
    pub symbol: String,
}

/// # Summary
/// 交易时间周期枚举，定义 K 线的时间跨度。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TimeFrame {
    // 1分钟
    Minute1,
    // 5分钟
    Minute5,
    // 1小时
    Hour1,
    // 1日
    Day1,
}

impl FromStr for TimeFrame {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1m" | "minute1" => Ok(TimeFrame::Minute1),
            "5m" | "minute5" => Ok(TimeFrame::Minute5),
            "1h" | "hour1" => Ok(TimeFrame::Hour1),
            "1d" | "day1" => Ok(TimeFrame::Day1),
            _ => Err(format!("Unknown TimeFrame: {}", s)),
        }
    }
}

impl std::fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeFrame::Minute1 => write!(f, "1m"),
            TimeFrame::Minute5 => write!(f, "5m"),
            TimeFrame::Hour1 => write!(f, "1h"),
            TimeFrame::Day1 => write!(f, "1d"),
        }
    }
}

/// # Summary
/// 系统关注的五只固定标的。
///
/// # Invariants
/// - 集合封闭，不支持运行时扩展。
/// - `ALL` 的顺序即图表与收盘价表的列顺序。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Instrument {
    Aapl,
    Amzn,
    Meta,
    Goog,
    Nflx,
}

impl Instrument {
    /// 全部标的，按约定顺序排列。
    pub const ALL: [Instrument; 5] = [
        Instrument::Aapl,
        Instrument::Amzn,
        Instrument::Meta,
        Instrument::Goog,
        Instrument::Nflx,
    ];

    /// 返回交易代码。
    pub fn symbol(&self) -> &'static str {
        match self {
            Instrument::Aapl => "AAPL",
            Instrument::Amzn => "AMZN",
            Instrument::Meta => "META",
            Instrument::Goog => "GOOG",
            Instrument::Nflx => "NFLX",
        }
    }

    /// # Summary
    /// 转换为行情提供者使用的证券身份。
    pub fn to_stock(&self) -> Stock {
        Stock {
            symbol: self.symbol().to_string(),
        }
    }
}

impl FromStr for Instrument {
    type Err = String;

    /// 严格匹配交易代码（区分大小写，忽略首尾空白）。
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Instrument::ALL
            .into_iter()
            .find(|i| i.symbol() == trimmed)
            .ok_or_else(|| format!("Unknown instrument: {}", s))
    }
}

impl std::fmt::Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}
