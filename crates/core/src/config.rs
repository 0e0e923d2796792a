use crate::common::TimeFrame;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 全局应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub feed: FeedConfig,
    pub plot: PlotConfig,
    pub log: LogConfig,
}

/// 快照与图表的输出目录，显式传入各个阶段
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub plots_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    // 回溯天数
    pub lookback_days: u32,
    // 采样周期
    pub interval: TimeFrame,
    // 单次请求超时 (秒)
    pub timeout_secs: u64,
}

/// 图像尺寸以英寸 × DPI 表达，像素尺寸由二者相乘得到
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub width_in: u32,
    pub height_in: u32,
    pub dpi: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    // 未设置 RUST_LOG 时使用的过滤级别
    pub level: String,
    // 设置后额外按天滚动写入该目录
    pub dir: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data-faang-stocks"),
            plots_dir: PathBuf::from("plots"),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            lookback_days: 5,
            interval: TimeFrame::Hour1,
            timeout_secs: 10,
        }
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width_in: 12,
            height_in: 6,
            dpi: 150,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
        }
    }
}

impl PlotConfig {
    /// 像素尺寸 (宽, 高)。
    pub fn pixels(&self) -> (u32, u32) {
        (
            self.width_in.saturating_mul(self.dpi),
            self.height_in.saturating_mul(self.dpi),
        )
    }
}
