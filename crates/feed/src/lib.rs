//! 行情数据源适配器：Yahoo Finance 提供者与多标的下载。

pub mod download;
pub mod yahoo;
