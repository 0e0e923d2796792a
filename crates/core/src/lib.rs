//! FAANG 行情快照系统的核心层：实体、错误与端口。
//!
//! 具体实现 (Yahoo 数据源、CSV 快照存储、图表后端) 位于各自的适配器 crate 中，
//! 通过这里定义的 trait 注入到应用层。

pub mod chart;
pub mod common;
pub mod config;
pub mod market;
pub mod snapshot;
