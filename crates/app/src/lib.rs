//! 应用层：配置加载、日志初始化与管线编排。

pub mod logging;
pub mod pipeline;
pub mod settings;
