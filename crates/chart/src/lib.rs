//! 收盘价折线图：内存中的图表构建与 PNG 输出。

pub mod png;
pub mod render;
