//! 行情分析：从恢复后的快照中提取收盘价。

pub mod closing;
