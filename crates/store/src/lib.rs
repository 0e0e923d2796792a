//! 基于平面 CSV 文件的快照存储：目录准备、写入、发现与结构恢复。

pub mod csv_store;
pub mod dir;
pub mod locator;
pub mod parser;
pub mod writer;
