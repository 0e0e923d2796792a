use thiserror::Error;

/// # Summary
/// 快照域错误枚举，覆盖文件读写、格式损坏与结构无法识别。
///
/// # Invariants
/// - 表头形状歧义等可恢复情况不会出现在这里，只在解析器内部记录日志。
/// - 出现在这里的错误都是致命的，由调用方直接上抛。
#[derive(Error, Debug)]
pub enum SnapshotError {
    // 目录不可写、文件不可读等 I/O 失败
    #[error("IO error: {0}")]
    Io(String),
    // 文件根本无法作为表格解析
    #[error("Malformed snapshot {path}: {reason}")]
    Malformed { path: String, reason: String },
    // 找不到任何类似收盘价的列
    #[error("Schema not recognized: no column matching '{0}'")]
    SchemaNotRecognized(String),
}

impl From<std::io::Error> for SnapshotError {
    fn from(err: std::io::Error) -> Self {
        SnapshotError::Io(err.to_string())
    }
}
