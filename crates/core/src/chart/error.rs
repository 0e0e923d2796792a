use thiserror::Error;

/// # Summary
/// 图表域错误枚举。
#[derive(Error, Debug)]
pub enum ChartError {
    // 输出目录或文件写入失败
    #[error("IO error: {0}")]
    Io(String),
    // 绘图后端失败
    #[error("Render error: {0}")]
    Render(String),
}

impl From<std::io::Error> for ChartError {
    fn from(err: std::io::Error) -> Self {
        ChartError::Io(err.to_string())
    }
}
