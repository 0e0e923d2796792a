use faang_core::snapshot::error::SnapshotError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// 确保目录存在并返回其绝对路径。
///
/// # Logic
/// 1. 目录不存在时递归创建。
/// 2. 将路径解析为绝对路径 (不解析符号链接)。
///
/// # Arguments
/// * `path` - 目标目录，可以是相对路径。
///
/// # Returns
/// * `Result<PathBuf, SnapshotError>` - 绝对路径或 I/O 错误。
pub fn ensure_dir(path: &Path) -> Result<PathBuf, SnapshotError> {
    if !path.exists() {
        fs::create_dir_all(path)?;
        info!("Created directory {}", path.display());
    }
    Ok(std::path::absolute(path)?)
}
