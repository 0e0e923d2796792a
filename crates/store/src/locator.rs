use faang_core::snapshot::entity::{DATA_EXTENSION, SnapshotFile};
use faang_core::snapshot::error::SnapshotError;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// 找出目录中最近修改的快照文件。
///
/// # Logic
/// 1. 目录不存在视为尚无快照。
/// 2. 只考虑扩展名为 `csv` 的普通文件。
/// 3. 按修改时间取最大者；修改时间相同时取文件名字典序最大者，保证结果确定。
///
/// # Arguments
/// * `dir` - 快照目录。
///
/// # Returns
/// * `Ok(None)` - 没有任何快照，调用方应跳过后续处理。
/// * `Ok(Some(file))` - 最新的快照。
pub fn find_latest(dir: &Path) -> Result<Option<SnapshotFile>, SnapshotError> {
    if !dir.exists() {
        debug!("Snapshot directory {} does not exist yet", dir.display());
        return Ok(None);
    }

    let mut candidates = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(DATA_EXTENSION) {
            continue;
        }
        let metadata = entry.metadata()?;
        if !metadata.is_file() {
            continue;
        }
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        candidates.push(SnapshotFile {
            path,
            stem,
            modified: metadata.modified()?,
        });
    }

    let latest = candidates
        .into_iter()
        .max_by(|a, b| a.modified.cmp(&b.modified).then_with(|| a.path.cmp(&b.path)));

    match &latest {
        Some(file) => info!("Latest snapshot: {}", file.path.display()),
        None => info!("No snapshot found in {}", dir.display()),
    }

    Ok(latest)
}
