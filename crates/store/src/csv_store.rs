use crate::dir::ensure_dir;
use crate::locator::find_latest;
use crate::parser::parse_snapshot;
use crate::writer::write_snapshot;
use chrono::NaiveDateTime;
use faang_core::snapshot::entity::{MarketFrame, RecoveredTable, SnapshotFile};
use faang_core::snapshot::error::SnapshotError;
use faang_core::snapshot::port::SnapshotStore;
use std::path::{Path, PathBuf};

/// SnapshotStore 的 CSV 实现，每个快照一个平面文件。
///
/// # Summary
/// 所有快照存放在同一个数据目录下，文件名即快照身份。
///
/// # Invariants
/// * 目录在首次写入时创建，读取路径不会创建目录。
/// * 不加锁：同一秒内的并发写入互相覆盖。
pub struct CsvSnapshotStore {
    data_dir: PathBuf,
}

impl CsvSnapshotStore {
    /// 创建指向 `data_dir` 的存储实例，不触碰文件系统。
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl SnapshotStore for CsvSnapshotStore {
    fn save(
        &self,
        frame: &MarketFrame,
        taken_at: NaiveDateTime,
    ) -> Result<SnapshotFile, SnapshotError> {
        let dir = ensure_dir(&self.data_dir)?;
        write_snapshot(frame, &dir, taken_at)
    }

    fn latest(&self) -> Result<Option<SnapshotFile>, SnapshotError> {
        find_latest(&self.data_dir)
    }

    fn load(&self, file: &SnapshotFile) -> Result<RecoveredTable, SnapshotError> {
        parse_snapshot(&file.path)
    }
}
