use super::entity::{MarketFrame, RecoveredTable, SnapshotFile};
use super::error::SnapshotError;
use chrono::NaiveDateTime;

/// # Summary
/// 快照存储接口，负责快照的写入、发现与加载。
///
/// # Invariants
/// - 快照一经写入不再修改。
/// - 写入路径与读取路径只通过文件系统交互，不共享运行时状态。
pub trait SnapshotStore: Send + Sync {
    /// # Summary
    /// 将行情表写成以创建时刻命名的快照文件。
    ///
    /// # Arguments
    /// * `frame` - 双层行情表。
    /// * `taken_at` - 创建时刻 (本地墙钟时间)，决定文件名。
    ///
    /// # Returns
    /// 成功返回写入的快照文件。
    fn save(&self, frame: &MarketFrame, taken_at: NaiveDateTime)
    -> Result<SnapshotFile, SnapshotError>;

    /// # Summary
    /// 找出最近修改的快照文件。
    ///
    /// # Returns
    /// 目录中没有快照时返回 `Ok(None)`。
    fn latest(&self) -> Result<Option<SnapshotFile>, SnapshotError>;

    /// # Summary
    /// 加载快照并恢复其列结构。
    ///
    /// # Returns
    /// 恢复后的表；文件无法作为表格解析时返回 `SnapshotError::Malformed`。
    fn load(&self, file: &SnapshotFile) -> Result<RecoveredTable, SnapshotError>;
}
