use chrono::NaiveDateTime;
use faang_core::snapshot::entity::{
    DATA_EXTENSION, FIELD_LEVEL_LABEL, INDEX_FORMAT, INDEX_LABEL, INSTRUMENT_LEVEL_LABEL,
    MarketFrame, SnapshotFile,
};
use faang_core::snapshot::error::SnapshotError;
use std::path::Path;
use tracing::{info, warn};

/// 将 CSV 写入错误映射为存储层错误。
fn write_error(err: csv::Error) -> SnapshotError {
    SnapshotError::Io(format!("CSV error: {}", err))
}

/// 将行情表写成以创建时刻命名的快照文件。
///
/// # Summary
/// 采用双层表头布局：第一行字段名，第二行标的代码，第三行是只含索引列名的哨兵行，
/// 之后每行一个时间点。缺失值写为空单元格。
///
/// 索引列是 UTC 墙钟时间 (K 线时间戳统一为 UTC，不带时区后缀)；文件名则取本地墙钟时间，
/// 二者所在时区可能不同。
///
/// # Logic
/// 1. 以 `taken_at` 生成 `YYYYMMDD-HHMMSS.csv` 文件名。
/// 2. 依次写出三行表头与数据行。
/// 3. 刷新后读取文件元数据，构造 `SnapshotFile`。
///
/// # Arguments
/// * `frame` - 双层行情表。
/// * `dir` - 已存在的输出目录。
/// * `taken_at` - 创建时刻。
///
/// # Returns
/// * `Result<SnapshotFile, SnapshotError>` - 写出的快照文件或 I/O 错误。
pub fn write_snapshot(
    frame: &MarketFrame,
    dir: &Path,
    taken_at: NaiveDateTime,
) -> Result<SnapshotFile, SnapshotError> {
    let stem = SnapshotFile::stem_at(taken_at);
    if frame.is_empty() {
        warn!("Snapshot {stem} has no rows, writing headers only");
    }
    let path = dir.join(format!("{stem}.{DATA_EXTENSION}"));

    let mut writer = csv::Writer::from_path(&path).map_err(write_error)?;

    let fields = frame.columns.iter().map(|c| c.key.field.as_str());
    let instruments = frame.columns.iter().map(|c| c.key.instrument.as_str());
    let blanks = frame.columns.iter().map(|_| "");

    writer
        .write_record(std::iter::once(FIELD_LEVEL_LABEL).chain(fields))
        .map_err(write_error)?;
    writer
        .write_record(std::iter::once(INSTRUMENT_LEVEL_LABEL).chain(instruments))
        .map_err(write_error)?;
    writer
        .write_record(std::iter::once(INDEX_LABEL).chain(blanks))
        .map_err(write_error)?;

    for (row, ts) in frame.index.iter().enumerate() {
        let cells = frame.columns.iter().map(|c| {
            c.values
                .get(row)
                .copied()
                .flatten()
                .map(|v| v.to_string())
                .unwrap_or_default()
        });
        writer
            .write_record(std::iter::once(ts.format(INDEX_FORMAT).to_string()).chain(cells))
            .map_err(write_error)?;
    }

    writer.flush()?;

    let modified = std::fs::metadata(&path)?.modified()?;
    info!(
        "Snapshot saved at {} ({} rows, {} columns)",
        path.display(),
        frame.len(),
        frame.columns.len()
    );

    Ok(SnapshotFile {
        path,
        stem,
        modified,
    })
}
