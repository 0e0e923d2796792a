//! 快照结构恢复。
//!
//! 不同版本的写入方对双层列键的表头写法并不一致：有的用两行物理表头 (字段、标的)
//! 外加一行索引列名哨兵行，有的只有一行表头，标的代码落在第一条数据行里。
//! 这里按 "先双层、后单层" 的顺序尝试解析，尽量还原出双层结构，
//! 实在无法还原时退回只有平铺标签的降级表。

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord};
use faang_core::common::Instrument;
use faang_core::snapshot::entity::{Column, ColumnKey, RecoveredTable, Table};
use faang_core::snapshot::error::SnapshotError;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%dT%H:%M:%S%:z"];

/// 双层表头假设不成立的原因。仅用于日志，不会离开本模块。
#[derive(Error, Debug)]
enum ShapeMismatch {
    #[error("expected at least 3 lines, found {0}")]
    TooShort(usize),
    #[error("line {line} has a blank label in column {column}")]
    BlankLabel { line: usize, column: usize },
    #[error("line 3 is not an index-label line")]
    NoSentinel,
    #[error("line {line} index '{cell}' is not a timestamp")]
    IndexNotTimestamp { line: usize, cell: String },
}

/// # Summary
/// 解析索引列中的时间戳。
///
/// # Logic
/// 依次尝试: 带 UTC 偏移的时间 (保留墙钟时间)、不带偏移的时间、纯日期 (取零点)。
///
/// # Returns
/// 无法识别时返回 None。
pub fn parse_timestamp(cell: &str) -> Option<NaiveDateTime> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    OFFSET_FORMATS
        .iter()
        .find_map(|f| DateTime::parse_from_str(cell, f).ok())
        .map(|dt| dt.naive_local())
        .or_else(|| {
            NAIVE_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(cell, f).ok())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(cell, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// # Summary
/// 加载快照文件并恢复为双层或降级的单层表。
///
/// # Logic
/// 1. 将文件读成等宽的记录；读不出来即为致命错误。
/// 2. 尝试双层表头解析。
/// 3. 失败则按单层表头解析，并尝试把第一条数据行提升为标的层。
///
/// # Arguments
/// * `path` - 快照文件路径。
///
/// # Returns
/// * `Ok(RecoveredTable)` - 恢复后的表。
/// * `Err(SnapshotError::Malformed)` - 文件无法作为表格解析。
pub fn parse_snapshot(path: &Path) -> Result<RecoveredTable, SnapshotError> {
    let rows = read_rows(path)?;

    match parse_two_level(&rows) {
        Ok(table) => {
            debug!(
                "Parsed {} as a two-line header snapshot ({} rows)",
                path.display(),
                table.len()
            );
            Ok(RecoveredTable::TwoLevel(table))
        }
        Err(mismatch) => {
            warn!(
                "{} does not have a two-line header ({mismatch}), retrying with a single header line",
                path.display()
            );
            Ok(parse_single_level(&rows))
        }
    }
}

fn read_error(path: &Path, err: csv::Error) -> SnapshotError {
    if err.is_io_error() {
        SnapshotError::Io(err.to_string())
    } else {
        SnapshotError::Malformed {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }
}

/// # Summary
/// 读取全部记录并补齐省略了索引单元格的表头行。
///
/// # Logic
/// 1. 以非严格模式读取，允许行宽不一致。
/// 2. 以最宽的行为表宽；恰好窄一格且索引位不是时间戳的行视为省略了索引的表头行，
///    在最前面补一个空索引单元格，其全部单元格都作为值标签。
/// 3. 其他宽度不一致的行为致命错误。
fn read_rows(path: &Path) -> Result<Vec<StringRecord>, SnapshotError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| read_error(path, e))?;

    let rows = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| read_error(path, e))?;

    let malformed = |reason: String| SnapshotError::Malformed {
        path: path.display().to_string(),
        reason,
    };

    let width = rows.iter().map(StringRecord::len).max().unwrap_or(0);
    let rows = rows
        .into_iter()
        .enumerate()
        .map(|(n, row)| {
            if row.len() == width {
                Ok(row)
            } else if row.len() + 1 == width && parse_timestamp(index_cell(&row)).is_none() {
                let mut padded = StringRecord::with_capacity(row.as_slice().len(), width);
                padded.push_field("");
                padded.extend(row.iter());
                Ok(padded)
            } else {
                Err(malformed(format!(
                    "line {} has {} fields, expected {width}",
                    n + 1,
                    row.len()
                )))
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    match rows.first() {
        None => Err(malformed("file is empty".to_string())),
        Some(header) if header.len() < 2 => {
            Err(malformed("no columns besides the index".to_string()))
        }
        Some(_) => Ok(rows),
    }
}

/// 第一列是索引，其余为值单元格。
fn index_cell(row: &StringRecord) -> &str {
    row.get(0).unwrap_or("")
}

fn value_cells(row: &StringRecord) -> impl Iterator<Item = &str> {
    row.iter().skip(1)
}

/// 按列位置从行中取值，列从值单元格开始计数。
fn collect_columns<K>(keys: Vec<K>, rows: &[&StringRecord]) -> Vec<Column<K>> {
    keys.into_iter()
        .enumerate()
        .map(|(i, key)| Column {
            key,
            values: rows
                .iter()
                .map(|r| r.get(i + 1).unwrap_or("").trim().to_string())
                .collect(),
        })
        .collect()
}

fn labels(row: &StringRecord, line: usize) -> Result<Vec<String>, ShapeMismatch> {
    value_cells(row)
        .enumerate()
        .map(|(i, cell)| match cell.trim() {
            "" => Err(ShapeMismatch::BlankLabel {
                line,
                column: i + 2,
            }),
            label => Ok(label.to_string()),
        })
        .collect()
}

/// # Summary
/// 双层表头解析：第 1 行字段，第 2 行标的，第 3 行为索引列名哨兵行，其余为数据。
///
/// # Logic
/// 1. 前两行的值单元格都必须非空；字段名上的重复后缀同样去掉。
/// 2. 第 3 行的索引位不能是时间戳，且值单元格全部为空。
/// 3. 每条数据行的索引都必须是时间戳。
fn parse_two_level(rows: &[StringRecord]) -> Result<Table<ColumnKey>, ShapeMismatch> {
    let [field_line, instrument_line, sentinel, data @ ..] = rows else {
        return Err(ShapeMismatch::TooShort(rows.len()));
    };

    let fields = labels(field_line, 1)?;
    let instruments = labels(instrument_line, 2)?;

    let sentinel_blank = value_cells(sentinel).all(|c| c.trim().is_empty());
    if !sentinel_blank || parse_timestamp(index_cell(sentinel)).is_some() {
        return Err(ShapeMismatch::NoSentinel);
    }

    let index = data
        .iter()
        .enumerate()
        .map(|(n, row)| {
            parse_timestamp(index_cell(row)).ok_or_else(|| ShapeMismatch::IndexNotTimestamp {
                line: n + 4,
                cell: index_cell(row).to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let keys = strip_duplicate_suffixes(&fields)
        .into_iter()
        .zip(instruments)
        .map(|(field, instrument)| ColumnKey { field, instrument })
        .collect();
    let data: Vec<&StringRecord> = data.iter().collect();

    Ok(Table {
        index,
        columns: collect_columns(keys, &data),
    })
}

/// # Summary
/// 单层表头解析，必要时把第一条数据行提升为标的层。
///
/// # Logic
/// 1. 第一行作为平铺列标签。
/// 2. 若第一条数据行的值单元格全部是已知标的代码，则标签作为字段层、该行作为标的层，并丢弃该行。
///    标签上的重复后缀 (`Close.1`) 在提升时去掉。
/// 3. 否则保持平铺标签，进入降级模式。
/// 4. 重新解析索引：非时间戳且整行为空的残留哨兵行直接丢弃，其余非时间戳行告警后丢弃。
fn parse_single_level(rows: &[StringRecord]) -> RecoveredTable {
    let Some((header, body)) = rows.split_first() else {
        return RecoveredTable::SingleLevel(Table {
            index: Vec::new(),
            columns: Vec::new(),
        });
    };
    let flat: Vec<String> = value_cells(header).map(|c| c.trim().to_string()).collect();

    match body.first().and_then(instrument_row) {
        Some(instruments) => {
            info!("Promoted the first data row to the instrument level");
            let keys = strip_duplicate_suffixes(&flat)
                .into_iter()
                .zip(instruments)
                .map(|(field, instrument)| ColumnKey { field, instrument })
                .collect();
            RecoveredTable::TwoLevel(timestamped(keys, &body[1..]))
        }
        None => {
            warn!("No instrument row found, falling back to single-level columns");
            RecoveredTable::SingleLevel(timestamped(flat, body))
        }
    }
}

/// 行的值单元格全部为已知标的代码时返回这些代码。
fn instrument_row(row: &StringRecord) -> Option<Vec<String>> {
    let cells: Vec<&str> = value_cells(row).collect();
    if cells.is_empty() {
        return None;
    }
    cells
        .into_iter()
        .map(|c| c.parse::<Instrument>().ok().map(|i| i.symbol().to_string()))
        .collect()
}

/// 去掉重复列名被加上的 `.N` 后缀，前提是去掉后的名字本身也是一个标签。
fn strip_duplicate_suffixes(labels: &[String]) -> Vec<String> {
    labels
        .iter()
        .map(|label| match label.rsplit_once('.') {
            Some((base, n))
                if !n.is_empty()
                    && n.chars().all(|c| c.is_ascii_digit())
                    && labels.iter().any(|l| l == base) =>
            {
                base.to_string()
            }
            _ => label.clone(),
        })
        .collect()
}

/// 保留索引可解析为时间戳的行并构建表。
fn timestamped<K>(keys: Vec<K>, rows: &[StringRecord]) -> Table<K> {
    let mut index = Vec::with_capacity(rows.len());
    let mut kept = Vec::with_capacity(rows.len());
    let mut dropped = 0usize;

    for row in rows {
        match parse_timestamp(index_cell(row)) {
            Some(ts) => {
                index.push(ts);
                kept.push(row);
            }
            None if value_cells(row).all(|c| c.trim().is_empty()) => {
                debug!("Discarding leftover label row '{}'", index_cell(row));
            }
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        warn!("Dropped {dropped} rows whose index is not a timestamp");
    }

    Table {
        index,
        columns: collect_columns(keys, &kept),
    }
}
