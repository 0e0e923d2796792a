use faang_core::common::Instrument;
use faang_core::market::entity::{ClosingPrices, PriceSeries};
use faang_core::snapshot::entity::{ColumnKey, PriceField, RecoveredTable, Table};
use faang_core::snapshot::error::SnapshotError;
use tracing::{info, warn};

/// # Summary
/// 把单元格文本转换为价格，无法解析或非有限值视为缺失。
pub fn coerce_price(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// # Summary
/// 从恢复后的快照中提取收盘价表。
///
/// # Logic
/// 1. 双层结构：优先取字段名恰为 `Close` 的列；没有时取第一个字段名包含 `Close` 的字段 (如 `Adj Close`)，并告警。
/// 2. 降级结构：取所有标签包含 `Close` 的列，标的按标签中出现的代码匹配。
/// 3. 两种情况都找不到时返回 `SchemaNotRecognized`。
/// 4. 对五个固定标的逐一取列并转换为数值；缺少的标的记入 `unavailable` 并告警。
///
/// # Arguments
/// * `table`: 恢复后的快照。
///
/// # Returns
/// 成功返回收盘价表。
pub fn extract_closing_prices(table: &RecoveredTable) -> Result<ClosingPrices, SnapshotError> {
    let close = PriceField::Close.label();

    let (field, lookup): (String, Vec<(Instrument, Option<&Vec<String>>)>) = match table {
        RecoveredTable::TwoLevel(t) => {
            let field = close_field(t)
                .ok_or_else(|| SnapshotError::SchemaNotRecognized(close.to_string()))?;
            let lookup = Instrument::ALL
                .into_iter()
                .map(|i| (i, find_two_level(t, field, i)))
                .collect();
            (field.to_string(), lookup)
        }
        RecoveredTable::SingleLevel(t) => {
            let selected: Vec<_> = t.columns.iter().filter(|c| c.key.contains(close)).collect();
            if selected.is_empty() {
                return Err(SnapshotError::SchemaNotRecognized(close.to_string()));
            }
            info!(
                "Degraded snapshot: {} flat columns contain '{close}'",
                selected.len()
            );
            let lookup = Instrument::ALL
                .into_iter()
                .map(|i| {
                    let column = selected
                        .iter()
                        .copied()
                        .find(|c| c.key.contains(i.symbol()));
                    (i, column.map(|c| &c.values))
                })
                .collect();
            (close.to_string(), lookup)
        }
    };

    let mut series = Vec::new();
    let mut unavailable = Vec::new();
    for (instrument, values) in lookup {
        match values {
            Some(cells) => series.push(PriceSeries {
                instrument,
                values: cells.iter().map(|c| coerce_price(c)).collect(),
            }),
            None => {
                warn!("{instrument} has no '{field}' column in this snapshot, skipping it");
                unavailable.push(instrument);
            }
        }
    }

    Ok(ClosingPrices {
        index: table.index().to_vec(),
        field,
        series,
        unavailable,
    })
}

/// 选出收盘价字段：精确匹配优先，其次按原始列顺序取第一个子串匹配。
fn close_field(table: &Table<ColumnKey>) -> Option<&str> {
    let close = PriceField::Close.label();
    if table.columns.iter().any(|c| c.key.field == close) {
        return Some(close);
    }
    let drifted = table
        .columns
        .iter()
        .map(|c| c.key.field.as_str())
        .find(|f| f.contains(close))?;
    warn!("No '{close}' field in snapshot, charting '{drifted}' instead (adjusted vs raw close is ambiguous)");
    Some(drifted)
}

fn find_two_level<'a>(
    table: &'a Table<ColumnKey>,
    field: &str,
    instrument: Instrument,
) -> Option<&'a Vec<String>> {
    table
        .columns
        .iter()
        .find(|c| c.key.field == field && c.key.instrument == instrument.symbol())
        .map(|c| &c.values)
}
