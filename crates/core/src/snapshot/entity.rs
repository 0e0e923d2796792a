use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::SystemTime;

/// 数据快照文件扩展名
pub const DATA_EXTENSION: &str = "csv";

/// 图表文件扩展名
pub const PLOT_EXTENSION: &str = "png";

/// 快照文件名 (不含扩展名) 的时间格式: `YYYYMMDD-HHMMSS`
pub const STEM_FORMAT: &str = "%Y%m%d-%H%M%S";

/// 快照索引列的时间格式
pub const INDEX_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 双层表头第一行索引位的标签
pub const FIELD_LEVEL_LABEL: &str = "Price";

/// 双层表头第二行索引位的标签
pub const INSTRUMENT_LEVEL_LABEL: &str = "Ticker";

/// 索引列名，写在第三行 (哨兵行)
pub const INDEX_LABEL: &str = "Datetime";

/// # Summary
/// 价格字段，即双层列键的外层。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PriceField {
    Open,
    High,
    Low,
    Close,
    AdjClose,
    Volume,
}

impl PriceField {
    /// 写入快照时使用的字段顺序。
    pub const WRITE_ORDER: [PriceField; 6] = [
        PriceField::AdjClose,
        PriceField::Close,
        PriceField::High,
        PriceField::Low,
        PriceField::Open,
        PriceField::Volume,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PriceField::Open => "Open",
            PriceField::High => "High",
            PriceField::Low => "Low",
            PriceField::Close => "Close",
            PriceField::AdjClose => "Adj Close",
            PriceField::Volume => "Volume",
        }
    }
}

/// # Summary
/// 磁盘上的一个快照文件。身份即文件名，不附带其他元数据。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotFile {
    // 文件绝对路径
    pub path: PathBuf,
    // 文件名去掉扩展名后的部分，例如 `20250101-090000`
    pub stem: String,
    // 文件最后修改时间
    pub modified: SystemTime,
}

impl SnapshotFile {
    /// 按创建时刻生成快照文件名主干。
    pub fn stem_at(taken_at: NaiveDateTime) -> String {
        taken_at.format(STEM_FORMAT).to_string()
    }
}

/// # Summary
/// 双层列键 (价格字段 × 标的)。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnKey {
    pub field: String,
    pub instrument: String,
}

impl ColumnKey {
    pub fn new(field: impl Into<String>, instrument: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            instrument: instrument.into(),
        }
    }
}

/// # Summary
/// 表中的一列。
#[derive(Debug, Clone, PartialEq)]
pub struct Column<K, V = String> {
    pub key: K,
    // 与所属表的 `index` 逐行对齐
    pub values: Vec<V>,
}

/// # Summary
/// 以时间为行索引的列式表。
///
/// # Invariants
/// - 每一列的 `values.len()` 等于 `index.len()`。
/// - 列顺序即原始文件中的物理顺序。
#[derive(Debug, Clone, PartialEq)]
pub struct Table<K, V = String> {
    pub index: Vec<NaiveDateTime>,
    pub columns: Vec<Column<K, V>>,
}

impl<K: PartialEq, V> Table<K, V> {
    /// 行数。
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// 按列键查找列。
    pub fn column(&self, key: &K) -> Option<&Column<K, V>> {
        self.columns.iter().find(|c| &c.key == key)
    }
}

/// 由行情提供者构建、写入快照前的双层行情表。
pub type MarketFrame = Table<ColumnKey, Option<f64>>;

/// # Summary
/// 结构恢复解析器的产出。
///
/// # Invariants
/// - `TwoLevel`: 每一列都可以用 (字段, 标的) 寻址。
/// - `SingleLevel`: 降级模式，列只能用平铺标签寻址。
/// - 单元格保留原始文本，数值转换由下游负责。
#[derive(Debug, Clone, PartialEq)]
pub enum RecoveredTable {
    TwoLevel(Table<ColumnKey>),
    SingleLevel(Table<String>),
}

impl RecoveredTable {
    /// 时间索引。
    pub fn index(&self) -> &[NaiveDateTime] {
        match self {
            RecoveredTable::TwoLevel(t) => &t.index,
            RecoveredTable::SingleLevel(t) => &t.index,
        }
    }
}
