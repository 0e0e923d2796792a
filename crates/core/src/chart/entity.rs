use chrono::NaiveDateTime;

/// # Summary
/// 图表中的一条折线。
///
/// # Invariants
/// - `segments` 中每一段都非空，且段内按时间升序。
/// - 缺失值把序列切成多段，段与段之间不连线。
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    // 图例标签 (标的代码)
    pub label: String,
    pub segments: Vec<Vec<(NaiveDateTime, f64)>>,
}

impl ChartSeries {
    /// 所有数据点，按段依次展开。
    pub fn points(&self) -> impl Iterator<Item = &(NaiveDateTime, f64)> {
        self.segments.iter().flatten()
    }
}

/// # Summary
/// 内存中的可渲染图表，直到显式写出前不落盘。
///
/// # Invariants
/// - `series` 可以为空，空图表同样可以写出。
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    // 标题，取自快照文件名主干
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    // 横轴范围，来自收盘价表的时间索引；索引为空时为 None
    pub x_range: Option<(NaiveDateTime, NaiveDateTime)>,
    pub series: Vec<ChartSeries>,
}

impl Chart {
    /// # Summary
    /// 计算所有折线的纵轴取值范围。
    ///
    /// # Returns
    /// 没有任何数据点时返回 None。
    pub fn y_range(&self) -> Option<(f64, f64)> {
        self.series
            .iter()
            .flat_map(|s| s.points())
            .fold(None, |acc, &(_, y)| match acc {
                None => Some((y, y)),
                Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
            })
    }
}
