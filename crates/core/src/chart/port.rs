use super::entity::Chart;
use super::error::ChartError;
use std::path::{Path, PathBuf};

/// # Summary
/// 图表输出接口，把内存中的图表序列化为图像文件。
pub trait PlotWriter: Send + Sync {
    /// # Summary
    /// 将图表写入目录，文件名由图表标题派生。
    ///
    /// # Arguments
    /// * `chart` - 待写出的图表。
    /// * `dir` - 输出目录，调用方保证其存在。
    ///
    /// # Returns
    /// 成功返回写出的文件路径。
    fn write(&self, chart: &Chart, dir: &Path) -> Result<PathBuf, ChartError>;
}
