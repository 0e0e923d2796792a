use config::{Config, ConfigError, Environment, File};
use faang_core::config::AppConfig;
use std::path::Path;

/// 工作目录下的可选配置文件
pub const CONFIG_FILE: &str = "faang.toml";

/// 环境变量前缀，层级之间以 `__` 分隔，例如 `FAANG__STORAGE__DATA_DIR`
pub const ENV_PREFIX: &str = "FAANG";

/// 从工作目录加载配置。
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(Path::new(CONFIG_FILE))
}

/// # Summary
/// 按层叠顺序加载应用配置。
///
/// # Logic
/// 1. 内置默认值 (由 `AppConfig` 的 serde 默认值提供)。
/// 2. 可选的配置文件，不存在时跳过。
/// 3. `FAANG__*` 环境变量，优先级最高。
///
/// # Arguments
/// * `file`: 配置文件路径，格式由扩展名决定。
pub fn load_config_from(file: &Path) -> Result<AppConfig, ConfigError> {
    Config::builder()
        .add_source(File::from(file).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}
