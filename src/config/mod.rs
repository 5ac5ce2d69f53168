use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::{OptimizerError, OptimizerResult};

/// 重写器配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct OptimizerConfig {
    /// 单次重写的最大迭代轮数，防止规则编写错误导致无限重写
    pub max_iteration_rounds: usize,
    /// 按规则名称禁用的规则，如 "MergeTwoFiltersRule"
    pub disabled_rules: Vec<String>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_iteration_rounds: 10,
            disabled_rules: Vec::new(),
        }
    }
}

impl OptimizerConfig {
    pub fn validate(&self) -> OptimizerResult<()> {
        if self.max_iteration_rounds == 0 {
            return Err(OptimizerError::config("max_iteration_rounds 必须大于 0"));
        }
        Ok(())
    }
}

/// 日志配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub dir: String,
    pub file: String,
    pub max_file_size: u64,
    pub max_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: "logs".to_string(),
            file: "sqlrewrite".to_string(),
            max_file_size: 100 * 1024 * 1024, // 100MB
            max_files: 5,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub optimizer: OptimizerConfig,
    pub log: LogConfig,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> OptimizerResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> OptimizerResult<Self> {
        let config: Config = toml::from_str(content)?;
        config.optimizer.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> OptimizerResult<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.optimizer.max_iteration_rounds, 10);
        assert!(config.optimizer.disabled_rules.is_empty());
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_config_load_save() {
        let temp_file = NamedTempFile::new().expect("创建临时文件失败");

        let mut config = Config::default();
        config.optimizer.max_iteration_rounds = 3;
        config.optimizer.disabled_rules = vec!["MergeTwoFiltersRule".to_string()];
        config.save(temp_file.path()).expect("保存配置失败");

        let loaded = Config::load(temp_file.path()).expect("加载配置失败");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let mut temp_file = NamedTempFile::new().expect("创建临时文件失败");
        temp_file
            .write_all(b"[optimizer]\ndisabled_rules = [\"PruneScanColumnsRule\"]\n")
            .expect("写入临时文件失败");

        let config = Config::load(temp_file.path()).expect("加载配置失败");
        assert_eq!(config.optimizer.max_iteration_rounds, 10);
        assert_eq!(config.optimizer.disabled_rules, vec!["PruneScanColumnsRule"]);
        assert_eq!(config.log, LogConfig::default());
    }

    #[test]
    fn test_zero_rounds_rejected() {
        let err = Config::from_toml_str("[optimizer]\nmax_iteration_rounds = 0\n")
            .expect_err("0 轮应被拒绝");
        assert!(matches!(err, OptimizerError::Config(_)));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let err = Config::from_toml_str("[optimizer\n").expect_err("格式错误应被拒绝");
        assert!(matches!(err, OptimizerError::Config(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Config::load("/nonexistent/sqlrewrite.toml").expect_err("文件不存在应报错");
        assert!(matches!(err, OptimizerError::Io(_)));
    }
}
