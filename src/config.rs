use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 默认管理的 Python 解释器
    pub python_path: Option<PathBuf>,
    /// 通过 `-m` 调用的包管理器模块
    pub package_manager: String,
    /// PyPI 索引地址（在线简介查询）
    pub index_url: String,
    pub lookup_timeout_secs: u64,
    /// 同时进行的在线查询数量上限
    pub lookup_workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            python_path: None,
            package_manager: crate::pip::DEFAULT_PACKAGE_MANAGER.to_string(),
            index_url: "https://pypi.org".to_string(),
            lookup_timeout_secs: 3,
            lookup_workers: 4,
        }
    }
}

impl Config {
    pub fn load_or_default() -> Result<Self> {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let config_path = PathBuf::from(home).join(".config/pylib-manager/config.toml");
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content)?;
            log::debug!("已加载配置: {}", config_path.display());
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config::load_from(&dir.path().join("config.toml")).expect("load");
        assert_eq!(config.package_manager, "pip");
        assert_eq!(config.lookup_timeout_secs, 3);
        assert!(config.python_path.is_none());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "python_path = \"/opt/py/bin/python3\"\nlookup_workers = 2\n")
            .expect("write");
        let config = Config::load_from(&path).expect("load");
        assert_eq!(config.python_path, Some(PathBuf::from("/opt/py/bin/python3")));
        assert_eq!(config.lookup_workers, 2);
        assert_eq!(config.index_url, "https://pypi.org");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "lookup_workers = \"many\"").expect("write");
        assert!(Config::load_from(&path).is_err());
    }
}
