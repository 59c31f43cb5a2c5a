//! 目标解释器的选择与校验

use crate::config::Config;
use std::path::{Path, PathBuf};
use std::process::Command;

pub const PYTHON_ENV_VAR: &str = "PYLIB_PYTHON";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum InterpreterError {
    #[error("未设置 Python 解释器路径")]
    Empty,
    #[error("无效的 Python 路径: {0}")]
    NotFound(PathBuf),
    #[error("路径不是可执行文件: {0}")]
    NotAFile(PathBuf),
}

/// 确定默认目标解释器
///
/// 优先级：命令行参数 > 配置文件 > 环境变量 PYLIB_PYTHON > PATH 中的 python3 / python
pub fn resolve(cli_arg: Option<PathBuf>, config: &Config) -> Option<PathBuf> {
    let from_env = std::env::var(PYTHON_ENV_VAR).ok();
    resolve_from(cli_arg, config, from_env).or_else(detect_on_path)
}

fn resolve_from(
    cli_arg: Option<PathBuf>,
    config: &Config,
    from_env: Option<String>,
) -> Option<PathBuf> {
    cli_arg
        .or_else(|| config.python_path.clone())
        .or_else(|| from_env.filter(|s| !s.trim().is_empty()).map(PathBuf::from))
}

/// 在 PATH 中查找 python3 / python
pub fn detect_on_path() -> Option<PathBuf> {
    let finder = if cfg!(windows) { "where" } else { "which" };
    for name in ["python3", "python"] {
        let found = Command::new(finder)
            .arg(name)
            .output()
            .ok()
            .filter(|o| o.status.success())
            .and_then(|o| {
                String::from_utf8_lossy(&o.stdout)
                    .lines()
                    .map(str::trim)
                    .find(|l| !l.is_empty())
                    .map(PathBuf::from)
            });
        if let Some(path) = found {
            log::debug!("PATH 中找到解释器: {}", path.display());
            return Some(path);
        }
    }
    None
}

/// 探测 / 执行命令前的路径检查
pub fn validate(path: &Path) -> Result<(), InterpreterError> {
    if path.as_os_str().is_empty() {
        return Err(InterpreterError::Empty);
    }
    if !path.exists() {
        return Err(InterpreterError::NotFound(path.to_path_buf()));
    }
    if path.is_dir() {
        return Err(InterpreterError::NotAFile(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_argument_wins() {
        let config = Config {
            python_path: Some("/from/config".into()),
            ..Config::default()
        };
        let got = resolve_from(Some("/from/cli".into()), &config, Some("/from/env".into()));
        assert_eq!(got, Some(PathBuf::from("/from/cli")));
    }

    #[test]
    fn config_before_env() {
        let config = Config {
            python_path: Some("/from/config".into()),
            ..Config::default()
        };
        let got = resolve_from(None, &config, Some("/from/env".into()));
        assert_eq!(got, Some(PathBuf::from("/from/config")));
    }

    #[test]
    fn blank_env_is_ignored() {
        let got = resolve_from(None, &Config::default(), Some("  ".into()));
        assert_eq!(got, None);
        let got = resolve_from(None, &Config::default(), Some("/from/env".into()));
        assert_eq!(got, Some(PathBuf::from("/from/env")));
    }

    #[test]
    fn validate_rejects_missing_and_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(validate(Path::new("")), Err(InterpreterError::Empty));
        let missing = dir.path().join("python");
        assert_eq!(validate(&missing), Err(InterpreterError::NotFound(missing.clone())));
        assert_eq!(
            validate(dir.path()),
            Err(InterpreterError::NotAFile(dir.path().to_path_buf()))
        );
        std::fs::write(&missing, b"").expect("write");
        assert_eq!(validate(&missing), Ok(()));
    }
}
