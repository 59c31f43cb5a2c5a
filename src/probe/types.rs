//! 探针相关数据类型定义

use chrono::{DateTime, Local, TimeZone};
use serde::Deserialize;

/// 已安装的发行包（由目标解释器报告）
#[derive(Debug, Clone, PartialEq)]
pub struct PackageRecord {
    pub name: String,
    pub version: String,
    /// 所有文件大小之和，无法确定时为 0
    pub size_bytes: u64,
    /// 仅用于展示，例如 "1.25 MB" / "unknown"
    pub size_display: String,
    /// 最新的文件修改时间，没有可用文件时为 None
    pub installed_at: Option<DateTime<Local>>,
    /// 仅用于展示，例如 "2024-05-01 12:30" / "unknown"
    pub installed_display: String,
}

/// 探针脚本输出的单个 JSON 对象
///
/// 正常条目与 `{"error": ...}` 共用同一结构，字段缺失时取默认值。
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ProbeEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub raw_size: u64,
    #[serde(default)]
    pub raw_mtime: Option<f64>,
    #[serde(default)]
    pub error: Option<String>,
}

impl From<ProbeEntry> for PackageRecord {
    fn from(entry: ProbeEntry) -> Self {
        let installed_at = entry.raw_mtime.and_then(timestamp_from_epoch);
        Self {
            name: entry.name,
            version: entry.version,
            size_bytes: entry.raw_size,
            size_display: entry.size,
            installed_at,
            installed_display: entry.date,
        }
    }
}

/// 0 或负数表示探针没有取到修改时间
fn timestamp_from_epoch(secs: f64) -> Option<DateTime<Local>> {
    if !secs.is_finite() || secs <= 0.0 {
        return None;
    }
    let whole = secs.trunc() as i64;
    let nanos = ((secs - secs.trunc()) * 1e9) as u32;
    Local.timestamp_opt(whole, nanos).single()
}

/// 探针执行失败
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("无法启动解释器: {0}")]
    Launch(#[from] std::io::Error),

    #[error("执行失败 (exit={code:?}): {stderr}")]
    Exit { code: Option<i32>, stderr: String },

    #[error("未返回数据 (no data returned){detail}")]
    NoData { detail: String },

    #[error("输出解析失败: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("探针错误: {0}")]
    Reported(String),
}

impl ProbeError {
    /// stdout 为空；stderr 若有内容则附在消息后面
    pub fn no_data(stderr: &str) -> Self {
        let stderr = stderr.trim();
        let detail = if stderr.is_empty() {
            String::new()
        } else {
            format!(": {stderr}")
        };
        Self::NoData { detail }
    }
}

/// 成功时为按名称排序的包列表，失败时为单个错误
pub type ProbeResult = Result<Vec<PackageRecord>, ProbeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_mtime_means_no_timestamp() {
        let entry = ProbeEntry {
            name: "six".into(),
            raw_mtime: None,
            ..Default::default()
        };
        assert!(PackageRecord::from(entry).installed_at.is_none());
        assert!(timestamp_from_epoch(0.0).is_none());
        assert!(timestamp_from_epoch(f64::NAN).is_none());
    }

    #[test]
    fn epoch_seconds_become_local_timestamp() {
        let ts = timestamp_from_epoch(1_700_000_000.5).expect("valid timestamp");
        assert_eq!(ts.timestamp(), 1_700_000_000);
        assert_eq!(ts.timestamp_subsec_millis(), 500);
    }

    #[test]
    fn no_data_keeps_stderr_for_diagnosis() {
        assert_eq!(ProbeError::no_data("  ").to_string(), "未返回数据 (no data returned)");
        let msg = ProbeError::no_data("Fatal Python error\n").to_string();
        assert!(msg.starts_with("未返回数据"));
        assert!(msg.ends_with("Fatal Python error"));
    }

    #[test]
    fn exit_error_message_carries_stderr() {
        let err = ProbeError::Exit {
            code: Some(1),
            stderr: "Traceback: boom".into(),
        };
        assert!(err.to_string().contains("Traceback: boom"));
    }
}
