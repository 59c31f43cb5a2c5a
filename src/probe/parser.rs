//! 探针输出解析

use super::types::{PackageRecord, ProbeEntry, ProbeError};

/// 解析探针的 stdout。
///
/// 空输出、非法 JSON、首个元素带 `error` 字段都视为失败；
/// 成功时按名称（忽略大小写）稳定排序。
pub fn parse_probe_output(stdout: &str) -> Result<Vec<PackageRecord>, ProbeError> {
    let raw = stdout.trim();
    if raw.is_empty() {
        return Err(ProbeError::no_data(""));
    }

    let entries: Vec<ProbeEntry> = serde_json::from_str(raw)?;

    if let Some(message) = entries.first().and_then(|e| e.error.clone()) {
        return Err(ProbeError::Reported(message));
    }

    let mut records: Vec<PackageRecord> = entries.into_iter().map(PackageRecord::from).collect();
    sort_by_name(&mut records);
    Ok(records)
}

/// 名称升序，忽略大小写；相同名称保持原顺序
pub fn sort_by_name(records: &mut [PackageRecord]) {
    records.sort_by_cached_key(|r| r.name.to_lowercase());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_output_is_no_data() {
        assert!(matches!(parse_probe_output(""), Err(ProbeError::NoData { .. })));
        assert!(matches!(parse_probe_output("  \n\t "), Err(ProbeError::NoData { .. })));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        assert!(matches!(
            parse_probe_output("Traceback (most recent call last):"),
            Err(ProbeError::Parse(_))
        ));
        assert!(matches!(
            parse_probe_output(r#"{"name": "x"}"#),
            Err(ProbeError::Parse(_))
        ));
    }

    #[test]
    fn error_entry_is_reported() {
        let out = r#"[{"error": "No module named 'importlib.metadata'"}]"#;
        match parse_probe_output(out) {
            Err(ProbeError::Reported(msg)) => {
                assert_eq!(msg, "No module named 'importlib.metadata'")
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn records_are_sorted_case_insensitively() {
        let out = r#"[
            {"name": "Beta", "version": "2.0", "size": "0.49 MB", "date": "2024-01-02 10:00", "raw_size": 512000, "raw_mtime": 1704189600.0},
            {"name": "alpha", "version": "1.0", "size": "2.00 MB", "date": "2024-01-01 10:00", "raw_size": 2097152, "raw_mtime": 1704103200.0},
            {"name": "Zeta", "version": "0.1", "size": "n/a", "date": "n/a", "raw_size": 0, "raw_mtime": 0}
        ]"#;
        let records = parse_probe_output(out).expect("parse");
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["alpha", "Beta", "Zeta"]);
        assert_eq!(records[0].size_bytes, 2_097_152);
        assert_eq!(records[1].size_bytes, 512_000);
        assert_eq!(records[0].size_display, "2.00 MB");
        assert!(records[0].installed_at.is_some());
        assert!(records[2].installed_at.is_none());
    }

    #[test]
    fn equal_names_keep_original_order() {
        let out = r#"[
            {"name": "Dup", "version": "1"},
            {"name": "aaa", "version": "0"},
            {"name": "dup", "version": "2"}
        ]"#;
        let records = parse_probe_output(out).expect("parse");
        let versions: Vec<&str> = records.iter().map(|r| r.version.as_str()).collect();
        assert_eq!(versions, ["0", "1", "2"]);
    }

    #[test]
    fn output_without_mtime_field_still_parses() {
        let out = r#"[{"name": "six", "version": "1.16.0", "size": "0.03 MB", "date": "2023-05-01 09:00", "raw_size": 34000}]"#;
        let records = parse_probe_output(out).expect("parse");
        assert_eq!(records.len(), 1);
        assert!(records[0].installed_at.is_none());
        assert_eq!(records[0].installed_display, "2023-05-01 09:00");
    }

    #[test]
    fn empty_array_is_empty_environment() {
        let records = parse_probe_output("[]\n").expect("parse");
        assert!(records.is_empty());
    }
}
