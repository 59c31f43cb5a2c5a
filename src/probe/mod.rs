//! 环境探针 — 在目标解释器内部枚举已安装的发行包
//!
//! 管理进程与目标解释器可能不是同一个 Python，因此所有内省都在
//! 目标解释器的子进程中完成，结果以 JSON 形式传回。

pub mod parser;
pub mod script;
pub mod types;

// 重新导出常用类型和函数
pub use parser::{parse_probe_output, sort_by_name};
pub use script::PROBE_SCRIPT;
pub use types::{PackageRecord, ProbeError, ProbeResult};

use crate::process::{self, ProcessOptions};
use std::path::Path;

/// 探测目标解释器中的全部发行包。
///
/// 调用方负责事先确认解释器路径存在。
pub fn probe(interpreter: &Path) -> ProbeResult {
    probe_with(interpreter, &ProcessOptions::default())
}

/// 与 [`probe`] 相同，但可为子进程附加环境变量（如 PYTHONPATH）
pub fn probe_with(interpreter: &Path, options: &ProcessOptions) -> ProbeResult {
    let output = process::run_captured(interpreter, ["-c", PROBE_SCRIPT], options)?;

    // 空输出优先于退出码判断，stderr 一并保留
    if output.stdout.trim().is_empty() {
        return Err(ProbeError::no_data(&output.stderr));
    }

    if !output.success() {
        return Err(ProbeError::Exit {
            code: output.exit_code,
            stderr: output.stderr.trim().to_string(),
        });
    }

    let records = parse_probe_output(&output.stdout)?;
    log::info!(
        "probe {}: {} 个发行包",
        interpreter.display(),
        records.len()
    );
    Ok(records)
}
