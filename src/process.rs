//! 子进程执行：probe 与 pip 共用的阻塞式调用

use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Stdio};

/// Windows 下隐藏控制台窗口 (CREATE_NO_WINDOW)
#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// 子进程附加选项
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    /// 追加到子进程环境中的变量
    pub env: Vec<(String, String)>,
}

impl ProcessOptions {
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

/// 子进程输出（已按 UTF-8 宽松解码）
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// 被信号终止时为 None
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// 以目标解释器为程序，阻塞运行并捕获 stdout / stderr。
///
/// 非法字节以 U+FFFD 替换，不会因解码失败而报错。
/// 只有进程无法启动时才返回 Err。
pub fn run_captured<I, S>(
    program: &Path,
    args: I,
    options: &ProcessOptions,
) -> std::io::Result<ProcessOutput>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    for (k, v) in &options.env {
        cmd.env(k, v);
    }

    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        cmd.creation_flags(CREATE_NO_WINDOW);
    }

    log::debug!("spawn: {}", program.display());
    let output = cmd.output()?;

    Ok(ProcessOutput {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}
