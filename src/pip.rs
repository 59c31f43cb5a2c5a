//! 包管理器命令 — 通过 `<interpreter> -m pip ...` 安装 / 卸载 / 升级

use crate::process::{self, ProcessOptions};
use std::path::{Path, PathBuf};

pub const DEFAULT_PACKAGE_MANAGER: &str = "pip";

/// 命令执行结果
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutcome {
    pub success: bool,
    /// 简短描述，例如 "安装 requests 成功"
    pub message: String,
    /// stdout + stderr，用于诊断显示
    pub combined_output: String,
}

/// 预定义的包管理操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipOperation {
    Install(String),
    Uninstall(String),
    UpgradePip,
}

impl PipOperation {
    pub fn args(&self) -> Vec<String> {
        match self {
            Self::Install(name) => vec!["install".into(), name.clone()],
            Self::Uninstall(name) => vec!["uninstall".into(), name.clone(), "-y".into()],
            Self::UpgradePip => vec!["install".into(), "--upgrade".into(), "pip".into()],
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Install(name) => format!("安装 {name}"),
            Self::Uninstall(name) => format!("卸载 {name}"),
            Self::UpgradePip => "升级 pip".to_string(),
        }
    }

    /// 卸载需要先经过用户确认
    pub fn is_destructive(&self) -> bool {
        matches!(self, Self::Uninstall(_))
    }
}

/// 针对某个目标解释器的包管理器封装
#[derive(Debug, Clone)]
pub struct PipRunner {
    pub interpreter: PathBuf,
    /// 通过 `-m` 运行的模块名
    pub module: String,
}

impl PipRunner {
    pub fn new(interpreter: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
            module: DEFAULT_PACKAGE_MANAGER.to_string(),
        }
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    pub fn execute(&self, op: &PipOperation) -> CommandOutcome {
        self.run(&op.label(), &op.args())
    }

    /// 执行任意参数序列；`label` 用于生成结果描述
    pub fn run(&self, label: &str, args: &[String]) -> CommandOutcome {
        let mut full_args = vec!["-m".to_string(), self.module.clone()];
        full_args.extend(args.iter().cloned());

        match process::run_captured(&self.interpreter, &full_args, &ProcessOptions::default()) {
            Ok(output) => {
                let success = output.success();
                let message = format!("{} {}", label, if success { "成功" } else { "失败" });
                if success {
                    log::info!("{message}");
                } else {
                    log::warn!("{message} (exit={:?})", output.exit_code);
                }
                CommandOutcome {
                    success,
                    message,
                    combined_output: output.combined_output(),
                }
            }
            Err(e) => {
                log::warn!("{label}: 无法启动 {}: {e}", self.interpreter.display());
                let text = e.to_string();
                CommandOutcome {
                    success: false,
                    message: text.clone(),
                    combined_output: text,
                }
            }
        }
    }
}

/// 以默认包管理器 (pip) 执行一条命令
pub fn run_package_manager_command(interpreter: &Path, args: &[String]) -> CommandOutcome {
    let label = format!("{} {}", DEFAULT_PACKAGE_MANAGER, args.join(" "));
    PipRunner::new(interpreter).run(label.trim_end(), args)
}
