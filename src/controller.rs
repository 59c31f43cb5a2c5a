//! 界面状态容器
//!
//! 目标解释器路径、当前包列表、进行中的操作都归 `Controller` 所有，
//! 由 UI 线程独占；后台任务只通过事件把结果交回来。

use crate::interpreter::{self, InterpreterError};
use crate::pip::PipOperation;
use crate::probe::{PackageRecord, ProbeResult};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Version,
    Size,
    InstalledAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub key: SortKey,
    pub descending: bool,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            key: SortKey::Name,
            descending: false,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ControllerError {
    #[error(transparent)]
    Interpreter(#[from] InterpreterError),
    #[error("{0} 正在进行中，请稍候")]
    Busy(String),
}

/// 一次探测请求；完成时凭 generation 判断结果是否过期
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeTicket {
    pub generation: u64,
    pub interpreter: PathBuf,
}

/// 探测结果的处理方式
#[derive(Debug, PartialEq)]
pub enum ProbeApplied {
    /// 列表已整体替换，附带包数量
    Replaced(usize),
    /// 最新一次探测失败，旧列表保持不变
    Failed(String),
    /// 已有更新的探测请求，结果被丢弃
    Stale,
}

#[derive(Debug)]
pub struct Controller {
    interpreter: PathBuf,
    packages: Arc<[PackageRecord]>,
    generation: u64,
    probing: bool,
    command: Option<PipOperation>,
    sort: SortState,
    filter: String,
    /// 过滤并排序后的下标，列表 / 排序 / 过滤变化时重建
    view: Vec<usize>,
}

impl Controller {
    pub fn new(interpreter: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
            packages: Arc::from(Vec::new()),
            generation: 0,
            probing: false,
            command: None,
            sort: SortState::default(),
            filter: String::new(),
            view: Vec::new(),
        }
    }

    pub fn interpreter(&self) -> &Path {
        &self.interpreter
    }

    /// 切换目标解释器；针对旧路径仍在进行的探测一律作废
    pub fn set_interpreter(&mut self, path: impl Into<PathBuf>) {
        self.interpreter = path.into();
        self.generation += 1;
        self.probing = false;
    }

    pub fn packages(&self) -> Arc<[PackageRecord]> {
        Arc::clone(&self.packages)
    }

    pub fn is_probing(&self) -> bool {
        self.probing
    }

    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    // ===== 探测 =====

    /// 登记一次新的探测；之前未完成的探测随之作废
    pub fn begin_probe(&mut self) -> Result<ProbeTicket, ControllerError> {
        interpreter::validate(&self.interpreter)?;
        self.generation += 1;
        self.probing = true;
        Ok(ProbeTicket {
            generation: self.generation,
            interpreter: self.interpreter.clone(),
        })
    }

    pub fn complete_probe(&mut self, generation: u64, result: ProbeResult) -> ProbeApplied {
        if generation != self.generation {
            log::warn!(
                "丢弃过期的探测结果 (generation {} < {})",
                generation,
                self.generation
            );
            return ProbeApplied::Stale;
        }
        self.probing = false;
        match result {
            Ok(records) => {
                let count = records.len();
                self.packages = Arc::from(records);
                self.rebuild_view();
                ProbeApplied::Replaced(count)
            }
            Err(e) => ProbeApplied::Failed(e.to_string()),
        }
    }

    // ===== 包管理命令 =====

    /// 同一时间只允许一条命令
    pub fn begin_command(&mut self, op: PipOperation) -> Result<PathBuf, ControllerError> {
        if let Some(running) = &self.command {
            return Err(ControllerError::Busy(running.label()));
        }
        interpreter::validate(&self.interpreter)?;
        self.command = Some(op);
        Ok(self.interpreter.clone())
    }

    pub fn finish_command(&mut self) -> Option<PipOperation> {
        self.command.take()
    }

    pub fn command_in_flight(&self) -> Option<&PipOperation> {
        self.command.as_ref()
    }

    // ===== 排序与过滤 =====

    /// 同一列再次选择时切换升降序
    pub fn sort_by(&mut self, key: SortKey) {
        if self.sort.key == key {
            self.sort.descending = !self.sort.descending;
        } else {
            self.sort = SortState {
                key,
                descending: false,
            };
        }
        self.rebuild_view();
    }

    pub fn set_filter(&mut self, query: impl Into<String>) {
        self.filter = query.into();
        self.rebuild_view();
    }

    /// 当前过滤条件下、按当前排序方式排列的包
    pub fn visible(&self) -> impl Iterator<Item = &PackageRecord> + '_ {
        self.view.iter().map(move |&i| &self.packages[i])
    }

    pub fn visible_len(&self) -> usize {
        self.view.len()
    }

    pub fn visible_at(&self, row: usize) -> Option<&PackageRecord> {
        self.view.get(row).map(move |&i| &self.packages[i])
    }

    fn rebuild_view(&mut self) {
        let query = self.filter.trim().to_lowercase();
        let packages = &self.packages;
        let mut view: Vec<usize> = (0..packages.len())
            .filter(|&i| query.is_empty() || packages[i].name.to_lowercase().contains(&query))
            .collect();

        let sort = self.sort;
        view.sort_by(|&a, &b| {
            let ord = compare(&packages[a], &packages[b], sort.key);
            if sort.descending {
                ord.reverse()
            } else {
                ord
            }
        });
        self.view = view;
    }
}

fn compare(a: &PackageRecord, b: &PackageRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortKey::Version => compare_versions(&a.version, &b.version),
        SortKey::Size => a.size_bytes.cmp(&b.size_bytes),
        SortKey::InstalledAt => a.installed_at.cmp(&b.installed_at),
    }
}

/// 逐段比较版本号，两段都是数字时按数值比较，否则按字符串比较
fn compare_versions(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = match (x.parse::<u64>(), y.parse::<u64>()) {
                    (Ok(nx), Ok(ny)) => nx.cmp(&ny),
                    _ => x.cmp(y),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}
