use super::input::InputBox;
use crate::config::Config;
use crate::controller::{Controller, ProbeApplied, SortKey};
use crate::pip::{CommandOutcome, PipOperation, PipRunner};
use crate::probe::PackageRecord;
use crate::worker::{self, AppEvent, LookupPool};
use std::path::PathBuf;
use std::time::Instant;
use tokio::sync::mpsc;

/// 选中项变化后延迟多久再发起在线查询
pub const DETAIL_DEBOUNCE_MS: u128 = 250;

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    /// `/` 过滤库名
    Search,
    /// `i` 输入要安装的包名
    Install,
    /// `e` 修改解释器路径
    EditPath,
    /// 破坏性操作执行前确认
    Confirm(PipOperation),
    /// 查看失败输出
    Output,
}

/// 状态栏提示的级别
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatusLevel {
    Info,
    Ok,
    Error,
}

pub struct App {
    pub controller: Controller,
    pub config: Config,
    pub mode: InputMode,
    pub selected: usize,
    pub search: InputBox,
    pub install_input: InputBox,
    pub path_input: InputBox,
    pub status: String,
    pub status_level: StatusLevel,
    pub detail: String,
    pub detail_seq: u64,
    pub detail_scheduled: Option<Instant>,
    pub output_title: String,
    pub output_lines: Vec<String>,
    pub output_scroll: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(interpreter: PathBuf, config: Config) -> Self {
        Self {
            controller: Controller::new(interpreter),
            config,
            mode: InputMode::Normal,
            selected: 0,
            search: InputBox::new(),
            install_input: InputBox::new(),
            path_input: InputBox::new(),
            status: "就绪".to_string(),
            status_level: StatusLevel::Info,
            detail: String::new(),
            detail_seq: 0,
            detail_scheduled: None,
            output_title: String::new(),
            output_lines: Vec::new(),
            output_scroll: 0,
            should_quit: false,
        }
    }

    pub fn set_status(&mut self, level: StatusLevel, msg: impl Into<String>) {
        self.status = msg.into();
        self.status_level = level;
    }

    // ===== 选择 =====

    pub fn visible_len(&self) -> usize {
        self.controller.visible_len()
    }

    pub fn selected_package(&self) -> Option<PackageRecord> {
        self.controller.visible_at(self.selected).cloned()
    }

    pub fn select_prev(&mut self, step: usize) {
        let before = self.selected;
        self.selected = self.selected.saturating_sub(step);
        if before != self.selected {
            self.schedule_detail();
        }
    }

    pub fn select_next(&mut self, step: usize) {
        let max = self.visible_len().saturating_sub(1);
        let before = self.selected;
        self.selected = (self.selected + step).min(max);
        if before != self.selected {
            self.schedule_detail();
        }
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
        self.schedule_detail();
    }

    pub fn select_last(&mut self) {
        self.selected = self.visible_len().saturating_sub(1);
        self.schedule_detail();
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    // ===== 过滤与排序 =====

    pub fn apply_filter(&mut self) {
        self.controller.set_filter(self.search.content());
        self.selected = 0;
        self.schedule_detail();
    }

    /// 排序后保持选中同一个包
    pub fn sort_by(&mut self, key: SortKey) {
        let current = self.selected_package().map(|p| p.name);
        self.controller.sort_by(key);
        if let Some(name) = current {
            if let Some(idx) = self.controller.visible().position(|p| p.name == name) {
                self.selected = idx;
            }
        }
    }

    // ===== 在线简介 =====

    pub fn schedule_detail(&mut self) {
        self.detail_scheduled = Some(Instant::now());
    }

    /// 防抖时间到后发起查询；返回是否已发起
    pub fn fire_pending_detail(&mut self, tx: &mpsc::Sender<AppEvent>, lookups: &LookupPool) -> bool {
        let Some(scheduled) = self.detail_scheduled else {
            return false;
        };
        if scheduled.elapsed().as_millis() < DETAIL_DEBOUNCE_MS {
            return false;
        }
        self.detail_scheduled = None;
        self.detail_seq += 1;
        match self.selected_package() {
            Some(pkg) => {
                self.detail = "Loading...".to_string();
                lookups.spawn(tx, pkg.name, self.detail_seq);
                true
            }
            None => {
                self.detail.clear();
                false
            }
        }
    }

    // ===== 探测 / 命令 =====

    /// 重新扫描目标环境；当前列表在新结果到达前保持不变
    pub fn request_refresh(&mut self, tx: &mpsc::Sender<AppEvent>) {
        match self.controller.begin_probe() {
            Ok(ticket) => {
                self.set_status(
                    StatusLevel::Info,
                    format!("正在扫描环境: {} ...", ticket.interpreter.display()),
                );
                worker::spawn_probe(tx, ticket);
            }
            Err(e) => self.set_status(StatusLevel::Error, e.to_string()),
        }
    }

    /// 用户发起的操作入口；破坏性操作先进入确认
    pub fn submit_command(&mut self, op: PipOperation, tx: &mpsc::Sender<AppEvent>) {
        if op.is_destructive() {
            self.mode = InputMode::Confirm(op);
        } else {
            self.mode = InputMode::Normal;
            self.request_command(op, tx);
        }
    }

    pub fn request_command(&mut self, op: PipOperation, tx: &mpsc::Sender<AppEvent>) {
        match self.controller.begin_command(op.clone()) {
            Ok(interpreter) => {
                self.set_status(StatusLevel::Info, format!("正在执行: {} ...", op.label()));
                let runner = PipRunner::new(interpreter).with_module(self.config.package_manager.clone());
                worker::spawn_command(tx, runner, op);
            }
            Err(e) => self.set_status(StatusLevel::Error, e.to_string()),
        }
    }

    /// 切换解释器后立即重新扫描
    pub fn change_interpreter(&mut self, path: PathBuf, tx: &mpsc::Sender<AppEvent>) {
        self.controller.set_interpreter(path);
        self.request_refresh(tx);
    }

    // ===== 后台事件 =====

    pub fn handle_event(&mut self, event: AppEvent, tx: &mpsc::Sender<AppEvent>) {
        match event {
            AppEvent::ProbeFinished { generation, result } => {
                match self.controller.complete_probe(generation, result) {
                    ProbeApplied::Replaced(count) => {
                        self.clamp_selection();
                        self.schedule_detail();
                        self.set_status(StatusLevel::Ok, format!("就绪。共找到 {count} 个库。"));
                    }
                    ProbeApplied::Failed(msg) => {
                        self.set_status(StatusLevel::Error, "扫描失败");
                        self.show_output("扫描失败", &msg);
                    }
                    ProbeApplied::Stale => {}
                }
            }
            AppEvent::CommandFinished { operation, outcome } => {
                self.controller.finish_command();
                self.on_command_done(&operation, outcome, tx);
            }
            AppEvent::DetailLoaded { seq, text, .. } => {
                if seq == self.detail_seq {
                    self.detail = text;
                }
            }
        }
    }

    fn on_command_done(
        &mut self,
        operation: &PipOperation,
        outcome: CommandOutcome,
        tx: &mpsc::Sender<AppEvent>,
    ) {
        if outcome.success {
            self.set_status(StatusLevel::Ok, outcome.message);
            if matches!(operation, PipOperation::Install(_)) {
                self.install_input.clear();
            }
            self.request_refresh(tx);
        } else {
            self.set_status(StatusLevel::Error, outcome.message.clone());
            self.show_output(&outcome.message, &outcome.combined_output);
        }
    }

    pub fn show_output(&mut self, title: &str, text: &str) {
        self.output_title = title.to_string();
        self.output_lines = text.lines().map(str::to_string).collect();
        self.output_scroll = 0;
        self.mode = InputMode::Output;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::ProbeError;

    fn record(name: &str) -> PackageRecord {
        PackageRecord {
            name: name.to_string(),
            version: "1.0".to_string(),
            size_bytes: 0,
            size_display: "0.00 MB".to_string(),
            installed_at: None,
            installed_display: "unknown".to_string(),
        }
    }

    fn app_with(names: &[&str]) -> (App, tempfile::NamedTempFile) {
        let file = tempfile::NamedTempFile::new().expect("tempfile");
        let mut app = App::new(file.path().to_path_buf(), Config::default());
        let ticket = app.controller.begin_probe().expect("probe");
        let (tx, _rx) = mpsc::channel(4);
        app.handle_event(
            AppEvent::ProbeFinished {
                generation: ticket.generation,
                result: Ok(names.iter().map(|n| record(n)).collect()),
            },
            &tx,
        );
        (app, file)
    }

    #[test]
    fn probe_success_updates_status_and_list() {
        let (app, _file) = app_with(&["alpha", "Beta"]);
        assert_eq!(app.visible_len(), 2);
        assert_eq!(app.status_level, StatusLevel::Ok);
        assert!(app.status.contains('2'));
    }

    #[test]
    fn probe_failure_opens_output_and_keeps_list() {
        let (mut app, _file) = app_with(&["alpha"]);
        let ticket = app.controller.begin_probe().expect("probe");
        let (tx, _rx) = mpsc::channel(4);
        app.handle_event(
            AppEvent::ProbeFinished {
                generation: ticket.generation,
                result: Err(ProbeError::no_data("")),
            },
            &tx,
        );
        assert_eq!(app.mode, InputMode::Output);
        assert_eq!(app.status_level, StatusLevel::Error);
        assert_eq!(app.visible_len(), 1);
    }

    #[test]
    fn failed_command_shows_combined_output() {
        let (mut app, _file) = app_with(&["alpha"]);
        let (tx, _rx) = mpsc::channel(4);
        app.controller.begin_command(PipOperation::Install("nope".into())).expect("begin");
        app.handle_event(
            AppEvent::CommandFinished {
                operation: PipOperation::Install("nope".into()),
                outcome: CommandOutcome {
                    success: false,
                    message: "安装 nope 失败".into(),
                    combined_output: "\nERROR: No matching distribution found for nope\n".into(),
                },
            },
            &tx,
        );
        assert!(app.controller.command_in_flight().is_none());
        assert_eq!(app.mode, InputMode::Output);
        assert!(app.output_lines.iter().any(|l| l.contains("No matching distribution")));
    }

    #[test]
    fn stale_detail_is_ignored() {
        let (mut app, _file) = app_with(&["alpha"]);
        let (tx, _rx) = mpsc::channel(4);
        app.detail_seq = 5;
        app.detail = "current".into();
        app.handle_event(
            AppEvent::DetailLoaded {
                seq: 4,
                name: "alpha".into(),
                text: "old".into(),
            },
            &tx,
        );
        assert_eq!(app.detail, "current");
    }

    #[test]
    fn sorting_keeps_the_selected_package() {
        let (mut app, _file) = app_with(&["alpha", "Beta", "gamma"]);
        app.selected = 0;
        app.sort_by(SortKey::Name);
        assert_eq!(app.selected_package().map(|p| p.name), Some("alpha".to_string()));
        assert_eq!(app.selected, 2);
    }

    #[test]
    fn uninstall_waits_for_confirmation() {
        let (mut app, _file) = app_with(&["six"]);
        let (tx, _rx) = mpsc::channel(4);
        app.submit_command(PipOperation::Uninstall("six".into()), &tx);
        assert_eq!(app.mode, InputMode::Confirm(PipOperation::Uninstall("six".into())));
        assert!(app.controller.command_in_flight().is_none());
    }

    #[test]
    fn switching_to_bad_path_drops_running_scan() {
        let (mut app, _file) = app_with(&["keep"]);
        let ticket = app.controller.begin_probe().expect("probe");
        let (tx, _rx) = mpsc::channel(4);
        app.change_interpreter(PathBuf::from("/no/such/python"), &tx);
        assert_eq!(app.status_level, StatusLevel::Error);

        app.handle_event(
            AppEvent::ProbeFinished {
                generation: ticket.generation,
                result: Ok(vec![record("from-old"), record("other")]),
            },
            &tx,
        );
        assert_eq!(app.visible_len(), 1);
        assert_eq!(app.selected_package().map(|p| p.name), Some("keep".to_string()));
    }

    #[test]
    fn filter_resets_selection() {
        let (mut app, _file) = app_with(&["alpha", "Beta", "gamma"]);
        app.selected = 2;
        app.search = InputBox::with_content("bet");
        app.apply_filter();
        assert_eq!(app.selected, 0);
        assert_eq!(app.selected_package().map(|p| p.name), Some("Beta".to_string()));
    }
}
