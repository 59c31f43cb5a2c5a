mod dialog;
pub mod input;
mod layout;
pub mod state;
mod table;
mod theme;

use crate::config::Config;
use crate::controller::SortKey;
use crate::pip::PipOperation;
use crate::pypi::PypiClient;
use crate::worker::{AppEvent, LookupPool};
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use input::InputBox;
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use state::{App, InputMode};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

const PAGE: usize = 10;

pub async fn run(interpreter: PathBuf, config: Config) -> Result<()> {
    let client = PypiClient::new(
        &config.index_url,
        Duration::from_secs(config.lookup_timeout_secs),
    )?;
    let lookups = LookupPool::new(client, config.lookup_workers);

    // 终端初始化
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(interpreter, config);
    let (tx, mut rx) = mpsc::channel(32);

    // 启动即扫描一次
    if app.controller.interpreter().as_os_str().is_empty() {
        app.path_input = InputBox::new();
        app.mode = InputMode::EditPath;
        app.set_status(state::StatusLevel::Error, "未找到Python，请手动输入解释器路径");
    } else {
        app.request_refresh(&tx);
    }

    // 主循环
    let result: Result<()> = loop {
        app.fire_pending_detail(&tx, &lookups);

        if let Err(e) = terminal.draw(|f| ui(f, &app)) {
            break Err(e.into());
        }

        match event::poll(Duration::from_millis(100)) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    handle_key(key, &mut app, &tx);
                }
                Ok(_) => {}
                Err(e) => break Err(e.into()),
            },
            Ok(false) => {}
            Err(e) => break Err(e.into()),
        }

        // 处理后台事件
        while let Ok(event) = rx.try_recv() {
            app.handle_event(event, &tx);
        }

        if app.should_quit {
            break Ok(());
        }
    };

    // 恢复终端
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn ui(f: &mut Frame, app: &App) {
    table::render_main(f, app);
    dialog::render_overlay(f, app);
}

/// 按键分发
pub fn handle_key(key: KeyEvent, app: &mut App, tx: &mpsc::Sender<AppEvent>) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.mode.clone() {
        InputMode::Normal => handle_normal_key(key, app, tx),
        InputMode::Search => handle_search_key(key, app),
        InputMode::Install => handle_install_key(key, app, tx),
        InputMode::EditPath => handle_path_key(key, app, tx),
        InputMode::Confirm(op) => handle_confirm_key(key, app, tx, op),
        InputMode::Output => handle_output_key(key, app),
    }
}

fn handle_normal_key(key: KeyEvent, app: &mut App, tx: &mpsc::Sender<AppEvent>) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(1),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(1),
        KeyCode::PageUp => app.select_prev(PAGE),
        KeyCode::PageDown => app.select_next(PAGE),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),
        KeyCode::Char('/') => app.mode = InputMode::Search,
        KeyCode::Char('i') => app.mode = InputMode::Install,
        KeyCode::Char('e') => {
            let current = app.controller.interpreter().display().to_string();
            app.path_input = InputBox::with_content(&current);
            app.mode = InputMode::EditPath;
        }
        KeyCode::Char('u') | KeyCode::Delete => {
            if let Some(pkg) = app.selected_package() {
                app.submit_command(PipOperation::Uninstall(pkg.name), tx);
            }
        }
        KeyCode::Char('p') => app.submit_command(PipOperation::UpgradePip, tx),
        KeyCode::Char('r') | KeyCode::F(5) => app.request_refresh(tx),
        KeyCode::Char('o') => {
            if !app.output_lines.is_empty() {
                app.mode = InputMode::Output;
            }
        }
        KeyCode::Char('1') => app.sort_by(SortKey::Name),
        KeyCode::Char('2') => app.sort_by(SortKey::Version),
        KeyCode::Char('3') => app.sort_by(SortKey::Size),
        KeyCode::Char('4') => app.sort_by(SortKey::InstalledAt),
        _ => {}
    }
}

/// 编辑类按键（插入 / 删除 / 光标移动）；返回内容是否变化
fn edit_input(input: &mut InputBox, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char(c) => {
            if key.modifiers.contains(KeyModifiers::CONTROL)
                || key.modifiers.contains(KeyModifiers::ALT)
            {
                return false;
            }
            input.insert(c);
            true
        }
        KeyCode::Backspace => {
            input.delete_back();
            true
        }
        KeyCode::Delete => {
            input.delete_forward();
            true
        }
        KeyCode::Left => {
            input.move_left();
            false
        }
        KeyCode::Right => {
            input.move_right();
            false
        }
        KeyCode::Home => {
            input.move_home();
            false
        }
        KeyCode::End => {
            input.move_end();
            false
        }
        _ => false,
    }
}

fn handle_search_key(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => app.mode = InputMode::Normal,
        KeyCode::Up => app.select_prev(1),
        KeyCode::Down => app.select_next(1),
        _ => {
            if edit_input(&mut app.search, key) {
                app.apply_filter();
            }
        }
    }
}

fn handle_install_key(key: KeyEvent, app: &mut App, tx: &mpsc::Sender<AppEvent>) {
    match key.code {
        KeyCode::Esc => app.mode = InputMode::Normal,
        KeyCode::Enter => {
            let name = app.install_input.content().trim().to_string();
            if name.is_empty() {
                return;
            }
            app.submit_command(PipOperation::Install(name), tx);
        }
        _ => {
            edit_input(&mut app.install_input, key);
        }
    }
}

fn handle_path_key(key: KeyEvent, app: &mut App, tx: &mpsc::Sender<AppEvent>) {
    match key.code {
        KeyCode::Esc => app.mode = InputMode::Normal,
        KeyCode::Enter => {
            let path = app.path_input.content().trim().to_string();
            app.mode = InputMode::Normal;
            app.change_interpreter(PathBuf::from(path), tx);
        }
        _ => {
            edit_input(&mut app.path_input, key);
        }
    }
}

fn handle_confirm_key(key: KeyEvent, app: &mut App, tx: &mpsc::Sender<AppEvent>, op: PipOperation) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            app.mode = InputMode::Normal;
            app.request_command(op, tx);
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.mode = InputMode::Normal;
        }
        _ => {}
    }
}

fn handle_output_key(key: KeyEvent, app: &mut App) {
    let max_scroll = app.output_lines.len().saturating_sub(1);
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => app.mode = InputMode::Normal,
        KeyCode::Up => app.output_scroll = app.output_scroll.saturating_sub(1),
        KeyCode::Down => app.output_scroll = (app.output_scroll + 1).min(max_scroll),
        KeyCode::PageUp => app.output_scroll = app.output_scroll.saturating_sub(PAGE),
        KeyCode::PageDown => app.output_scroll = (app.output_scroll + PAGE).min(max_scroll),
        _ => {}
    }
}
