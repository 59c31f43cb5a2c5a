use super::input;
use super::layout;
use super::state::{App, InputMode, StatusLevel};
use super::theme::{ACCENT, DIM, ERR, OK, SEL_BG};
use crate::controller::{SortKey, SortState};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

const COLUMNS: [(SortKey, &str); 4] = [
    (SortKey::Name, "库名"),
    (SortKey::Version, "版本"),
    (SortKey::Size, "预估大小"),
    (SortKey::InstalledAt, "安装时间"),
];

/// 表头文字，当前排序列带方向箭头
pub fn column_title(key: SortKey, title: &str, sort: SortState) -> String {
    if sort.key != key {
        return title.to_string();
    }
    let arrow = if sort.descending { "▼" } else { "▲" };
    format!("{title} {arrow}")
}

pub fn render_main(f: &mut Frame, app: &App) {
    let chunks = layout::main_layout(f.area());

    let path = app.controller.interpreter().display().to_string();
    let title = if path.is_empty() {
        "PyLib Manager — 未选择解释器".to_string()
    } else {
        format!("PyLib Manager — {path}")
    };
    layout::render_header(f, &title, chunks[0]);

    input::render_input_box(f, &app.search, "搜索:", app.mode == InputMode::Search, chunks[1]);

    render_table(f, app, chunks[2]);
    render_detail(f, app, chunks[3]);

    let color = match app.status_level {
        StatusLevel::Info => Color::Green,
        StatusLevel::Ok => OK,
        StatusLevel::Error => ERR,
    };
    let busy = match (app.controller.is_probing(), app.controller.command_in_flight()) {
        (_, Some(op)) => format!(" [{}]", op.label()),
        (true, None) => " [扫描中]".to_string(),
        _ => String::new(),
    };
    let footer = format!(
        "{}{} | ↑↓ 选择 | / 搜索 | 1-4 排序 | i 安装 | u 卸载 | p 升级pip | r 刷新 | e 解释器 | o 输出 | q 退出",
        app.status, busy
    );
    layout::render_footer(f, &footer, color, chunks[4]);
}

fn render_table(f: &mut Frame, app: &App, area: Rect) {
    let sort = app.controller.sort_state();
    let header = Row::new(
        COLUMNS
            .iter()
            .map(|(key, title)| Cell::from(column_title(*key, title, sort))),
    )
    .style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD));

    let shown = app.controller.visible_len();
    let rows: Vec<Row> = app
        .controller
        .visible()
        .map(|p| {
            Row::new(vec![
                Cell::from(p.name.clone()),
                Cell::from(p.version.clone()),
                Cell::from(p.size_display.clone()),
                Cell::from(p.installed_display.clone()),
            ])
        })
        .collect();

    let total = app.controller.packages().len();
    let title = if shown == total {
        format!(" 已安装 ({total}) ")
    } else {
        format!(" 已安装 ({shown}/{total}) ")
    };

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(40),
            Constraint::Percentage(20),
            Constraint::Percentage(15),
            Constraint::Percentage(25),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    )
    .row_highlight_style(Style::default().bg(SEL_BG).add_modifier(Modifier::BOLD))
    .highlight_symbol("▶ ");

    let mut state = TableState::default();
    if shown > 0 {
        state.select(Some(app.selected.min(shown - 1)));
    }
    f.render_stateful_widget(table, area, &mut state);
}

fn render_detail(f: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = if app.detail.is_empty() {
        vec![Line::from(Span::styled("选择一个库查看简介", Style::default().fg(DIM)))]
    } else {
        app.detail.lines().map(|l| Line::from(l.to_string())).collect()
    };
    let paragraph = Paragraph::new(lines)
        .block(Block::default().title(" PyPI 在线简介 ").borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_sorted_column_gets_an_arrow() {
        let sort = SortState {
            key: SortKey::Size,
            descending: true,
        };
        assert_eq!(column_title(SortKey::Size, "预估大小", sort), "预估大小 ▼");
        assert_eq!(column_title(SortKey::Name, "库名", sort), "库名");
        let sort = SortState::default();
        assert_eq!(column_title(SortKey::Name, "库名", sort), "库名 ▲");
    }
}
