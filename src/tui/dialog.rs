//! 弹出层：安装输入、解释器路径、操作确认、输出查看

use super::input;
use super::layout;
use super::state::{App, InputMode};
use super::theme::ERR;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render_overlay(f: &mut Frame, app: &App) {
    let area = f.area();
    match &app.mode {
        InputMode::Normal | InputMode::Search => {}
        InputMode::Install => {
            let popup = layout::centered_line(60, 3, area);
            layout::clear(f, popup);
            input::render_input_box(f, &app.install_input, "安装包:", true, popup);
        }
        InputMode::EditPath => {
            let popup = layout::centered_line(80, 3, area);
            layout::clear(f, popup);
            input::render_input_box(f, &app.path_input, "Python解释器路径:", true, popup);
        }
        InputMode::Confirm(op) => {
            let popup = layout::centered_line(50, 5, area);
            layout::clear(f, popup);
            let text = vec![
                Line::from(vec![
                    Span::raw("确定执行 "),
                    Span::styled(
                        op.label(),
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(" ?"),
                ]),
                Line::from(""),
                Line::from(Span::styled("y 确认    n / Esc 取消", Style::default().fg(Color::DarkGray))),
            ];
            let dialog = Paragraph::new(text)
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .title(" 确认 ")
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(ERR)),
                );
            f.render_widget(dialog, popup);
        }
        InputMode::Output => {
            let popup = layout::centered_rect(85, 75, area);
            layout::clear(f, popup);
            let title = format!("{}  (↑↓ 滚动, Esc 关闭)", app.output_title);
            layout::render_scrollable_content(
                f,
                &title,
                &app.output_lines,
                app.output_scroll,
                ERR,
                popup,
            );
        }
    }
}
