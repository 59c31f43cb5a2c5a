use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// 单行文本输入框，光标按字符计数，支持中英文
#[derive(Debug, Clone, Default)]
pub struct InputBox {
    content: String,
    cursor: usize,
}

impl InputBox {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以给定内容初始化，光标置于末尾
    pub fn with_content(text: &str) -> Self {
        Self {
            content: text.to_string(),
            cursor: text.chars().count(),
        }
    }

    pub fn insert(&mut self, c: char) {
        let byte_pos = char_to_byte(&self.content, self.cursor);
        self.content.insert(byte_pos, c);
        self.cursor += 1;
    }

    /// Backspace
    pub fn delete_back(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.remove_at_cursor();
        }
    }

    /// Delete
    pub fn delete_forward(&mut self) {
        if self.cursor < self.content.chars().count() {
            self.remove_at_cursor();
        }
    }

    fn remove_at_cursor(&mut self) {
        let start = char_to_byte(&self.content, self.cursor);
        let end = char_to_byte(&self.content, self.cursor + 1);
        self.content.drain(start..end);
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.content.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.content.chars().count();
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn cursor_pos(&self) -> usize {
        self.cursor
    }
}

/// UTF-8 安全的字符位置转字节位置
fn char_to_byte(s: &str, char_pos: usize) -> usize {
    s.char_indices()
        .nth(char_pos)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// 渲染输入框：label + 文本 + 光标
pub fn render_input_box(f: &mut Frame, input: &InputBox, label: &str, focused: bool, area: Rect) {
    let border_color = if focused { Color::Yellow } else { Color::DarkGray };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let chars: Vec<char> = input.content().chars().collect();
    let cursor_pos = input.cursor_pos().min(chars.len());
    let before: String = chars[..cursor_pos].iter().collect();
    let (cursor_char, after) = if cursor_pos < chars.len() {
        (chars[cursor_pos].to_string(), chars[cursor_pos + 1..].iter().collect())
    } else {
        (" ".to_string(), String::new())
    };

    let mut spans = vec![
        Span::styled(
            format!("{label} "),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(before, Style::default().fg(Color::White)),
    ];

    if focused {
        spans.push(Span::styled(
            cursor_char,
            Style::default().fg(Color::Black).bg(Color::White),
        ));
    } else {
        spans.push(Span::styled(cursor_char, Style::default().fg(Color::White)));
    }
    spans.push(Span::styled(after, Style::default().fg(Color::White)));

    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editing_multibyte_text() {
        let mut input = InputBox::new();
        for c in "数据pkg".chars() {
            input.insert(c);
        }
        input.move_home();
        input.move_right();
        input.delete_forward();
        assert_eq!(input.content(), "数pkg");
        input.move_end();
        input.delete_back();
        assert_eq!(input.content(), "数pk");
        assert_eq!(input.cursor_pos(), 3);
    }

    #[test]
    fn with_content_places_cursor_at_end() {
        let mut input = InputBox::with_content("/usr/bin/python3");
        assert_eq!(input.cursor_pos(), 16);
        input.insert('x');
        assert_eq!(input.content(), "/usr/bin/python3x");
        input.clear();
        assert_eq!(input.content(), "");
        input.move_left();
        assert_eq!(input.cursor_pos(), 0);
    }
}
