//! 界面配色

use ratatui::style::Color;

/// 标题 / 表头
pub const ACCENT: Color = Color::Rgb(91, 206, 250);
/// 选中行背景
pub const SEL_BG: Color = Color::Rgb(40, 48, 66);
/// 次要信息
pub const DIM: Color = Color::Rgb(130, 130, 140);
/// 成功提示
pub const OK: Color = Color::Rgb(120, 200, 120);
/// 失败提示
pub const ERR: Color = Color::Rgb(240, 110, 110);
