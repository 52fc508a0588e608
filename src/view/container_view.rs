use crate::domain::model::ItemId;
use crate::view::item_view::{item_width, render_item};
use unicode_width::UnicodeWidthStr;

/// One drop zone: its label, a rule, then its tokens top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerView {
    pub lines: Vec<String>,
    pub width: usize,
}

pub fn render_container(label: &str, items: &[ItemId]) -> ContainerView {
    let width = items
        .iter()
        .map(item_width)
        .chain(std::iter::once(label.width()))
        .max()
        .unwrap_or(0)
        .max(4);

    let mut lines = Vec::with_capacity(items.len() + 2);
    lines.push(label.to_string());
    lines.push("-".repeat(width));
    lines.extend(items.iter().map(render_item));

    ContainerView { lines, width }
}

impl ContainerView {
    /// Line `row` padded to the column width; blank below the last token.
    pub fn padded_line(&self, row: usize) -> String {
        let line = self.lines.get(row).map(String::as_str).unwrap_or("");
        let padding = self.width.saturating_sub(line.width());
        format!("{}{}", line, " ".repeat(padding))
    }
}
