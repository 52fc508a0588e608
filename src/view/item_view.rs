use crate::domain::model::ItemId;
use unicode_width::UnicodeWidthStr;

/// A draggable token as it appears inside a container.
pub fn render_item(item: &ItemId) -> String {
    format!("[{}]", item)
}

/// The floating copy shown while `item` is being dragged.
pub fn render_overlay(item: &ItemId) -> String {
    format!("dragging: {}", render_item(item))
}

/// Terminal columns the rendered token occupies.
pub fn item_width(item: &ItemId) -> usize {
    render_item(item).width()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_item() {
        assert_eq!(render_item(&ItemId::new("A")), "[A]");
        assert_eq!(render_item(&ItemId::new("")), "[]");
        assert_eq!(render_overlay(&ItemId::new("a,b")), "dragging: [a,b]");
    }

    #[test]
    fn test_item_width_counts_wide_characters() {
        assert_eq!(item_width(&ItemId::new("AB")), 4);
        assert_eq!(item_width(&ItemId::new("山田")), 6);
    }
}
