use ratatui::{buffer::Buffer, layout::Rect, style::Color};

/// A box of `height` rows sitting directly above `anchor`, as wide as it.
#[must_use]
pub fn above(anchor: Rect, height: u16, bounds: Rect) -> Rect {
    let height = height.min(anchor.y.saturating_sub(bounds.y));
    Rect {
        x: anchor.x,
        y: anchor.y.saturating_sub(height),
        width: anchor.width,
        height,
    }
}

pub fn draw_drop_shadow(buf: &mut Buffer, area: Rect, terminal_area: Rect) {
    let shadow_area = Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width,
        height: area.height,
    };

    let shadow_area = shadow_area.intersection(terminal_area);

    for y in shadow_area.top()..shadow_area.bottom() {
        for x in shadow_area.left()..shadow_area.right() {
            let cell = &mut buf[(x, y)];
            cell.set_style(ratatui::style::Style::default().bg(Color::Black));
            cell.set_symbol(" ");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_above_is_clamped_to_bounds() {
        let bounds = Rect::new(0, 0, 80, 24);
        let anchor = Rect::new(0, 20, 80, 3);
        assert_eq!(above(anchor, 6, bounds), Rect::new(0, 14, 80, 6));
        assert_eq!(above(anchor, 40, bounds), Rect::new(0, 0, 80, 20));
    }
}
