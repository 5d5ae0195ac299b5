use ratatui::{
    prelude::{Buffer, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// Keys and the description of what they do.
pub type KeyBinding<'a> = (&'a [&'a str], &'a str);

/// One centred help line, e.g. `←/→ Move | Space Hard Drop`.
///
/// Bindings are listed in order; those that no longer fit the width are left
/// out, so the most important ones go first.
#[derive(Debug)]
pub struct KeyBindingDisplay<'a> {
    bindings: &'a [KeyBinding<'a>],
}

impl<'a> KeyBindingDisplay<'a> {
    pub fn new(bindings: &'a [KeyBinding<'a>]) -> Self {
        Self { bindings }
    }

    fn line(&self, width: u16) -> Line<'a> {
        let mut line = Line::default();
        for &(keys, desc) in self.bindings {
            let item = binding_spans(keys, desc, !line.spans.is_empty());
            let item_width: usize = item.iter().map(Span::width).sum();
            if line.width() + item_width > usize::from(width) {
                break;
            }
            line.spans.extend(item);
        }
        line.centered()
    }
}

fn binding_spans<'a>(keys: &'a [&'a str], desc: &'a str, separated: bool) -> Vec<Span<'a>> {
    let mut spans = vec![];
    if separated {
        spans.push(Span::styled(" | ", SEPARATOR_STYLE));
    }
    for (i, key) in keys.iter().copied().enumerate() {
        if i > 0 {
            spans.push(Span::styled("/", SEPARATOR_STYLE));
        }
        spans.push(Span::styled(key, KEY_STYLE));
    }
    spans.push(Span::raw(" "));
    spans.push(Span::styled(desc, DESCRIPTION_STYLE));
    spans
}

const KEY_STYLE: Style = Style::new().fg(Color::Cyan);
const DESCRIPTION_STYLE: Style = Style::new().fg(Color::White);
const SEPARATOR_STYLE: Style = Style::new().fg(Color::DarkGray);

impl Widget for KeyBindingDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.line(area.width).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BINDINGS: &[KeyBinding] = &[(&["←", "→"], "Move"), (&["q"], "Quit")];

    #[test]
    fn test_line_joins_keys_and_items() {
        let line = KeyBindingDisplay::new(BINDINGS).line(80);
        assert_eq!(line.to_string(), "←/→ Move | q Quit");
    }

    #[test]
    fn test_narrow_line_drops_trailing_items() {
        let display = KeyBindingDisplay::new(BINDINGS);
        assert_eq!(display.line(17).to_string(), "←/→ Move | q Quit");
        assert_eq!(display.line(16).to_string(), "←/→ Move");
        assert_eq!(display.line(3).to_string(), "");
    }
}
