use crate::app::state::{AppState, EditorState, Message, MessageBody, MessageId, RecordBubble};
use crate::domain::codec::{FormField, FormValue};
use crate::domain::models::{plain_text, PropertyValue};
use crate::theme::{glyphs, Theme};

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// The conversation, newest at the bottom. Keeps the selected bubble in view.
pub struct ChatLog<'a> {
    pub state: &'a AppState<'a>,
    pub theme: &'a Theme,
}

impl Widget for ChatLog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        let mut lines: Vec<Line> = Vec::new();
        let mut focus: Option<(usize, usize)> = None;

        for message in &self.state.conversation.messages {
            let start = lines.len();
            lines.extend(self.message_lines(message));
            lines.push(Line::from(""));
            if self.is_focused(message.id) {
                focus = Some((start, lines.len()));
            }
        }

        if lines.is_empty() {
            let hint = Line::from(vec![
                Span::styled(" Type ", self.theme.dimmed),
                Span::styled("/", self.theme.footer_segment_key),
                Span::styled(" to see available commands", self.theme.dimmed),
            ]);
            Paragraph::new(hint).render(area, buf);
            return;
        }

        let offset = scroll_offset(lines.len(), area.height as usize, focus);
        Paragraph::new(lines)
            .scroll((u16::try_from(offset).unwrap_or(u16::MAX), 0))
            .render(area, buf);
    }
}

impl<'a> ChatLog<'a> {
    fn is_focused(&self, id: MessageId) -> bool {
        self.state.editing == Some(id) || self.state.selected_bubble == Some(id)
    }

    fn message_lines(&self, message: &'a Message) -> Vec<Line<'a>> {
        let time = message.timestamp.format("%H:%M").to_string();
        match &message.body {
            MessageBody::Text(text) => {
                let (marker, style) = if message.sent {
                    (glyphs::SENT, self.theme.message_sent)
                } else if text.starts_with("Error") || text.starts_with("Unknown command") {
                    (glyphs::RECEIVED, self.theme.message_error)
                } else {
                    (glyphs::RECEIVED, self.theme.message_received)
                };

                text.lines()
                    .enumerate()
                    .map(|(i, line)| {
                        let mut spans = if i == 0 {
                            vec![
                                Span::styled(format!(" {time} "), self.theme.timestamp),
                                Span::styled(format!("{marker} "), style),
                            ]
                        } else {
                            vec![Span::raw("         ")]
                        };
                        spans.push(Span::styled(line, style));
                        Line::from(spans)
                    })
                    .collect()
            }
            MessageBody::Record(bubble) => self.bubble_lines(message.id, bubble, &time),
        }
    }

    fn bubble_lines(&self, id: MessageId, bubble: &'a RecordBubble, time: &str) -> Vec<Line<'a>> {
        let border = if bubble.is_editing() && self.state.editing == Some(id) {
            self.theme.bubble_editing
        } else if self.state.selected_bubble == Some(id) {
            self.theme.bubble_selected
        } else {
            self.theme.bubble_border
        };
        let side = || Span::styled(format!("       {}", glyphs::BUBBLE_SIDE), border);

        let badge = if bubble.is_new { " (new)" } else { "" };
        let mut lines = vec![Line::from(vec![
            Span::styled(format!(" {time}  "), self.theme.timestamp),
            Span::styled(glyphs::BUBBLE_TOP, border),
            Span::styled(
                format!(" {}{badge} ", bubble.record.display_title()),
                self.theme.bubble_title,
            ),
        ])];

        match &bubble.editor {
            Some(editor) => {
                for (index, field) in editor.form.fields.iter().enumerate() {
                    let active = index == editor.field_index && self.state.editing == Some(id);
                    let mut spans = vec![side()];
                    spans.extend(self.field_spans(editor, field, active));
                    lines.push(Line::from(spans));
                }
                if !editor.form.unsupported.is_empty() {
                    lines.push(Line::from(vec![
                        side(),
                        Span::styled(
                            format!("not editable: {}", editor.form.unsupported.join(", ")),
                            self.theme.dimmed,
                        ),
                    ]));
                }
            }
            None => {
                for (name, value) in &bubble.record.properties {
                    if matches!(value, PropertyValue::Title { .. }) {
                        continue;
                    }
                    let Some(summary) = summarize(value) else {
                        continue;
                    };
                    lines.push(Line::from(vec![
                        side(),
                        Span::styled(format!("{name}: "), self.theme.field_label),
                        Span::styled(summary, self.theme.field_value),
                    ]));
                }
            }
        }

        lines.push(Line::from(Span::styled(
            format!("       {}", glyphs::BUBBLE_BOTTOM),
            border,
        )));
        lines
    }

    fn field_spans(
        &self,
        editor: &EditorState,
        field: &'a FormField,
        active: bool,
    ) -> Vec<Span<'a>> {
        let label_style = if active {
            self.theme.field_active
        } else {
            self.theme.field_label
        };
        let mut spans = vec![Span::styled(format!("{}: ", field.name), label_style)];
        let value_style = self.theme.field_value;

        match &field.value {
            FormValue::Text(text) => {
                spans.push(Span::styled(text.as_str(), value_style));
                if active {
                    spans.push(Span::styled(glyphs::CURSOR, self.theme.field_active));
                }
            }
            FormValue::Date(date) => {
                let text = match date {
                    Some(d) => match &d.end {
                        Some(end) => format!("{} → {end}", d.start),
                        None => d.start.clone(),
                    },
                    None if active => String::new(),
                    None => glyphs::EMPTY_VALUE.to_string(),
                };
                spans.push(Span::styled(text, value_style));
                if active {
                    spans.push(Span::styled(glyphs::CURSOR, self.theme.field_active));
                }
            }
            FormValue::Flag(flag) => {
                let mark = if *flag { glyphs::CHECKED } else { glyphs::UNCHECKED };
                spans.push(Span::styled(mark, value_style));
            }
            FormValue::Choice(choice) if active => {
                spans.extend(self.option_spans(
                    field,
                    |name| choice.as_deref() == Some(name),
                    None,
                ));
            }
            FormValue::Choice(choice) => {
                spans.push(Span::styled(
                    choice.clone().unwrap_or_else(|| glyphs::EMPTY_VALUE.to_string()),
                    value_style,
                ));
            }
            FormValue::Choices(selected) if active => {
                spans.extend(self.option_spans(
                    field,
                    |name| selected.iter().any(|s| s == name),
                    Some(editor.option_cursor),
                ));
            }
            FormValue::Choices(selected) => {
                let text = if selected.is_empty() {
                    glyphs::EMPTY_VALUE.to_string()
                } else {
                    selected.join(", ")
                };
                spans.push(Span::styled(text, value_style));
            }
        }
        spans
    }

    /// Every option of a choice field, selected ones highlighted.
    fn option_spans(
        &self,
        field: &FormField,
        is_selected: impl Fn(&str) -> bool,
        cursor: Option<usize>,
    ) -> Vec<Span<'a>> {
        if field.descriptor.options.is_empty() {
            return vec![Span::styled("(no options)", self.theme.dimmed)];
        }
        field
            .descriptor
            .options
            .iter()
            .enumerate()
            .flat_map(|(i, option)| {
                let mut style: Style = if is_selected(&option.name) {
                    self.theme.option_selected
                } else {
                    self.theme.dimmed
                };
                if cursor == Some(i) {
                    style = style.patch(self.theme.field_active);
                }
                [
                    Span::styled(format!(" {} ", option.name), style),
                    Span::raw(" "),
                ]
            })
            .collect()
    }
}

/// One-line rendering of a stored value; `None` for empty values.
fn summarize(value: &PropertyValue) -> Option<String> {
    let text = match value {
        PropertyValue::Title { title: runs } | PropertyValue::RichText { rich_text: runs } => {
            plain_text(runs)
        }
        PropertyValue::Select { select: option } | PropertyValue::Status { status: option } => {
            option.as_ref()?.name.clone()
        }
        PropertyValue::MultiSelect { multi_select } => multi_select
            .iter()
            .map(|o| o.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        PropertyValue::Date { date } => date.as_ref()?.start.clone(),
        PropertyValue::Checkbox { checkbox } => {
            let mark = if *checkbox { glyphs::CHECKED } else { glyphs::UNCHECKED };
            mark.to_string()
        }
        PropertyValue::Url { url: text }
        | PropertyValue::Email { email: text }
        | PropertyValue::PhoneNumber { phone_number: text } => text.clone()?,
        PropertyValue::CreatedTime { .. }
        | PropertyValue::LastEditedTime { .. }
        | PropertyValue::Unsupported => return None,
    };
    (!text.trim().is_empty()).then_some(text)
}

/// Bottom-anchored scroll, moved up just enough to show the focused range.
fn scroll_offset(total: usize, height: usize, focus: Option<(usize, usize)>) -> usize {
    let bottom = total.saturating_sub(height);
    match focus {
        Some((start, end)) if start < bottom => {
            // Tall bubbles show their top
            let wanted = if end - start > height {
                start
            } else {
                end.saturating_sub(height)
            };
            wanted.min(bottom)
        }
        _ => bottom,
    }
}
