use crate::domain::codec::{FormField, FormValue, RecordForm};
use crate::domain::models::{DateValue, PropertyKind, Schema};

/// An open record form plus the schema snapshot it was hydrated from.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    pub form: RecordForm,
    pub schema: Schema,
    pub field_index: usize,
    /// Highlighted option of a multi-select field.
    pub option_cursor: usize,
}

impl EditorState {
    #[must_use]
    pub fn new(form: RecordForm, schema: Schema) -> Self {
        Self {
            form,
            schema,
            field_index: 0,
            option_cursor: 0,
        }
    }

    #[must_use]
    pub fn current_field(&self) -> Option<&FormField> {
        self.form.fields.get(self.field_index)
    }

    /// Whether typed characters go into the current field.
    #[must_use]
    pub fn accepts_text(&self) -> bool {
        matches!(
            self.current_field().map(|f| &f.value),
            Some(FormValue::Text(_) | FormValue::Date(_))
        )
    }

    pub fn next_field(&mut self) {
        let len = self.form.fields.len();
        if len > 0 {
            self.field_index = (self.field_index + 1) % len;
            self.option_cursor = 0;
        }
    }

    pub fn prev_field(&mut self) {
        let len = self.form.fields.len();
        if len > 0 {
            self.field_index = (self.field_index + len - 1) % len;
            self.option_cursor = 0;
        }
    }

    pub fn input_char(&mut self, c: char) {
        let Some(field) = self.form.fields.get_mut(self.field_index) else {
            return;
        };
        match &mut field.value {
            FormValue::Text(text) => text.push(c),
            FormValue::Date(Some(date)) => date.start.push(c),
            FormValue::Date(date @ None) => {
                *date = Some(DateValue {
                    start: c.to_string(),
                    end: None,
                    time_zone: None,
                });
            }
            _ => {}
        }
    }

    pub fn backspace(&mut self) {
        let Some(field) = self.form.fields.get_mut(self.field_index) else {
            return;
        };
        match &mut field.value {
            FormValue::Text(text) => {
                text.pop();
            }
            FormValue::Date(date) => {
                if let Some(value) = date {
                    value.start.pop();
                    if value.start.is_empty() {
                        *date = None;
                    }
                }
            }
            _ => {}
        }
    }

    /// Step a select/status value through its options, or move the
    /// multi-select cursor.
    pub fn cycle(&mut self, forward: bool) {
        let Some(field) = self.form.fields.get_mut(self.field_index) else {
            return;
        };
        let names: Vec<String> = field
            .descriptor
            .options
            .iter()
            .map(|o| o.name.clone())
            .collect();
        if names.is_empty() {
            return;
        }

        match (&field.descriptor.kind, &mut field.value) {
            (PropertyKind::Select | PropertyKind::Status, FormValue::Choice(choice)) => {
                // A select may be cleared; a status always holds an option.
                let mut positions: Vec<Option<String>> = names.into_iter().map(Some).collect();
                if field.descriptor.kind == PropertyKind::Select {
                    positions.insert(0, None);
                }
                let len = positions.len();
                let next = match positions.iter().position(|p| p == choice) {
                    Some(i) if forward => (i + 1) % len,
                    Some(i) => (i + len - 1) % len,
                    None if forward => 0,
                    None => len - 1,
                };
                *choice = positions[next].clone();
            }
            (PropertyKind::MultiSelect, FormValue::Choices(_)) => {
                let len = names.len();
                self.option_cursor = if forward {
                    (self.option_cursor + 1) % len
                } else {
                    (self.option_cursor + len - 1) % len
                };
            }
            _ => {}
        }
    }

    /// Flip a checkbox, or toggle the highlighted multi-select option.
    pub fn toggle(&mut self) {
        let cursor = self.option_cursor;
        let Some(field) = self.form.fields.get_mut(self.field_index) else {
            return;
        };
        match &mut field.value {
            FormValue::Flag(flag) => *flag = !*flag,
            FormValue::Choices(selected) => {
                let Some(option) = field.descriptor.options.get(cursor) else {
                    return;
                };
                if let Some(pos) = selected.iter().position(|n| n == &option.name) {
                    selected.remove(pos);
                } else {
                    selected.push(option.name.clone());
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::codec::PropertyCodec;
    use crate::domain::models::{PropertyDescriptor, Record, SelectOption};

    fn editor() -> EditorState {
        let schema = Schema::new([
            ("Name".to_string(), PropertyDescriptor::new(PropertyKind::Title)),
            (
                "Status".to_string(),
                PropertyDescriptor::with_options(
                    PropertyKind::Status,
                    vec![SelectOption::new("s1", "Inbox"), SelectOption::new("s2", "Done")],
                ),
            ),
            (
                "Priority".to_string(),
                PropertyDescriptor::with_options(
                    PropertyKind::Select,
                    vec![SelectOption::new("p1", "High")],
                ),
            ),
            (
                "Tags".to_string(),
                PropertyDescriptor::with_options(
                    PropertyKind::MultiSelect,
                    vec![SelectOption::new("t1", "home"), SelectOption::new("t2", "work")],
                ),
            ),
            ("Due".to_string(), PropertyDescriptor::new(PropertyKind::Date)),
            ("Done".to_string(), PropertyDescriptor::new(PropertyKind::Checkbox)),
        ]);
        let form = RecordForm::hydrate(&PropertyCodec::default(), &Record::draft(), &schema).unwrap();
        EditorState::new(form, schema)
    }

    fn value<'a>(editor: &'a EditorState, name: &str) -> &'a FormValue {
        &editor.form.field(name).unwrap().value
    }

    #[test]
    fn test_typing_edits_text_fields() {
        let mut editor = editor();
        assert!(editor.accepts_text());
        for c in "Buy milk".chars() {
            editor.input_char(c);
        }
        editor.backspace();
        assert_eq!(value(&editor, "Name"), &FormValue::Text("Buy mil".to_string()));
    }

    #[test]
    fn test_field_navigation_wraps() {
        let mut editor = editor();
        editor.prev_field();
        assert_eq!(editor.current_field().unwrap().name, "Done");
        editor.next_field();
        assert_eq!(editor.current_field().unwrap().name, "Name");
    }

    #[test]
    fn test_status_cycles_through_options_only() {
        let mut editor = editor();
        editor.next_field();
        assert_eq!(value(&editor, "Status"), &FormValue::Choice(Some("Inbox".to_string())));
        editor.cycle(true);
        assert_eq!(value(&editor, "Status"), &FormValue::Choice(Some("Done".to_string())));
        editor.cycle(true);
        assert_eq!(value(&editor, "Status"), &FormValue::Choice(Some("Inbox".to_string())));
    }

    #[test]
    fn test_select_can_be_cleared() {
        let mut editor = editor();
        editor.field_index = 2;
        editor.cycle(true);
        assert_eq!(value(&editor, "Priority"), &FormValue::Choice(Some("High".to_string())));
        editor.cycle(true);
        assert_eq!(value(&editor, "Priority"), &FormValue::Choice(None));
    }

    #[test]
    fn test_multi_select_toggle_follows_cursor() {
        let mut editor = editor();
        editor.field_index = 3;
        editor.cycle(true);
        editor.toggle();
        assert_eq!(value(&editor, "Tags"), &FormValue::Choices(vec!["work".to_string()]));
        editor.toggle();
        assert_eq!(value(&editor, "Tags"), &FormValue::Choices(vec![]));
    }

    #[test]
    fn test_date_and_checkbox_editing() {
        let mut editor = editor();
        editor.field_index = 4;
        for c in "2024-01-08".chars() {
            editor.input_char(c);
        }
        assert!(matches!(value(&editor, "Due"), FormValue::Date(Some(d)) if d.start == "2024-01-08"));
        for _ in 0..10 {
            editor.backspace();
        }
        assert_eq!(value(&editor, "Due"), &FormValue::Date(None));

        editor.next_field();
        assert!(!editor.accepts_text());
        editor.toggle();
        assert_eq!(value(&editor, "Done"), &FormValue::Flag(true));
    }
}
