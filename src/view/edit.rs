use std::fmt;

use crate::core::path::NodePath;
use crate::core::value::{JsonValue, ValueKind, is_json_number};

/// Single-line edit buffer. A freshly seeded field starts with its whole
/// content selected, so the first typed character or backspace replaces it;
/// any cursor movement keeps the content and drops the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextField {
    value: String,
    cursor: usize,
    selected: bool,
}

impl TextField {
    pub fn new() -> Self {
        Self {
            value: String::new(),
            cursor: 0,
            selected: false,
        }
    }

    pub fn seeded(text: impl Into<String>) -> Self {
        let value: String = text.into();
        let cursor = value.chars().count();
        Self {
            value,
            cursor,
            selected: true,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    fn byte_at_char(&self, pos: usize) -> usize {
        self.value
            .char_indices()
            .nth(pos)
            .map(|(idx, _)| idx)
            .unwrap_or(self.value.len())
    }

    pub fn insert_char(&mut self, ch: char) {
        if self.selected {
            self.value.clear();
            self.cursor = 0;
            self.selected = false;
        }
        let byte_pos = self.byte_at_char(self.cursor);
        self.value.insert(byte_pos, ch);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) -> bool {
        if self.selected {
            self.value.clear();
            self.cursor = 0;
            self.selected = false;
            return true;
        }
        if self.cursor == 0 {
            return false;
        }
        let byte_pos = self.byte_at_char(self.cursor - 1);
        self.value.remove(byte_pos);
        self.cursor -= 1;
        true
    }

    pub fn move_left(&mut self) {
        self.selected = false;
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.selected = false;
        let len = self.value.chars().count();
        self.cursor = (self.cursor + 1).min(len);
    }

    pub fn move_home(&mut self) {
        self.selected = false;
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.selected = false;
        self.cursor = self.value.chars().count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
        self.selected = false;
    }
}

impl Default for TextField {
    fn default() -> Self {
        Self::new()
    }
}

/// In-flight inline edit of one leaf. At most one session exists at a time;
/// it either commits through the document copy path or is discarded whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub path: NodePath,
    pub kind: ValueKind,
    pub field: TextField,
    pub invalid: bool,
}

impl EditSession {
    pub fn new(path: NodePath, kind: ValueKind, seed: impl Into<String>) -> Self {
        Self {
            path,
            kind,
            field: TextField::seeded(seed),
            invalid: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditError {
    InvalidNumber,
    InvalidBool,
    InvalidNull,
    NotEditable,
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidNumber => f.write_str("not a valid number literal"),
            Self::InvalidBool => f.write_str("expected true or false"),
            Self::InvalidNull => f.write_str("expected null or empty"),
            Self::NotEditable => f.write_str("containers cannot be edited inline"),
        }
    }
}

impl std::error::Error for EditError {}

/// Parses the typed text back into a value, directed by the leaf's original
/// kind. The text's own shape is never sniffed: editing a string that looks
/// numeric still yields a string.
pub fn parse_edited(kind: ValueKind, text: &str) -> Result<JsonValue, EditError> {
    match kind {
        ValueKind::String => Ok(JsonValue::String(text.to_owned())),
        ValueKind::Number => {
            let literal = text.trim();
            if !is_json_number(literal) {
                return Err(EditError::InvalidNumber);
            }
            parse_number(literal).ok_or(EditError::InvalidNumber)
        }
        ValueKind::Bool => {
            let literal = text.trim();
            if literal.eq_ignore_ascii_case("true") {
                Ok(JsonValue::Bool(true))
            } else if literal.eq_ignore_ascii_case("false") {
                Ok(JsonValue::Bool(false))
            } else {
                Err(EditError::InvalidBool)
            }
        }
        ValueKind::Null => {
            let literal = text.trim();
            if literal.is_empty() || literal.eq_ignore_ascii_case("null") {
                Ok(JsonValue::Null)
            } else {
                Err(EditError::InvalidNull)
            }
        }
        ValueKind::Array | ValueKind::Object => Err(EditError::NotEditable),
    }
}

fn parse_number(literal: &str) -> Option<JsonValue> {
    if let Ok(int) = literal.parse::<i64>() {
        return Some(JsonValue::Number(int.into()));
    }
    if let Ok(int) = literal.parse::<u64>() {
        return Some(JsonValue::Number(int.into()));
    }
    let float = literal.parse::<f64>().ok()?;
    serde_json::Number::from_f64(float).map(JsonValue::Number)
}

#[cfg(test)]
mod tests {
    use super::{EditError, TextField, parse_edited};
    use crate::core::value::{JsonValue, ValueKind};

    #[test]
    fn string_edits_are_verbatim_even_when_numeric_looking() {
        assert_eq!(
            parse_edited(ValueKind::String, "123"),
            Ok(JsonValue::String("123".to_string()))
        );
        assert_eq!(
            parse_edited(ValueKind::String, "  spaced  "),
            Ok(JsonValue::String("  spaced  ".to_string()))
        );
    }

    #[test]
    fn number_edits_accept_json_literals_only() {
        assert_eq!(
            parse_edited(ValueKind::Number, " 5 "),
            Ok(JsonValue::Number(5.into()))
        );
        assert_eq!(
            parse_edited(ValueKind::Number, "-2.5e2"),
            Ok(JsonValue::Number(
                serde_json::Number::from_f64(-250.0).expect("finite")
            ))
        );
        assert_eq!(parse_edited(ValueKind::Number, ""), Err(EditError::InvalidNumber));
        assert_eq!(
            parse_edited(ValueKind::Number, "five"),
            Err(EditError::InvalidNumber)
        );
        assert_eq!(
            parse_edited(ValueKind::Number, "+1"),
            Err(EditError::InvalidNumber)
        );
    }

    #[test]
    fn bool_edits_accept_only_true_or_false() {
        assert_eq!(
            parse_edited(ValueKind::Bool, " TRUE "),
            Ok(JsonValue::Bool(true))
        );
        assert_eq!(
            parse_edited(ValueKind::Bool, "false"),
            Ok(JsonValue::Bool(false))
        );
        assert_eq!(parse_edited(ValueKind::Bool, "yes"), Err(EditError::InvalidBool));
        assert_eq!(parse_edited(ValueKind::Bool, "1"), Err(EditError::InvalidBool));
    }

    #[test]
    fn null_edits_accept_empty_or_null() {
        assert_eq!(parse_edited(ValueKind::Null, ""), Ok(JsonValue::Null));
        assert_eq!(parse_edited(ValueKind::Null, " NULL "), Ok(JsonValue::Null));
        assert_eq!(
            parse_edited(ValueKind::Null, "none"),
            Err(EditError::InvalidNull)
        );
    }

    #[test]
    fn containers_are_not_editable() {
        assert_eq!(
            parse_edited(ValueKind::Object, "{}"),
            Err(EditError::NotEditable)
        );
    }

    #[test]
    fn seeded_field_replaces_content_on_first_keystroke() {
        let mut field = TextField::seeded("hello");
        assert!(field.is_selected());
        field.insert_char('x');
        assert_eq!(field.value(), "x");
        field.insert_char('y');
        assert_eq!(field.value(), "xy");
    }

    #[test]
    fn cursor_movement_keeps_the_seed() {
        let mut field = TextField::seeded("abc");
        field.move_left();
        assert!(!field.is_selected());
        field.insert_char('!');
        assert_eq!(field.value(), "ab!c");
        assert!(field.backspace());
        assert_eq!(field.value(), "abc");
    }

    #[test]
    fn backspace_on_selection_clears_everything() {
        let mut field = TextField::seeded("abc");
        assert!(field.backspace());
        assert_eq!(field.value(), "");
        assert!(!field.backspace());
    }
}
