use std::fmt;

use indexmap::IndexMap;
use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A parsed JSON document. Object members keep declaration order.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Array(Vec<JsonValue>),
    Object(IndexMap<String, JsonValue>),
}

/// Kind tag for a value, used wherever rendering or edit parsing branches on
/// the value's type. Matched exhaustively so a new kind cannot fall through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn is_container(self) -> bool {
        matches!(self, Self::Array | Self::Object)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl JsonValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Number(_) => ValueKind::Number,
            Self::String(_) => ValueKind::String,
            Self::Array(_) => ValueKind::Array,
            Self::Object(_) => ValueKind::Object,
        }
    }

    pub fn is_container(&self) -> bool {
        self.kind().is_container()
    }

    pub fn child_count(&self) -> usize {
        match self {
            Self::Array(items) => items.len(),
            Self::Object(map) => map.len(),
            _ => 0,
        }
    }

    pub fn parse(input: &str) -> Result<JsonValue, ParseError> {
        serde_json::from_str(input).map_err(|err| ParseError {
            message: err.to_string(),
        })
    }

    pub fn to_pretty(&self) -> String {
        serde_json::to_string_pretty(self).expect("JsonValue serialization does not fail")
    }

    /// Text shown for a leaf in the tree: strings quoted, the rest in their
    /// literal form. Containers have no leaf text.
    pub fn leaf_text(&self) -> Option<String> {
        match self {
            Self::Null => Some("null".to_string()),
            Self::Bool(flag) => Some(flag.to_string()),
            Self::Number(number) => Some(number.to_string()),
            Self::String(text) => Some(format!("\"{}\"", escape_string(text))),
            Self::Array(_) | Self::Object(_) => None,
        }
    }

    /// Text seeded into the inline editor: strings unquoted, the rest as
    /// their literal form. Containers are not editable.
    pub fn edit_seed(&self) -> Option<String> {
        match self {
            Self::Null => Some("null".to_string()),
            Self::Bool(flag) => Some(flag.to_string()),
            Self::Number(number) => Some(number.to_string()),
            Self::String(text) => Some(text.clone()),
            Self::Array(_) | Self::Object(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    message: String,
}

impl ParseError {
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message.as_str())
    }
}

impl std::error::Error for ParseError {}

pub fn escape_string(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            c if c < '\u{20}' => {
                out.push_str(&format!("\\u{:04X}", c as u32));
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Strict JSON number grammar: optional minus, integer part without leading
/// zeros, optional fraction and exponent. `f64::from_str` is looser ("+1",
/// "inf", "nan"), so editing validates against this first.
pub fn is_json_number(input: &str) -> bool {
    let bytes = input.as_bytes();
    let at = |i: usize| bytes.get(i).copied();
    let mut i = 0usize;

    if at(i) == Some(b'-') {
        i += 1;
    }
    match at(i) {
        Some(b'0') => i += 1,
        Some(b'1'..=b'9') => {
            while matches!(at(i), Some(b'0'..=b'9')) {
                i += 1;
            }
        }
        _ => return false,
    }

    if at(i) == Some(b'.') {
        i += 1;
        let start = i;
        while matches!(at(i), Some(b'0'..=b'9')) {
            i += 1;
        }
        if i == start {
            return false;
        }
    }

    if matches!(at(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(at(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let start = i;
        while matches!(at(i), Some(b'0'..=b'9')) {
            i += 1;
        }
        if i == start {
            return false;
        }
    }

    i == bytes.len()
}

impl Serialize for JsonValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(flag) => serializer.serialize_bool(*flag),
            Self::Number(number) => number.serialize(serializer),
            Self::String(text) => serializer.serialize_str(text),
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Object(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for JsonValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = JsonValue;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<JsonValue, E> {
                Ok(JsonValue::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<JsonValue, E> {
                Ok(JsonValue::Number(value.into()))
            }

            fn visit_u64<E>(self, value: u64) -> Result<JsonValue, E> {
                Ok(JsonValue::Number(value.into()))
            }

            fn visit_f64<E>(self, value: f64) -> Result<JsonValue, E>
            where
                E: serde::de::Error,
            {
                serde_json::Number::from_f64(value)
                    .map(JsonValue::Number)
                    .ok_or_else(|| E::custom("non-finite number"))
            }

            fn visit_str<E>(self, value: &str) -> Result<JsonValue, E> {
                Ok(JsonValue::String(value.to_owned()))
            }

            fn visit_string<E>(self, value: String) -> Result<JsonValue, E> {
                Ok(JsonValue::String(value))
            }

            fn visit_unit<E>(self) -> Result<JsonValue, E> {
                Ok(JsonValue::Null)
            }

            fn visit_none<E>(self) -> Result<JsonValue, E> {
                Ok(JsonValue::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<JsonValue, D::Error>
            where
                D: Deserializer<'de>,
            {
                JsonValue::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<JsonValue, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(item) = seq.next_element()? {
                    items.push(item);
                }
                Ok(JsonValue::Array(items))
            }

            fn visit_map<A>(self, mut access: A) -> Result<JsonValue, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut map = IndexMap::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, JsonValue>()? {
                    map.insert(key, value);
                }
                Ok(JsonValue::Object(map))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::{JsonValue, is_json_number};

    #[test]
    fn parse_preserves_object_member_order() {
        let doc =
            JsonValue::parse(r#"{"zulu": 1, "alpha": 2, "mike": 3}"#).expect("valid document");
        let JsonValue::Object(map) = doc else {
            panic!("expected object root");
        };
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["zulu", "alpha", "mike"]);
    }

    #[test]
    fn parse_rejects_unquoted_keys_with_parser_message() {
        let err = JsonValue::parse("{ invalid: true, }").expect_err("bare key must fail");
        assert!(!err.message().is_empty());
    }

    #[test]
    fn pretty_output_reparses_to_the_same_document() {
        let doc = JsonValue::parse(r#"{"a": [1, 2.5, "x", null, true], "b": {"c": -3}}"#)
            .expect("valid document");
        let round = JsonValue::parse(&doc.to_pretty()).expect("pretty output is valid");
        assert_eq!(round, doc);
    }

    #[test]
    fn integer_literals_stay_integers() {
        let doc = JsonValue::parse(r#"{"n": 7}"#).expect("valid document");
        assert!(doc.to_pretty().contains("7"));
        assert!(!doc.to_pretty().contains("7.0"));
    }

    #[test]
    fn leaf_text_quotes_strings_and_escapes() {
        let value = JsonValue::String("say \"hi\"\n".to_string());
        assert_eq!(value.leaf_text().expect("leaf"), "\"say \\\"hi\\\"\\n\"");
        assert_eq!(value.edit_seed().expect("seed"), "say \"hi\"\n");
    }

    #[test]
    fn containers_have_no_leaf_text() {
        assert_eq!(JsonValue::Array(Vec::new()).leaf_text(), None);
        assert_eq!(JsonValue::Object(Default::default()).edit_seed(), None);
    }

    #[test]
    fn json_number_grammar() {
        for ok in ["0", "-1", "12.5", "1e5", "-0.2E-3", "10"] {
            assert!(is_json_number(ok), "{ok} should be a JSON number");
        }
        for bad in ["", "+1", "01", "1.", ".5", "1e", "0x1", "nan", "inf", "1 "] {
            assert!(!is_json_number(bad), "{bad} should be rejected");
        }
    }
}
