//! Cell values.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::markup::{MarkupNode, flatten_text};

/// Discriminant of a [`RawValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Text,
    Number,
    Bool,
    Markup,
    Object,
}

/// The raw value stored in a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum RawValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Markup(Vec<MarkupNode>),
    Object(serde_json::Value),
}

impl RawValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Text(_) => ValueKind::Text,
            Self::Number(_) => ValueKind::Number,
            Self::Bool(_) => ValueKind::Bool,
            Self::Markup(_) => ValueKind::Markup,
            Self::Object(_) => ValueKind::Object,
        }
    }

    pub fn is_markup(&self) -> bool {
        matches!(self, Self::Markup(_))
    }

    /// Text form of the value: markup is flattened, objects become JSON.
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(text) => Cow::Borrowed(text),
            Self::Number(number) => Cow::Owned(number.to_string()),
            Self::Bool(flag) => Cow::Borrowed(if *flag { "true" } else { "false" }),
            Self::Markup(nodes) => Cow::Owned(flatten_text(nodes)),
            Self::Object(value) => Cow::Owned(value.to_string()),
        }
    }
}

impl Default for RawValue {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<MarkupNode>> for RawValue {
    fn from(value: Vec<MarkupNode>) -> Self {
        Self::Markup(value)
    }
}

/// Explicit ordering override carried by a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SortValue {
    Number(f64),
    Text(String),
}

impl SortValue {
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Self::Number(number) => Cow::Owned(number.to_string()),
            Self::Text(text) => Cow::Borrowed(text),
        }
    }
}

/// A normalized cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub value: RawValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<SortValue>,
}

impl Cell {
    pub fn new(value: impl Into<RawValue>) -> Self {
        Self {
            value: value.into(),
            text: None,
            order: None,
        }
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_order(mut self, order: SortValue) -> Self {
        self.order = Some(order);
        self
    }

    /// Text used for display and search: the explicit text when present,
    /// otherwise the text form of the value.
    pub fn display_text(&self) -> Cow<'_, str> {
        match &self.text {
            Some(text) => Cow::Borrowed(text),
            None => self.value.to_text(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.display_text().trim().is_empty()
    }
}

/// A cell as supplied by the caller, before normalization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "serde_json::Value")]
pub enum InputCell {
    Text(String),
    Number(f64),
    Bool(bool),
    Markup(Vec<MarkupNode>),
    Structured {
        data: Option<RawValue>,
        text: Option<String>,
        order: Option<SortValue>,
    },
}

impl InputCell {
    pub fn structured(data: impl Into<RawValue>) -> Self {
        Self::Structured {
            data: Some(data.into()),
            text: None,
            order: None,
        }
    }
}

impl From<&str> for InputCell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for InputCell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for InputCell {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for InputCell {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for InputCell {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<serde_json::Value> for InputCell {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Bool(flag) => Self::Bool(flag),
            Value::Number(number) => Self::Number(number.as_f64().unwrap_or(f64::NAN)),
            Value::String(text) => Self::Text(text),
            Value::Array(items) => match markup_from_json(&items) {
                Some(nodes) => Self::Markup(nodes),
                None => Self::structured(RawValue::Object(Value::Array(items))),
            },
            Value::Object(mut map) => {
                let data = map.remove("data").and_then(raw_value_from_json);
                let text = map
                    .remove("text")
                    .and_then(|text| text.as_str().map(str::to_string));
                let order = map.remove("order").and_then(|order| match order {
                    Value::Number(number) => number.as_f64().map(SortValue::Number),
                    Value::String(text) => Some(SortValue::Text(text)),
                    _ => None,
                });
                Self::Structured { data, text, order }
            }
            Value::Null => Self::Structured {
                data: None,
                text: None,
                order: None,
            },
        }
    }
}

/// Converts a JSON `data` payload; `null` counts as missing.
fn raw_value_from_json(value: serde_json::Value) -> Option<RawValue> {
    use serde_json::Value;

    match value {
        Value::Null => None,
        Value::Bool(flag) => Some(RawValue::Bool(flag)),
        Value::Number(number) => Some(RawValue::Number(number.as_f64().unwrap_or(f64::NAN))),
        Value::String(text) => Some(RawValue::Text(text)),
        Value::Array(items) => Some(match markup_from_json(&items) {
            Some(nodes) => RawValue::Markup(nodes),
            None => RawValue::Object(Value::Array(items)),
        }),
        other => Some(RawValue::Object(other)),
    }
}

fn markup_from_json(items: &[serde_json::Value]) -> Option<Vec<MarkupNode>> {
    if items.is_empty() {
        return None;
    }
    serde_json::from_value(serde_json::Value::Array(items.to_vec())).ok()
}

/// A column heading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeaderCell {
    pub title: RawValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// The title is markup and should be rendered as such.
    #[serde(default)]
    pub html: bool,
}

impl HeaderCell {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: RawValue::Text(title.into()),
            text: None,
            html: false,
        }
    }

    pub fn markup(nodes: Vec<MarkupNode>) -> Self {
        Self {
            title: RawValue::Markup(nodes),
            text: None,
            html: true,
        }
    }

    pub fn title_text(&self) -> Cow<'_, str> {
        match &self.text {
            Some(text) => Cow::Borrowed(text),
            None => self.title.to_text(),
        }
    }
}
