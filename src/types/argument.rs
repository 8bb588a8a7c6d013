//! Request arguments.
//!
//! Arguments are a flat wire model: every key maps to a single [`Value`] or to
//! a list of values (repeated form fields). Lists hold values, not arguments,
//! so nesting is ruled out by construction.

use chrono::{DateTime, Utc};

use super::attachment::Attachment;

/// A single argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Encoded as milliseconds since the Unix epoch.
    Date(DateTime<Utc>),
    /// Omitted from every encoding.
    Null,
    /// Binary content; only multipart bodies can carry it.
    Attachment(Attachment),
}

impl Value {
    /// Text form of a scalar value, or `None` for nulls and attachments.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Text(s) => Some(s.clone()),
            Value::Integer(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Date(d) => Some(d.timestamp_millis().to_string()),
            Value::Null | Value::Attachment(_) => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_attachment(&self) -> bool {
        matches!(self, Value::Attachment(_))
    }
}

/// An argument: one value, or a list of values sent as repeated fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Single(Value),
    List(Vec<Value>),
}

impl Argument {
    pub fn null() -> Self {
        Argument::Single(Value::Null)
    }

    /// The values of this argument in order, one per encoded field.
    pub fn values(&self) -> &[Value] {
        match self {
            Argument::Single(value) => std::slice::from_ref(value),
            Argument::List(values) => values,
        }
    }
}

impl From<Value> for Argument {
    fn from(value: Value) -> Self {
        Argument::Single(value)
    }
}

impl From<Vec<Value>> for Argument {
    fn from(values: Vec<Value>) -> Self {
        Argument::List(values)
    }
}

macro_rules! impl_value_from {
    ($($ty:ty => |$v:ident| $conv:expr),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from($v: $ty) -> Self {
                    $conv
                }
            }

            impl From<Option<$ty>> for Value {
                fn from(value: Option<$ty>) -> Self {
                    value.map(Value::from).unwrap_or(Value::Null)
                }
            }

            impl From<$ty> for Argument {
                fn from(value: $ty) -> Self {
                    Argument::Single(Value::from(value))
                }
            }

            impl From<Option<$ty>> for Argument {
                fn from(value: Option<$ty>) -> Self {
                    Argument::Single(Value::from(value))
                }
            }

            impl From<Vec<$ty>> for Argument {
                fn from(values: Vec<$ty>) -> Self {
                    Argument::List(values.into_iter().map(Value::from).collect())
                }
            }

            impl From<Vec<Option<$ty>>> for Argument {
                fn from(values: Vec<Option<$ty>>) -> Self {
                    Argument::List(values.into_iter().map(Value::from).collect())
                }
            }
        )*
    };
}

impl_value_from! {
    String => |v| Value::Text(v),
    &str => |v| Value::Text(v.to_string()),
    i64 => |v| Value::Integer(v),
    i32 => |v| Value::Integer(i64::from(v)),
    u32 => |v| Value::Integer(i64::from(v)),
    f64 => |v| Value::Float(v),
    f32 => |v| Value::Float(f64::from(v)),
    bool => |v| Value::Bool(v),
    DateTime<Utc> => |v| Value::Date(v),
    Attachment => |v| Value::Attachment(v),
}

/// Insertion-ordered argument map.
///
/// Inserting an existing key replaces its value in place, keeping the key's
/// original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    entries: Vec<(String, Argument)>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Argument>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert an argument, returning the previous value for the key.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Argument>,
    ) -> Option<Argument> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Argument> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn remove(&mut self, key: &str) -> Option<Argument> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Argument)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Key/value pairs in encoding order: lists expanded, empty keys skipped.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.iter()
            .filter(|(key, _)| !key.is_empty())
            .flat_map(|(key, argument)| argument.values().iter().map(move |v| (key, v)))
    }

    /// Whether any value is an attachment.
    pub fn has_attachments(&self) -> bool {
        self.fields().any(|(_, value)| value.is_attachment())
    }
}

impl<K, V> FromIterator<(K, V)> for Arguments
where
    K: Into<String>,
    V: Into<Argument>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut arguments = Arguments::new();
        for (key, value) in iter {
            arguments.insert(key, value);
        }
        arguments
    }
}
