use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use reportgrid_core::CellValue;

use crate::error::BindError;

/// Result of looking a property up on one level of a record
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Value(CellValue),
    /// The field exists but holds nothing
    Null,
    /// No such field at this level
    Unknown,
}

impl<T: Into<CellValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => FieldValue::Value(v.into()),
            None => FieldValue::Null,
        }
    }
}

/// A data record content rows are bound to.
///
/// Mapping-like records answer every key, returning `Null` for absent ones.
/// Structured records answer only their declared fields and may expose an
/// embedded parent whose fields are visible one level up.
pub trait Record {
    fn field(&self, name: &str) -> FieldValue;

    fn parent(&self) -> Option<&dyn Record> {
        None
    }
}

impl<V: Clone + Into<CellValue>> Record for HashMap<String, V> {
    fn field(&self, name: &str) -> FieldValue {
        self.get(name).cloned().into()
    }
}

impl<V: Clone + Into<CellValue>> Record for BTreeMap<String, V> {
    fn field(&self, name: &str) -> FieldValue {
        self.get(name).cloned().into()
    }
}

impl Record for serde_json::Map<String, serde_json::Value> {
    fn field(&self, name: &str) -> FieldValue {
        match self.get(name) {
            Some(value) => json_field(value),
            None => FieldValue::Null,
        }
    }
}

impl Record for serde_json::Value {
    fn field(&self, name: &str) -> FieldValue {
        match self {
            serde_json::Value::Object(map) => map.field(name),
            _ => FieldValue::Unknown,
        }
    }
}

fn json_field(value: &serde_json::Value) -> FieldValue {
    use serde_json::Value;
    match value {
        Value::Null => FieldValue::Null,
        Value::Bool(b) => FieldValue::Value(CellValue::Boolean(*b)),
        Value::Number(n) => {
            let value = if let Some(i) = n.as_i64() {
                CellValue::from(i)
            } else if let Some(u) = n.as_u64() {
                CellValue::from(u)
            } else {
                n.as_f64()
                    .map(CellValue::Number)
                    .unwrap_or_else(|| CellValue::Text(n.to_string()))
            };
            FieldValue::Value(value)
        }
        Value::String(s) => FieldValue::Value(CellValue::Text(s.clone())),
        other => FieldValue::Value(CellValue::Text(other.to_string())),
    }
}

/// Turns a bound value into display text: `(value, record, content row) -> text`
pub type ValueFormatter = Arc<dyn Fn(&str, &dyn Record, usize) -> String + Send + Sync>;

/// Value formatters keyed by property name
#[derive(Clone, Default)]
pub struct Formatters(HashMap<String, ValueFormatter>);

impl Formatters {
    pub fn insert(&mut self, property: impl Into<String>, formatter: ValueFormatter) {
        self.0.insert(property.into(), formatter);
    }

    pub fn get(&self, property: &str) -> Option<&ValueFormatter> {
        self.0.get(property)
    }
}

impl fmt::Debug for Formatters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.0.keys().collect();
        keys.sort();
        f.debug_tuple("Formatters").field(&keys).finish()
    }
}

/// Which level of a record a property was found on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Own,
    Parent,
}

/// Resolves content properties on records.
///
/// Remembers where each property was found so later records try that level
/// first. One binder lives for one export call.
#[derive(Debug, Default)]
pub struct FieldBinder {
    accessors: HashMap<String, Scope>,
}

impl FieldBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `property` on `record`, `None` for null.
    pub fn resolve(
        &mut self,
        record: &dyn Record,
        property: &str,
    ) -> Result<Option<CellValue>, BindError> {
        if let Some(&scope) = self.accessors.get(property) {
            match lookup(record, property, scope) {
                FieldValue::Unknown => {}
                found => return Ok(into_option(found)),
            }
        }

        for scope in [Scope::Own, Scope::Parent] {
            match lookup(record, property, scope) {
                FieldValue::Unknown => continue,
                found => {
                    self.accessors.insert(property.to_string(), scope);
                    return Ok(into_option(found));
                }
            }
        }

        Err(BindError::UnknownField {
            property: property.to_string(),
        })
    }

    /// Display text for `property` on the content row `row`.
    ///
    /// Nulls become empty strings before the formatter runs. Booleans read
    /// `true`/`false`. A property that cannot be resolved is logged and
    /// rendered empty.
    pub fn display(
        &mut self,
        record: &dyn Record,
        property: &str,
        row: usize,
        formatters: &Formatters,
    ) -> String {
        let raw = match self.resolve(record, property) {
            Ok(Some(CellValue::Boolean(b))) => b.to_string(),
            Ok(value) => value.map(|v| v.as_text()).unwrap_or_default(),
            Err(e) => {
                tracing::warn!("Content row {}: {}", row, e);
                return String::new();
            }
        };

        match formatters.get(property) {
            Some(format) => format(&raw, record, row),
            None => raw,
        }
    }
}

fn lookup(record: &dyn Record, property: &str, scope: Scope) -> FieldValue {
    match scope {
        Scope::Own => record.field(property),
        Scope::Parent => record
            .parent()
            .map(|parent| parent.field(property))
            .unwrap_or(FieldValue::Unknown),
    }
}

fn into_option(value: FieldValue) -> Option<CellValue> {
    match value {
        FieldValue::Value(CellValue::Empty) => None,
        FieldValue::Value(v) => Some(v),
        FieldValue::Null | FieldValue::Unknown => None,
    }
}
