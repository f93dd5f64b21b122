//! Dynamically-typed values flowing in and out of object queries.

use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::ToSql;

use mq_core::{CategoryCode, MenuCode};

/// A query parameter or an untyped query result.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    /// One row of a multi-column scalar projection.
    Tuple(Vec<Value>),
    /// A whole entity read through an untyped query.
    Entity {
        entity: &'static str,
        fields: Vec<(&'static str, Value)>,
    },
}

impl Value {
    /// Read a column as whatever SQLite stored.
    pub(crate) fn from_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Self> {
        Ok(match row.get_ref(idx)? {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(v) => Value::Integer(v),
            ValueRef::Real(v) => Value::Real(v),
            ValueRef::Text(bytes) => Value::Text(
                std::str::from_utf8(bytes)
                    .map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            idx,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?
                    .to_string(),
            ),
            ValueRef::Blob(_) => {
                return Err(rusqlite::Error::InvalidColumnType(
                    idx,
                    "blob".into(),
                    rusqlite::types::Type::Blob,
                ))
            }
        })
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Look up a field of an [`Value::Entity`] by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Entity { fields, .. } => fields.iter().find(|(n, _)| *n == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Render as JSON for command-line output.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Integer(v) => serde_json::json!(v),
            Value::Real(v) => serde_json::json!(v),
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::Tuple(values) => {
                serde_json::Value::Array(values.iter().map(Value::to_json).collect())
            }
            Value::Entity { fields, .. } => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(name, v)| ((*name).to_string(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Integer(v) => write!(f, "{v}"),
            Value::Real(v) => write!(f, "{v}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Tuple(values) => {
                write!(f, "(")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, ")")
            }
            Value::Entity { entity, fields } => {
                write!(f, "{entity}(")?;
                for (i, (name, v)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}={v}")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            Value::Null => Ok(ToSqlOutput::Borrowed(ValueRef::Null)),
            Value::Integer(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Integer(*v))),
            Value::Real(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Real(*v))),
            Value::Text(s) => Ok(ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes()))),
            Value::Tuple(_) | Value::Entity { .. } => Err(rusqlite::Error::ToSqlConversionFailure(
                "composite values cannot be bound as parameters".into(),
            )),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<MenuCode> for Value {
    fn from(code: MenuCode) -> Self {
        Value::Integer(code.get())
    }
}

impl From<CategoryCode> for Value {
    fn from(code: CategoryCode) -> Self {
        Value::Integer(code.get())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
