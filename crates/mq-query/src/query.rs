//! Executable query objects bound to a SQLite connection.
//!
//! [`Query`] returns dynamically-typed [`Value`]s; [`TypedQuery`] checks at
//! creation time that its result type can hold the projected columns and
//! then returns that type directly.

use std::collections::HashMap;
use std::marker::PhantomData;

use rusqlite::types::ValueRef;
use rusqlite::Connection;

use crate::ast::ParamRef;
use crate::error::{QueryError, Result};
use crate::metamodel::{Entity, FieldType, Metamodel};
use crate::parser::parse;
use crate::translate::{translate, Binding, CompiledQuery, Projection};
use crate::value::Value;

/// Parse and translate query text.
pub fn compile(metamodel: &Metamodel, oql: &str) -> Result<CompiledQuery> {
    let statement = parse(oql)?;
    let compiled = translate(metamodel, &statement)?;
    tracing::debug!(oql, sql = %compiled.sql, "compiled object query");
    Ok(compiled)
}

// ---------------------------------------------------------------------------
// Result mapping
// ---------------------------------------------------------------------------

/// A type that rows of a query can be read into.
pub trait QueryResult: Sized {
    /// Name used in type-mismatch errors.
    const TYPE_NAME: &'static str;

    /// Whether rows of `projection` can be read as `Self`.
    fn accepts(projection: &Projection) -> bool;

    /// Like [`accepts`](Self::accepts), with nullable columns allowed.
    /// `Option<Self>` checks against this.
    fn accepts_nullable(projection: &Projection) -> bool {
        Self::accepts(projection)
    }

    fn read_row(row: &rusqlite::Row<'_>, projection: &Projection) -> rusqlite::Result<Self>;
}

impl<E: Entity> QueryResult for E {
    const TYPE_NAME: &'static str = "entity";

    fn accepts(projection: &Projection) -> bool {
        matches!(projection, Projection::Entity(meta) if meta.name == E::meta().name)
    }

    fn read_row(row: &rusqlite::Row<'_>, _projection: &Projection) -> rusqlite::Result<Self> {
        <E as Entity>::from_row(row)
    }
}

macro_rules! scalar_result {
    ($ty:ty, $name:literal, $($field_type:pat_param)|+) => {
        impl QueryResult for $ty {
            const TYPE_NAME: &'static str = $name;

            fn accepts(projection: &Projection) -> bool {
                matches!(projection.single_field(), Some(field) if !field.nullable)
                    && Self::accepts_nullable(projection)
            }

            fn accepts_nullable(projection: &Projection) -> bool {
                matches!(projection.single_field_type(), Some($($field_type)|+))
            }

            fn read_row(
                row: &rusqlite::Row<'_>,
                _projection: &Projection,
            ) -> rusqlite::Result<Self> {
                row.get(0)
            }
        }
    };
}

scalar_result!(String, "String", FieldType::Text);
scalar_result!(i64, "i64", FieldType::Integer);
scalar_result!(i32, "i32", FieldType::Integer);
scalar_result!(f64, "f64", FieldType::Real | FieldType::Integer);
scalar_result!(bool, "bool", FieldType::Integer);

/// A single nullable column; SQL NULL reads as `None`.
impl<T: QueryResult> QueryResult for Option<T> {
    const TYPE_NAME: &'static str = "Option";

    fn accepts(projection: &Projection) -> bool {
        T::accepts_nullable(projection)
    }

    fn read_row(row: &rusqlite::Row<'_>, projection: &Projection) -> rusqlite::Result<Self> {
        if let Projection::Fields(fields) = projection {
            if fields.len() == 1 && matches!(row.get_ref(0)?, ValueRef::Null) {
                return Ok(None);
            }
        }
        T::read_row(row, projection).map(Some)
    }
}

impl QueryResult for Value {
    const TYPE_NAME: &'static str = "Value";

    fn accepts(_projection: &Projection) -> bool {
        true
    }

    fn read_row(row: &rusqlite::Row<'_>, projection: &Projection) -> rusqlite::Result<Self> {
        match projection {
            Projection::Entity(meta) => {
                let mut fields = Vec::with_capacity(meta.fields.len());
                for (idx, field) in meta.fields.iter().enumerate() {
                    fields.push((field.name, Value::from_column(row, idx)?));
                }
                Ok(Value::Entity {
                    entity: meta.name,
                    fields,
                })
            }
            Projection::Fields(fields) if fields.len() == 1 => Value::from_column(row, 0),
            Projection::Fields(fields) => {
                let mut values = Vec::with_capacity(fields.len());
                for idx in 0..fields.len() {
                    values.push(Value::from_column(row, idx)?);
                }
                Ok(Value::Tuple(values))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Query objects
// ---------------------------------------------------------------------------

/// A compiled query whose results are read as `T`.
pub struct TypedQuery<'conn, T> {
    conn: &'conn Connection,
    compiled: CompiledQuery,
    params: HashMap<ParamRef, Value>,
    _result: PhantomData<fn() -> T>,
}

/// A compiled query whose results are untyped [`Value`]s.
pub type Query<'conn> = TypedQuery<'conn, Value>;

impl<'conn, T: QueryResult> TypedQuery<'conn, T> {
    /// Compile `oql` and check that its projection fits `T`.
    pub fn new(conn: &'conn Connection, metamodel: &Metamodel, oql: &str) -> Result<Self> {
        let compiled = compile(metamodel, oql)?;
        if !T::accepts(&compiled.projection) {
            return Err(QueryError::TypeMismatch {
                expected: T::TYPE_NAME,
                projection: compiled.projection.describe(),
            });
        }
        Ok(Self {
            conn,
            compiled,
            params: HashMap::new(),
            _result: PhantomData,
        })
    }

    /// Bind a named parameter (`:name`).
    #[must_use]
    pub fn set_parameter(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.params
            .insert(ParamRef::Named(name.to_string()), value.into());
        self
    }

    /// Bind a positional parameter (`?1`, `?2`, ...).
    #[must_use]
    pub fn set_position(mut self, position: u32, value: impl Into<Value>) -> Self {
        self.params.insert(ParamRef::Positional(position), value.into());
        self
    }

    /// The generated SQL text.
    pub fn sql(&self) -> &str {
        &self.compiled.sql
    }

    pub fn projection(&self) -> &Projection {
        &self.compiled.projection
    }

    /// Run the query and expect exactly one row.
    pub fn single_result(&self) -> Result<T> {
        let values = self.bound_values()?;
        let mut stmt = self.conn.prepare(&self.compiled.sql)?;
        let mut rows = stmt.query(rusqlite::params_from_iter(values.iter()))?;

        let first = match rows.next()? {
            Some(row) => T::read_row(row, &self.compiled.projection)?,
            None => return Err(QueryError::NoResult),
        };
        if rows.next()?.is_some() {
            return Err(QueryError::NonUniqueResult);
        }
        Ok(first)
    }

    /// Run the query and collect every row; empty when nothing matches.
    pub fn result_list(&self) -> Result<Vec<T>> {
        let values = self.bound_values()?;
        let mut stmt = self.conn.prepare(&self.compiled.sql)?;
        let projection = &self.compiled.projection;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(values.iter()), |row| {
                T::read_row(row, projection)
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Resolve every placeholder to a concrete value.
    fn bound_values(&self) -> Result<Vec<Value>> {
        let expected = self.compiled.parameters();
        if let Some(extra) = self.params.keys().find(|p| !expected.contains(*p)) {
            return Err(QueryError::UnknownParameter(extra.to_string()));
        }

        self.compiled
            .bindings
            .iter()
            .map(|binding| match binding {
                Binding::Literal(value) => Ok(value.clone()),
                Binding::Param(param) => self
                    .params
                    .get(param)
                    .cloned()
                    .ok_or_else(|| QueryError::UnboundParameter(param.to_string())),
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Entity operations
// ---------------------------------------------------------------------------

/// Load one entity by primary key.
pub fn find<E: Entity>(conn: &Connection, id: impl Into<Value>) -> Result<Option<E>> {
    let meta = E::meta();
    let sql = format!(
        "SELECT {} FROM {} WHERE {} = ?1",
        meta.column_list(None),
        meta.table,
        meta.id()?.column
    );
    tracing::debug!(entity = meta.name, %sql, "find by id");

    let id = id.into();
    match conn.query_row(&sql, [&id], <E as Entity>::from_row) {
        Ok(entity) => Ok(Some(entity)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Insert a new entity row.
pub fn persist<E: Entity>(conn: &Connection, entity: &E) -> Result<()> {
    let meta = E::meta();
    let placeholders: Vec<String> = (1..=meta.fields.len()).map(|i| format!("?{i}")).collect();
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        meta.table,
        meta.column_list(None),
        placeholders.join(", ")
    );
    tracing::debug!(entity = meta.name, %sql, "persist");

    let values = entity.values();
    conn.execute(&sql, rusqlite::params_from_iter(values.iter()))?;
    Ok(())
}
