//! mq-query: an object-query language over SQLite.
//!
//! Queries name entities and fields (`SELECT m.menuName FROM Menu m WHERE
//! m.menuCode = 7`) rather than tables and columns. Text goes through the
//! [`lexer`] and [`parser`] into an [`ast::SelectStatement`], which
//! [`translate`] resolves against a [`Metamodel`] into parameterised SQL.
//! [`TypedQuery`] and [`Query`] then execute it on a borrowed connection.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod metamodel;
pub mod parser;
pub mod query;
pub mod translate;
pub mod value;

pub use error::{QueryError, Result};
pub use metamodel::{Entity, EntityMeta, FieldMeta, FieldType, Metamodel};
pub use query::{compile, find, persist, Query, QueryResult, TypedQuery};
pub use translate::{CompiledQuery, Projection};
pub use value::Value;
