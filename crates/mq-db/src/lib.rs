//! mq-db: SQLite persistence for menuql.
//!
//! Provides connection pooling, embedded migrations, the menu entities, a
//! session layer over the object-query engine, and repository functions.

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
pub mod seed;
pub mod session;

pub use session::{Session, SessionFactory};
