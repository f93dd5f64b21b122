//! Sessions: the scope in which object queries run.
//!
//! A [`SessionFactory`] is built once per process from the pool and holds
//! the entity [`Metamodel`]. Each [`Session`] owns one pooled connection for
//! its lifetime and hands it back to the pool when dropped, so a test or an
//! HTTP request opens one session, works through it, and lets it fall out of
//! scope.

use std::sync::Arc;

use mq_core::Result;
use mq_query::{Entity, Metamodel, Query, QueryResult, TypedQuery, Value};
use rusqlite::Connection;

use crate::models::{Category, Menu};
use crate::pool::{get_conn, DbPool, PooledConnection};

/// Metamodel with every entity this crate maps.
pub fn menu_metamodel() -> Metamodel {
    let mut metamodel = Metamodel::new();
    metamodel.register::<Menu>().register::<Category>();
    metamodel
}

/// Process-wide session source. Cheap to clone.
#[derive(Clone)]
pub struct SessionFactory {
    pool: DbPool,
    metamodel: Arc<Metamodel>,
}

impl SessionFactory {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            metamodel: Arc::new(menu_metamodel()),
        }
    }

    /// Check out a connection and wrap it in a session.
    pub fn open_session(&self) -> Result<Session> {
        let conn = get_conn(&self.pool)?;
        tracing::trace!("session opened");
        Ok(Session {
            conn,
            metamodel: Arc::clone(&self.metamodel),
        })
    }
}

/// One unit of work bound to one pooled connection.
pub struct Session {
    conn: PooledConnection,
    metamodel: Arc<Metamodel>,
}

impl Session {
    /// Compile an untyped query.
    pub fn create_query(&self, oql: &str) -> Result<Query<'_>> {
        Ok(Query::new(&self.conn, &self.metamodel, oql)?)
    }

    /// Compile a query whose rows are read as `T`.
    pub fn create_typed_query<T: QueryResult>(&self, oql: &str) -> Result<TypedQuery<'_, T>> {
        Ok(TypedQuery::new(&self.conn, &self.metamodel, oql)?)
    }

    /// Load an entity by primary key.
    pub fn find<E: Entity>(&self, id: impl Into<Value>) -> Result<Option<E>> {
        Ok(mq_query::find(&self.conn, id)?)
    }

    /// Insert a new entity.
    pub fn persist<E: Entity>(&self, entity: &E) -> Result<()> {
        Ok(mq_query::persist(&self.conn, entity)?)
    }

    /// The underlying connection, for transactions and raw SQL.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        tracing::trace!("session closed");
    }
}
