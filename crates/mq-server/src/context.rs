//! Application context shared by all route handlers via Axum state.

use std::sync::Arc;

use mq_core::config::Config;
use mq_core::Result;
use mq_db::SessionFactory;

use crate::views::Views;

/// Cheaply cloneable: the session factory wraps the pool and metamodel in
/// `Arc`s, and the rest is behind `Arc` here.
#[derive(Clone)]
pub struct AppContext {
    /// Opens one session per request.
    pub sessions: SessionFactory,
    /// Immutable application configuration snapshot.
    pub config: Arc<Config>,
    /// Compiled view templates.
    pub views: Arc<Views>,
}

impl AppContext {
    pub fn new(sessions: SessionFactory, config: Config) -> Result<Self> {
        Ok(Self {
            sessions,
            config: Arc::new(config),
            views: Arc::new(Views::new()?),
        })
    }
}
