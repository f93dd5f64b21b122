//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates an in-memory DB seeded with the
//! fixture menu, default config, and full [`AppContext`]. The
//! [`TestHarness::with_server`] constructor starts Axum on a random port for
//! HTTP-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;

use mq_core::config::Config;
use mq_db::pool::init_memory_pool;
use mq_db::seed::seed_fixtures;
use mq_db::{Session, SessionFactory};
use mq_server::context::AppContext;
use mq_server::router::build_router;

/// Test harness wrapping a fully-constructed [`AppContext`] backed by an
/// in-memory database.
pub struct TestHarness {
    pub ctx: AppContext,
    pub sessions: SessionFactory,
}

impl TestHarness {
    /// Create a new harness with the fixture data loaded.
    pub fn new() -> Self {
        let harness = Self::empty();
        let session = harness.session();
        seed_fixtures(&session).expect("failed to seed fixtures");
        drop(session);
        harness
    }

    /// Create a harness over an empty (migrated, unseeded) database.
    pub fn empty() -> Self {
        let db = init_memory_pool().expect("failed to create in-memory pool");
        let sessions = SessionFactory::new(db);
        let ctx = AppContext::new(sessions.clone(), Config::default())
            .expect("failed to build app context");
        Self { ctx, sessions }
    }

    /// Open a session on the harness database.
    pub fn session(&self) -> Session {
        self.sessions.open_session().expect("failed to open session")
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        Self::serve(Self::new()).await
    }

    /// Start an Axum server over an empty database.
    pub async fn with_empty_server() -> (Self, SocketAddr) {
        Self::serve(Self::empty()).await
    }

    async fn serve(harness: Self) -> (Self, SocketAddr) {
        let app = build_router(harness.ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }
}
