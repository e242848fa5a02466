//! Connection pools per engine, startup ping, and the per-operation deadline.

use crate::error::AdminError;
use crate::sql::Engine;
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{PgPool, SqlitePool};
use std::future::Future;
use std::time::Duration;

#[derive(Clone, Debug)]
pub enum DbPool {
    Postgres(PgPool),
    Sqlite(SqlitePool),
}

/// Connection factory shared by every executor operation. Cloning is cheap.
#[derive(Clone, Debug)]
pub struct Database {
    engine: Engine,
    pool: DbPool,
    statement_timeout: Duration,
}

/// Acquire one pooled connection for the body; it is returned to the pool when the
/// body finishes. The body is type-checked once per engine.
macro_rules! with_connection {
    ($db:expr, $conn:ident => $body:expr) => {
        match $db.pool() {
            $crate::db::DbPool::Postgres(pool) => {
                let mut $conn = pool.acquire().await?;
                $body
            }
            $crate::db::DbPool::Sqlite(pool) => {
                let mut $conn = pool.acquire().await?;
                $body
            }
        }
    };
}
pub(crate) use with_connection;

impl Database {
    /// Open a pool and ping it. Failure here is fatal for the caller at startup.
    pub async fn connect(
        uri: &str,
        engine: Engine,
        max_connections: u32,
        statement_timeout: Duration,
    ) -> Result<Self, AdminError> {
        let pool = match engine {
            Engine::Postgres => DbPool::Postgres(
                PgPoolOptions::new()
                    .max_connections(max_connections)
                    .acquire_timeout(statement_timeout)
                    .connect(uri)
                    .await
                    .map_err(|e| AdminError::Connection(e.to_string()))?,
            ),
            Engine::Sqlite => {
                let mut options = SqlitePoolOptions::new().acquire_timeout(statement_timeout);
                // every in-memory connection is a separate database
                options = if uri.contains(":memory:") || uri.contains("mode=memory") {
                    options.max_connections(1).idle_timeout(None).max_lifetime(None)
                } else {
                    options.max_connections(max_connections)
                };
                DbPool::Sqlite(
                    options
                        .connect(uri)
                        .await
                        .map_err(|e| AdminError::Connection(e.to_string()))?,
                )
            }
        };
        let db = Database {
            engine,
            pool,
            statement_timeout,
        };
        db.ping().await?;
        tracing::info!(engine = %engine, "database connected");
        Ok(db)
    }

    /// Wrap an existing pool (e.g. one shared with the host application).
    pub fn from_pool(pool: DbPool, statement_timeout: Duration) -> Self {
        let engine = match &pool {
            DbPool::Postgres(_) => Engine::Postgres,
            DbPool::Sqlite(_) => Engine::Sqlite,
        };
        Database {
            engine,
            pool,
            statement_timeout,
        }
    }

    pub fn engine(&self) -> Engine {
        self.engine
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn statement_timeout(&self) -> Duration {
        self.statement_timeout
    }

    pub async fn ping(&self) -> Result<(), AdminError> {
        self.run(async {
            with_connection!(self, conn => {
                sqlx::query("SELECT 1")
                    .execute(&mut *conn)
                    .await
                    .map_err(|e| AdminError::Connection(e.to_string()))?;
            });
            Ok::<_, AdminError>(())
        })
        .await
    }

    /// Run one operation under the statement deadline. Dropping the future on expiry
    /// aborts the in-flight statement and releases its connection.
    pub async fn run<T, F>(&self, op: F) -> Result<T, AdminError>
    where
        F: Future<Output = Result<T, AdminError>>,
    {
        tokio::time::timeout(self.statement_timeout, op)
            .await
            .map_err(|_| AdminError::Timeout(self.statement_timeout))?
    }

    /// Execute raw SQL with no parameters (fixtures, demo seeding). Not reachable from
    /// client input.
    pub async fn execute_script(&self, sql: &str) -> Result<(), AdminError> {
        tracing::debug!(sql = %sql, "script");
        self.run(async {
            with_connection!(self, conn => {
                sqlx::query(sql).execute(&mut *conn).await?;
            });
            Ok::<_, AdminError>(())
        })
        .await
    }
}
