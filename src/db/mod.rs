use std::future::Future;
use std::time::Duration;

use migration::{Migrator, MigratorTrait, SCHEMA_VERSION};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, DbErr, Statement,
};
use tokio::sync::{broadcast, watch};

use crate::errors::AppError;
use crate::live::{ChangeNotifier, LiveQuery, Table};

/// Owned handle to the local store.
///
/// Constructed once by the caller and cloned into every repository; clones
/// share the same connection pool and change notifier.
#[derive(Debug, Clone)]
pub struct Store {
    db: DatabaseConnection,
    changes: ChangeNotifier,
}

impl Store {
    /// Open (or create) the store at `database_url` and bring its schema to
    /// the current version.
    ///
    /// A store stamped with any other non-zero schema version is wiped and
    /// recreated; there is no data migration.
    ///
    /// # Errors
    ///
    /// [`AppError::Config`] for a non-SQLite URL; otherwise an error if the
    /// connection cannot be established or the schema cannot be applied.
    pub async fn open(database_url: &str) -> Result<Self, AppError> {
        if !database_url.starts_with("sqlite:") {
            return Err(AppError::Config(format!(
                "DATABASE_URL must be a sqlite: URL, got {database_url:?}"
            )));
        }

        let db = Database::connect(connect_options(database_url)).await?;
        Self::from_connection(db).await
    }

    /// Wrap an existing connection, enabling foreign keys and applying the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be applied.
    pub async fn from_connection(db: DatabaseConnection) -> Result<Self, AppError> {
        db.execute_unprepared("PRAGMA foreign_keys = ON").await?;
        prepare_schema(&db).await?;

        Ok(Self {
            db,
            changes: ChangeNotifier::new(),
        })
    }

    #[must_use]
    pub const fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Announce committed changes to `tables`.
    pub fn notify(&self, tables: &[Table]) {
        tracing::trace!(?tables, "tables changed");
        self.changes.notify(tables);
    }

    /// Run `query` now and again after every committed change to `tables`.
    ///
    /// The refresh task ends when every [`LiveQuery`] clone is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial query fails.
    pub async fn observe<T, F, Fut>(
        &self,
        tables: &[Table],
        query: F,
    ) -> Result<LiveQuery<T>, AppError>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(DatabaseConnection) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Vec<T>, DbErr>> + Send + 'static,
    {
        // Subscribe before the first read so no commit slips between the two.
        let mut changes = self.changes.subscribe();
        let initial = query(self.db.clone()).await?;
        let (tx, rx) = watch::channel(initial);

        let db = self.db.clone();
        let tables = tables.to_vec();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    () = tx.closed() => break,
                    change = changes.recv() => match change {
                        Ok(table) if !tables.contains(&table) => continue,
                        Ok(_) => {}
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::debug!(skipped, "live query lagged, refreshing once");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                }

                match query(db.clone()).await {
                    Ok(rows) => {
                        if tx.send(rows).is_err() {
                            break;
                        }
                    }
                    Err(err) => tracing::warn!(error = %err, ?tables, "live query refresh failed"),
                }
            }
            tracing::trace!(?tables, "live query stopped");
        });

        Ok(LiveQuery::new(rx))
    }

    /// Schema version stamped in the database file.
    ///
    /// # Errors
    ///
    /// Returns an error if the pragma cannot be read.
    pub async fn schema_version(&self) -> Result<i32, AppError> {
        Ok(read_user_version(&self.db).await?)
    }

    /// Close the underlying connection pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool fails to shut down cleanly.
    pub async fn close(self) -> Result<(), AppError> {
        self.db.close().await?;
        Ok(())
    }
}

/// Lifetime for in-memory connections; recycling one would drop the database.
const IN_MEMORY_CONNECTION_LIFETIME: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

fn connect_options(database_url: &str) -> ConnectOptions {
    let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");

    let mut opts = ConnectOptions::new(database_url);
    // Every pooled connection to an in-memory database is its own database.
    opts.max_connections(if in_memory { 1 } else { 4 })
        .min_connections(1)
        .connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);
    if in_memory {
        // Unset values fall back to the pool's 10 and 30 minute defaults.
        opts.idle_timeout(IN_MEMORY_CONNECTION_LIFETIME)
            .max_lifetime(IN_MEMORY_CONNECTION_LIFETIME);
    }
    opts
}

async fn read_user_version(db: &DatabaseConnection) -> Result<i32, DbErr> {
    let row = db
        .query_one(Statement::from_string(
            DbBackend::Sqlite,
            "PRAGMA user_version",
        ))
        .await?;
    row.map_or(Ok(0), |row| row.try_get::<i32>("", "user_version"))
}

async fn prepare_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let version = read_user_version(db).await?;

    if version == 0 || version == SCHEMA_VERSION {
        tracing::debug!(version, "applying pending migrations");
        Migrator::up(db, None).await?;
    } else {
        tracing::warn!(
            found = version,
            expected = SCHEMA_VERSION,
            "schema version mismatch, recreating store"
        );
        Migrator::fresh(db).await?;
    }

    db.execute_unprepared(&format!("PRAGMA user_version = {SCHEMA_VERSION}"))
        .await?;
    Ok(())
}
