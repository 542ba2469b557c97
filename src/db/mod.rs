pub mod employees;
pub mod users;

pub use employees::EmployeeStore;
pub use users::UserStore;

use surrealdb::Surreal;
use surrealdb::engine::any::{self, Any};
use thiserror::Error;

pub type DB = Surreal<Any>;

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Anything `surrealdb::engine::any` understands: `ws://host:8000`, `mem://`, ...
    pub url: String,
    /// Root credentials. Embedded engines run without them.
    pub credentials: Option<(String, String)>,
    pub namespace: String,
    pub database: String,
}

impl DatabaseConfig {
    /// A throwaway embedded database. Each call gets its own datastore.
    pub fn in_memory() -> Self {
        Self {
            url: "mem://".to_string(),
            credentials: None,
            namespace: "staffdesk".to_string(),
            database: "hr".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Database(#[from] surrealdb::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Unique indexes back the store invariants even if two requests race past
/// the application-level checks.
const SCHEMA: &str = "
    DEFINE INDEX IF NOT EXISTS users_username ON TABLE users COLUMNS username UNIQUE;
    DEFINE INDEX IF NOT EXISTS employees_employee_id ON TABLE employees COLUMNS employee_id UNIQUE;
";

pub async fn connect(config: &DatabaseConfig) -> StoreResult<DB> {
    // 1. Connect
    let db = any::connect(config.url.as_str()).await?;

    // 2. Authenticate, if this is a server that wants it
    if let Some((username, password)) = &config.credentials {
        db.signin(surrealdb::opt::auth::Root {
            username: username.as_str(),
            password: password.as_str(),
        })
        .await?;
    }

    // 3. Select namespace and database
    db.use_ns(config.namespace.as_str())
        .use_db(config.database.as_str())
        .await?;

    // 4. Indexes
    db.query(SCHEMA).await?.check()?;

    tracing::debug!(
        url = %config.url,
        namespace = %config.namespace,
        database = %config.database,
        "database ready"
    );

    Ok(db)
}

/// SurrealDB reports unique index violations as a plain query error.
pub(crate) fn is_unique_violation(err: &surrealdb::Error) -> bool {
    err.to_string().contains("already contains")
}
