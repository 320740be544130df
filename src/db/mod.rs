use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;

/// Establish a pooled connection to the catalog database.
///
/// In-memory `SQLite` URLs are capped at a single connection so every
/// request sees the same database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> anyhow::Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(database_url);
    if database_url.contains(":memory:") {
        opts.max_connections(1).min_connections(1);
    } else {
        opts.max_connections(20).min_connections(2);
    }
    opts.connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(false);

    let db = Database::connect(opts).await?;
    tracing::debug!(url_scheme = scheme(database_url), "database pool ready");
    Ok(db)
}

/// The URL scheme, so logs never carry credentials.
fn scheme(database_url: &str) -> &str {
    database_url.split(':').next().unwrap_or("unknown")
}
