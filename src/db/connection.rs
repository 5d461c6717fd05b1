//! Async database connection.

use diesel_async::{AsyncConnection, AsyncPgConnection};

use crate::config::DatabaseConfig;
use crate::error::{AppError, AppResult};

/// Opens a connection using the configured URL or the credential file.
///
/// # Errors
///
/// - `AppError::Configuration` - If no URL can be resolved
/// - `AppError::Database` - If the server refuses the connection or does not
///   answer within `connection_timeout`
///
/// # Example
///
/// ```ignore
/// let mut conn = establish_connection(&settings.database).await?;
/// ```
pub async fn establish_connection(config: &DatabaseConfig) -> AppResult<AsyncPgConnection> {
    let url = config.resolve_url()?;
    let timeout = config.connection_timeout();

    tracing::debug!(timeout_secs = timeout.as_secs(), "Connecting to database");
    match tokio::time::timeout(timeout, AsyncPgConnection::establish(&url)).await {
        Ok(Ok(conn)) => Ok(conn),
        Ok(Err(e)) => Err(AppError::database("connect", e)),
        Err(_) => Err(AppError::database(
            "connect",
            anyhow::anyhow!("no answer within {}s", timeout.as_secs()),
        )),
    }
}
