//! Debtor phone maintenance.

use diesel::sql_types::Text;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::config::DatabaseConfig;
use crate::db::establish_connection;
use crate::error::{AppError, AppResult};
use crate::models::PhoneUpdate;

const UPDATE_PHONE_SQL: &str = "UPDATE clien SET fone1 = $1 WHERE razao_social = $2";

/// Writes to the debtor table
#[derive(Debug, Clone)]
pub struct ClientRepository {
    database: DatabaseConfig,
}

impl ClientRepository {
    pub fn new(database: DatabaseConfig) -> Self {
        Self { database }
    }

    /// Applies every update in one transaction.
    ///
    /// # Returns
    /// The number of rows each update touched, in input order. Nothing is
    /// written if any update fails.
    pub async fn apply_phone_updates(&self, updates: &[PhoneUpdate]) -> AppResult<Vec<usize>> {
        let mut conn = establish_connection(&self.database).await?;

        let counts = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let mut counts = Vec::with_capacity(updates.len());
                    for update in updates {
                        let affected = diesel::sql_query(UPDATE_PHONE_SQL)
                            .bind::<Text, _>(update.phone.as_str())
                            .bind::<Text, _>(update.debtor_name.as_str())
                            .execute(conn)
                            .await?;
                        tracing::debug!(debtor = %update.debtor_name, affected, "Phone updated");
                        counts.push(affected);
                    }
                    Ok(counts)
                }
                .scope_boxed()
            })
            .await
            .map_err(|e| AppError::database("update debtor phones", e))?;

        tracing::info!(
            updates = updates.len(),
            rows = counts.iter().sum::<usize>(),
            "Phone updates committed"
        );
        Ok(counts)
    }
}
