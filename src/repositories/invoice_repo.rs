//! Receivables query.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::query_builder::{BoxedSqlQuery, SqlQuery};
use diesel::sql_types::{BigInt, Integer, Nullable};
use diesel_async::RunQueryDsl;

use crate::config::DatabaseConfig;
use crate::db::establish_connection;
use crate::error::{AppError, AppResult};
use crate::models::{InvoiceRecord, InvoiceRow};
use crate::services::recipients::{RecipientQuery, RecipientSource};

/// Open or partially paid invoices with a balance, due on a given day.
///
/// `$1` days ahead of today, `$2` establishment, `$3` limit (NULL for all).
const DUE_INVOICES_SQL: &str = "\
SELECT
    CAST(c.razao_social AS TEXT) AS debtor_name,
    CAST(r.num_documento AS TEXT) AS document_number,
    CAST(r.vlr_documento AS NUMERIC) AS amount,
    CAST(r.dat_vencimento AS DATE) AS due_date,
    CAST(r.cod_barra AS TEXT) AS barcode,
    CAST(c.fone1 AS TEXT) AS phone_raw
FROM ctrec r
INNER JOIN clien c ON r.cod_cliente = c.codigo
WHERE r.status IN ('A', 'P')
  AND r.vlr_saldo > 0
  AND CAST(r.dat_vencimento AS DATE) = CURRENT_DATE + $1
  AND r.cod_estabe = $2
ORDER BY r.dat_vencimento, c.razao_social
LIMIT $3";

type DueInvoicesQuery = BoxedSqlQuery<'static, Pg, SqlQuery>;

/// Recipient source backed by the ERP database.
///
/// Opens one connection per fetch; the connection is dropped when the fetch
/// returns, on success and on error.
#[derive(Debug, Clone)]
pub struct PgRecipientSource {
    database: DatabaseConfig,
}

impl PgRecipientSource {
    pub fn new(database: DatabaseConfig) -> Self {
        Self { database }
    }

    fn build_query(query: &RecipientQuery) -> DueInvoicesQuery {
        diesel::sql_query(DUE_INVOICES_SQL)
            .into_boxed::<Pg>()
            .bind::<Integer, _>(query.due_in_days)
            .bind::<Integer, _>(query.establishment)
            .bind::<Nullable<BigInt>, _>(query.limit)
    }
}

#[async_trait]
impl RecipientSource for PgRecipientSource {
    async fn fetch(&self, query: &RecipientQuery) -> AppResult<Vec<InvoiceRecord>> {
        let mut conn = establish_connection(&self.database).await?;

        let rows: Vec<InvoiceRow> = Self::build_query(query)
            .load(&mut conn)
            .await
            .map_err(|e| AppError::database("fetch due invoices", e))?;

        tracing::info!(
            due_in_days = query.due_in_days,
            establishment = query.establishment,
            count = rows.len(),
            "Fetched due invoices"
        );
        Ok(rows.into_iter().map(InvoiceRecord::from).collect())
    }

    fn describe(&self) -> String {
        "database".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_binds_parameters_in_order() {
        let query = RecipientQuery {
            due_in_days: 7,
            limit: Some(3),
            establishment: 0,
        };
        let sql = PgRecipientSource::build_query(&query);

        let rendered = diesel::debug_query::<Pg, _>(&sql).to_string();
        assert!(rendered.contains("CURRENT_DATE + $1"));
        assert!(rendered.contains("r.cod_estabe = $2"));
        assert!(rendered.contains("LIMIT $3"));
    }

    #[test]
    fn test_query_filters_open_invoices_with_balance() {
        assert!(DUE_INVOICES_SQL.contains("r.status IN ('A', 'P')"));
        assert!(DUE_INVOICES_SQL.contains("r.vlr_saldo > 0"));
    }
}
