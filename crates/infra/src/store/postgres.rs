//! Postgres-backed invoice store.
//!
//! Maps to the `invoices` table:
//!
//! | column        | type   | notes                                  |
//! |---------------|--------|----------------------------------------|
//! | `id`          | text   | primary key, `gen_random_uuid()` default |
//! | `customer_id` | text   | not checked against any customer table |
//! | `amount`      | bigint | minor units                            |
//! | `status`      | text   | `pending` or `paid`                    |
//! | `date`        | text   | `YYYY-MM-DD`                           |
//!
//! ## Error Mapping
//!
//! | SQLx Error | StoreError |
//! |------------|------------|
//! | `Database` | `Query` |
//! | `PoolClosed`, `PoolTimedOut`, `Io`, `Tls` | `Unavailable` |
//! | `ColumnDecode`, `ColumnNotFound`, `Decode` | `Decode` |
//! | anything else | `Query` |

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use tracing::instrument;

use dashboard_core::{CustomerId, InvoiceId};
use dashboard_invoicing::{AmountCents, Invoice, InvoiceChanges, InvoiceStatus, NewInvoice, parse_date};

use super::{InvoiceStore, StoreError};

// `id` is compared as-is so lookups stay on the primary-key index.
const INSERT_SQL: &str = r#"
    INSERT INTO invoices (customer_id, amount, status, date)
    VALUES ($1, $2, $3, $4)
    RETURNING id
"#;

const UPDATE_SQL: &str = r#"
    UPDATE invoices
    SET customer_id = $1, amount = $2, status = $3
    WHERE id = $4
"#;

const DELETE_SQL: &str = "DELETE FROM invoices WHERE id = $1";

const GET_SQL: &str = r#"
    SELECT id, customer_id, amount, status, date
    FROM invoices
    WHERE id = $1
"#;

const LIST_SQL: &str = r#"
    SELECT id, customer_id, amount, status, date
    FROM invoices
    ORDER BY date DESC, id DESC
"#;

/// Invoice store over a SQLx connection pool.
///
/// The pool is `Send + Sync`; each call checks out a connection for exactly
/// one statement.
#[derive(Debug, Clone)]
pub struct PostgresInvoiceStore {
    pool: Arc<PgPool>,
}

impl PostgresInvoiceStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Open a pool against `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create the `invoices` table if it is missing. Development convenience;
    /// production schemas are managed outside this service.
    pub async fn ensure_table(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS invoices (
                id TEXT PRIMARY KEY DEFAULT gen_random_uuid()::text,
                customer_id TEXT NOT NULL,
                amount BIGINT NOT NULL,
                status TEXT NOT NULL,
                date TEXT NOT NULL
            )
            "#,
        )
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_table", e))?;
        Ok(())
    }
}

#[async_trait]
impl InvoiceStore for PostgresInvoiceStore {
    #[instrument(skip(self, invoice), fields(customer_id = %invoice.customer_id), err)]
    async fn insert(&self, invoice: NewInvoice) -> Result<Invoice, StoreError> {
        let row = sqlx::query(INSERT_SQL)
        .bind(invoice.customer_id.as_str())
        .bind(invoice.amount.cents())
        .bind(invoice.status.as_str())
        .bind(invoice.date.format(dashboard_invoicing::DATE_FORMAT).to_string())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_invoice", e))?;

        let id: String = row
            .try_get("id")
            .map_err(|e| StoreError::Decode(format!("id: {e}")))?;
        Ok(invoice.into_invoice(InvoiceId::new(id)))
    }

    #[instrument(skip(self, changes), fields(invoice_id = %id), err)]
    async fn update(&self, id: &InvoiceId, changes: InvoiceChanges) -> Result<u64, StoreError> {
        let result = sqlx::query(UPDATE_SQL)
        .bind(changes.customer_id.as_str())
        .bind(changes.amount.cents())
        .bind(changes.status.as_str())
        .bind(id.as_str())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_invoice", e))?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self), fields(invoice_id = %id), err)]
    async fn delete(&self, id: &InvoiceId) -> Result<u64, StoreError> {
        let result = sqlx::query(DELETE_SQL)
            .bind(id.as_str())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_invoice", e))?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self), fields(invoice_id = %id), err)]
    async fn get(&self, id: &InvoiceId) -> Result<Option<Invoice>, StoreError> {
        let row = sqlx::query(GET_SQL)
        .bind(id.as_str())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_invoice", e))?;

        row.as_ref().map(invoice_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn list(&self) -> Result<Vec<Invoice>, StoreError> {
        let rows = sqlx::query(LIST_SQL)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_invoices", e))?;

        rows.iter().map(invoice_from_row).collect()
    }
}

fn invoice_from_row(row: &PgRow) -> Result<Invoice, StoreError> {
    let decode = |col: &str, e: sqlx::Error| StoreError::Decode(format!("{col}: {e}"));

    let id: String = row.try_get("id").map_err(|e| decode("id", e))?;
    let customer_id: String = row.try_get("customer_id").map_err(|e| decode("customer_id", e))?;
    let amount: i64 = row.try_get("amount").map_err(|e| decode("amount", e))?;
    let status: String = row.try_get("status").map_err(|e| decode("status", e))?;
    let date: String = row.try_get("date").map_err(|e| decode("date", e))?;

    let status = InvoiceStatus::parse(&status)
        .ok_or_else(|| StoreError::Decode(format!("status: unknown value '{status}'")))?;
    let date = parse_date(&date).map_err(|e| StoreError::Decode(format!("date: {e}")))?;

    Ok(Invoice {
        id: InvoiceId::new(id),
        customer_id: CustomerId::new(customer_id),
        amount: AmountCents::new(amount),
        status,
        date,
    })
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let code = db_err.code().map(|c| c.to_string()).unwrap_or_default();
            StoreError::Query(format!(
                "database error in {operation} ({code}): {}",
                db_err.message()
            ))
        }
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {operation}"))
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("timed out acquiring connection in {operation}"))
        }
        sqlx::Error::Io(e) => StoreError::Unavailable(format!("io error in {operation}: {e}")),
        sqlx::Error::Tls(e) => StoreError::Unavailable(format!("tls error in {operation}: {e}")),
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::Decode(_) => {
            StoreError::Decode(format!("decode error in {operation}: {err}"))
        }
        _ => StoreError::Query(format!("sqlx error in {operation}: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_errors_map_to_unavailable() {
        assert!(matches!(
            map_sqlx_error("list_invoices", sqlx::Error::PoolClosed),
            StoreError::Unavailable(msg) if msg.contains("list_invoices")
        ));
        assert!(matches!(
            map_sqlx_error("insert_invoice", sqlx::Error::PoolTimedOut),
            StoreError::Unavailable(_)
        ));
    }

    #[test]
    fn missing_column_maps_to_decode() {
        assert!(matches!(
            map_sqlx_error("get_invoice", sqlx::Error::ColumnNotFound("amount".into())),
            StoreError::Decode(msg) if msg.contains("amount")
        ));
    }

    #[test]
    fn id_lookups_compare_the_key_column_directly() {
        for sql in [UPDATE_SQL, DELETE_SQL, GET_SQL] {
            assert!(!sql.contains("::"), "{sql}");
        }
        assert!(UPDATE_SQL.contains("WHERE id = $4"));
        assert!(DELETE_SQL.contains("WHERE id = $1"));
        assert!(GET_SQL.contains("WHERE id = $1"));
        assert!(!INSERT_SQL.contains("::"));
    }

    #[test]
    fn row_not_found_maps_to_query() {
        assert!(matches!(
            map_sqlx_error("get_invoice", sqlx::Error::RowNotFound),
            StoreError::Query(_)
        ));
    }
}
