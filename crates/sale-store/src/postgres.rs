use async_trait::async_trait;
use domain::{AggregateRoot, Sale};
use sqlx::{PgPool, Row, postgres::PgPoolOptions, postgres::PgRow};

use crate::{
    PageRequest, Result, SaleId, StoreError, Version, repository::SaleRepository,
};

const UNIQUE_SALE_NUMBER: &str = "unique_sale_number";
const SALES_PKEY: &str = "sales_pkey";

/// PostgreSQL-backed sale repository.
///
/// Each sale is one row in `sales`: the serialized aggregate in a JSONB
/// `document` column plus indexed columns for lookups, ordering and
/// optimistic concurrency.
#[derive(Clone)]
pub struct PostgresSaleRepository {
    pool: PgPool,
}

impl PostgresSaleRepository {
    /// Creates a new PostgreSQL sale repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to `database_url` with a pool of at most `max_connections`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_sale(row: PgRow) -> Result<Sale> {
        let document: serde_json::Value = row.try_get("document")?;
        let version: i64 = row.try_get("version")?;

        let mut sale: Sale = serde_json::from_value(document)?;
        sale.set_version(Version::new(version));
        Ok(sale)
    }

    fn map_write_error(sale: &Sale, expected: Version, error: sqlx::Error) -> StoreError {
        if let sqlx::Error::Database(ref db_err) = error {
            match db_err.constraint() {
                Some(UNIQUE_SALE_NUMBER) => {
                    return StoreError::DuplicateSaleNumber(sale.sale_number().to_string());
                }
                Some(SALES_PKEY) => {
                    return StoreError::ConcurrencyConflict {
                        sale_id: sale.id(),
                        expected,
                        actual: Version::first(),
                    };
                }
                _ => {}
            }
        }
        StoreError::Database(error)
    }
}

#[async_trait]
impl SaleRepository for PostgresSaleRepository {
    async fn find_by_id(&self, id: SaleId) -> Result<Option<Sale>> {
        let row = sqlx::query("SELECT document, version FROM sales WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_sale).transpose()
    }

    async fn find_by_sale_number(&self, sale_number: &str) -> Result<Option<Sale>> {
        let row = sqlx::query("SELECT document, version FROM sales WHERE sale_number = $1")
            .bind(sale_number)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_sale).transpose()
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<Sale>> {
        let rows = sqlx::query(
            r#"
            SELECT document, version
            FROM sales
            ORDER BY sale_date DESC, id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::from(page.size()))
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_sale).collect()
    }

    #[tracing::instrument(skip(self, sale), fields(sale_id = %sale.id()))]
    async fn add(&self, sale: &Sale) -> Result<Version> {
        if sale.version() != Version::initial() {
            return Err(StoreError::ConcurrencyConflict {
                sale_id: sale.id(),
                expected: sale.version(),
                actual: Version::initial(),
            });
        }

        let version = Version::first();
        let document = serde_json::to_value(sale)?;

        sqlx::query(
            r#"
            INSERT INTO sales (id, sale_number, sale_date, customer_id, branch_id, total_amount, is_cancelled, version, document)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(sale.id().as_uuid())
        .bind(sale.sale_number())
        .bind(sale.sale_date())
        .bind(sale.customer().id().as_uuid())
        .bind(sale.branch().id().as_uuid())
        .bind(sale.total_amount())
        .bind(sale.is_cancelled())
        .bind(version.as_i64())
        .bind(document)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_write_error(sale, sale.version(), e))?;

        tracing::debug!(sale_number = %sale.sale_number(), "Sale inserted");
        Ok(version)
    }

    #[tracing::instrument(skip(self, sale), fields(sale_id = %sale.id()))]
    async fn update(&self, sale: &Sale) -> Result<Version> {
        let sale_id = sale.id();
        let expected = sale.version();

        // Start a transaction
        let mut tx = self.pool.begin().await?;

        let current: Option<i64> =
            sqlx::query_scalar("SELECT version FROM sales WHERE id = $1 FOR UPDATE")
                .bind(sale_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await?;

        let actual = Version::new(current.ok_or(StoreError::NotFound(sale_id))?);
        if actual != expected {
            return Err(StoreError::ConcurrencyConflict {
                sale_id,
                expected,
                actual,
            });
        }

        let version = actual.next();
        let document = serde_json::to_value(sale)?;

        sqlx::query(
            r#"
            UPDATE sales
            SET sale_number = $2, total_amount = $3, is_cancelled = $4, version = $5,
                document = $6, updated_at = NOW()
            WHERE id = $1 AND version = $7
            "#,
        )
        .bind(sale_id.as_uuid())
        .bind(sale.sale_number())
        .bind(sale.total_amount())
        .bind(sale.is_cancelled())
        .bind(version.as_i64())
        .bind(document)
        .bind(expected.as_i64())
        .execute(&mut *tx)
        .await
        .map_err(|e| Self::map_write_error(sale, expected, e))?;

        tx.commit().await?;

        tracing::debug!(version = %version, "Sale updated");
        Ok(version)
    }

    async fn delete(&self, id: SaleId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sales WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.max(0) as u64)
    }
}
