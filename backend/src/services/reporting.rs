//! Reporting service for dashboard statistics and spending analytics

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppResult;

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
}

/// Dashboard stock counters
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_items: i64,
    pub total_quantity: i64,
    pub in_stock: i64,
    pub low_stock: i64,
    pub out_of_stock: i64,
    /// Sum of price times quantity over items with a price
    pub total_value: Decimal,
    pub category_count: i64,
    pub pending_replacements: i64,
}

/// Spending totals for one category
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct CategorySpending {
    pub category: String,
    pub total_spent: Decimal,
    pub item_count: i64,
}

/// Spending totals for one month of the requested year
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct MonthlySpending {
    pub month: i32,
    pub total_spent: Decimal,
    pub item_count: i64,
}

/// Spending report for a year
#[derive(Debug, Serialize)]
pub struct SpendingReport {
    pub year: i32,
    pub total_spent: Decimal,
    pub by_category: Vec<CategorySpending>,
    pub by_month: Vec<MonthlySpending>,
}

impl ReportingService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Dashboard counters across the whole inventory
    pub async fn dashboard_stats(&self) -> AppResult<DashboardStats> {
        let (total_items, total_quantity, in_stock, low_stock, out_of_stock, total_value) =
            sqlx::query_as::<_, (i64, i64, i64, i64, i64, Decimal)>(
                r#"
                SELECT COUNT(*),
                       COALESCE(SUM(quantity), 0)::bigint,
                       COUNT(*) FILTER (WHERE status = 'in-stock'),
                       COUNT(*) FILTER (WHERE status = 'low-stock'),
                       COUNT(*) FILTER (WHERE status = 'out-of-stock'),
                       COALESCE(SUM(price * quantity), 0)
                FROM inventory_items
                "#,
            )
            .fetch_one(&self.db)
            .await?;

        let category_count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories")
                .fetch_one(&self.db)
                .await?;

        let pending_replacements = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM transactions t
            WHERE t.transaction_type = 'transfer'
              AND t.reason LIKE 'Replacement Equipment%'
              AND NOT EXISTS (
                  SELECT 1 FROM transactions c
                  WHERE c.transaction_type = 'confirmation'
                    AND c.branch IS NOT DISTINCT FROM t.branch
                    AND c.item_tracking_id IS NOT DISTINCT FROM t.item_tracking_id
                    AND c.created_at > t.created_at
              )
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        Ok(DashboardStats {
            total_items,
            total_quantity,
            in_stock,
            low_stock,
            out_of_stock,
            total_value,
            category_count,
            pending_replacements,
        })
    }

    /// Purchase spending for one year, priced as unit price times quantity of
    /// items created that year. Items without a price count as zero.
    pub async fn spending(&self, year: i32) -> AppResult<SpendingReport> {
        let by_category = sqlx::query_as::<_, CategorySpending>(
            r#"
            SELECT category,
                   COALESCE(SUM(price * quantity), 0) AS total_spent,
                   COUNT(*) AS item_count
            FROM inventory_items
            WHERE EXTRACT(YEAR FROM created_at) = $1
            GROUP BY category
            ORDER BY total_spent DESC
            "#,
        )
        .bind(year)
        .fetch_all(&self.db)
        .await?;

        let by_month = sqlx::query_as::<_, MonthlySpending>(
            r#"
            SELECT EXTRACT(MONTH FROM created_at)::int AS month,
                   COALESCE(SUM(price * quantity), 0) AS total_spent,
                   COUNT(*) AS item_count
            FROM inventory_items
            WHERE EXTRACT(YEAR FROM created_at) = $1
            GROUP BY month
            ORDER BY month
            "#,
        )
        .bind(year)
        .fetch_all(&self.db)
        .await?;

        let total_spent = by_category
            .iter()
            .fold(Decimal::ZERO, |acc, c| acc + c.total_spent);

        Ok(SpendingReport {
            year,
            total_spent,
            by_category,
            by_month,
        })
    }
}
