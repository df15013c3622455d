//! Category management service

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::Category;

/// Category service
#[derive(Clone)]
pub struct CategoryService {
    db: PgPool,
}

/// Input for creating or updating a category
#[derive(Debug, Deserialize)]
pub struct CategoryInput {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, FromRow)]
struct CategoryRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(r: CategoryRow) -> Self {
        Category {
            id: r.id,
            name: r.name,
            description: r.description,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

const CATEGORY_COLUMNS: &str = "id, name, description, created_at, updated_at";

impl CategoryService {
    /// Create a new CategoryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all categories ordered by name
    pub async fn list(&self) -> AppResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY name"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Create a category with a unique name
    pub async fn create(&self, input: CategoryInput) -> AppResult<Category> {
        let name = input
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or(AppError::MissingFields)?;

        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            r#"
            INSERT INTO categories (name, description)
            VALUES ($1, $2)
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(&input.description)
        .fetch_one(&self.db)
        .await
        .map_err(Self::map_name_conflict)?;

        Ok(row.into())
    }

    /// Update a category's name or description
    pub async fn update(&self, category_id: Uuid, input: CategoryInput) -> AppResult<Category> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            r#"
            UPDATE categories
            SET name = COALESCE(NULLIF(TRIM($1), ''), name),
                description = COALESCE($2, description),
                updated_at = NOW()
            WHERE id = $3
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(&input.name)
        .bind(&input.description)
        .bind(category_id)
        .fetch_optional(&self.db)
        .await
        .map_err(Self::map_name_conflict)?
        .ok_or_else(|| AppError::NotFound("Category".to_string()))?;

        Ok(row.into())
    }

    /// Delete a category. Items keep their category string; they are not
    /// touched or re-categorized.
    pub async fn delete(&self, category_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(category_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Category".to_string()));
        }

        Ok(())
    }

    /// Category names for prompt building and dropdowns
    pub async fn names(&self) -> AppResult<Vec<String>> {
        let names =
            sqlx::query_scalar::<_, String>("SELECT name FROM categories ORDER BY name")
                .fetch_all(&self.db)
                .await?;

        Ok(names)
    }

    fn map_name_conflict(e: sqlx::Error) -> AppError {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return AppError::DuplicateEntry("category name".to_string());
            }
        }
        AppError::DatabaseError(e)
    }
}
