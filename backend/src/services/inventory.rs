//! Inventory service for item CRUD, serial-number management and
//! warranty expiry derivation

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{FromRow, PgPool, Postgres};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::InventoryItem;
use shared::types::StockStatus;
use shared::validation::{
    fan_out_quantities, first_duplicate_serial, negative_quantity_field, split_serial_numbers,
    warranty_expiry,
};

/// Inventory service for managing items
#[derive(Clone)]
pub struct InventoryService {
    db: PgPool,
}

/// Database row for an inventory item
#[derive(Debug, FromRow)]
pub(crate) struct ItemRow {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub quantity: i32,
    pub min_stock: i32,
    pub max_stock: Option<i32>,
    pub price: Option<Decimal>,
    pub supplier: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub warranty: Option<String>,
    pub warranty_expiry_date: Option<NaiveDate>,
    pub location: String,
    pub description: Option<String>,
    pub status: String,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ItemRow> for InventoryItem {
    fn from(r: ItemRow) -> Self {
        let status = StockStatus::parse(&r.status)
            .unwrap_or_else(|| StockStatus::derive(r.quantity, r.min_stock));
        InventoryItem {
            id: r.id,
            name: r.name,
            category: r.category,
            quantity: r.quantity,
            min_stock: r.min_stock,
            max_stock: r.max_stock,
            price: r.price,
            supplier: r.supplier,
            model: r.model,
            serial_number: r.serial_number,
            warranty: r.warranty,
            warranty_expiry_date: r.warranty_expiry_date,
            location: r.location,
            description: r.description,
            status,
            created_by: r.created_by,
            updated_by: r.updated_by,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Column list shared by the item queries in this service
pub(crate) const ITEM_COLUMNS: &str = "id, name, category, quantity, min_stock, max_stock, price, \
     supplier, model, serial_number, warranty, warranty_expiry_date, location, description, \
     status, created_by, updated_by, created_at, updated_at";

/// Input for creating an inventory item
#[derive(Debug, Deserialize)]
pub struct CreateItemInput {
    pub name: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<i32>,
    pub min_stock: Option<i32>,
    pub max_stock: Option<i32>,
    pub price: Option<Decimal>,
    pub supplier: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub warranty: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}

/// Input for updating an inventory item; absent fields are left unchanged
#[derive(Debug, Deserialize)]
pub struct UpdateItemInput {
    pub name: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<i32>,
    pub min_stock: Option<i32>,
    pub max_stock: Option<i32>,
    pub price: Option<Decimal>,
    pub supplier: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub warranty: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}

impl InventoryService {
    /// Create a new InventoryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all inventory items
    pub async fn list_items(&self) -> AppResult<Vec<InventoryItem>> {
        let rows = sqlx::query_as::<_, ItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM inventory_items ORDER BY created_at DESC"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a single item by id
    pub async fn get_item(&self, item_id: Uuid) -> AppResult<InventoryItem> {
        let row = sqlx::query_as::<_, ItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM inventory_items WHERE id = $1"
        ))
        .bind(item_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Inventory item".to_string()))?;

        Ok(row.into())
    }

    /// Create one or more inventory items.
    ///
    /// When the serial-number field carries several comma-separated serials
    /// together with an aggregate quantity, creation fans out into one item
    /// per serial with the quantity split across them.
    pub async fn create_items(
        &self,
        user_id: Uuid,
        input: CreateItemInput,
    ) -> AppResult<Vec<InventoryItem>> {
        let name = non_empty(input.name).ok_or(AppError::MissingFields)?;
        let category = non_empty(input.category).ok_or(AppError::MissingFields)?;
        let location = non_empty(input.location).ok_or(AppError::MissingFields)?;
        let quantity = input.quantity.unwrap_or(0);
        let min_stock = input.min_stock.unwrap_or(0);

        if let Some(field) = negative_quantity_field(quantity, min_stock) {
            return Err(AppError::Validation {
                field: field.to_string(),
                message: "Cannot be negative".to_string(),
            });
        }

        let serial_csv = input.serial_number.unwrap_or_default();
        let serials = split_serial_numbers(&serial_csv);

        // Pre-flight duplicate scan for a friendly error; the item_serials
        // uniqueness constraint is the actual guarantee.
        if !serials.is_empty() {
            self.check_duplicate_serials(&serials, None).await?;
        }

        let warranty = non_empty(input.warranty);
        let today = Utc::now().date_naive();
        let expiry = warranty.as_deref().and_then(|w| warranty_expiry(w, today));

        let mut tx = self.db.begin().await?;
        let mut created = Vec::new();

        if serials.len() > 1 {
            // One item per serial, aggregate quantity split across them
            let quantities = fan_out_quantities(quantity, serials.len());
            for (serial, qty) in serials.iter().zip(quantities) {
                let row = insert_item(
                    &mut tx,
                    InsertItem {
                        name: &name,
                        category: &category,
                        quantity: qty,
                        min_stock,
                        max_stock: input.max_stock,
                        price: input.price,
                        supplier: input.supplier.as_deref(),
                        model: input.model.as_deref(),
                        serial_number: Some(serial),
                        warranty: warranty.as_deref(),
                        warranty_expiry_date: expiry,
                        location: &location,
                        description: input.description.as_deref(),
                        created_by: Some(user_id),
                    },
                )
                .await?;
                claim_serials(&mut tx, row.id, std::slice::from_ref(serial)).await?;
                created.push(row.into());
            }
        } else {
            let serial_field = if serials.is_empty() {
                None
            } else {
                Some(serial_csv.trim())
            };
            let row = insert_item(
                &mut tx,
                InsertItem {
                    name: &name,
                    category: &category,
                    quantity,
                    min_stock,
                    max_stock: input.max_stock,
                    price: input.price,
                    supplier: input.supplier.as_deref(),
                    model: input.model.as_deref(),
                    serial_number: serial_field,
                    warranty: warranty.as_deref(),
                    warranty_expiry_date: expiry,
                    location: &location,
                    description: input.description.as_deref(),
                    created_by: Some(user_id),
                },
            )
            .await?;
            claim_serials(&mut tx, row.id, &serials).await?;
            created.push(row.into());
        }

        tx.commit().await?;
        Ok(created)
    }

    /// Update an inventory item; absent fields are left unchanged
    pub async fn update_item(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        input: UpdateItemInput,
    ) -> AppResult<InventoryItem> {
        let mut tx = self.db.begin().await?;

        let existing = sqlx::query_as::<_, ItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM inventory_items WHERE id = $1 FOR UPDATE"
        ))
        .bind(item_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Inventory item".to_string()))?;

        let name = input.name.unwrap_or(existing.name);
        let category = input.category.unwrap_or(existing.category);
        let quantity = input.quantity.unwrap_or(existing.quantity);
        let min_stock = input.min_stock.unwrap_or(existing.min_stock);
        let max_stock = input.max_stock.or(existing.max_stock);
        let price = input.price.or(existing.price);
        let supplier = input.supplier.or(existing.supplier);
        let model = input.model.or(existing.model);
        let location = input.location.unwrap_or(existing.location);
        let description = input.description.or(existing.description);

        if let Some(field) = negative_quantity_field(quantity, min_stock) {
            return Err(AppError::Validation {
                field: field.to_string(),
                message: "Cannot be negative".to_string(),
            });
        }

        let serial_changed = input.serial_number.is_some();
        let serial_csv = input
            .serial_number
            .unwrap_or_else(|| existing.serial_number.clone().unwrap_or_default());
        let serials = split_serial_numbers(&serial_csv);

        if serial_changed && !serials.is_empty() {
            self.check_duplicate_serials(&serials, Some(item_id)).await?;
        }

        // Warranty expiry is re-derived only when the warranty text changes;
        // the creation date stays the anchor.
        let warranty_changed =
            input.warranty.is_some() && input.warranty != existing.warranty;
        let warranty = input.warranty.or(existing.warranty);
        let expiry = if warranty_changed {
            warranty
                .as_deref()
                .and_then(|w| warranty_expiry(w, existing.created_at.date_naive()))
        } else {
            existing.warranty_expiry_date
        };

        let status = StockStatus::derive(quantity, min_stock);

        let row = sqlx::query_as::<_, ItemRow>(&format!(
            r#"
            UPDATE inventory_items
            SET name = $1, category = $2, quantity = $3, min_stock = $4, max_stock = $5,
                price = $6, supplier = $7, model = $8, serial_number = $9, warranty = $10,
                warranty_expiry_date = $11, location = $12, description = $13, status = $14,
                updated_by = $15, updated_at = NOW()
            WHERE id = $16
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(&name)
        .bind(&category)
        .bind(quantity)
        .bind(min_stock)
        .bind(max_stock)
        .bind(price)
        .bind(&supplier)
        .bind(&model)
        .bind(if serials.is_empty() { None } else { Some(serial_csv.trim()) })
        .bind(&warranty)
        .bind(expiry)
        .bind(&location)
        .bind(&description)
        .bind(status.as_str())
        .bind(user_id)
        .bind(item_id)
        .fetch_one(&mut *tx)
        .await?;

        if serial_changed {
            sqlx::query("DELETE FROM item_serials WHERE item_id = $1")
                .bind(item_id)
                .execute(&mut *tx)
                .await?;
            claim_serials(&mut tx, item_id, &serials).await?;
        }

        tx.commit().await?;
        Ok(row.into())
    }

    /// Delete an inventory item
    pub async fn delete_item(&self, item_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM inventory_items WHERE id = $1")
            .bind(item_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Inventory item".to_string()));
        }

        Ok(())
    }

    /// Scan existing items for serials colliding with the candidates,
    /// excluding the item being edited. Best-effort UX check: the storage
    /// constraint on item_serials closes the race window.
    async fn check_duplicate_serials(
        &self,
        candidates: &[String],
        exclude_item: Option<Uuid>,
    ) -> AppResult<()> {
        let existing = sqlx::query_as::<_, (String, String)>(
            r#"
            SELECT name, serial_number
            FROM inventory_items
            WHERE serial_number IS NOT NULL AND serial_number <> ''
              AND ($1::uuid IS NULL OR id <> $1)
            "#,
        )
        .bind(exclude_item)
        .fetch_all(&self.db)
        .await?;

        if let Some((serial, item_name)) = first_duplicate_serial(candidates, &existing) {
            return Err(AppError::DuplicateSerial { serial, item_name });
        }
        Ok(())
    }
}

/// Fields for an item insert
struct InsertItem<'a> {
    name: &'a str,
    category: &'a str,
    quantity: i32,
    min_stock: i32,
    max_stock: Option<i32>,
    price: Option<Decimal>,
    supplier: Option<&'a str>,
    model: Option<&'a str>,
    serial_number: Option<&'a str>,
    warranty: Option<&'a str>,
    warranty_expiry_date: Option<NaiveDate>,
    location: &'a str,
    description: Option<&'a str>,
    created_by: Option<Uuid>,
}

async fn insert_item(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    item: InsertItem<'_>,
) -> AppResult<ItemRow> {
    let status = StockStatus::derive(item.quantity, item.min_stock);

    let row = sqlx::query_as::<_, ItemRow>(&format!(
        r#"
        INSERT INTO inventory_items (
            name, category, quantity, min_stock, max_stock, price, supplier, model,
            serial_number, warranty, warranty_expiry_date, location, description,
            status, created_by, updated_by
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $15)
        RETURNING {ITEM_COLUMNS}
        "#
    ))
    .bind(item.name)
    .bind(item.category)
    .bind(item.quantity)
    .bind(item.min_stock)
    .bind(item.max_stock)
    .bind(item.price)
    .bind(item.supplier)
    .bind(item.model)
    .bind(item.serial_number)
    .bind(item.warranty)
    .bind(item.warranty_expiry_date)
    .bind(item.location)
    .bind(item.description)
    .bind(status.as_str())
    .bind(item.created_by)
    .fetch_one(&mut **tx)
    .await?;

    Ok(row)
}

/// Record the individual serials an item holds. The primary key on
/// item_serials is what actually enforces serial uniqueness across items.
pub(crate) async fn claim_serials(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    item_id: Uuid,
    serials: &[String],
) -> AppResult<()> {
    for serial in serials {
        sqlx::query("INSERT INTO item_serials (serial, item_id) VALUES ($1, $2)")
            .bind(serial)
            .bind(item_id)
            .execute(&mut **tx)
            .await
            .map_err(|e| map_serial_conflict(e, serial))?;
    }
    Ok(())
}

/// Turn a unique violation on item_serials into the domain error
fn map_serial_conflict(e: sqlx::Error, serial: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::DuplicateSerial {
                serial: serial.to_string(),
                item_name: "another item".to_string(),
            };
        }
    }
    AppError::DatabaseError(e)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
