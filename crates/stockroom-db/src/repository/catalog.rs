//! # Catalog Repository
//!
//! Database operations for suppliers and products: the slow-changing
//! reference data the ledger and sales operate on.
//!
//! Stock is NOT mutated here. `Product::stock` belongs to the stock ledger;
//! this repository only creates products (stock 0), resolves them, and
//! updates prices.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use stockroom_core::validation::{validate_name, validate_price};
use stockroom_core::{Money, Product, Supplier};

/// Repository for supplier and product reference data.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    // =========================================================================
    // Suppliers
    // =========================================================================

    /// Creates a supplier.
    ///
    /// ## Errors
    /// * `InvalidArgument` - empty name (checked before any mutation)
    /// * `TransactionFailed` - duplicate name (UNIQUE constraint)
    pub async fn create_supplier(
        &self,
        name: &str,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> EngineResult<Supplier> {
        validate_name("name", name)?;

        let supplier = Supplier {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            phone: phone.map(str::to_string),
            email: email.map(str::to_string),
            created_at: Utc::now(),
        };

        debug!(id = %supplier.id, name = %supplier.name, "Creating supplier");

        sqlx::query(
            r#"
            INSERT INTO suppliers (id, name, phone, email, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&supplier.id)
        .bind(&supplier.name)
        .bind(&supplier.phone)
        .bind(&supplier.email)
        .bind(supplier.created_at)
        .execute(&self.pool)
        .await?;

        Ok(supplier)
    }

    /// Gets a supplier by ID.
    pub async fn get_supplier(&self, id: &str) -> EngineResult<Option<Supplier>> {
        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT id, name, phone, email, created_at
            FROM suppliers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(supplier)
    }

    /// Deletes a supplier.
    ///
    /// Products referencing the supplier survive: the store clears their
    /// `supplier_id` (`ON DELETE SET NULL`), it never deletes them.
    pub async fn delete_supplier(&self, id: &str) -> EngineResult<()> {
        debug!(id = %id, "Deleting supplier");

        let result = sqlx::query("DELETE FROM suppliers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(EngineError::not_found("Supplier", id));
        }

        Ok(())
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Creates a product with zero stock.
    ///
    /// Stock only ever enters through the ledger's `receive_stock`.
    ///
    /// ## Errors
    /// * `InvalidArgument` - empty name or negative price
    /// * `NotFound` - `supplier_id` given but no such supplier
    /// * `TransactionFailed` - duplicate name (UNIQUE constraint)
    pub async fn create_product(
        &self,
        name: &str,
        supplier_id: Option<&str>,
        unit_price: Money,
    ) -> EngineResult<Product> {
        validate_name("name", name)?;
        validate_price("unit_price", unit_price)?;

        if let Some(sid) = supplier_id {
            if self.get_supplier(sid).await?.is_none() {
                return Err(EngineError::not_found("Supplier", sid));
            }
        }

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            supplier_id: supplier_id.map(str::to_string),
            unit_price,
            stock: 0,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %product.id, name = %product.name, "Creating product");

        sqlx::query(
            r#"
            INSERT INTO products (id, name, supplier_id, unit_price, stock, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.supplier_id)
        .bind(product.unit_price)
        .bind(product.stock)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by ID.
    pub async fn get_product(&self, id: &str) -> EngineResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, supplier_id, unit_price, stock, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Updates a product's selling price. Price only - stock and sale totals
    /// are untouched (item prices are snapshots taken at insertion time).
    ///
    /// ## Errors
    /// * `InvalidArgument` - negative price
    /// * `NotFound` - no row affected
    pub async fn update_price(&self, product_id: &str, new_price: Money) -> EngineResult<()> {
        validate_price("unit_price", new_price)?;

        debug!(id = %product_id, price = %new_price, "Updating product price");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET unit_price = ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(product_id)
        .bind(new_price)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(EngineError::not_found("Product", product_id));
        }

        Ok(())
    }

    /// Deletes a product.
    ///
    /// Blocked (`ON DELETE RESTRICT`, surfaced as `TransactionFailed`) while
    /// any sale item references the product; its purchase history cascades.
    pub async fn delete_product(&self, id: &str) -> EngineResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(EngineError::not_found("Product", id));
        }

        Ok(())
    }
}
