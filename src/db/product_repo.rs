// src/db/product_repo.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::product::Product};

const PRODUCT_COLUMNS: &str =
    "id, company_id, name, price, thumbnail_url, is_deleted, created_at, updated_at";

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_in_company(
        &self,
        company_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Product>, AppError> {
        let maybe_product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE id = $1 AND company_id = $2 AND is_deleted = FALSE"
        ))
        .bind(id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_product)
    }

    pub async fn list_by_company(
        &self,
        company_id: Uuid,
        include_deleted: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Product>, AppError> {
        let filter = if include_deleted {
            ""
        } else {
            "AND is_deleted = FALSE"
        };
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE company_id = $1 {filter} \
             ORDER BY name ASC LIMIT $2 OFFSET $3"
        ))
        .bind(company_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    pub async fn count_by_company(
        &self,
        company_id: Uuid,
        include_deleted: bool,
    ) -> Result<i64, AppError> {
        let filter = if include_deleted {
            ""
        } else {
            "AND is_deleted = FALSE"
        };
        let (total,): (i64,) = sqlx::query_as(&format!(
            "SELECT COUNT(*) FROM products WHERE company_id = $1 {filter}"
        ))
        .bind(company_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    pub async fn create(
        &self,
        company_id: Uuid,
        name: &str,
        price: Decimal,
        thumbnail_url: Option<&str>,
    ) -> Result<Product, AppError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products (company_id, name, price, thumbnail_url) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(company_id)
        .bind(name)
        .bind(price)
        .bind(thumbnail_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(product)
    }

    // Atualização parcial: campos None mantêm o valor atual (COALESCE).
    pub async fn update(
        &self,
        company_id: Uuid,
        id: Uuid,
        name: Option<&str>,
        price: Option<Decimal>,
        thumbnail_url: Option<&str>,
    ) -> Result<Option<Product>, AppError> {
        let maybe_product = sqlx::query_as::<_, Product>(&format!(
            "UPDATE products SET \
                 name = COALESCE($3, name), \
                 price = COALESCE($4, price), \
                 thumbnail_url = COALESCE($5, thumbnail_url), \
                 updated_at = now() \
             WHERE id = $1 AND company_id = $2 AND is_deleted = FALSE \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(company_id)
        .bind(name)
        .bind(price)
        .bind(thumbnail_url)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_product)
    }

    pub async fn soft_delete(&self, company_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE products SET is_deleted = TRUE, updated_at = now() \
             WHERE id = $1 AND company_id = $2 AND is_deleted = FALSE",
        )
        .bind(id)
        .bind(company_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
