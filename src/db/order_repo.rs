// src/db/order_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::order::{Order, OrderItem, PaymentType},
};

const ORDER_COLUMNS: &str =
    "id, company_id, staff_id, date_of_order, payment_reference, payment_type, is_deleted";

#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_order<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        staff_id: Uuid,
        payment_reference: &str,
        payment_type: PaymentType,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>(&format!(
            "INSERT INTO orders (company_id, staff_id, payment_reference, payment_type) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(company_id)
        .bind(staff_id)
        .bind(payment_reference)
        .bind(payment_type)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some("orders_payment_reference_key")
                {
                    return AppError::PaymentReferenceAlreadyExists;
                }
            }
            e.into()
        })?;
        Ok(order)
    }

    pub async fn add_item<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<OrderItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, OrderItem>(
            "INSERT INTO order_items (order_id, product_id, quantity) \
             VALUES ($1, $2, $3) \
             RETURNING id, order_id, product_id, quantity",
        )
        .bind(order_id)
        .bind(product_id)
        .bind(quantity)
        .fetch_one(executor)
        .await?;
        Ok(item)
    }

    pub async fn find_in_company(
        &self,
        company_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Order>, AppError> {
        let maybe_order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE id = $1 AND company_id = $2 AND is_deleted = FALSE"
        ))
        .bind(id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_order)
    }

    // Listagem com filtro opcional de intervalo de datas (sobre o dia do pedido)
    pub async fn list_by_company(
        &self,
        company_id: Uuid,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Order>, AppError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE company_id = $1 AND is_deleted = FALSE \
               AND ($2::date IS NULL OR date_of_order::date >= $2) \
               AND ($3::date IS NULL OR date_of_order::date <= $3) \
             ORDER BY date_of_order DESC LIMIT $4 OFFSET $5"
        ))
        .bind(company_id)
        .bind(date_from)
        .bind(date_to)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    pub async fn count_by_company(
        &self,
        company_id: Uuid,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<i64, AppError> {
        let (total,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM orders \
             WHERE company_id = $1 AND is_deleted = FALSE \
               AND ($2::date IS NULL OR date_of_order::date >= $2) \
               AND ($3::date IS NULL OR date_of_order::date <= $3)",
        )
        .bind(company_id)
        .bind(date_from)
        .bind(date_to)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    pub async fn items_of_order(&self, order_id: Uuid) -> Result<Vec<OrderItem>, AppError> {
        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT id, order_id, product_id, quantity \
             FROM order_items WHERE order_id = $1 ORDER BY id",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    // Itens sempre passam pelo pedido para garantir o escopo da empresa
    pub async fn find_item_in_company(
        &self,
        company_id: Uuid,
        item_id: Uuid,
    ) -> Result<Option<OrderItem>, AppError> {
        let maybe_item = sqlx::query_as::<_, OrderItem>(
            "SELECT oi.id, oi.order_id, oi.product_id, oi.quantity \
             FROM order_items oi \
             JOIN orders o ON o.id = oi.order_id \
             WHERE oi.id = $1 AND o.company_id = $2 AND o.is_deleted = FALSE",
        )
        .bind(item_id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_item)
    }

    pub async fn update_item_quantity(
        &self,
        item_id: Uuid,
        quantity: i32,
    ) -> Result<OrderItem, AppError> {
        let item = sqlx::query_as::<_, OrderItem>(
            "UPDATE order_items SET quantity = $2 WHERE id = $1 \
             RETURNING id, order_id, product_id, quantity",
        )
        .bind(item_id)
        .bind(quantity)
        .fetch_one(&self.pool)
        .await?;
        Ok(item)
    }

    pub async fn delete_item(&self, item_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM order_items WHERE id = $1")
            .bind(item_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn soft_delete(&self, company_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE orders SET is_deleted = TRUE \
             WHERE id = $1 AND company_id = $2 AND is_deleted = FALSE",
        )
        .bind(id)
        .bind(company_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
