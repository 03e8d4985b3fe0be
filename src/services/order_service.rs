// src/services/order_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{OrderRepository, ProductRepository},
    models::order::{OrderDetail, PaymentType},
};

#[derive(Clone)]
pub struct OrderService {
    order_repo: OrderRepository,
    product_repo: ProductRepository,
    pool: PgPool,
}

impl OrderService {
    pub fn new(order_repo: OrderRepository, product_repo: ProductRepository, pool: PgPool) -> Self {
        Self {
            order_repo,
            product_repo,
            pool,
        }
    }

    // Cria o pedido e todos os itens numa única transação: ou entra tudo,
    // ou nada. Cada produto precisa pertencer ao catálogo (vivo) da empresa.
    pub async fn create_order(
        &self,
        company_id: Uuid,
        staff_id: Uuid,
        payment_reference: &str,
        payment_type: PaymentType,
        items: &[(Uuid, i32)],
    ) -> Result<OrderDetail, AppError> {
        // Valida os produtos antes de abrir a transação
        for (product_id, _) in items {
            self.product_repo
                .find_in_company(company_id, *product_id)
                .await?
                .ok_or(AppError::ProductNotFound)?;
        }

        let mut tx = self.pool.begin().await?;

        let order = self
            .order_repo
            .create_order(&mut *tx, company_id, staff_id, payment_reference, payment_type)
            .await?;

        let mut created_items = Vec::with_capacity(items.len());
        for (product_id, quantity) in items {
            let item = self
                .order_repo
                .add_item(&mut *tx, order.id, *product_id, *quantity)
                .await?;
            created_items.push(item);
        }

        tx.commit().await?;

        Ok(OrderDetail {
            order,
            items: created_items,
        })
    }

    pub async fn order_with_items(
        &self,
        company_id: Uuid,
        order_id: Uuid,
    ) -> Result<OrderDetail, AppError> {
        let order = self
            .order_repo
            .find_in_company(company_id, order_id)
            .await?
            .ok_or(AppError::OrderNotFound)?;
        let items = self.order_repo.items_of_order(order.id).await?;
        Ok(OrderDetail { order, items })
    }
}
