// src/db/subscription_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::subscription::Subscription};

const SUBSCRIPTION_COLUMNS: &str = "id, company_id, begin_date, end_date, token, created_at";

#[derive(Clone)]
pub struct SubscriptionRepository {
    pool: PgPool,
}

impl SubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // A assinatura "vigente" é sempre a mais recente da empresa.
    pub async fn latest_for_company(
        &self,
        company_id: Uuid,
    ) -> Result<Option<Subscription>, AppError> {
        let maybe_sub = sqlx::query_as::<_, Subscription>(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions \
             WHERE company_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT 1"
        ))
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_sub)
    }

    pub async fn list_by_company(
        &self,
        company_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Subscription>, AppError> {
        let subs = sqlx::query_as::<_, Subscription>(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions \
             WHERE company_id = $1 \
             ORDER BY created_at ASC LIMIT $2 OFFSET $3"
        ))
        .bind(company_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(subs)
    }

    pub async fn count_by_company(&self, company_id: Uuid) -> Result<i64, AppError> {
        let (total,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM subscriptions WHERE company_id = $1")
                .bind(company_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(total)
    }

    pub async fn token_exists(&self, token: &str) -> Result<bool, AppError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM subscriptions WHERE token = $1)")
                .bind(token)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    // O índice único do token é a trava contra resgate duplo: mesmo numa
    // corrida, a segunda inserção falha e vira SubscriptionTokenUsed.
    pub async fn insert<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        begin_date: NaiveDate,
        end_date: NaiveDate,
        token: &str,
    ) -> Result<Subscription, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sub = sqlx::query_as::<_, Subscription>(&format!(
            "INSERT INTO subscriptions (company_id, begin_date, end_date, token) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {SUBSCRIPTION_COLUMNS}"
        ))
        .bind(company_id)
        .bind(begin_date)
        .bind(end_date)
        .bind(token)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some("subscriptions_token_key")
                {
                    return AppError::SubscriptionTokenUsed;
                }
            }
            e.into()
        })?;
        Ok(sub)
    }
}
