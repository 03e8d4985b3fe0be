// src/db/company_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::company::Company};

const COMPANY_COLUMNS: &str =
    "id, name, official_email, address, city_id, headquarters_id, date_of_creation";

#[derive(Clone)]
pub struct CompanyRepository {
    pool: PgPool,
}

impl CompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>, AppError> {
        let maybe_company = sqlx::query_as::<_, Company>(&format!(
            "SELECT {COMPANY_COLUMNS} FROM companies WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_company)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Company>, AppError> {
        let maybe_company = sqlx::query_as::<_, Company>(&format!(
            "SELECT {COMPANY_COLUMNS} FROM companies WHERE name = $1 LIMIT 1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_company)
    }

    // Listagem filtrável por nome de estado e de cidade (console e diretório
    // do app mobile). Filtros ausentes não restringem nada.
    pub async fn list_by_state_and_city(
        &self,
        state: Option<&str>,
        city: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Company>, AppError> {
        let companies = sqlx::query_as::<_, Company>(
            "SELECT c.id, c.name, c.official_email, c.address, c.city_id, \
                    c.headquarters_id, c.date_of_creation \
             FROM companies c \
             LEFT JOIN cities ci ON ci.id = c.city_id \
             LEFT JOIN states st ON st.id = ci.state_id \
             WHERE ($1::text IS NULL OR st.name = $1) \
               AND ($2::text IS NULL OR ci.name = $2) \
             ORDER BY c.name ASC LIMIT $3 OFFSET $4",
        )
        .bind(state)
        .bind(city)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(companies)
    }

    pub async fn count_by_state_and_city(
        &self,
        state: Option<&str>,
        city: Option<&str>,
    ) -> Result<i64, AppError> {
        let (total,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) \
             FROM companies c \
             LEFT JOIN cities ci ON ci.id = c.city_id \
             LEFT JOIN states st ON st.id = ci.state_id \
             WHERE ($1::text IS NULL OR st.name = $1) \
               AND ($2::text IS NULL OR ci.name = $2)",
        )
        .bind(state)
        .bind(city)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    pub async fn create_company<'e, E>(
        &self,
        executor: E,
        name: &str,
        official_email: Option<&str>,
        address: Option<&str>,
        city_id: Option<Uuid>,
        headquarters_id: Option<Uuid>,
    ) -> Result<Company, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let company = sqlx::query_as::<_, Company>(&format!(
            "INSERT INTO companies (name, official_email, address, city_id, headquarters_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COMPANY_COLUMNS}"
        ))
        .bind(name)
        .bind(official_email)
        .bind(address)
        .bind(city_id)
        .bind(headquarters_id)
        .fetch_one(executor)
        .await?;
        Ok(company)
    }

    // Exclusão física: só o console administrativo chega aqui, e as linhas
    // dependentes caem por CASCADE.
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
