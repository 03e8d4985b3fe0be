// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{User, UserRole},
};

const USER_COLUMNS: &str = "id, company_id, fullname, username, personal_email, address, \
                            password_hash, role, is_deleted, created_at, updated_at";

// O repositório de funcionários, responsável por todas as interações com a
// tabela 'users'. Leituras padrão filtram os soft-deletados.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1 AND is_deleted = FALSE"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND is_deleted = FALSE"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    // Busca restrita à empresa do chamador (um admin só enxerga a própria equipe)
    pub async fn find_by_id_in_company(
        &self,
        company_id: Uuid,
        id: Uuid,
    ) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE id = $1 AND company_id = $2 AND is_deleted = FALSE"
        ))
        .bind(id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    // Cria um novo funcionário. Mapeia as violações de unicidade para erros
    // de domínio (e-mail global, username por empresa).
    #[allow(clippy::too_many_arguments)]
    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        fullname: &str,
        username: &str,
        personal_email: &str,
        address: Option<&str>,
        password_hash: &str,
        role: UserRole,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users \
                 (company_id, fullname, username, personal_email, address, password_hash, role) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(company_id)
        .bind(fullname)
        .bind(username)
        .bind(personal_email)
        .bind(address)
        .bind(password_hash)
        .bind(role)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    if let Some(constraint) = db_err.constraint() {
                        return match constraint {
                            "users_personal_email_key" => AppError::EmailAlreadyExists,
                            "users_company_id_username_key" => AppError::UsernameAlreadyExists,
                            _ => AppError::UniqueConstraintViolation(constraint.to_string()),
                        };
                    }
                }
            }
            e.into()
        })?;

        Ok(user)
    }

    pub async fn list_by_company(
        &self,
        company_id: Uuid,
        include_deleted: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>, AppError> {
        let filter = if include_deleted {
            ""
        } else {
            "AND is_deleted = FALSE"
        };
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE company_id = $1 {filter} \
             ORDER BY fullname ASC LIMIT $2 OFFSET $3"
        ))
        .bind(company_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
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
            "SELECT COUNT(*) FROM users WHERE company_id = $1 {filter}"
        ))
        .bind(company_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    pub async fn update_role(&self, id: Uuid, role: UserRole) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET role = $1, updated_at = now() WHERE id = $2 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(role)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET password_hash = $1, updated_at = now() WHERE id = $2")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // Exclusão lógica: a linha permanece para auditoria
    pub async fn soft_delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET is_deleted = TRUE, updated_at = now() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
