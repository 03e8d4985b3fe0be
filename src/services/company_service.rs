// src/services/company_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CompanyRepository, LocationRepository, UserRepository},
    models::{auth::User, auth::UserRole, company::Company},
    services::auth::{hash_password, scoped_username},
};

// Dados do primeiro administrador criado junto com a empresa
#[derive(Debug)]
pub struct NewAdmin {
    pub fullname: String,
    pub username: String,
    pub personal_email: String,
    pub password: String,
}

#[derive(Clone)]
pub struct CompanyService {
    company_repo: CompanyRepository,
    user_repo: UserRepository,
    location_repo: LocationRepository,
    pool: PgPool, // Usamos a pool para iniciar transações
}

impl CompanyService {
    pub fn new(
        company_repo: CompanyRepository,
        user_repo: UserRepository,
        location_repo: LocationRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            company_repo,
            user_repo,
            location_repo,
            pool,
        }
    }

    // Criação simples (API de parceiros); sem administrador embutido.
    pub async fn create_company(
        &self,
        name: &str,
        official_email: Option<&str>,
        address: Option<&str>,
        city_id: Option<Uuid>,
    ) -> Result<Company, AppError> {
        self.check_city(city_id).await?;
        self.company_repo
            .create_company(&self.pool, name, official_email, address, city_id, None)
            .await
    }

    // LÓGICA DE NEGÓCIO: onboarding do console administrativo. Cria a empresa
    // e, atomicamente, o seu primeiro administrador.
    pub async fn onboard_company(
        &self,
        name: &str,
        official_email: Option<&str>,
        address: Option<&str>,
        city_id: Option<Uuid>,
        headquarters_id: Option<Uuid>,
        admin: NewAdmin,
    ) -> Result<(Company, User), AppError> {
        self.check_city(city_id).await?;

        // Filial precisa apontar para uma matriz existente
        if let Some(hq_id) = headquarters_id {
            self.company_repo
                .find_by_id(hq_id)
                .await?
                .ok_or(AppError::CompanyNotFound)?;
        }

        // Hashing fora da transação (não toca no banco)
        let password_hash = hash_password(&admin.password).await?;

        // 1. Inicia a transação
        let mut tx = self.pool.begin().await?;

        // 2. Cria a empresa
        let company = self
            .company_repo
            .create_company(
                &mut *tx,
                name,
                official_email,
                address,
                city_id,
                headquarters_id,
            )
            .await?;

        // 3. Cria o administrador já com o username escopado pela empresa.
        // Se falhar aqui, a empresa criada acima é desfeita.
        let username = scoped_username(&admin.username, &company.name);
        let admin_user = self
            .user_repo
            .create_user(
                &mut *tx,
                company.id,
                &admin.fullname,
                &username,
                &admin.personal_email,
                address,
                &password_hash,
                UserRole::Administrator,
            )
            .await?;

        // 4. Se chegou aqui, deu tudo certo.
        tx.commit().await?;

        tracing::info!(
            "🏢 Empresa '{}' criada com o administrador '{}'",
            company.name,
            admin_user.username
        );
        Ok((company, admin_user))
    }

    async fn check_city(&self, city_id: Option<Uuid>) -> Result<(), AppError> {
        if let Some(city_id) = city_id {
            self.location_repo
                .find_city(city_id)
                .await?
                .ok_or(AppError::CityNotFound)?;
        }
        Ok(())
    }
}
