// src/config.rs

use std::{env, path::PathBuf, time::Duration};

use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    db::{
        CompanyRepository, LocationRepository, OrderRepository, ProductRepository,
        SubscriptionRepository, UserRepository,
    },
    services::{
        auth::AuthService,
        company_service::CompanyService,
        order_service::OrderService,
        subscription_service::{SubscriptionService, SubscriptionTokenCodec},
    },
};

// Identidade da empresa matriz semeada na primeira subida
#[derive(Clone)]
pub struct BootstrapConfig {
    pub company_name: String,
    pub admin_fullname: String,
    pub admin_username: String,
    pub admin_email: String,
    pub admin_password: String,
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub upload_dir: PathBuf,
    pub bootstrap: BootstrapConfig,

    // Repositórios usados diretamente pelos handlers
    pub company_repo: CompanyRepository,
    pub user_repo: UserRepository,
    pub product_repo: ProductRepository,
    pub order_repo: OrderRepository,
    pub subscription_repo: SubscriptionRepository,
    pub location_repo: LocationRepository,

    // Serviços (regras de negócio transacionais)
    pub auth_service: AuthService,
    pub company_service: CompanyService,
    pub order_service: OrderService,
    pub subscription_service: SubscriptionService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");
        let upload_dir =
            PathBuf::from(env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()));

        let bootstrap = BootstrapConfig {
            company_name: env::var("BOOTSTRAP_COMPANY")
                .unwrap_or_else(|_| "Tragel Group".to_string()),
            admin_fullname: env::var("BOOTSTRAP_ADMIN_FULLNAME")
                .unwrap_or_else(|_| "Joshua".to_string()),
            admin_username: env::var("BOOTSTRAP_ADMIN_USERNAME")
                .unwrap_or_else(|_| "iamOgunyinka".to_string()),
            admin_email: env::var("BOOTSTRAP_ADMIN_EMAIL")
                .unwrap_or_else(|_| "ogunyinkajoshua@yahoo.com".to_string()),
            admin_password: env::var("BOOTSTRAP_ADMIN_PASSWORD")
                .expect("BOOTSTRAP_ADMIN_PASSWORD deve ser definida"),
        };

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let company_repo = CompanyRepository::new(db_pool.clone());
        let user_repo = UserRepository::new(db_pool.clone());
        let product_repo = ProductRepository::new(db_pool.clone());
        let order_repo = OrderRepository::new(db_pool.clone());
        let subscription_repo = SubscriptionRepository::new(db_pool.clone());
        let location_repo = LocationRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo.clone(), jwt_secret.clone());
        let company_service = CompanyService::new(
            company_repo.clone(),
            user_repo.clone(),
            location_repo.clone(),
            db_pool.clone(),
        );
        let order_service =
            OrderService::new(order_repo.clone(), product_repo.clone(), db_pool.clone());
        let subscription_service = SubscriptionService::new(
            subscription_repo.clone(),
            company_repo.clone(),
            SubscriptionTokenCodec::new(jwt_secret),
            db_pool.clone(),
        );

        Ok(Self {
            db_pool,
            upload_dir,
            bootstrap,
            company_repo,
            user_repo,
            product_repo,
            order_repo,
            subscription_repo,
            location_repo,
            auth_service,
            company_service,
            order_service,
            subscription_service,
        })
    }
}
