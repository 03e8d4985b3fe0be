// src/handlers/mobile.rs
//
// Superfície consumida pelo aplicativo. Os clientes do app são cadastrados
// como usuários básicos da empresa padrão do sistema.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        pagination::{PageQuery, Paginated},
    },
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{LoginPayload, UserRole},
    services::auth::{hash_password, scoped_username},
};

// ---
// Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignUpPayload {
    #[validate(length(min = 1, message = "O nome completo é obrigatório."))]
    pub fullname: String,

    #[validate(length(min = 3, message = "O nome de usuário deve ter pelo menos 3 caracteres."))]
    pub username: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub personal_email: String,

    pub address: Option<String>,

    #[validate(length(min = 8, message = "A senha deve ter pelo menos 8 caracteres."))]
    pub password: String,
}

// Filtro por localização (?state=Lagos&city=Ikeja)
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct LocationFilter {
    pub state: Option<String>,
    pub city: Option<String>,
}

// ---
// Handlers
// ---

// POST /api/mobile/sign_up — auto-cadastro de cliente do aplicativo
#[utoipa::path(
    post,
    path = "/api/mobile/sign_up",
    tag = "Mobile",
    request_body = SignUpPayload,
    responses(
        (status = 201, description = "Conta criada"),
        (status = 409, description = "E-mail ou nome de usuário já em uso")
    )
)]
pub async fn sign_up(
    State(app_state): State<AppState>,
    Json(payload): Json<SignUpPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    // Clientes do app pertencem à empresa padrão criada no bootstrap
    let company = app_state
        .company_repo
        .find_by_name(&app_state.bootstrap.company_name)
        .await?
        .ok_or(AppError::CompanyNotFound)?;

    let username = scoped_username(&payload.username, &company.name);
    let password_hash = hash_password(&payload.password).await?;

    let user = app_state
        .user_repo
        .create_user(
            &app_state.db_pool,
            company.id,
            &payload.fullname,
            &username,
            &payload.personal_email,
            payload.address.as_deref(),
            &password_hash,
            UserRole::Basic,
        )
        .await?;

    tracing::info!("✅ Cliente mobile '{}' cadastrado", user.username);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": StatusCode::CREATED.as_u16(),
            "message": "Successful",
            "username": user.username,
        })),
    ))
}

// POST /api/mobile/login — mesma autenticação, resposta em envelope
#[utoipa::path(
    post,
    path = "/api/mobile/login",
    tag = "Mobile",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Token de sessão emitido"),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let token = app_state
        .auth_service
        .login_user(&payload.username, &payload.password)
        .await?;

    Ok(Json(json!({
        "status": StatusCode::OK.as_u16(),
        "message": "Successful",
        "token": token,
    })))
}

// GET /api/mobile/companies — diretório de empresas, filtrável por localização
#[utoipa::path(
    get,
    path = "/api/mobile/companies",
    tag = "Mobile",
    params(PageQuery, LocationFilter),
    responses((status = 200, description = "Empresas visíveis no aplicativo")),
    security(("api_jwt" = []))
)]
pub async fn list_companies(
    State(app_state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Query(page): Query<PageQuery>,
    Query(filter): Query<LocationFilter>,
) -> Result<impl IntoResponse, AppError> {
    let companies = app_state
        .company_repo
        .list_by_state_and_city(
            filter.state.as_deref(),
            filter.city.as_deref(),
            page.limit(),
            page.offset(),
        )
        .await?;
    Ok(Json(json!({
        "status": StatusCode::OK.as_u16(),
        "message": "Successful",
        "companies": companies,
    })))
}

// GET /api/mobile/companies/{company_id}/products — catálogo público da empresa
#[utoipa::path(
    get,
    path = "/api/mobile/companies/{company_id}/products",
    tag = "Mobile",
    params(PageQuery),
    responses(
        (status = 200, description = "Catálogo paginado"),
        (status = 404, description = "Empresa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn company_products(
    State(app_state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(company_id): Path<Uuid>,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .company_repo
        .find_by_id(company_id)
        .await?
        .ok_or(AppError::CompanyNotFound)?;

    let products = app_state
        .product_repo
        .list_by_company(company_id, false, page.limit(), page.offset())
        .await?;
    let total = app_state
        .product_repo
        .count_by_company(company_id, false)
        .await?;
    Ok(Json(Paginated::new(products, &page, total)))
}
