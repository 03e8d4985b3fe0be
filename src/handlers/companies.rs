// src/handlers/companies.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        pagination::{PageQuery, Paginated},
        response::ApiMessage,
    },
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{RequireRole, SuperUserRole},
    },
    models::company::Company,
};

// ---
// Payload: CreateCompany
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Tragel Epe")]
    pub name: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub official_email: Option<String>,

    pub address: Option<String>,
    pub city_id: Option<Uuid>,
}

// Filtro opcional por localização (?state=Lagos&city=Ikeja)
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct CompanyFilter {
    pub state: Option<String>,
    pub city: Option<String>,
}

// GET /api/v1/companies — somente super-usuário enxerga todos os tenants
#[utoipa::path(
    get,
    path = "/api/v1/companies",
    tag = "Companies",
    params(PageQuery, CompanyFilter),
    responses((status = 200, description = "Listagem paginada de empresas")),
    security(("api_jwt" = []))
)]
pub async fn list_companies(
    State(app_state): State<AppState>,
    _guard: RequireRole<SuperUserRole>,
    Query(page): Query<PageQuery>,
    Query(filter): Query<CompanyFilter>,
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
    let total = app_state
        .company_repo
        .count_by_state_and_city(filter.state.as_deref(), filter.city.as_deref())
        .await?;
    Ok(Json(Paginated::new(companies, &page, total)))
}

#[utoipa::path(
    get,
    path = "/api/v1/companies/{company_id}",
    tag = "Companies",
    responses(
        (status = 200, description = "Empresa encontrada", body = Company),
        (status = 404, description = "Empresa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_company(
    State(app_state): State<AppState>,
    _guard: RequireRole<SuperUserRole>,
    Path(company_id): Path<Uuid>,
) -> Result<Json<Company>, AppError> {
    let company = app_state
        .company_repo
        .find_by_id(company_id)
        .await?
        .ok_or(AppError::CompanyNotFound)?;
    Ok(Json(company))
}

#[utoipa::path(
    post,
    path = "/api/v1/companies",
    tag = "Companies",
    request_body = CreateCompanyPayload,
    responses((status = 201, description = "Empresa criada", body = Company)),
    security(("api_jwt" = []))
)]
pub async fn create_company(
    State(app_state): State<AppState>,
    _guard: RequireRole<SuperUserRole>,
    Json(payload): Json<CreateCompanyPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let company = app_state
        .company_service
        .create_company(
            &payload.name,
            payload.official_email.as_deref(),
            payload.address.as_deref(),
            payload.city_id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(company)))
}

// Exclusão física, restrita ao super-usuário. As linhas dependentes caem
// por CASCADE — é a única remoção "de verdade" do sistema.
#[utoipa::path(
    delete,
    path = "/api/v1/companies/{company_id}",
    tag = "Companies",
    responses(
        (status = 200, description = "Empresa removida", body = ApiMessage),
        (status = 404, description = "Empresa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_company(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequireRole<SuperUserRole>,
    Path(company_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let company = app_state
        .company_repo
        .find_by_id(company_id)
        .await?
        .ok_or(AppError::CompanyNotFound)?;

    tracing::warn!(
        "🗑️ DELETE[delete_company] por '{}': empresa '{}'",
        user.username,
        company.name
    );

    if !app_state.company_repo.delete(company_id).await? {
        return Err(AppError::CompanyNotFound);
    }
    Ok(ApiMessage::ok("Successful"))
}
