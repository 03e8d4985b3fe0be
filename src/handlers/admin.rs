// src/handlers/admin.rs
//
// Console administrativo: restrito ao super-usuário. É por aqui que novas
// empresas (e filiais) entram no sistema, já com o primeiro administrador.

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
    middleware::rbac::{RequireRole, SuperUserRole},
    models::location::{City, Country, State as LocationState},
    services::company_service::NewAdmin,
};

// ---
// Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OnboardCompanyPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Tragel Epe")]
    pub name: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub official_email: Option<String>,

    pub address: Option<String>,
    pub city_id: Option<Uuid>,

    #[validate(length(min = 1, message = "O nome completo do administrador é obrigatório."))]
    pub admin_fullname: String,

    #[validate(length(min = 3, message = "O nome de usuário deve ter pelo menos 3 caracteres."))]
    pub admin_username: String,

    #[validate(email(message = "O e-mail do administrador é inválido."))]
    pub admin_email: String,

    #[validate(length(min = 8, message = "A senha deve ter pelo menos 8 caracteres."))]
    pub admin_password: String,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AuditQuery {
    // inclui as linhas soft-deletadas na listagem (auditoria)
    pub include_deleted: Option<bool>,
}

impl AuditQuery {
    fn include_deleted(&self) -> bool {
        self.include_deleted.unwrap_or(false)
    }
}

// ---
// Onboarding
// ---

#[utoipa::path(
    post,
    path = "/admin/companies",
    tag = "Admin",
    request_body = OnboardCompanyPayload,
    responses(
        (status = 201, description = "Empresa criada com o primeiro administrador"),
        (status = 409, description = "E-mail ou nome de usuário já em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn onboard_company(
    State(app_state): State<AppState>,
    _guard: RequireRole<SuperUserRole>,
    Json(payload): Json<OnboardCompanyPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let (company, admin) = app_state
        .company_service
        .onboard_company(
            &payload.name,
            payload.official_email.as_deref(),
            payload.address.as_deref(),
            payload.city_id,
            None,
            NewAdmin {
                fullname: payload.admin_fullname,
                username: payload.admin_username,
                personal_email: payload.admin_email,
                password: payload.admin_password,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "company": company, "admin": admin })),
    ))
}

// A filial aponta para a matriz via headquarters_id
#[utoipa::path(
    post,
    path = "/admin/companies/{company_id}/branches",
    tag = "Admin",
    request_body = OnboardCompanyPayload,
    responses(
        (status = 201, description = "Filial criada com o primeiro administrador"),
        (status = 404, description = "Matriz não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn onboard_branch(
    State(app_state): State<AppState>,
    _guard: RequireRole<SuperUserRole>,
    Path(company_id): Path<Uuid>,
    Json(payload): Json<OnboardCompanyPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let (branch, admin) = app_state
        .company_service
        .onboard_company(
            &payload.name,
            payload.official_email.as_deref(),
            payload.address.as_deref(),
            payload.city_id,
            Some(company_id),
            NewAdmin {
                fullname: payload.admin_fullname,
                username: payload.admin_username,
                personal_email: payload.admin_email,
                password: payload.admin_password,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "company": branch, "admin": admin })),
    ))
}

// ---
// Auditoria: listagens que enxergam soft-deletados
// ---

#[utoipa::path(
    get,
    path = "/admin/companies/{company_id}/staff",
    tag = "Admin",
    params(PageQuery, AuditQuery),
    responses((status = 200, description = "Funcionários da empresa, opcionalmente com removidos")),
    security(("api_jwt" = []))
)]
pub async fn company_staff(
    State(app_state): State<AppState>,
    _guard: RequireRole<SuperUserRole>,
    Path(company_id): Path<Uuid>,
    Query(page): Query<PageQuery>,
    Query(audit): Query<AuditQuery>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .company_repo
        .find_by_id(company_id)
        .await?
        .ok_or(AppError::CompanyNotFound)?;

    let users = app_state
        .user_repo
        .list_by_company(
            company_id,
            audit.include_deleted(),
            page.limit(),
            page.offset(),
        )
        .await?;
    let total = app_state
        .user_repo
        .count_by_company(company_id, audit.include_deleted())
        .await?;
    Ok(Json(Paginated::new(users, &page, total)))
}

#[utoipa::path(
    get,
    path = "/admin/companies/{company_id}/products",
    tag = "Admin",
    params(PageQuery, AuditQuery),
    responses((status = 200, description = "Produtos da empresa, opcionalmente com removidos")),
    security(("api_jwt" = []))
)]
pub async fn company_products(
    State(app_state): State<AppState>,
    _guard: RequireRole<SuperUserRole>,
    Path(company_id): Path<Uuid>,
    Query(page): Query<PageQuery>,
    Query(audit): Query<AuditQuery>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .company_repo
        .find_by_id(company_id)
        .await?
        .ok_or(AppError::CompanyNotFound)?;

    let products = app_state
        .product_repo
        .list_by_company(
            company_id,
            audit.include_deleted(),
            page.limit(),
            page.offset(),
        )
        .await?;
    let total = app_state
        .product_repo
        .count_by_company(company_id, audit.include_deleted())
        .await?;
    Ok(Json(Paginated::new(products, &page, total)))
}

// ---
// Dados de referência de localização
// ---

#[utoipa::path(
    get,
    path = "/admin/locations/countries",
    tag = "Admin",
    responses((status = 200, description = "Países cadastrados", body = [Country])),
    security(("api_jwt" = []))
)]
pub async fn list_countries(
    State(app_state): State<AppState>,
    _guard: RequireRole<SuperUserRole>,
) -> Result<Json<Vec<Country>>, AppError> {
    Ok(Json(app_state.location_repo.list_countries().await?))
}

#[utoipa::path(
    get,
    path = "/admin/locations/countries/{country_id}/states",
    tag = "Admin",
    responses((status = 200, description = "Estados do país", body = [LocationState])),
    security(("api_jwt" = []))
)]
pub async fn list_states(
    State(app_state): State<AppState>,
    _guard: RequireRole<SuperUserRole>,
    Path(country_id): Path<Uuid>,
) -> Result<Json<Vec<LocationState>>, AppError> {
    Ok(Json(app_state.location_repo.list_states(country_id).await?))
}

#[utoipa::path(
    get,
    path = "/admin/locations/states/{state_id}/cities",
    tag = "Admin",
    responses((status = 200, description = "Cidades do estado", body = [City])),
    security(("api_jwt" = []))
)]
pub async fn list_cities(
    State(app_state): State<AppState>,
    _guard: RequireRole<SuperUserRole>,
    Path(state_id): Path<Uuid>,
) -> Result<Json<Vec<City>>, AppError> {
    Ok(Json(app_state.location_repo.list_cities(state_id).await?))
}
