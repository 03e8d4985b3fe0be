// src/handlers/subscriptions.rs

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        pagination::{PageQuery, Paginated},
    },
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{AdminRole, RequireRole, SuperUserRole},
    },
    models::subscription::Subscription,
};

// ---
// Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssueTokenPayload {
    pub company_id: Uuid,
    #[schema(example = "2026-01-01")]
    pub from: NaiveDate,
    #[schema(example = "2026-12-31")]
    pub to: NaiveDate,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RedeemPayload {
    #[validate(length(min = 1, message = "O token é obrigatório."))]
    pub token: String,
}

// ---
// Handlers
// ---

#[utoipa::path(
    get,
    path = "/api/v1/subscriptions",
    tag = "Subscriptions",
    params(PageQuery),
    responses((status = 200, description = "Histórico de assinaturas da empresa")),
    security(("api_jwt" = []))
)]
pub async fn list_subscriptions(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _role: RequireRole<AdminRole>,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let subs = app_state
        .subscription_repo
        .list_by_company(user.company_id, page.limit(), page.offset())
        .await?;
    let total = app_state
        .subscription_repo
        .count_by_company(user.company_id)
        .await?;
    Ok(Json(Paginated::new(subs, &page, total)))
}

// GET /api/v1/subscriptions/expiry — quando vence (ou venceu) a assinatura
#[utoipa::path(
    get,
    path = "/api/v1/subscriptions/expiry",
    tag = "Subscriptions",
    responses((status = 200, description = "Data de vencimento e situação atual")),
    security(("api_jwt" = []))
)]
pub async fn subscription_expiry(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _role: RequireRole<AdminRole>,
) -> Result<impl IntoResponse, AppError> {
    let expiry = app_state
        .subscription_service
        .latest_expiry(user.company_id)
        .await?;
    let today = chrono::Utc::now().date_naive();
    let active = app_state
        .subscription_service
        .is_company_active(user.company_id, today)
        .await?;
    Ok(Json(json!({ "expiresOn": expiry, "active": active })))
}

// POST /api/v1/subscriptions/token — somente o super-usuário emite tokens,
// para qualquer empresa do sistema.
#[utoipa::path(
    post,
    path = "/api/v1/subscriptions/token",
    tag = "Subscriptions",
    request_body = IssueTokenPayload,
    responses(
        (status = 201, description = "Token de assinatura assinado"),
        (status = 400, description = "Intervalo de datas inválido"),
        (status = 404, description = "Empresa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn issue_token(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequireRole<SuperUserRole>,
    Json(payload): Json<IssueTokenPayload>,
) -> Result<impl IntoResponse, AppError> {
    let token = app_state
        .subscription_service
        .issue_token(payload.company_id, payload.from, payload.to)
        .await?;

    tracing::info!(
        "🔑 Token de assinatura emitido por '{}' para a empresa {} ({} a {})",
        user.username,
        payload.company_id,
        payload.from,
        payload.to
    );

    Ok((StatusCode::CREATED, Json(json!({ "token": token }))))
}

// POST /api/v1/subscriptions/redeem — o administrador da empresa aplica o
// token recebido. Cada token vale uma única vez.
#[utoipa::path(
    post,
    path = "/api/v1/subscriptions/redeem",
    tag = "Subscriptions",
    request_body = RedeemPayload,
    responses(
        (status = 201, description = "Assinatura registrada", body = Subscription),
        (status = 401, description = "Token inválido ou adulterado"),
        (status = 403, description = "Token de outra empresa"),
        (status = 409, description = "Token já utilizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn redeem_token(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _role: RequireRole<AdminRole>,
    Json(payload): Json<RedeemPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let subscription = app_state
        .subscription_service
        .redeem(user.company_id, &payload.token)
        .await?;

    tracing::info!(
        "✅ Assinatura de {} a {} ativada na empresa {} por '{}'",
        subscription.begin_date,
        subscription.end_date,
        user.company_id,
        user.username
    );

    Ok((StatusCode::CREATED, Json(subscription)))
}
