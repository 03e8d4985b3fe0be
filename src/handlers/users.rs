// src/handlers/users.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::ToSchema;
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
        rbac::{AdminRole, RequireRole},
        subscription::ActiveSubscription,
    },
    models::auth::{User, UserRole},
    services::auth::{hash_password, scoped_username},
};

// ---
// Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStaffPayload {
    #[validate(length(min = 1, message = "O nome completo é obrigatório."))]
    #[schema(example = "Maria Adeyemi")]
    pub fullname: String,

    #[validate(length(min = 3, message = "O nome de usuário deve ter pelo menos 3 caracteres."))]
    #[schema(example = "maria")]
    pub username: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub personal_email: String,

    pub address: Option<String>,

    #[validate(length(min = 8, message = "A senha deve ter pelo menos 8 caracteres."))]
    pub password: String,

    // administradores só criam papéis abaixo de super-usuário
    pub role: Option<UserRole>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRolePayload {
    pub role: UserRole,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordPayload {
    #[validate(length(min = 8, message = "A senha deve ter pelo menos 8 caracteres."))]
    pub new_password: String,
}

// ---
// Handlers
// ---

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    params(PageQuery),
    responses((status = 200, description = "Listagem paginada de funcionários")),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _role: RequireRole<AdminRole>,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let users = app_state
        .user_repo
        .list_by_company(user.company_id, false, page.limit(), page.offset())
        .await?;
    let total = app_state
        .user_repo
        .count_by_company(user.company_id, false)
        .await?;
    Ok(Json(Paginated::new(users, &page, total)))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    tag = "Users",
    responses(
        (status = 200, description = "Funcionário encontrado", body = User),
        (status = 404, description = "Funcionário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_user(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _role: RequireRole<AdminRole>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<User>, AppError> {
    let staff = app_state
        .user_repo
        .find_by_id_in_company(user.company_id, user_id)
        .await?
        .ok_or(AppError::UserNotFound)?;
    Ok(Json(staff))
}

// POST /api/v1/users — administrador cria funcionário na PRÓPRIA empresa.
// O papel pedido nunca pode igualar ou exceder o do criador.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    request_body = CreateStaffPayload,
    responses(
        (status = 201, description = "Funcionário criado", body = User),
        (status = 409, description = "E-mail ou nome de usuário já em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    AuthenticatedUser(creator): AuthenticatedUser,
    _role: RequireRole<AdminRole>,
    _sub: ActiveSubscription,
    Json(payload): Json<CreateStaffPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let role = payload.role.unwrap_or(UserRole::Basic);
    if role >= creator.role {
        return Err(AppError::Forbidden(
            "Você não pode conceder um papel igual ou superior ao seu.".to_string(),
        ));
    }

    let company = app_state
        .company_repo
        .find_by_id(creator.company_id)
        .await?
        .ok_or(AppError::CompanyNotFound)?;

    let username = scoped_username(&payload.username, &company.name);
    let password_hash = hash_password(&payload.password).await?;

    let staff = app_state
        .user_repo
        .create_user(
            &app_state.db_pool,
            creator.company_id,
            &payload.fullname,
            &username,
            &payload.personal_email,
            payload.address.as_deref(),
            &password_hash,
            role,
        )
        .await?;

    tracing::info!(
        "✅ Funcionário '{}' criado na empresa '{}' por '{}'",
        staff.username,
        company.name,
        creator.username
    );

    Ok((StatusCode::CREATED, Json(staff)))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}/role",
    tag = "Users",
    request_body = ChangeRolePayload,
    responses(
        (status = 200, description = "Papel atualizado", body = User),
        (status = 403, description = "Papel pedido acima do permitido")
    ),
    security(("api_jwt" = []))
)]
pub async fn change_role(
    State(app_state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    _role: RequireRole<AdminRole>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<ChangeRolePayload>,
) -> Result<Json<User>, AppError> {
    if payload.role >= actor.role {
        return Err(AppError::Forbidden(
            "Você não pode conceder um papel igual ou superior ao seu.".to_string(),
        ));
    }

    let target = app_state
        .user_repo
        .find_by_id_in_company(actor.company_id, user_id)
        .await?
        .ok_or(AppError::UserNotFound)?;

    if target.role >= actor.role {
        return Err(AppError::Forbidden(
            "Você não pode alterar um usuário de papel igual ou superior ao seu.".to_string(),
        ));
    }

    let updated = app_state
        .user_repo
        .update_role(target.id, payload.role)
        .await?;
    Ok(Json(updated))
}

// Redefinição de senha de terceiros. Por segurança o administrador não
// redefine a própria senha por aqui.
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}/password",
    tag = "Users",
    request_body = ResetPasswordPayload,
    responses(
        (status = 200, description = "Senha redefinida", body = ApiMessage),
        (status = 403, description = "Não é permitido redefinir a própria senha")
    ),
    security(("api_jwt" = []))
)]
pub async fn reset_password(
    State(app_state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    _role: RequireRole<AdminRole>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<ResetPasswordPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    if user_id == actor.id {
        return Err(AppError::Forbidden(
            "Use o fluxo de troca de senha para a própria conta.".to_string(),
        ));
    }

    let target = app_state
        .user_repo
        .find_by_id_in_company(actor.company_id, user_id)
        .await?
        .ok_or(AppError::UserNotFound)?;

    if target.role >= actor.role {
        return Err(AppError::Forbidden(
            "Você não pode alterar um usuário de papel igual ou superior ao seu.".to_string(),
        ));
    }

    let password_hash = hash_password(&payload.new_password).await?;
    app_state
        .user_repo
        .update_password(target.id, &password_hash)
        .await?;

    tracing::info!(
        "🔑 Senha de '{}' redefinida por '{}'",
        target.username,
        actor.username
    );

    Ok(ApiMessage::ok("Successful"))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}",
    tag = "Users",
    responses(
        (status = 200, description = "Funcionário removido (exclusão lógica)", body = ApiMessage),
        (status = 404, description = "Funcionário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    _role: RequireRole<AdminRole>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    if user_id == actor.id {
        return Err(AppError::Forbidden(
            "Você não pode remover a própria conta.".to_string(),
        ));
    }

    let target = app_state
        .user_repo
        .find_by_id_in_company(actor.company_id, user_id)
        .await?
        .ok_or(AppError::UserNotFound)?;

    if target.role >= actor.role {
        return Err(AppError::Forbidden(
            "Você não pode remover um usuário de papel igual ou superior ao seu.".to_string(),
        ));
    }

    app_state.user_repo.soft_delete(target.id).await?;

    tracing::warn!(
        "🗑️ DELETE[delete_user] por '{}': funcionário '{}'",
        actor.username,
        target.username
    );

    Ok(ApiMessage::ok("Successful"))
}
