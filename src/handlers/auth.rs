// src/handlers/auth.rs

use axum::{Json, extract::State};
use validator::Validate;

use crate::{
    common::{error::AppError, response::ApiMessage},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{AuthResponse, LoginPayload, User},
};

// Handler de login
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Token de sessão emitido", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let token = app_state
        .auth_service
        .login_user(&payload.username, &payload.password)
        .await?;

    Ok(Json(AuthResponse { token }))
}

// Com JWT a sessão é stateless: o logout só confirma que o cliente deve
// descartar o token.
#[utoipa::path(
    get,
    path = "/auth/logout",
    tag = "Auth",
    responses((status = 200, description = "Sessão encerrada", body = ApiMessage)),
    security(("api_jwt" = []))
)]
pub async fn logout(AuthenticatedUser(user): AuthenticatedUser) -> impl axum::response::IntoResponse {
    tracing::info!("👋 Logout do usuário '{}'", user.username);
    ApiMessage::ok("Sessão encerrada.")
}

// Handler da rota protegida /me
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Auth",
    responses((status = 200, description = "Usuário autenticado", body = User)),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<User> {
    Json(user)
}

#[utoipa::path(
    get,
    path = "/auth/ping",
    tag = "Auth",
    responses((status = 200, description = "OK", body = ApiMessage))
)]
pub async fn ping() -> impl axum::response::IntoResponse {
    ApiMessage::ok("OK")
}
