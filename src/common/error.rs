// src/common/error.rs

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Toda resposta de erro segue o envelope {status, error, message}.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Permissão negada: {0}")]
    Forbidden(String),

    #[error("A empresa não possui nenhuma assinatura ativa")]
    SubscriptionRequired,

    #[error("Muitas requisições")]
    RateLimited { retry_after: u64 },

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Empresa não encontrada")]
    CompanyNotFound,

    #[error("Produto não encontrado")]
    ProductNotFound,

    #[error("Pedido não encontrado")]
    OrderNotFound,

    #[error("Cidade não encontrada")]
    CityNotFound,

    #[error("Item não encontrado")]
    ItemNotFound,

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Nome de usuário já existe nesta empresa")]
    UsernameAlreadyExists,

    #[error("Referência de pagamento já registrada")]
    PaymentReferenceAlreadyExists,

    #[error("Token de assinatura inválido ou malformado")]
    InvalidSubscriptionToken,

    #[error("Token de assinatura já utilizado")]
    SubscriptionTokenUsed,

    #[error("Intervalo de datas inválido")]
    InvalidDateRange,

    #[error("Upload inválido: {0}")]
    InvalidUpload(String),

    #[error("Violação de restrição única: {0}")]
    UniqueConstraintViolation(String),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::SubscriptionRequired => StatusCode::FORBIDDEN,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::UserNotFound
            | AppError::CompanyNotFound
            | AppError::ProductNotFound
            | AppError::OrderNotFound
            | AppError::ItemNotFound => StatusCode::NOT_FOUND,
            AppError::EmailAlreadyExists
            | AppError::UsernameAlreadyExists
            | AppError::PaymentReferenceAlreadyExists
            | AppError::SubscriptionTokenUsed
            | AppError::UniqueConstraintViolation(_) => StatusCode::CONFLICT,
            AppError::InvalidSubscriptionToken
            | AppError::InvalidDateRange
            | AppError::CityNotFound
            | AppError::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Validação retorna todos os detalhes por campo.
        if let AppError::ValidationError(errors) = &self {
            let mut details = std::collections::HashMap::new();
            for (field, field_errors) in errors.field_errors() {
                let messages: Vec<String> = field_errors
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .collect();
                details.insert(field.to_string(), messages);
            }
            let body = Json(json!({
                "status": status.as_u16(),
                "error": "Um ou mais campos são inválidos.",
                "details": details,
            }));
            return (status, body).into_response();
        }

        let message = match &self {
            // Erros internos viram uma mensagem opaca; o detalhe fica no log.
            e if status == StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                "Ocorreu um erro inesperado.".to_string()
            }
            e => e.to_string(),
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "error": status.canonical_reason().unwrap_or("Erro"),
            "message": message,
        }));

        let mut response = (status, body).into_response();
        if let AppError::RateLimited { retry_after } = self {
            if let Ok(value) = retry_after.to_string().parse() {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            AppError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::SubscriptionRequired.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::RateLimited { retry_after: 5 }.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AppError::SubscriptionTokenUsed.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::InvalidSubscriptionToken.status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn rate_limited_sets_retry_after() {
        let response = AppError::RateLimited { retry_after: 12 }.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers().get(header::RETRY_AFTER).unwrap(),
            "12"
        );
    }
}
