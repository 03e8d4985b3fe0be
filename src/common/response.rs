// src/common/response.rs

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use utoipa::ToSchema;

// Envelope padrão para respostas que só carregam uma mensagem
// (criações, exclusões, resgates de token etc).
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiMessage {
    #[schema(example = 200)]
    pub status: u16,
    #[schema(example = "Successful")]
    pub message: String,
}

impl ApiMessage {
    pub fn new(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<Self>) {
        (
            status,
            Json(Self {
                status: status.as_u16(),
                message: message.into(),
            }),
        )
    }

    pub fn ok(message: impl Into<String>) -> impl IntoResponse {
        Self::new(StatusCode::OK, message)
    }
}
