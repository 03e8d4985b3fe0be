// src/handlers/uploads.rs

use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{AdminRole, RequireRole},
        subscription::ActiveSubscription,
    },
};

// Limite de 150 KB por arquivo (miniaturas de produto, não fotografia)
pub const MAX_UPLOAD_BYTES: usize = 150 * 1024;

const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

fn extension_of(filename: &str) -> Option<String> {
    let ext = filename.rsplit_once('.')?.1.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

// POST /api/v1/uploads — multipart com um campo "photo". O arquivo é salvo
// em {UPLOAD_DIR}/{company_id}/{uuid}.{ext} e servido em /uploads.
#[utoipa::path(
    post,
    path = "/api/v1/uploads",
    tag = "Uploads",
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Arquivo salvo, URL pública retornada"),
        (status = 400, description = "Campo ausente, extensão proibida ou arquivo grande demais")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload_photo(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _role: RequireRole<AdminRole>,
    _sub: ActiveSubscription,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidUpload(e.to_string()))?
    {
        if field.name() != Some("photo") {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_owned)
            .ok_or_else(|| AppError::InvalidUpload("O arquivo não tem nome.".to_string()))?;

        let ext = extension_of(&filename).ok_or_else(|| {
            AppError::InvalidUpload(format!(
                "Extensão não permitida (aceitamos {}).",
                ALLOWED_EXTENSIONS.join(", ")
            ))
        })?;

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidUpload(e.to_string()))?;
        if data.len() > MAX_UPLOAD_BYTES {
            return Err(AppError::InvalidUpload(format!(
                "O arquivo excede o limite de {} KB.",
                MAX_UPLOAD_BYTES / 1024
            )));
        }

        // 1. Diretório por empresa, criado sob demanda
        let dir = app_state.upload_dir.join(user.company_id.to_string());
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| anyhow::anyhow!("Falha ao criar diretório de upload: {}", e))?;

        // 2. Nome aleatório: nunca reaproveitamos o nome enviado pelo cliente
        let stored_name = format!("{}.{}", Uuid::new_v4(), ext);
        let path = dir.join(&stored_name);
        tokio::fs::write(&path, &data)
            .await
            .map_err(|e| anyhow::anyhow!("Falha ao gravar o arquivo: {}", e))?;

        let url = format!("/uploads/{}/{}", user.company_id, stored_name);
        tracing::info!("✅ Upload de '{}' salvo em '{}'", filename, url);

        return Ok((
            StatusCode::CREATED,
            Json(json!({
                "status": StatusCode::CREATED.as_u16(),
                "message": "Successful",
                "url": url,
            })),
        ));
    }

    Err(AppError::InvalidUpload(
        "O campo \"photo\" é obrigatório.".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_whitelist() {
        assert_eq!(extension_of("foto.PNG").as_deref(), Some("png"));
        assert_eq!(extension_of("a.b.jpeg").as_deref(), Some("jpeg"));
        assert_eq!(extension_of("script.sh"), None);
        // sem extensão, sem upload
        assert_eq!(extension_of("semextensao"), None);
    }
}
