// src/models/company.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

// Uma empresa (tenant). `headquarters_id` preenchido indica que a linha
// é uma filial apontando para a matriz.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: Uuid,
    #[schema(example = "Tragel Group")]
    pub name: String,
    pub official_email: Option<String>,
    pub address: Option<String>,
    pub city_id: Option<Uuid>,
    pub headquarters_id: Option<Uuid>,
    pub date_of_creation: DateTime<Utc>,
}
