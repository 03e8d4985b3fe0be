// src/models/location.rs

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

// Hierarquia de localização (dados de referência): País -> Estado -> Cidade.

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub id: Uuid,
    #[schema(example = "Nigeria")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct State {
    pub id: Uuid,
    pub country_id: Uuid,
    #[schema(example = "Lagos")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub id: Uuid,
    pub state_id: Uuid,
    #[schema(example = "Ikeja")]
    pub name: String,
}
