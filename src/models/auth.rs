// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Papel do funcionário dentro da empresa. A ordem dos variantes importa:
// os guards de permissão comparam com `>=` (Basic < Administrator < SuperUser).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Basic,
    Administrator,
    SuperUser,
}

// Representa um funcionário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub company_id: Uuid,
    #[schema(example = "Joshua Ogunyinka")]
    pub fullname: String,
    #[schema(example = "joshua@Tragel Group")]
    pub username: String,
    pub personal_email: String,
    pub address: Option<String>,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    pub role: UserRole,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(length(min = 1, message = "O nome de usuário é obrigatório."))]
    pub username: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

// Estrutura de dados ("claims") dentro do JWT de sessão
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_order_is_total() {
        assert!(UserRole::Basic < UserRole::Administrator);
        assert!(UserRole::Administrator < UserRole::SuperUser);
        assert!(UserRole::SuperUser >= UserRole::SuperUser);
    }

    #[test]
    fn role_serializes_as_snake_case() {
        assert_eq!(
            serde_json::to_string(&UserRole::SuperUser).unwrap(),
            "\"super_user\""
        );
        let role: UserRole = serde_json::from_str("\"administrator\"").unwrap();
        assert_eq!(role, UserRole::Administrator);
    }

    #[test]
    fn claims_roundtrip() {
        let claims = Claims {
            sub: Uuid::new_v4(),
            exp: 2_000_000_000,
            iat: 1_700_000_000,
        };
        let json = serde_json::to_string(&claims).unwrap();
        let back: Claims = serde_json::from_str(&json).unwrap();
        assert_eq!(back.sub, claims.sub);
        assert_eq!(back.exp, claims.exp);
    }
}
