// src/middleware/rbac.rs

use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{common::error::AppError, models::auth::User, models::auth::UserRole};

/// 1. O Trait que define um degrau mínimo de papel
pub trait RoleDef: Send + Sync + 'static {
    fn min_role() -> UserRole;
    fn label() -> &'static str;
}

/// 2. O Extractor (Guardião): rejeita com 403 quem estiver abaixo do degrau.
/// Como os papéis formam uma ordem total, o check de "somente super-usuário"
/// é o mesmo check de limiar com o degrau no topo.
pub struct RequireRole<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<User>()
            .ok_or(AppError::InvalidToken)?;

        if !role_meets(user.role, T::min_role()) {
            return Err(AppError::Forbidden(format!(
                "Esta ação exige o papel '{}' ou superior.",
                T::label()
            )));
        }

        Ok(RequireRole(PhantomData))
    }
}

pub fn role_meets(actual: UserRole, required: UserRole) -> bool {
    actual >= required
}

// ---
// DEFINIÇÃO DOS DEGRAUS (TIPOS)
// ---

pub struct AdminRole;
impl RoleDef for AdminRole {
    fn min_role() -> UserRole {
        UserRole::Administrator
    }
    fn label() -> &'static str {
        "administrador"
    }
}

pub struct SuperUserRole;
impl RoleDef for SuperUserRole {
    fn min_role() -> UserRole {
        UserRole::SuperUser
    }
    fn label() -> &'static str {
        "super-usuário"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_follow_role_order() {
        assert!(role_meets(UserRole::Administrator, AdminRole::min_role()));
        assert!(role_meets(UserRole::SuperUser, AdminRole::min_role()));
        assert!(!role_meets(UserRole::Basic, AdminRole::min_role()));

        assert!(role_meets(UserRole::SuperUser, SuperUserRole::min_role()));
        assert!(!role_meets(
            UserRole::Administrator,
            SuperUserRole::min_role()
        ));
    }
}
