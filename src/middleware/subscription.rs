// src/middleware/subscription.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use chrono::Utc;

use crate::{common::error::AppError, config::AppState, models::auth::User};

// Guardião de assinatura: só deixa passar se a assinatura mais recente da
// empresa do chamador ainda estiver vigente hoje.
pub struct ActiveSubscription;

impl<S> FromRequestParts<S> for ActiveSubscription
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let user = parts
            .extensions
            .get::<User>()
            .ok_or(AppError::InvalidToken)?;

        let today = Utc::now().date_naive();
        let active = app_state
            .subscription_service
            .is_company_active(user.company_id, today)
            .await?;

        if !active {
            return Err(AppError::SubscriptionRequired);
        }

        Ok(ActiveSubscription)
    }
}
