// src/middleware/rate_limit.rs

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use crate::common::error::AppError;

// Limitador de janela fixa: no máximo `limit` requisições por chave dentro
// de cada janela de `period_secs`. O contador é compartilhado entre workers
// do runtime e protegido por Mutex (a atualização precisa ser atômica).
#[derive(Clone)]
pub struct RateLimiter {
    limit: u32,
    period_secs: i64,
    counters: Arc<Mutex<HashMap<(String, i64), u32>>>,
}

impl RateLimiter {
    pub fn new(limit: u32, period_secs: i64) -> Self {
        Self {
            limit,
            period_secs,
            counters: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn check(&self, key: &str) -> Result<(), u64> {
        self.check_at(key, Utc::now().timestamp())
    }

    // Separado do relógio para ser testável.
    fn check_at(&self, key: &str, now: i64) -> Result<(), u64> {
        let bucket = now.div_euclid(self.period_secs);
        let mut counters = self
            .counters
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // Janelas antigas não interessam mais; poda na passada.
        counters.retain(|(_, b), _| *b == bucket);

        let count = counters.entry((key.to_string(), bucket)).or_insert(0);
        if *count >= self.limit {
            let retry_after = ((bucket + 1) * self.period_secs - now).max(1) as u64;
            return Err(retry_after);
        }
        *count += 1;
        Ok(())
    }
}

// Identidade do chamador: o token de sessão quando houver, senão o endereço
// informado pelo proxy, senão um balde único anônimo.
fn caller_key(request: &Request) -> String {
    if let Some(auth) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        return auth.to_string();
    }
    if let Some(forwarded) = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        return forwarded.to_string();
    }
    "anonymous".to_string()
}

pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let key = caller_key(&request);
    limiter
        .check(&key)
        .map_err(|retry_after| AppError::RateLimited { retry_after })?;
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admits_up_to_limit_and_then_rejects() {
        let limiter = RateLimiter::new(3, 15);
        let now = 1_000_005; // meio de uma janela qualquer

        assert!(limiter.check_at("a", now).is_ok());
        assert!(limiter.check_at("a", now + 1).is_ok());
        assert!(limiter.check_at("a", now + 2).is_ok());

        let retry_after = limiter.check_at("a", now + 3).unwrap_err();
        assert!(retry_after >= 1);
        assert!(retry_after <= 15);
    }

    #[test]
    fn window_rollover_resets_the_counter() {
        let limiter = RateLimiter::new(1, 15);
        let window_start = 15 * 100;

        assert!(limiter.check_at("a", window_start).is_ok());
        assert!(limiter.check_at("a", window_start + 14).is_err());
        // primeira marca da janela seguinte
        assert!(limiter.check_at("a", window_start + 15).is_ok());
    }

    #[test]
    fn keys_do_not_share_budget() {
        let limiter = RateLimiter::new(1, 15);
        let now = 30;

        assert!(limiter.check_at("a", now).is_ok());
        assert!(limiter.check_at("b", now).is_ok());
        assert!(limiter.check_at("a", now).is_err());
        assert!(limiter.check_at("b", now).is_err());
    }

    #[test]
    fn retry_after_points_to_next_window() {
        let limiter = RateLimiter::new(1, 10);
        // janela [20, 30); estamos no segundo 23
        assert!(limiter.check_at("a", 23).is_ok());
        assert_eq!(limiter.check_at("a", 23).unwrap_err(), 7);
    }
}
