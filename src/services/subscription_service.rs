// src/services/subscription_service.rs

use chrono::NaiveDate;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CompanyRepository, SubscriptionRepository},
    models::subscription::{Subscription, SubscriptionClaims},
};

// ---
// Codec do token de assinatura
// ---
// Aplicação direta do serializador assinado: os claims carregam o próprio
// intervalo de datas, então a validação de `exp` do JWT fica desligada.
#[derive(Clone)]
pub struct SubscriptionTokenCodec {
    secret: String,
}

impl SubscriptionTokenCodec {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    pub fn sign(&self, claims: &SubscriptionClaims) -> Result<String, AppError> {
        Ok(encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )?)
    }

    // Qualquer falha (assinatura, formato, claims faltando) vira o mesmo
    // erro opaco; o chamador não distingue token forjado de token corrompido.
    pub fn verify(&self, token: &str) -> Result<SubscriptionClaims, AppError> {
        let mut validation = Validation::default();
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let token_data = decode::<SubscriptionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidSubscriptionToken)?;

        Ok(token_data.claims)
    }
}

// ---
// Serviço de assinaturas: emissão (super-usuário) e resgate (admin da empresa)
// ---
#[derive(Clone)]
pub struct SubscriptionService {
    subscription_repo: SubscriptionRepository,
    company_repo: CompanyRepository,
    codec: SubscriptionTokenCodec,
    pool: PgPool,
}

impl SubscriptionService {
    pub fn new(
        subscription_repo: SubscriptionRepository,
        company_repo: CompanyRepository,
        codec: SubscriptionTokenCodec,
        pool: PgPool,
    ) -> Self {
        Self {
            subscription_repo,
            company_repo,
            codec,
            pool,
        }
    }

    // Emite um token assinado para a empresa indicada. O token ainda não
    // cria a assinatura: ele circula fora de banda até o admin resgatá-lo.
    pub async fn issue_token(
        &self,
        company_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<String, AppError> {
        if from > to {
            return Err(AppError::InvalidDateRange);
        }
        let company = self
            .company_repo
            .find_by_id(company_id)
            .await?
            .ok_or(AppError::CompanyNotFound)?;

        self.codec.sign(&SubscriptionClaims {
            id: company.id,
            company: company.name,
            from,
            to,
        })
    }

    // Resgata um token: verifica assinatura, destinatário e uso único, e só
    // então registra a assinatura com o intervalo embutido nos claims.
    pub async fn redeem(&self, company_id: Uuid, token: &str) -> Result<Subscription, AppError> {
        let claims = self.codec.verify(token)?;

        if claims.id != company_id {
            return Err(AppError::Forbidden(
                "Este token de assinatura pertence a outra empresa.".to_string(),
            ));
        }
        if claims.from > claims.to {
            return Err(AppError::InvalidDateRange);
        }
        // Checagem antecipada; o índice único do token cobre a corrida.
        if self.subscription_repo.token_exists(token).await? {
            return Err(AppError::SubscriptionTokenUsed);
        }

        let sub = self
            .subscription_repo
            .insert(&self.pool, company_id, claims.from, claims.to, token)
            .await?;
        tracing::info!(
            "🔑 Assinatura resgatada para a empresa {} ({} a {})",
            company_id,
            claims.from,
            claims.to
        );
        Ok(sub)
    }

    // Regra de vigência (fixada): ativa <=> end_date da assinatura mais
    // recente >= hoje.
    pub async fn is_company_active(
        &self,
        company_id: Uuid,
        today: NaiveDate,
    ) -> Result<bool, AppError> {
        let latest = self.subscription_repo.latest_for_company(company_id).await?;
        Ok(latest.map(|s| s.is_active_on(today)).unwrap_or(false))
    }

    pub async fn latest_expiry(&self, company_id: Uuid) -> Result<Option<NaiveDate>, AppError> {
        let latest = self.subscription_repo.latest_for_company(company_id).await?;
        Ok(latest.map(|s| s.end_date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> SubscriptionTokenCodec {
        SubscriptionTokenCodec::new("segredo-de-teste".to_string())
    }

    fn claims() -> SubscriptionClaims {
        SubscriptionClaims {
            id: Uuid::new_v4(),
            company: "Tragel Group".to_string(),
            from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        }
    }

    #[test]
    fn sign_then_verify_recovers_claims() {
        let codec = codec();
        let original = claims();
        let token = codec.sign(&original).unwrap();
        let recovered = codec.verify(&token).unwrap();
        assert_eq!(recovered, original);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let codec = codec();
        let mut token = codec.sign(&claims()).unwrap();
        // corrompe o payload mantendo o formato
        let mid = token.len() / 2;
        let flipped = if token.as_bytes()[mid] == b'A' { "B" } else { "A" };
        token.replace_range(mid..mid + 1, flipped);
        assert!(matches!(
            codec.verify(&token),
            Err(AppError::InvalidSubscriptionToken)
        ));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            codec().verify("nem-de-longe-um-token"),
            Err(AppError::InvalidSubscriptionToken)
        ));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = codec().sign(&claims()).unwrap();
        let other = SubscriptionTokenCodec::new("outro-segredo".to_string());
        assert!(matches!(
            other.verify(&token),
            Err(AppError::InvalidSubscriptionToken)
        ));
    }
}
