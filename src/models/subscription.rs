// src/models/subscription.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: Uuid,
    #[schema(ignore)]
    pub company_id: Uuid,
    pub begin_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(skip_serializing)] // o token bruto não volta nas listagens
    #[schema(ignore)]
    pub token: String,
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    // Regra de vigência: a assinatura vale até o fim do dia de `end_date`.
    pub fn is_active_on(&self, today: NaiveDate) -> bool {
        self.end_date >= today
    }
}

// Claims embutidos no token assinado de ativação de assinatura.
// Os nomes dos campos fazem parte do formato do token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionClaims {
    pub id: Uuid,         // empresa destinatária
    pub company: String,  // nome da empresa no momento da emissão
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(begin: NaiveDate, end: NaiveDate) -> Subscription {
        Subscription {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            begin_date: begin,
            end_date: end,
            token: "tok".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn active_until_end_of_last_day() {
        let begin = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let s = sub(begin, end);

        assert!(s.is_active_on(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()));
        // no próprio dia do vencimento ainda está ativa
        assert!(s.is_active_on(end));
        // no dia seguinte, não
        assert!(!s.is_active_on(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()));
    }

    #[test]
    fn token_is_not_serialized() {
        let s = sub(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        );
        let json = serde_json::to_string(&s).unwrap();
        assert!(!json.contains("tok"));
    }
}
