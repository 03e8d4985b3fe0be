// src/db/location_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::location::{City, Country, State},
};

// Dados de referência read-mostly; só leituras, a carga vem das migrações.
#[derive(Clone)]
pub struct LocationRepository {
    pool: PgPool,
}

impl LocationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_countries(&self) -> Result<Vec<Country>, AppError> {
        let countries =
            sqlx::query_as::<_, Country>("SELECT id, name FROM countries ORDER BY name ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(countries)
    }

    pub async fn list_states(&self, country_id: Uuid) -> Result<Vec<State>, AppError> {
        let states = sqlx::query_as::<_, State>(
            "SELECT id, country_id, name FROM states WHERE country_id = $1 ORDER BY name ASC",
        )
        .bind(country_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(states)
    }

    pub async fn list_cities(&self, state_id: Uuid) -> Result<Vec<City>, AppError> {
        let cities = sqlx::query_as::<_, City>(
            "SELECT id, state_id, name FROM cities WHERE state_id = $1 ORDER BY name ASC",
        )
        .bind(state_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(cities)
    }

    pub async fn find_city(&self, city_id: Uuid) -> Result<Option<City>, AppError> {
        let maybe_city =
            sqlx::query_as::<_, City>("SELECT id, state_id, name FROM cities WHERE id = $1")
                .bind(city_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(maybe_city)
    }
}
