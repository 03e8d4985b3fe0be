// src/handlers/products.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::{
        error::AppError,
        pagination::{PageQuery, Paginated},
        response::ApiMessage,
    },
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{AdminRole, RequireRole},
        subscription::ActiveSubscription,
    },
    models::product::Product,
};

// ---
// Validação Customizada
// ---
fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("O preço não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Cimento 50kg")]
    pub name: String,

    #[validate(custom(function = "validate_price"))]
    #[schema(example = "4500.00")]
    pub price: Decimal,

    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    #[validate(length(min = 1, message = "O nome não pode ser vazio."))]
    pub name: Option<String>,

    #[validate(custom(function = "validate_price"))]
    pub price: Option<Decimal>,

    pub thumbnail_url: Option<String>,
}

// Qualquer funcionário autenticado lê o catálogo da própria empresa;
// soft-deletados ficam de fora.
#[utoipa::path(
    get,
    path = "/api/v1/products",
    tag = "Products",
    params(PageQuery),
    responses((status = 200, description = "Listagem paginada de produtos")),
    security(("api_jwt" = []))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let products = app_state
        .product_repo
        .list_by_company(user.company_id, false, page.limit(), page.offset())
        .await?;
    let total = app_state
        .product_repo
        .count_by_company(user.company_id, false)
        .await?;
    Ok(Json(Paginated::new(products, &page, total)))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/{product_id}",
    tag = "Products",
    responses(
        (status = 200, description = "Produto encontrado", body = Product),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(product_id): Path<Uuid>,
) -> Result<Json<Product>, AppError> {
    let product = app_state
        .product_repo
        .find_in_company(user.company_id, product_id)
        .await?
        .ok_or(AppError::ProductNotFound)?;
    Ok(Json(product))
}

// Escritas no catálogo exigem administrador E assinatura vigente
#[utoipa::path(
    post,
    path = "/api/v1/products",
    tag = "Products",
    request_body = CreateProductPayload,
    responses((status = 201, description = "Produto criado", body = Product)),
    security(("api_jwt" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _role: RequireRole<AdminRole>,
    _sub: ActiveSubscription,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let product = app_state
        .product_repo
        .create(
            user.company_id,
            &payload.name,
            payload.price,
            payload.thumbnail_url.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    put,
    path = "/api/v1/products/{product_id}",
    tag = "Products",
    request_body = UpdateProductPayload,
    responses(
        (status = 200, description = "Produto atualizado", body = Product),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _role: RequireRole<AdminRole>,
    _sub: ActiveSubscription,
    Path(product_id): Path<Uuid>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<Json<Product>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let product = app_state
        .product_repo
        .update(
            user.company_id,
            product_id,
            payload.name.as_deref(),
            payload.price,
            payload.thumbnail_url.as_deref(),
        )
        .await?
        .ok_or(AppError::ProductNotFound)?;

    Ok(Json(product))
}

#[utoipa::path(
    delete,
    path = "/api/v1/products/{product_id}",
    tag = "Products",
    responses(
        (status = 200, description = "Produto removido (exclusão lógica)", body = ApiMessage),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _role: RequireRole<AdminRole>,
    _sub: ActiveSubscription,
    Path(product_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    if !app_state
        .product_repo
        .soft_delete(user.company_id, product_id)
        .await?
    {
        return Err(AppError::ProductNotFound);
    }
    Ok(ApiMessage::ok("Successful"))
}
