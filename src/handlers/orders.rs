// src/handlers/orders.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

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
    models::order::{OrderDetail, OrderItem, PaymentType},
};

// ---
// Payloads
// ---
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemPayload {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "A quantidade deve ser pelo menos 1."))]
    #[schema(example = 2)]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    #[validate(length(min = 1, message = "A referência de pagamento é obrigatória."))]
    #[schema(example = "PAY-2024-00017")]
    pub payment_reference: String,

    pub payment_type: PaymentType,

    #[validate(length(min = 1, message = "O pedido precisa de pelo menos um item."))]
    #[validate(nested)]
    pub items: Vec<OrderItemPayload>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddItemPayload {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "A quantidade deve ser pelo menos 1."))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemPayload {
    #[validate(range(min = 1, message = "A quantidade deve ser pelo menos 1."))]
    pub quantity: i32,
}

// Filtro opcional de intervalo (?from=2024-01-01&to=2024-01-31)
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct DateRangeQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

// ---
// Handler: create_order — qualquer funcionário de empresa com assinatura ativa
// ---
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    tag = "Orders",
    request_body = CreateOrderPayload,
    responses(
        (status = 201, description = "Pedido criado com os itens", body = OrderDetail),
        (status = 403, description = "Sem assinatura ativa")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_order(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _sub: ActiveSubscription,
    Json(payload): Json<CreateOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let items: Vec<(Uuid, i32)> = payload
        .items
        .iter()
        .map(|item| (item.product_id, item.quantity))
        .collect();

    let detail = app_state
        .order_service
        .create_order(
            user.company_id,
            user.id,
            &payload.payment_reference,
            payload.payment_type,
            &items,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(detail)))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders",
    tag = "Orders",
    params(PageQuery, DateRangeQuery),
    responses((status = 200, description = "Listagem paginada de pedidos")),
    security(("api_jwt" = []))
)]
pub async fn list_orders(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _role: RequireRole<AdminRole>,
    Query(page): Query<PageQuery>,
    Query(range): Query<DateRangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let orders = app_state
        .order_repo
        .list_by_company(
            user.company_id,
            range.from,
            range.to,
            page.limit(),
            page.offset(),
        )
        .await?;
    let total = app_state
        .order_repo
        .count_by_company(user.company_id, range.from, range.to)
        .await?;
    Ok(Json(Paginated::new(orders, &page, total)))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/count",
    tag = "Orders",
    params(DateRangeQuery),
    responses((status = 200, description = "Total de pedidos da empresa")),
    security(("api_jwt" = []))
)]
pub async fn order_count(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _role: RequireRole<AdminRole>,
    Query(range): Query<DateRangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let count = app_state
        .order_repo
        .count_by_company(user.company_id, range.from, range.to)
        .await?;
    Ok(Json(json!({ "count": count })))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{order_id}",
    tag = "Orders",
    responses(
        (status = 200, description = "Pedido com itens", body = OrderDetail),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_order(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _role: RequireRole<AdminRole>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderDetail>, AppError> {
    let detail = app_state
        .order_service
        .order_with_items(user.company_id, order_id)
        .await?;
    Ok(Json(detail))
}

#[utoipa::path(
    delete,
    path = "/api/v1/orders/{order_id}",
    tag = "Orders",
    responses(
        (status = 200, description = "Pedido removido (exclusão lógica)", body = ApiMessage),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_order(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _role: RequireRole<AdminRole>,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    if !app_state
        .order_repo
        .soft_delete(user.company_id, order_id)
        .await?
    {
        return Err(AppError::OrderNotFound);
    }
    Ok(ApiMessage::ok("Successful"))
}

// ---
// Itens de pedido
// ---

#[utoipa::path(
    get,
    path = "/api/v1/orders/{order_id}/items",
    tag = "Orders",
    responses((status = 200, description = "Itens do pedido", body = [OrderItem])),
    security(("api_jwt" = []))
)]
pub async fn get_order_items(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(order_id): Path<Uuid>,
) -> Result<Json<Vec<OrderItem>>, AppError> {
    // passa pelo pedido para garantir o escopo da empresa
    let order = app_state
        .order_repo
        .find_in_company(user.company_id, order_id)
        .await?
        .ok_or(AppError::OrderNotFound)?;
    let items = app_state.order_repo.items_of_order(order.id).await?;
    Ok(Json(items))
}

#[utoipa::path(
    post,
    path = "/api/v1/orders/{order_id}/items",
    tag = "Orders",
    request_body = AddItemPayload,
    responses((status = 201, description = "Item adicionado", body = OrderItem)),
    security(("api_jwt" = []))
)]
pub async fn add_order_item(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _role: RequireRole<AdminRole>,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<AddItemPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let order = app_state
        .order_repo
        .find_in_company(user.company_id, order_id)
        .await?
        .ok_or(AppError::OrderNotFound)?;
    app_state
        .product_repo
        .find_in_company(user.company_id, payload.product_id)
        .await?
        .ok_or(AppError::ProductNotFound)?;

    let item = app_state
        .order_repo
        .add_item(
            &app_state.db_pool,
            order.id,
            payload.product_id,
            payload.quantity,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

#[utoipa::path(
    get,
    path = "/api/v1/items/{item_id}",
    tag = "Orders",
    responses(
        (status = 200, description = "Item encontrado", body = OrderItem),
        (status = 404, description = "Item não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_item(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(item_id): Path<Uuid>,
) -> Result<Json<OrderItem>, AppError> {
    let item = app_state
        .order_repo
        .find_item_in_company(user.company_id, item_id)
        .await?
        .ok_or(AppError::ItemNotFound)?;
    Ok(Json(item))
}

#[utoipa::path(
    put,
    path = "/api/v1/items/{item_id}",
    tag = "Orders",
    request_body = UpdateItemPayload,
    responses(
        (status = 200, description = "Item atualizado", body = OrderItem),
        (status = 404, description = "Item não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_item(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _role: RequireRole<AdminRole>,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<UpdateItemPayload>,
) -> Result<Json<OrderItem>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let existing = app_state
        .order_repo
        .find_item_in_company(user.company_id, item_id)
        .await?
        .ok_or(AppError::ItemNotFound)?;

    let item = app_state
        .order_repo
        .update_item_quantity(existing.id, payload.quantity)
        .await?;
    Ok(Json(item))
}

#[utoipa::path(
    delete,
    path = "/api/v1/items/{item_id}",
    tag = "Orders",
    responses(
        (status = 200, description = "Item removido", body = ApiMessage),
        (status = 404, description = "Item não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_item(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _role: RequireRole<AdminRole>,
    Path(item_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let existing = app_state
        .order_repo
        .find_item_in_company(user.company_id, item_id)
        .await?
        .ok_or(AppError::ItemNotFound)?;

    app_state.order_repo.delete_item(existing.id).await?;
    Ok(ApiMessage::ok("Successful"))
}
