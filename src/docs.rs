// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::get_me,
        handlers::auth::ping,

        // --- Companies ---
        handlers::companies::list_companies,
        handlers::companies::get_company,
        handlers::companies::create_company,
        handlers::companies::delete_company,

        // --- Users ---
        handlers::users::list_users,
        handlers::users::get_user,
        handlers::users::create_user,
        handlers::users::change_role,
        handlers::users::reset_password,
        handlers::users::delete_user,

        // --- Products ---
        handlers::products::list_products,
        handlers::products::get_product,
        handlers::products::create_product,
        handlers::products::update_product,
        handlers::products::delete_product,

        // --- Orders ---
        handlers::orders::create_order,
        handlers::orders::list_orders,
        handlers::orders::order_count,
        handlers::orders::get_order,
        handlers::orders::delete_order,
        handlers::orders::get_order_items,
        handlers::orders::add_order_item,
        handlers::orders::get_item,
        handlers::orders::update_item,
        handlers::orders::delete_item,

        // --- Subscriptions ---
        handlers::subscriptions::list_subscriptions,
        handlers::subscriptions::subscription_expiry,
        handlers::subscriptions::issue_token,
        handlers::subscriptions::redeem_token,

        // --- Uploads ---
        handlers::uploads::upload_photo,

        // --- Mobile ---
        handlers::mobile::sign_up,
        handlers::mobile::login,
        handlers::mobile::list_companies,
        handlers::mobile::company_products,

        // --- Admin ---
        handlers::admin::onboard_company,
        handlers::admin::onboard_branch,
        handlers::admin::company_staff,
        handlers::admin::company_products,
        handlers::admin::list_countries,
        handlers::admin::list_states,
        handlers::admin::list_cities,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,
            models::auth::LoginPayload,
            models::auth::AuthResponse,

            // --- Companies ---
            models::company::Company,
            handlers::companies::CreateCompanyPayload,

            // --- Locations ---
            models::location::Country,
            models::location::State,
            models::location::City,

            // --- Products ---
            models::product::Product,
            handlers::products::CreateProductPayload,
            handlers::products::UpdateProductPayload,

            // --- Orders ---
            models::order::PaymentType,
            models::order::Order,
            models::order::OrderItem,
            models::order::OrderDetail,
            handlers::orders::CreateOrderPayload,
            handlers::orders::OrderItemPayload,
            handlers::orders::AddItemPayload,
            handlers::orders::UpdateItemPayload,

            // --- Subscriptions ---
            models::subscription::Subscription,
            handlers::subscriptions::IssueTokenPayload,
            handlers::subscriptions::RedeemPayload,

            // --- Users Payloads ---
            handlers::users::CreateStaffPayload,
            handlers::users::ChangeRolePayload,
            handlers::users::ResetPasswordPayload,

            // --- Mobile ---
            handlers::mobile::SignUpPayload,

            // --- Admin ---
            handlers::admin::OnboardCompanyPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Sessão"),
        (name = "Companies", description = "Gestão de Empresas (Tenants)"),
        (name = "Users", description = "Gestão de Funcionários"),
        (name = "Products", description = "Catálogo de Produtos"),
        (name = "Orders", description = "Pedidos e Itens de Pedido"),
        (name = "Subscriptions", description = "Assinaturas e Tokens de Ativação"),
        (name = "Uploads", description = "Upload de Imagens"),
        (name = "Mobile", description = "Superfície do Aplicativo"),
        (name = "Admin", description = "Console Administrativo (Super-Usuário)")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_jwt",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
