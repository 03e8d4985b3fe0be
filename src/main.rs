//src/main.rs

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::{
    auth::auth_middleware,
    etag::etag_middleware,
    rate_limit::{RateLimiter, rate_limit_middleware},
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Semeia a empresa padrão e o super-usuário na primeira subida
    services::bootstrap::ensure_bootstrap(&app_state)
        .await
        .expect("Falha no bootstrap da empresa padrão.");

    // Login tem janela mais apertada que o resto da API
    let login_limiter = RateLimiter::new(3, 15);
    let api_limiter = RateLimiter::new(5, 15);

    // Rotas de sessão: login e ping são públicos, o resto exige token
    let auth_routes = Router::new()
        .route("/logout", get(handlers::auth::logout))
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ))
        .route("/login", post(handlers::auth::login))
        .route("/ping", get(handlers::auth::ping))
        .layer(axum_middleware::from_fn_with_state(
            login_limiter,
            rate_limit_middleware,
        ));

    // API principal (parceiros e console web): tudo autenticado, GETs com ETag
    let api_v1_routes = Router::new()
        .route(
            "/companies",
            get(handlers::companies::list_companies).post(handlers::companies::create_company),
        )
        .route(
            "/companies/{company_id}",
            get(handlers::companies::get_company).delete(handlers::companies::delete_company),
        )
        .route(
            "/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/users/{user_id}",
            get(handlers::users::get_user).delete(handlers::users::delete_user),
        )
        .route("/users/{user_id}/role", put(handlers::users::change_role))
        .route(
            "/users/{user_id}/password",
            put(handlers::users::reset_password),
        )
        .route(
            "/products",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route(
            "/products/{product_id}",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        )
        .route(
            "/orders",
            get(handlers::orders::list_orders).post(handlers::orders::create_order),
        )
        .route("/orders/count", get(handlers::orders::order_count))
        .route(
            "/orders/{order_id}",
            get(handlers::orders::get_order).delete(handlers::orders::delete_order),
        )
        .route(
            "/orders/{order_id}/items",
            get(handlers::orders::get_order_items).post(handlers::orders::add_order_item),
        )
        .route(
            "/items/{item_id}",
            get(handlers::orders::get_item)
                .put(handlers::orders::update_item)
                .delete(handlers::orders::delete_item),
        )
        .route(
            "/subscriptions",
            get(handlers::subscriptions::list_subscriptions),
        )
        .route(
            "/subscriptions/expiry",
            get(handlers::subscriptions::subscription_expiry),
        )
        .route(
            "/subscriptions/token",
            post(handlers::subscriptions::issue_token),
        )
        .route(
            "/subscriptions/redeem",
            post(handlers::subscriptions::redeem_token),
        )
        .route(
            "/uploads",
            post(handlers::uploads::upload_photo)
                // folga sobre o limite do arquivo para o envelope multipart
                .layer(DefaultBodyLimit::max(handlers::uploads::MAX_UPLOAD_BYTES + 16 * 1024)),
        )
        .layer(axum_middleware::from_fn(etag_middleware))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ))
        .layer(axum_middleware::from_fn_with_state(
            api_limiter.clone(),
            rate_limit_middleware,
        ));

    // Superfície do aplicativo: cadastro e login públicos, o resto autenticado
    let mobile_routes = Router::new()
        .route("/companies", get(handlers::mobile::list_companies))
        .route(
            "/companies/{company_id}/products",
            get(handlers::mobile::company_products),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ))
        .route("/sign_up", post(handlers::mobile::sign_up))
        .route("/login", post(handlers::mobile::login))
        .layer(axum_middleware::from_fn_with_state(
            api_limiter,
            rate_limit_middleware,
        ));

    // Console administrativo: autenticação aqui, papel de super-usuário nos handlers
    let admin_routes = Router::new()
        .route("/companies", post(handlers::admin::onboard_company))
        .route(
            "/companies/{company_id}/branches",
            post(handlers::admin::onboard_branch),
        )
        .route(
            "/companies/{company_id}/staff",
            get(handlers::admin::company_staff),
        )
        .route(
            "/companies/{company_id}/products",
            get(handlers::admin::company_products),
        )
        .route("/locations/countries", get(handlers::admin::list_countries))
        .route(
            "/locations/countries/{country_id}/states",
            get(handlers::admin::list_states),
        )
        .route(
            "/locations/states/{state_id}/cities",
            get(handlers::admin::list_cities),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/auth", auth_routes)
        .nest("/api/v1", api_v1_routes)
        .nest("/api/mobile", mobile_routes)
        .nest("/admin", admin_routes)
        .nest_service("/uploads", ServeDir::new(&app_state.upload_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    // Inicia o servidor
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    tracing::info!("🔗 Documentação disponível em /docs");
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
