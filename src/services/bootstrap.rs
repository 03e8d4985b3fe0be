// src/services/bootstrap.rs

use crate::{
    config::AppState,
    models::auth::UserRole,
    services::auth::{hash_password, scoped_username},
};

// Semeia a empresa matriz e o super-usuário na primeira subida, para que o
// console administrativo e o cadastro mobile tenham onde se apoiar.
pub async fn ensure_bootstrap(app_state: &AppState) -> anyhow::Result<()> {
    let cfg = &app_state.bootstrap;

    if app_state
        .company_repo
        .find_by_name(&cfg.company_name)
        .await?
        .is_some()
    {
        tracing::info!("✅ Empresa matriz '{}' já existe, nada a semear.", cfg.company_name);
        return Ok(());
    }

    let password_hash = hash_password(&cfg.admin_password).await?;

    let mut tx = app_state.db_pool.begin().await?;

    let company = app_state
        .company_repo
        .create_company(&mut *tx, &cfg.company_name, None, None, None, None)
        .await?;

    let username = scoped_username(&cfg.admin_username, &company.name);
    app_state
        .user_repo
        .create_user(
            &mut *tx,
            company.id,
            &cfg.admin_fullname,
            &username,
            &cfg.admin_email,
            None,
            &password_hash,
            UserRole::SuperUser,
        )
        .await?;

    tx.commit().await?;

    tracing::info!(
        "🌱 Bootstrap concluído: empresa '{}' e super-usuário '{}' criados.",
        company.name,
        username
    );
    Ok(())
}
