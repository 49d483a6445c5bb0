mod account;
mod admin;
mod app;
mod auth;
mod chats;
mod config;
mod db;
mod error;
mod llm;
mod personas;
mod routes;
mod speech;
mod state;
#[cfg(test)]
mod testing;
mod vocabulary;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "persona_chat=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let state = state::AppState::init().await?;
    db::migrate(&state.db).await;

    if state.config.admin.email.is_none() || state.config.admin.password_hash.is_none() {
        tracing::warn!("ADMIN_EMAIL or ADMIN_PASSWORD_HASH unset; admin panel disabled");
    }

    app::serve(app::build_app(state)).await
}
