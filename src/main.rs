use agent_oauth_core::application::{
    commands::oauth::OAuthPolicy,
    ports::{
        authorization_code::AuthorizationCodeRepository, clients::ClientRegistry,
        security::TokenIssuer, time::Clock, util::CodeGenerator,
    },
    services::ApplicationServices,
};
use agent_oauth_core::config::AppConfig;
use agent_oauth_core::infrastructure::{
    clients::StaticClientRegistry, database,
    repositories::PostgresAuthorizationCodeRepository, security::token::JwtTokenIssuer,
    time::SystemClock, util::OsRngCodeGenerator,
};
use agent_oauth_core::presentation::http::{
    identity::TrustedHeaderIdentityResolver, routes::build_router, state::HttpState,
};
use anyhow::Result;
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const CLEANUP_COMMAND: &str = "cleanup-expired-codes";

#[tokio::main]
async fn main() {
    if let Err(err) = bootstrap().await {
        tracing::error!(error = %err, "fatal error");
        eprintln!("fatal error: {err}");
        std::process::exit(1);
    }
}

async fn bootstrap() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    tracing::debug!(?config, "configuration loaded");

    let pool = database::init_pool(config.database_url()).await?;
    database::run_migrations(&pool).await?;

    let code_repo: Arc<dyn AuthorizationCodeRepository> =
        Arc::new(PostgresAuthorizationCodeRepository::new(pool));
    let registry = StaticClientRegistry::new(config.clients().to_vec());
    if registry.is_empty() {
        tracing::warn!("no OAuth clients configured; every authorization request will be rejected");
    } else {
        tracing::info!(clients = registry.len(), "OAuth client registry loaded");
    }
    let clients: Arc<dyn ClientRegistry> = Arc::new(registry);
    let token_issuer: Arc<dyn TokenIssuer> = Arc::new(JwtTokenIssuer::with_secret(
        config.signing_secret(),
        config.issuer(),
        config.audience(),
    ));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let code_generator: Arc<dyn CodeGenerator> = Arc::new(OsRngCodeGenerator);

    let policy = OAuthPolicy {
        allow_plain_pkce: config.allow_plain_pkce(),
        access_token_ttl: config.access_token_ttl(),
        refresh_token_ttl: config.refresh_token_ttl(),
    };

    let services = Arc::new(ApplicationServices::new(
        code_repo,
        clients,
        token_issuer,
        clock,
        code_generator,
        policy,
    ));

    if std::env::args().nth(1).as_deref() == Some(CLEANUP_COMMAND) {
        let removed = services.code_store().cleanup_expired().await?;
        tracing::info!(removed, "expired authorization code cleanup finished");
        return Ok(());
    }

    if let Some(period) = config.code_cleanup_interval() {
        tracing::info!(period_secs = period.as_secs(), "starting in-process code cleanup");
        services.code_store().spawn_cleanup(period);
    }

    let state = HttpState {
        services: Arc::clone(&services),
        identity: Arc::new(TrustedHeaderIdentityResolver),
        public_base_url: config.public_base_url().to_string(),
        allowed_origins: config.allowed_origins().to_vec(),
    };

    let app = build_router(state);
    let service = app.into_make_service_with_connect_info::<SocketAddr>();

    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    let address: SocketAddr = listener.local_addr()?;
    tracing::info!("listening on {address}");

    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .unwrap_or_else(|| "info,tower_http=info,sqlx=warn".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer());

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install terminate handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("shutdown signal received");
}
