use anyhow::Context;
use staffdesk::{
    config::Config, db, handlers::auth::seed_admin, middleware::rate_limit, routes,
    state::AppState,
};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 0. Load .env, if there is one, then read the whole configuration once.
    // Nothing below this point touches the environment.
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    // 1. Sentry. No DSN means a disabled client.
    // The guard flushes pending events on drop, so it lives until main returns.
    let _guard = sentry::init((
        config.sentry_dsn.clone(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            traces_sample_rate: 0.2,
            ..Default::default()
        },
    ));

    // 2. Logging. Respects RUST_LOG.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "staffdesk=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    tracing::info!("Starting staffdesk API...");

    // 3. Database. One client for the whole process, shared by both stores.
    let db = db::connect(&config.database)
        .await
        .with_context(|| format!("could not connect to {}", config.database.url))?;
    tracing::info!(url = %config.database.url, "Connected to SurrealDB");

    let state = AppState::new(db, &config.jwt);

    // 4. First-run admin account
    if let Some(seed) = &config.seed_admin {
        seed_admin(&state, seed)
            .await
            .context("could not seed the admin account")?;
    }

    // 5. Routes
    let login_conf = rate_limit::create_login_config(config.login_limit)
        .context("login rate limit must have a non-zero burst and period")?;
    let app = routes::create_routes(state.clone(), login_conf);

    // 6. Serve until Ctrl-C / SIGTERM, letting in-flight requests finish.
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // 7. Last handle to the database goes away here.
    drop(state);
    tracing::info!("Database connection closed, bye");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
