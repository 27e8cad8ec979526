use nursery_portal::{
    AppState, GuardConfig, RouteGuard, SupabaseRestProbe, SupabaseSessionProvider,
    config::{AppConfig, Env},
    create_router,
    session::SessionState,
    supabase::ProbeState,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Loads configuration, initialises logging, builds the identity provider clients and
/// serves the router.
#[tokio::main]
async fn main() {
    // 1. Configuration (fail-fast: no Supabase settings, no server)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging: RUST_LOG wins, otherwise sensible local defaults.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "nursery_portal=debug,tower_http=info,axum=trace".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 3. Identity provider clients
    let sessions = Arc::new(
        SupabaseSessionProvider::new(&config)
            .expect("FATAL: Failed to build the Supabase session client."),
    ) as SessionState;
    let probe = Arc::new(
        SupabaseRestProbe::new(&config).expect("FATAL: Failed to build the Supabase REST client."),
    ) as ProbeState;

    tracing::info!(
        supabase = %config.supabase_url,
        verify_tokens = config.jwt_secret.is_some(),
        "identity provider configured"
    );

    // 4. Unified state
    let app_state = AppState {
        sessions,
        probe,
        guard: Arc::new(RouteGuard::new(GuardConfig::default())),
        config: config.clone(),
    };

    let app = create_router(app_state);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .expect("FATAL: Failed to bind the HTTP listener.");

    tracing::info!("Listening on {}", config.bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at /swagger-ui");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server terminated");
    }
}
