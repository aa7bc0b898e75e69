use mintai::config::Config;
use mintai::server::{build_app, serve};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mintai=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    if !config.has_model_credential() {
        tracing::info!("GOOGLE_API_KEY not set, advisor will answer from templates");
    }
    let (host, port) = (config.host.clone(), config.port);
    tracing::info!("Starting mintai on {}", config.address());

    let (state, app) = build_app(config).expect("Failed to build application");
    tracing::info!(
        provider = state.advisor.provider().as_str(),
        storage = state.store.backend_kind(),
        "mintai v{} ready",
        mintai::VERSION
    );

    let (bound_port, handle) = serve(app, &host, port)
        .await
        .expect("Failed to bind address");
    tracing::info!("Listening on http://{}:{}", host, bound_port);

    handle.await.expect("Server task panicked");
}
