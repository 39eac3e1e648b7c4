use std::net::SocketAddr;
use userbase_app::{AppConfig, AppContext};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let public_base_url = config.public_base_url.clone();

    let app_context = match AppContext::connect(config).await {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    let app = userbase_api::app(app_context);

    tracing::info!("Listening on http://{}", addr);
    tracing::info!("API docs available at {}/api-docs", public_base_url);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app.into_make_service())
        .await
        .expect("Server error");
}
