use mock_server::MockConfig;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let mut config = MockConfig::default();
    if let Ok(token) = std::env::var("MOCK_TOKEN") {
        config = config.with_token(&token);
    }
    if let Ok(names) = std::env::var("MOCK_FAIL_NAMES") {
        for name in names.split(',').map(str::trim).filter(|name| !name.is_empty()) {
            config = config.fail_on(name);
        }
    }

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, auth = config.token.is_some(), "mock consent API listening");
    mock_server::run_with(listener, config).await
}
