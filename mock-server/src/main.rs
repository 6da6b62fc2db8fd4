use mock_server::Partner;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let partner = Partner::new(
        std::env::var("MOCK_API_KEY").unwrap_or_else(|_| "100".to_string()),
        std::env::var("MOCK_API_SECRET").unwrap_or_else(|_| "secret".to_string()),
    );

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, api_key = %partner.api_key, "mock archive API listening");
    mock_server::run(listener, partner).await
}
