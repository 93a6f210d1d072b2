use std::error::Error;

use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env file, if present.
    // Production deployments set real environment variables instead.
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info,review_engine=info"))
        .unwrap();

    fmt().with_env_filter(filter).init();

    api::start().await?;

    Ok(())
}
