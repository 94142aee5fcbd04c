use clap::Parser;
use tibber_svg::cli::{self, Cli};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // stdout carries the svg
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tibber_svg=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    cli::run(&Cli::parse()).await
}
