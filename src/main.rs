use clap::Parser;
use travelcraft::cli::Cli;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    if let Err(err) = travelcraft::cli::run(cli).await {
        tracing::error!(target: "travelcraft::cli", error = %err, "request failed");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
