use clap::Parser;
use colored::Colorize;
use cotermctl::{cmd, error};

#[derive(Parser, Debug)]
#[command(
    name = "cotermctl",
    about = "Add or renew co-termination licenses for a Meraki organization",
    version,
    long_about = "Interactive co-termination license claiming for the Meraki Dashboard.\n\n\
                  Lists the organizations visible to an API key, verifies the chosen\n\
                  organization is co-term licensed, then claims license keys in add or\n\
                  renew mode and prints a before/after seat and expiration summary."
)]
struct Cli {
    /// Meraki Dashboard API key
    #[arg(short = 'k', long = "api-key", value_name = "API_KEY")]
    api_key: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> error::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("cotermctl=debug")
            .init();
    }

    cmd::licenses::claim_interactive(cli.api_key).await
}
