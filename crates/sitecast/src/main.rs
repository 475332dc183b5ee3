mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sitecast")]
#[command(about = "Provision static-site hosting and push your site to it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Provision the hosting stack and upload the site
    Up {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
        /// Per-stage timeout in seconds (no timeout when omitted)
        #[arg(long)]
        timeout: Option<u64>,
        /// Maximum concurrent object uploads
        #[arg(long, default_value = "8")]
        concurrency: usize,
    },
    /// Show the stage order and upload plan without touching the network
    Plan,
    /// Check the configuration file
    Validate,
    /// Show the outputs of the last completed run
    Status,
    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt::init();

    match cli.command {
        Commands::Up {
            yes,
            timeout,
            concurrency,
        } => commands::up::handle(yes, timeout, concurrency).await,
        Commands::Plan => commands::plan::handle(),
        Commands::Validate => commands::validate::handle(),
        Commands::Status => commands::status::handle().await,
        Commands::Version => {
            println!("sitecast {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
