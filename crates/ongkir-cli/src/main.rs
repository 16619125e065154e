mod tariff;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "ongkir")]
#[command(about = "JNE shipping tariff lookup")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Quote the first matching origin and destination
    Check {
        #[command(flatten)]
        route: RouteArgs,
    },
    /// Quote every origin × destination pair on one page
    Recursive {
        #[command(flatten)]
        route: RouteArgs,
        #[arg(long)]
        page: Option<String>,
        /// 0 dispatches every combination
        #[arg(long)]
        per_page: Option<String>,
    },
}

/// Raw route arguments; validated by [`ongkir_scraper::TariffQuery::parse`].
#[derive(Debug, Args)]
struct RouteArgs {
    #[arg(long)]
    origin: String,
    #[arg(long)]
    destination: String,
    #[arg(long, allow_hyphen_values = true)]
    weight: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = ongkir_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Check { route }) => tariff::run_check(&config, &route).await?,
        Some(Commands::Recursive {
            route,
            page,
            per_page,
        }) => {
            tariff::run_recursive(&config, &route, page.as_deref(), per_page.as_deref()).await?;
        }
        None => println!("ongkir: pass `check` or `recursive` (see --help)"),
    }

    Ok(())
}
