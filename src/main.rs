use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kartboard::api::{build_router, state::AppState};
use kartboard::calculate::{group_aggregates, rank_results};
use kartboard::config::AppConfig;
use kartboard::load::read_workbook;
use kartboard::reshape::build_long_entries;
use kartboard::timing::format_seconds;

#[derive(Parser)]
#[command(name = "kartboard")]
#[command(about = "Live tournament leaderboard dashboard")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the dashboard
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Read the workbook once and report what loaded
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = std::path::PathBuf::from(&cli.config);
    let config = if config_path.exists() {
        AppConfig::from_file(&config_path)?
    } else {
        AppConfig::default()
    };

    // Initialize tracing: RUST_LOG wins, then --log-level, then config.
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.log_level.clone());
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting kartboard v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Serve { host, port } => {
            let mut config = config;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;

            let addr = format!("{}:{}", config.server.host, config.server.port);
            let app = build_router(AppState::new(config));
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Dashboard: http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Check => {
            let tables = read_workbook(&config.data.workbook, &config.data)?;

            println!("\n=== Workbook Check ===");
            println!("Workbook:            {}", config.data.workbook.display());
            println!("Result rows:         {}", tables.results.len());
            println!("Roster rows:         {}", tables.players.len());
            println!("Quarantined results: {}", tables.quarantined_results);
            println!("Quarantined roster:  {}", tables.quarantined_players);
            println!("Unparseable times:   {}", tables.unparsed_times());

            let ranked = rank_results(&tables.results);
            if let Some(best) = ranked.first() {
                println!(
                    "Fastest:             {} vs {} ({})",
                    best.result.p1,
                    best.result.p2,
                    format_seconds(best.result.time_seconds)
                );
            }

            let entries = build_long_entries(&tables.results, &tables.players);
            for aggregate in group_aggregates(&entries) {
                println!(
                    "Group {:<20} {} entries, mean {}",
                    aggregate.group,
                    aggregate.entry_count,
                    format_seconds(aggregate.mean_time_seconds)
                );
            }
        }
    }

    Ok(())
}
