use std::net::SocketAddr;

use clap::{Parser, Subcommand};

mod app;
mod client;
mod config;
mod db;
mod seed;
mod state;
mod ui;
mod users;

use crate::config::AppConfig;
use crate::state::AppState;
use crate::users::repo::PgUserStore;

#[derive(Parser)]
#[command(name = "usercrud", about = "User management CRUD service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API and UI (default)
    Serve {
        /// Keep users in process memory instead of PostgreSQL
        #[arg(long)]
        in_memory: bool,
    },
    /// Insert the three demo users
    Seed {
        #[arg(long, default_value = seed::DEMO_PASSWORD)]
        password: String,
    },
    /// Remove the demo users
    Unseed,
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "usercrud=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    match cli.command.unwrap_or(Command::Serve { in_memory: false }) {
        Command::Serve { in_memory } => {
            let addr: SocketAddr =
                format!("{}:{}", config.server.host, config.server.port).parse()?;
            let state = if in_memory {
                tracing::warn!("using in-memory store; data is lost on exit");
                AppState::in_memory(config)?
            } else {
                AppState::init(config).await?
            };
            app::serve(app::build_app(state), addr).await?;
        }
        Command::Seed { password } => {
            let store = pg_store(&config).await?;
            seed::up(&store, &password).await?;
        }
        Command::Unseed => {
            let store = pg_store(&config).await?;
            seed::down(&store).await?;
        }
    }

    Ok(())
}

async fn pg_store(config: &AppConfig) -> anyhow::Result<PgUserStore> {
    let pool = db::connect(&config.database).await?;
    db::migrate(&pool).await;
    Ok(PgUserStore::new(pool))
}
