use clap::{Parser, Subcommand};
use comfy_table::{Cell, Table};
use sea_orm::Iterable;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use battlegrid::config::Config;
use battlegrid::entities::{nine_liner, RequestStatus, RequestType};
use battlegrid::repositories::PolygonRepository;
use battlegrid::state::AppState;
use battlegrid::utils::time::format_millis;

#[derive(Parser)]
#[command(author, version, about = "Inspect and maintain the BattleGrid local store", long_about = None)]
struct Cli {
    /// Print list commands as JSON instead of a table
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Row counts per table, 9-line requests by type and status
    Summary,
    /// List active accounts
    Users,
    /// Show the newest 9-line requests
    Recent {
        #[arg(short, long, default_value_t = 10)]
        limit: u64,
    },
    /// Find 9-line requests whose lines contain a term
    Search { term: String },
    /// List visible polygons with their vertices
    Polygons,
    /// Delete archived 9-line requests older than the retention window
    Cleanup {
        #[arg(short, long, help = "Retention in days (defaults to ARCHIVE_RETENTION_DAYS)")]
        days: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env()?;
    init_tracing(&config.log_level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        database = %config.database_url,
        "Opening BattleGrid store"
    );
    if !config.has_maps_api_key() {
        tracing::warn!("MAPS_API_KEY is not set; map tiles will not load in the client");
    }

    let state = AppState::open(config).await?;

    match cli.command {
        Commands::Summary => summary(&state).await?,
        Commands::Users => users(&state, cli.json).await?,
        Commands::Recent { limit } => {
            let requests = state.nine_lines.recent(limit).await?;
            print_requests(&requests, cli.json)?;
        }
        Commands::Search { term } => {
            let requests = state.nine_lines.search(&term).await?;
            if !cli.json {
                println!("{} request(s) matching {term:?}", requests.len());
            }
            print_requests(&requests, cli.json)?;
        }
        Commands::Polygons => polygons(&state, cli.json).await?,
        Commands::Cleanup { days } => {
            let days = days.unwrap_or(state.config.archive_retention_days);
            let removed = state.nine_lines.cleanup_old_archived(days).await?;
            println!("Removed {removed} archived request(s) older than {days} day(s)");
        }
    }

    state.store.close().await?;
    Ok(())
}

async fn summary(state: &AppState) -> anyhow::Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Table", "Rows"]);
    table.add_row(vec![
        Cell::new("users"),
        Cell::new(state.accounts.total_count().await?),
    ]);
    table.add_row(vec![
        Cell::new("users (active)"),
        Cell::new(state.accounts.active_count().await?),
    ]);
    table.add_row(vec![
        Cell::new("polygons (visible)"),
        Cell::new(state.polygons.visible_count().await?),
    ]);
    table.add_row(vec![
        Cell::new("nine_liners"),
        Cell::new(state.nine_lines.count(None, None).await?),
    ]);
    println!("{table}");

    let mut by_type = Table::new();
    by_type.set_header(vec!["Request type", "Count"]);
    for request_type in RequestType::ALL {
        let count = state.nine_lines.count(None, Some(request_type)).await?;
        by_type.add_row(vec![Cell::new(request_type), Cell::new(count)]);
    }
    println!("{by_type}");

    let mut by_status = Table::new();
    by_status.set_header(vec!["Status", "Count"]);
    for status in RequestStatus::iter() {
        let count = state.nine_lines.count(Some(status), None).await?;
        by_status.add_row(vec![Cell::new(status), Cell::new(count)]);
    }
    println!("{by_status}");

    println!("Schema version: {}", state.store.schema_version().await?);
    Ok(())
}

async fn users(state: &AppState, json: bool) -> anyhow::Result<()> {
    let accounts = state.accounts.list_active().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&accounts)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Username", "Email", "Level", "XP", "Created"]);
    for account in &accounts {
        table.add_row(vec![
            Cell::new(account.id),
            Cell::new(&account.username),
            Cell::new(&account.email),
            Cell::new(account.level),
            Cell::new(account.experience),
            Cell::new(format_millis(account.created_at)),
        ]);
    }
    println!("{table}");
    Ok(())
}

async fn polygons(state: &AppState, json: bool) -> anyhow::Result<()> {
    let polygons = state.polygons.list_visible().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&polygons)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Vertices", "Fill", "Stroke", "Created"]);
    for polygon in &polygons {
        let vertices = PolygonRepository::parse_coordinates(&polygon.coordinates);
        table.add_row(vec![
            Cell::new(polygon.id),
            Cell::new(polygon.name.as_deref().unwrap_or("-")),
            Cell::new(vertices.len()),
            Cell::new(&polygon.fill_color),
            Cell::new(&polygon.stroke_color),
            Cell::new(format_millis(polygon.created_at)),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn print_requests(requests: &[nine_liner::Model], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(requests)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Type", "Status", "Line 1", "Created", "Transmitted"]);
    for request in requests {
        table.add_row(vec![
            Cell::new(request.id),
            Cell::new(request.request_type),
            Cell::new(request.status),
            Cell::new(&request.line1),
            Cell::new(format_millis(request.created_at)),
            Cell::new(request.transmitted_at.map_or_else(|| "-".to_string(), format_millis)),
        ]);
    }
    println!("{table}");
    Ok(())
}

/// Initialize the `tracing` subscriber with an environment-based filter.
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("battlegrid={log_level},sea_orm=warn").into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
