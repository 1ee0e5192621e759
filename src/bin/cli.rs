//! cycledash CLI
//!
//! Command-line interface for cycledash operations:
//! - Render one snapshot without starting the daemon
//! - Inspect a running daemon's dashboard and health
//! - Generate a config file

use clap::{Parser, Subcommand};
use cycledash::config::{generate_default_config, Config};
use cycledash::dashboard::{CycleOutcome, DashboardController};
use cycledash::display::{ChartMount, RenderedView, SharedView, Slot};
use cycledash::fetch::SnapshotSource;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "cycledash-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Glucose and cycle dashboard tools")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Dashboard view URL of a running daemon
    #[arg(long, default_value = "http://127.0.0.1:8085", global = true)]
    pub api_url: String,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch one snapshot from the configured source and render it
    Fetch,

    /// Show what a running daemon currently displays
    Show,

    /// Show a running daemon's health
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch => {
            let config = match &cli.config {
                Some(path) => Config::load_with_env(path)?,
                None => Config::load_default(),
            };
            let source = config.source.build()?;

            let view = SharedView::new();
            let mut controller = DashboardController::new(Arc::new(view.clone()))
                .label_zone(config.dashboard.label_timezone);

            let snapshot = match source.fetch().await {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    eprintln!("Failed to fetch {}: {}", source.describe(), e);
                    std::process::exit(1);
                }
            };

            match controller.render_cycle(snapshot.as_ref()) {
                Ok(CycleOutcome::Rendered { .. }) => print_view(&view.snapshot(), &cli.format)?,
                Ok(CycleOutcome::NoData) => println!("No data"),
                Err(e) => {
                    eprintln!("Failed to render snapshot: {}", e);
                    print_view(&view.snapshot(), &cli.format)?;
                    std::process::exit(1);
                }
            }
        }

        Commands::Show => {
            let response = reqwest::get(format!("{}/api/v1/dashboard", cli.api_url)).await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    let rendered: serde_json::Value = resp.json().await?;
                    if cli.format == "json" {
                        println!("{}", serde_json::to_string_pretty(&rendered)?);
                    } else {
                        print_fields_json(&rendered);
                    }
                }
                Ok(resp) => {
                    eprintln!("Dashboard view returned error: {}", resp.status());
                    std::process::exit(1);
                }
                Err(e) => {
                    not_running(&cli.api_url, &e);
                }
            }
        }

        Commands::Status => {
            let response = reqwest::get(format!("{}/health", cli.api_url)).await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    let health: serde_json::Value = resp.json().await?;

                    println!("cycledash v{}", env!("CARGO_PKG_VERSION"));
                    println!();
                    println!(
                        "Status: {}",
                        health["status"].as_str().unwrap_or("unknown")
                    );
                    println!(
                        "Charts initialized: {}",
                        health["charts_initialized"].as_bool().unwrap_or(false)
                    );
                    if let Some(last) = health["last_render_at"].as_str() {
                        println!("Last render: {}", last);
                    }
                    if let Some(failures) = health["consecutive_failures"].as_u64() {
                        if failures > 0 {
                            println!("Cycles without a render: {}", failures);
                        }
                    }
                    if let Some(uptime) = health["uptime_seconds"].as_u64() {
                        println!();
                        println!("Uptime: {}", format_duration(uptime));
                    }
                }
                Ok(resp) => {
                    eprintln!("Dashboard view returned error: {}", resp.status());
                    std::process::exit(1);
                }
                Err(e) => {
                    not_running(&cli.api_url, &e);
                }
            }
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)?;
                    println!("Wrote config to {:?}", path);
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

fn not_running(api_url: &str, error: &reqwest::Error) -> ! {
    eprintln!("Cannot connect to cycledash at {}", api_url);
    eprintln!("Error: {}", error);
    eprintln!();
    eprintln!("Make sure the daemon is running:");
    eprintln!("  cargo run --bin cycledash");
    std::process::exit(1);
}

fn print_view(view: &RenderedView, format: &str) -> anyhow::Result<()> {
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(view)?);
        return Ok(());
    }

    for slot in Slot::ALL {
        println!("{:<20} {}", slot.id(), view.field(slot).unwrap_or("-"));
    }
    println!();
    for mount in ChartMount::ALL {
        match view.chart(mount) {
            Some(chart) => println!(
                "{:<20} {} labels, {} series",
                mount.id(),
                chart.labels.len(),
                chart.datasets.len()
            ),
            None => println!("{:<20} -", mount.id()),
        }
    }
    Ok(())
}

fn print_fields_json(rendered: &serde_json::Value) {
    for slot in Slot::ALL {
        println!(
            "{:<20} {}",
            slot.id(),
            rendered["fields"][slot.id()].as_str().unwrap_or("-")
        );
    }
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}
