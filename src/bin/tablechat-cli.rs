//! Tablechat CLI - chat-driven filtering and memoized sample queries
//!
//! `chat` loads the base dataset and filters it from typed requests.
//! `sample` drives a memoized slow query with a size parameter and a run
//! trigger.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncBufReadExt;

use tablechat::conversation::ConversationController;
use tablechat::dataset::loader::load_csv;
use tablechat::reactive::{ReactiveCell, Trigger};
use tablechat::sample::SampleQuery;
use tablechat::translate::BackendPreset;
use tablechat::{AppConfig, Dataset, TableSchema};

/// Rows printed per table
const MAX_ROWS: usize = 20;

#[derive(Parser)]
#[command(name = "tablechat")]
#[command(about = "Filter tabular data with natural language", long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter a dataset by chatting
    Chat {
        /// CSV file to load (overrides config)
        #[arg(long)]
        data: Option<PathBuf>,

        /// Backend preset: ollama, gemini or azure (overrides config)
        #[arg(long)]
        backend: Option<BackendPreset>,
    },

    /// Run a memoized slow query interactively
    Sample {
        /// Initial sample size
        #[arg(long, default_value = "100")]
        size: usize,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    match cli.command {
        Commands::Chat { data, backend } => {
            if let Some(data) = data {
                config.dataset = data;
            }
            if let Some(backend) = backend {
                config.backend = backend;
            }
            let runtime = tokio::runtime::Runtime::new().context("Failed to start runtime")?;
            runtime.block_on(run_chat(config))
        }
        Commands::Sample { size } => run_sample(&config, size),
    }
}

async fn run_chat(config: AppConfig) -> Result<()> {
    let schema = TableSchema::property_schedule();
    let base = Arc::new(load_csv(&config.dataset, &schema)?);
    let mut controller = ConversationController::from_config(base, &schema, &config)?;

    controller.view().subscribe(|view| print_table(view));
    for message in controller.messages() {
        println!("assistant> {}", message.content);
    }
    print_table(&controller.view().get());

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("you> ");
        io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "exit" {
            break;
        }
        controller.submit(line).await;
        if let Some(reply) = controller.log().last() {
            println!("assistant> {}", reply.content);
        }
    }
    Ok(())
}

fn run_sample(config: &AppConfig, size: usize) -> Result<()> {
    let trigger = Trigger::new();
    let size_cell = ReactiveCell::new(size);
    let query = SampleQuery::new(Duration::from_millis(config.sample_latency_ms));
    let memo = query.memoized(&trigger, size_cell.reader());

    // Two renderers share one cached result
    memo.subscribe(|result| match result.as_ref() {
        Ok(data) => println!("Loaded {} rows from the database.", data.len()),
        Err(err) => println!("Query failed: {err}"),
    });
    memo.subscribe(|result| {
        if let Ok(data) = result.as_ref() {
            print_table(data);
        }
    });

    println!("Commands: size <n>, run, show, quit");
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let mut parts = line.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("size"), Some(n)) => match n.parse() {
                Ok(n) => {
                    size_cell.set(n);
                    println!("Sample size set to {n} (press run to query)");
                }
                Err(_) => println!("Not a number: {n}"),
            },
            (Some("run"), None) => {
                trigger.fire();
            }
            (Some("show"), None) => {
                let fresh = memo.is_fresh();
                match memo.get().as_ref() {
                    Ok(data) => println!(
                        "{} rows ({}), {} queries so far",
                        data.len(),
                        if fresh { "cached" } else { "recomputed" },
                        memo.invocations()
                    ),
                    Err(err) => println!("Query failed: {err}"),
                }
            }
            (Some("quit" | "exit"), None) => break,
            (None, _) => {}
            _ => println!("Commands: size <n>, run, show, quit"),
        }
    }
    Ok(())
}

fn print_table(data: &Dataset) {
    let header: Vec<String> = data.column_names().map(str::to_string).collect();
    let body: Vec<Vec<String>> = data
        .rows()
        .iter()
        .take(MAX_ROWS)
        .map(|row| row.values().iter().map(ToString::to_string).collect())
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|col| {
            body.iter()
                .map(|row| row[col].len())
                .chain(std::iter::once(header[col].len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let render = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join(" | ")
    };

    println!("{}", render(&header));
    println!(
        "{}",
        widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("-+-")
    );
    for row in &body {
        println!("{}", render(row));
    }
    if data.len() > MAX_ROWS {
        println!("... {} more rows", data.len() - MAX_ROWS);
    }
    println!("({} rows)", data.len());
}
