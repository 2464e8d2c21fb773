mod config;
mod error;

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use engine::{AgentLoop, OpenAiBackend, Seed, ToolRegistry};
use storage::{EventKind, TraceStore};
use tracing_subscriber::EnvFilter;
use travel::models::Interest;
use travel::tools::{EVALS_TOOL, FINAL_ANSWER_TOOL};
use travel::{VacationInfo, prompts};

use config::Config;
use error::{Error, Result};

const CONFIG_FILE: &str = "waypoint.toml";

#[derive(Parser)]
#[command(name = "waypoint")]
#[command(about = "An itinerary-planning agent for AgentsVille", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a trip (and optionally refine it with the revision agent)
    Plan(PlanArgs),
    /// List recorded runs
    Runs {
        /// Show only the last N runs
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
    /// Show trace events for a run
    Logs {
        /// Run ID (prefix match supported)
        #[arg(short, long)]
        run: String,
        /// Filter by event kind (message, tool_call, observation)
        #[arg(short, long)]
        kind: Option<String>,
    },
}

#[derive(Args)]
struct PlanArgs {
    /// Start date YYYY-MM-DD (mocked data covers 2025-06-10..2025-06-15)
    #[arg(long)]
    start: String,
    /// End date YYYY-MM-DD
    #[arg(long)]
    end: String,
    /// Comma-separated traveler names
    #[arg(long, default_value = "Ada Lovelace,Alan Turing")]
    travelers: String,
    /// Comma-separated interests (art, dancing, food, music, nature, technology)
    #[arg(long, default_value = "technology,art,dancing")]
    interests: String,
    /// Total budget amount
    #[arg(long, default_value = "200.0")]
    budget: f64,
    /// Budget currency
    #[arg(long, default_value = "USD")]
    currency: String,
    /// Refine the itinerary with the revision agent
    #[arg(long)]
    revise: bool,
    /// Override the revision loop's step budget
    #[arg(long)]
    max_steps: Option<usize>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Plan(args) => cmd_plan(args).await,
        Commands::Runs { limit } => cmd_runs(limit),
        Commands::Logs { run, kind } => cmd_logs(&run, kind.as_deref()),
    }
}

async fn cmd_plan(args: PlanArgs) -> Result<()> {
    let config = load_config()?;
    let api_key = config.api_key()?;
    let vacation = build_vacation(&args)?;
    vacation.validate()?;

    let mut builder = OpenAiBackend::builder(api_key, &config.backend.model);
    if let Some(base_url) = &config.backend.base_url {
        builder = builder.base_url(base_url);
    }
    let backend = builder.build();

    println!("waypoint v{}", env!("CARGO_PKG_VERSION"));
    println!("Model: {}", config.backend.model);

    let itinerary = travel::generate_itinerary(&backend, &vacation).await?;
    println!(
        "Initial itinerary:\n{}",
        serde_json::to_string_pretty(&itinerary)?
    );

    if !args.revise {
        return Ok(());
    }

    let data_dir = data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let db_path = data_dir.join("trace.db");
    let store = TraceStore::open(&db_path)?;
    println!("Trace stored at: {}", db_path.display());

    let mut registry = ToolRegistry::new();
    travel::register_all(&mut registry, vacation.clone())?;
    let catalog = registry.catalog();

    let agent = AgentLoop::builder(backend, registry, store)
        .policy(config.policy)
        .final_tool(FINAL_ANSWER_TOOL)
        .validator_tool(EVALS_TOOL)
        .max_steps(args.max_steps.unwrap_or(config.limits.max_steps))
        .build()?;

    let seed = Seed::new(
        prompts::revision_system_prompt(&catalog),
        prompts::revision_task(&vacation, &itinerary),
        serde_json::to_value(&itinerary)?,
    );

    let outcome = agent.run(seed).await?;
    println!(
        "Run {} {} after {} steps",
        outcome.run_id,
        outcome.status.as_str(),
        outcome.steps_used
    );
    match outcome.answer {
        Some(answer) => println!("{}", serde_json::to_string_pretty(&answer)?),
        None => println!(
            "Best-known itinerary:\n{}",
            serde_json::to_string_pretty(&outcome.artifact)?
        ),
    }

    Ok(())
}

fn cmd_runs(limit: usize) -> Result<()> {
    let store = open_store()?;
    let runs = store.list_runs()?;

    if runs.is_empty() {
        println!("No runs recorded yet.");
        return Ok(());
    }

    for summary in runs.iter().take(limit) {
        let local = summary.started_at.with_timezone(&Local);
        println!(
            "{}  {}  {:>3} events  {}",
            &summary.id.to_string()[..8],
            local.format("%Y-%m-%d %H:%M:%S"),
            summary.event_count,
            summary.status.as_deref().unwrap_or("in progress"),
        );
    }

    Ok(())
}

fn cmd_logs(prefix: &str, kind: Option<&str>) -> Result<()> {
    let store = open_store()?;
    let run_id = resolve_run(&store, prefix)?;

    for event in store.load_run(run_id)? {
        if let Some(kind) = kind
            && event.kind.name() != kind
        {
            continue;
        }
        let local = event.timestamp.with_timezone(&Local);
        println!(
            "[{}] {:<12} {}",
            local.format("%H:%M:%S"),
            event.kind.name(),
            render_event(&event.kind),
        );
    }

    Ok(())
}

fn render_event(kind: &EventKind) -> String {
    match kind {
        EventKind::Message { role, content } => {
            format!("{role:?}: {}", truncate(content, 200))
        }
        EventKind::ToolCall { name, arguments } => format!("{name} {arguments}"),
        EventKind::Observation { tool, ok, output } => format!(
            "{} ok={ok} {}",
            tool.as_deref().unwrap_or("-"),
            truncate(&output.to_string(), 200),
        ),
        EventKind::RunStart => String::new(),
        EventKind::RunEnd { status, steps } => format!("{status} after {steps} steps"),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let cut = s
        .char_indices()
        .take_while(|(i, _)| *i < max)
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(max);
    format!("{}…", &s[..cut])
}

fn build_vacation(args: &PlanArgs) -> Result<VacationInfo> {
    let start_date = parse_date(&args.start)?;
    let end_date = parse_date(&args.end)?;
    let travelers = args
        .travelers
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    let interests = args
        .interests
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<Interest>())
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(VacationInfo {
        city: travel::models::CITY.into(),
        start_date,
        end_date,
        travelers,
        interests,
        budget_currency: args.currency.clone(),
        budget_amount: args.budget,
    })
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    s.parse().map_err(|_| Error::InvalidDate(s.to_string()))
}

fn load_config() -> Result<Config> {
    if std::path::Path::new(CONFIG_FILE).exists() {
        Ok(Config::load(CONFIG_FILE)?)
    } else {
        Ok(Config::default())
    }
}

fn data_dir() -> PathBuf {
    std::env::var_os("WAYPOINT_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(".waypoint"))
}

fn open_store() -> Result<TraceStore> {
    let db_path = data_dir().join("trace.db");
    if !db_path.exists() {
        return Err(Error::DatabaseNotFound { path: db_path });
    }
    Ok(TraceStore::open(&db_path)?)
}

fn resolve_run(store: &TraceStore, prefix: &str) -> Result<storage::RunId> {
    let matches: Vec<_> = store
        .list_runs()?
        .into_iter()
        .filter(|r| r.id.to_string().starts_with(prefix))
        .collect();

    match matches.as_slice() {
        [] => Err(Error::RunNotFound {
            prefix: prefix.to_string(),
        }),
        [one] => Ok(one.id),
        many => Err(Error::AmbiguousRun {
            prefix: prefix.to_string(),
            matches: many.iter().map(|r| r.id.to_string()[..8].to_string()).collect(),
        }),
    }
}
