use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use vmroster::{
    config::RunConfig,
    inventory::{CachingResolver, StaticInventory},
    pipeline,
};

#[derive(Parser)]
#[command(name = "vmroster")]
#[command(about = "Resolve a CSV machine manifest into the machines that should exist")]
struct Cli {
    /// Run configuration (YAML)
    #[arg(long, short, env = "VMROSTER_CONFIG")]
    config: PathBuf,

    /// Inventory snapshot (YAML); overrides `inventory` in the config
    #[arg(long, short)]
    inventory: Option<PathBuf>,

    /// Write JSON here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Evaluate expiry as of this date (YYYY-MM-DD) instead of today
    #[arg(long)]
    today: Option<NaiveDate>,
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    // stderr only: stdout carries the JSON result
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    // ─── 2) load config + inventory ──────────────────────────────────
    let config = RunConfig::load(&cli.config)?;
    let inventory_path = cli
        .inventory
        .or_else(|| config.inventory.clone())
        .ok_or_else(|| anyhow!("no inventory given: pass --inventory or set `inventory` in the config"))?;
    let inventory = StaticInventory::load(&inventory_path)?;
    let datacenter = inventory
        .datacenter(&config.datacenter_id)
        .context("cannot locate datacenter")?;

    // ─── 3) run ──────────────────────────────────────────────────────
    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    let resolver = CachingResolver::new(inventory);
    let output = pipeline::run(&config.request(), &datacenter, &resolver, today)?;
    let (hits, misses) = resolver.stats();
    info!(
        machines = output.machines.len(),
        cache_hits = hits,
        cache_misses = misses,
        "run complete"
    );

    // ─── 4) write result ─────────────────────────────────────────────
    let writer: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer_pretty(&mut writer, &output).context("writing result JSON")?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
