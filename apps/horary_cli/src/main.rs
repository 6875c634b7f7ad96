use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::Parser;
use horary::reasoning::ReasoningInput;
use horary::{load_chart_from_json, HoraryConfig, HoraryEngine};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about = "Derive horary chart state from a snapshot")]
struct Args {
    #[arg(help = "Chart snapshot (JSON)", required_unless_present = "check_config")]
    chart: Option<PathBuf>,

    /// Judgment reasoning: JSON array of strings or {stage, rule, weight} objects
    #[arg(long)]
    reasoning: Option<PathBuf>,

    /// TOML configuration; falls back to $HORARY_CONFIG, then defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Reference time for projected dates (RFC 3339). Defaults to now.
    #[arg(long)]
    now: Option<String>,

    #[arg(long)]
    pretty: bool,

    /// Validate the configuration and exit
    #[arg(long)]
    check_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => HoraryConfig::load(path)?,
        None => HoraryConfig::load_default()?,
    };
    if args.check_config {
        println!("configuration ok");
        return Ok(());
    }

    let chart_path = args.chart.as_deref().context("no chart snapshot given")?;
    let chart = load_chart_from_json(&read(chart_path)?)
        .with_context(|| format!("loading {}", chart_path.display()))?;

    let reasoning: Vec<ReasoningInput> = match &args.reasoning {
        Some(path) => serde_json::from_str(&read(path)?)
            .with_context(|| format!("parsing reasoning {}", path.display()))?,
        None => Vec::new(),
    };

    let now = match &args.now {
        Some(text) => DateTime::parse_from_rfc3339(text)
            .with_context(|| format!("invalid --now '{}'", text))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let derived = HoraryEngine::new(config).derive(&chart, &reasoning, Some(now));
    log::info!(
        "derived chart {}: {} aspects, {} upcoming",
        derived.chart_id,
        derived.aspects.len(),
        derived.future_aspects.len()
    );

    let out = if args.pretty {
        serde_json::to_string_pretty(&derived)?
    } else {
        serde_json::to_string(&derived)?
    };
    println!("{}", out);
    Ok(())
}

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}
