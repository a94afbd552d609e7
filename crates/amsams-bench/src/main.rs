use std::path::PathBuf;

use clap::Parser;

use amsams_bench::config::BenchmarkConfig;
use amsams_bench::logging::init_logging;
use amsams_bench::runner::SelfPlayRunner;

/// Deterministic self-play harness for the amsams engine.
#[derive(Debug, Parser)]
#[command(
    name = "amsams-bench",
    author,
    version,
    about = "Deterministic amsams self-play harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/selfplay.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of matches to play.
    #[arg(long, value_name = "COUNT")]
    matches: Option<usize>,

    /// Override the RNG seed for match generation.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Override the target score a match is played to.
    #[arg(long, value_name = "SCORE")]
    target_score: Option<u32>,

    /// Exit after validating the configuration (no matches are played).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchmarkConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(matches) = cli.matches {
        config.matches.count = matches;
    }

    if let Some(seed) = cli.seed {
        config.matches.seed = Some(seed);
    }

    if let Some(target_score) = cli.target_score {
        config.matches.target_score = target_score;
    }

    config.validate()?;

    let outputs = config.resolved_outputs();
    println!(
        "Loaded configuration '{}' ({} matches to {} points)",
        config.run_id, config.matches.count, config.matches.target_score
    );

    let _logging_guard = init_logging(&config.logging, &outputs)?;

    if cli.validate_only {
        println!("Validation-only mode: no matches played.");
        return Ok(());
    }

    let runner = SelfPlayRunner::new(config, outputs);
    let summary = runner.run()?;
    println!(
        "Self-play complete: {} matches → {}",
        summary.matches_played,
        summary.jsonl_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());

    Ok(())
}
