//! codegraph-dfa: analyze JSON program models for dbz / xss bugs

use clap::Parser;
use rustc_hash::FxHashSet;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use codegraph_dfa::features::summary::ReplayPropagator;
use codegraph_dfa::{
    run_batch, BugKind, ConfigError, DfaConfig, DfaResult, InMemoryProgramModel, Oracles, Preset,
    ProgramModel, Validatable,
};

#[derive(Parser)]
#[command(name = "codegraph-dfa")]
#[command(about = "Inter-procedural data-flow analysis over program models")]
#[command(version)]
struct Cli {
    /// Program model JSON files
    #[arg(long = "program", required = true)]
    programs: Vec<PathBuf>,

    /// Bug kind: dbz, xss (overrides the config)
    #[arg(long)]
    bug_kind: Option<String>,

    /// Preset: fast, balanced, thorough
    #[arg(long, default_value = "balanced")]
    preset: String,

    /// YAML config file (v1); takes precedence over --preset
    #[arg(long)]
    config: Option<PathBuf>,

    /// Recorded propagator answers to replay instead of name matching
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Directory receiving <program>/report.json
    #[arg(long, default_value = "dfa-reports")]
    output_dir: PathBuf,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
    }
}

fn load_config(cli: &Cli) -> DfaResult<DfaConfig> {
    let mut config = match &cli.config {
        Some(path) => DfaConfig::from_yaml(path)?,
        None => {
            let preset = Preset::from_str(&cli.preset)
                .map_err(|_| ConfigError::UnknownPreset(cli.preset.clone()))?;
            DfaConfig::from_preset(preset)
        }
    };
    if let Some(kind) = &cli.bug_kind {
        config = config.bug_kind(BugKind::from_str(kind)?);
    }
    config.validate()?;
    Ok(config)
}

/// Ok(false) when some program failed to load
fn run(cli: Cli) -> DfaResult<bool> {
    let config = load_config(&cli)?;

    let mut oracles = Oracles::rule_based(&config);
    if let Some(path) = &cli.replay {
        oracles = oracles.with_propagator(Arc::new(ReplayPropagator::from_json_file(path)?));
    }

    let mut all_loaded = true;
    let mut programs: Vec<Arc<dyn ProgramModel>> = Vec::new();
    for path in &cli.programs {
        match InMemoryProgramModel::from_json_file(path) {
            Ok(model) => programs.push(Arc::new(model)),
            Err(err) => {
                tracing::error!(path = %path.display(), error = %err, "failed to load program");
                all_loaded = false;
            }
        }
    }

    let reports = run_batch(&programs, &oracles, &config);
    let names: Vec<&str> = reports.iter().map(|r| r.program.as_str()).collect();
    let dirs = report_dir_names(&names);
    for (report, dir) in reports.iter().zip(&dirs) {
        if dir != &report.program {
            tracing::warn!(
                program = %report.program,
                dir = %dir,
                "duplicate program name, report directory renamed"
            );
        }
        let path = cli.output_dir.join(dir).join("report.json");
        report.write_json(&path)?;
        println!(
            "{}: {} bugs, {} candidates, {} failed entries -> {}",
            report.program,
            report.bug_item_number,
            report.bug_candidate_number,
            report.failed_entries().count(),
            path.display()
        );
    }
    Ok(all_loaded)
}

/// One directory name per program; repeated names get `-2`, `-3`, ...
fn report_dir_names(programs: &[&str]) -> Vec<String> {
    let mut used: FxHashSet<String> = FxHashSet::default();
    programs
        .iter()
        .map(|name| {
            let mut dir = name.to_string();
            let mut n = 2;
            while !used.insert(dir.clone()) {
                dir = format!("{name}-{n}");
                n += 1;
            }
            dir
        })
        .collect()
}
