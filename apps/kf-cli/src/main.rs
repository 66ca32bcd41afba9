use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use kf_task::{Config, SubstitutionPolicy, TaskError, catalog, exec_task, preprocess_task};

mod task_file;

use task_file::{RunReport, TaskFile};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Task(#[from] TaskError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Task file error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Report error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "kf-cli")]
#[command(about = "KineFlow CLI - Reaction network time-course tasks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a task file
    Run {
        /// Path to the task YAML file
        task_path: PathBuf,
        /// Algorithm substitution policy (overrides ALGORITHM_SUBSTITUTION_POLICY)
        #[arg(long)]
        policy: Option<SubstitutionPolicy>,
        /// Write results, log and warnings as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check a task file without simulating
    Validate {
        /// Path to the task YAML file
        task_path: PathBuf,
        /// Algorithm substitution policy (overrides ALGORITHM_SUBSTITUTION_POLICY)
        #[arg(long)]
        policy: Option<SubstitutionPolicy>,
    },
    /// List supported algorithms and their parameters
    Algorithms,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            task_path,
            policy,
            output,
        } => cmd_run(&task_path, policy, output.as_deref()),
        Commands::Validate { task_path, policy } => cmd_validate(&task_path, policy),
        Commands::Algorithms => {
            cmd_algorithms();
            Ok(())
        }
    }
}

fn config(policy: Option<SubstitutionPolicy>) -> CliResult<Config> {
    let mut config = Config::from_env()?;
    if let Some(policy) = policy {
        config.algorithm_substitution_policy = policy;
    }
    Ok(config)
}

fn cmd_run(
    task_path: &Path,
    policy: Option<SubstitutionPolicy>,
    output: Option<&Path>,
) -> CliResult<()> {
    let config = config(policy)?;
    let file = TaskFile::load(task_path)?;
    println!("Running task: {}", file.task.id);

    let outcome = exec_task(&file.task, &file.variables, None, &config)?;

    if let Some(log) = &outcome.log {
        println!("  Algorithm: {}", log.algorithm);
    }
    if !outcome.warnings.is_empty() {
        println!("  Warnings: {}", outcome.warnings.len());
    }
    for (id, values) in &outcome.results {
        let last = values.last().copied().unwrap_or(f64::NAN);
        println!("  {id}: {} samples, final = {last:.6e}", values.len());
    }

    if let Some(path) = output {
        let report = RunReport::new(
            &file.task.id,
            &outcome.results,
            outcome.log.as_ref(),
            &outcome.warnings,
        );
        std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
        println!("✓ Results written to {}", path.display());
    } else {
        println!("✓ Task completed");
    }
    Ok(())
}

fn cmd_validate(task_path: &Path, policy: Option<SubstitutionPolicy>) -> CliResult<()> {
    let mut config = config(policy)?;
    config.validate_inputs = true;
    println!("Validating task: {}", task_path.display());

    let file = TaskFile::load(task_path)?;
    let preprocessed = preprocess_task(&file.task, &file.variables, &config)?;
    println!(
        "✓ Task is valid ({} will run, {} targets resolved)",
        preprocessed.algorithm.kisao_id,
        preprocessed.target_ids.len()
    );
    Ok(())
}

fn cmd_algorithms() {
    println!("Supported algorithms:");
    for entry in catalog::algorithms() {
        println!("  {} - {} ({})", entry.kisao_id, entry.name, entry.solver);
        for (kisao_id, setting) in &entry.settings {
            println!(
                "      {kisao_id}: {} [{}] {}",
                setting.key, setting.value_type, setting.name
            );
        }
    }
}
