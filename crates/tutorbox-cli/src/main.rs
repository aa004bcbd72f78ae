//! Tutorbox CLI
//!
//! A command-line tool for running learner code snippets in a sandbox,
//! grading submissions against reference solutions, and managing lesson
//! progress.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{Level, debug, info};
use tracing_subscriber::EnvFilter;
use tutorbox::{Config, EXAMPLE_CONFIG, Executor, Grader, ProgressStore, RunLimits, Verdict};

#[derive(Parser)]
#[command(name = "tutorbox")]
#[command(about = "Sandboxed snippet execution and exercise grading")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new configuration file
    Init {
        /// Output path (default: tutorbox.toml)
        #[arg(short, long, default_value = "tutorbox.toml")]
        output: PathBuf,

        /// Overwrite existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Run a snippet and print its captured output
    Run {
        /// Source file to run
        #[arg(value_name = "FILE")]
        source: PathBuf,

        /// Wall clock limit in seconds
        #[arg(short, long)]
        time_limit: Option<f64>,
    },

    /// Grade a submission against a reference solution
    Grade {
        /// Learner source file
        #[arg(value_name = "FILE")]
        source: PathBuf,

        /// Reference solution file
        #[arg(short, long)]
        reference: PathBuf,
    },

    /// Inspect or mutate lesson progress
    Progress {
        #[command(subcommand)]
        action: ProgressAction,
    },

    /// Show effective configuration
    ShowConfig,
}

#[derive(Subcommand)]
enum ProgressAction {
    /// List lessons with their completion status
    Show,

    /// Mark a lesson complete
    Complete {
        /// Lesson identifier
        lesson: String,
    },

    /// Reset a lesson's completion flag
    Reset {
        /// Lesson identifier
        lesson: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Load configuration
    let config = if let Some(ref path) = cli.config {
        info!(?path, "loading configuration");
        Config::from_file(path).context("failed to load configuration")?
    } else {
        debug!("using default configuration");
        Config::default()
    };

    match cli.command {
        Commands::Init { output, force } => init_config(&output, force).await,
        Commands::Run { source, time_limit } => run_snippet(config, &source, time_limit).await,
        Commands::Grade { source, reference } => grade_submission(config, &source, &reference).await,
        Commands::Progress { action } => progress_action(&config, action),
        Commands::ShowConfig => {
            show_config(&config);
            Ok(())
        }
    }
}

async fn run_snippet(config: Config, source: &PathBuf, time_limit: Option<f64>) -> Result<()> {
    let source_text = tokio::fs::read_to_string(source)
        .await
        .context("failed to read source file")?;

    let limits = time_limit.map(|seconds| RunLimits::new().with_wall_time(seconds));

    let executor = Executor::new(config);
    let result = executor
        .execute_with(&source_text, limits.as_ref())
        .await
        .context("execution failed")?;

    if !result.stdout.is_empty() {
        print!("{}", result.stdout);
    }
    if !result.stderr.is_empty() {
        eprint!("{}", result.stderr);
    }

    match result.fault {
        None => Ok(()),
        Some(fault) => {
            eprintln!("fault: {fault}");
            std::process::exit(1);
        }
    }
}

async fn grade_submission(config: Config, source: &PathBuf, reference: &PathBuf) -> Result<()> {
    let learner_source = tokio::fs::read_to_string(source)
        .await
        .context("failed to read learner source file")?;
    let reference_source = tokio::fs::read_to_string(reference)
        .await
        .context("failed to read reference solution file")?;

    let grader = Grader::new(Executor::new(config));
    let verdict = grader
        .grade(&learner_source, &reference_source)
        .await
        .context("grading failed")?;

    print_verdict(&verdict);

    if verdict.passed {
        Ok(())
    } else {
        std::process::exit(1);
    }
}

fn print_verdict(verdict: &Verdict) {
    if verdict.passed {
        println!("PASS");
    } else {
        println!("FAIL");
    }

    if let Some(ref fault) = verdict.diagnostics {
        println!("Reason: {fault}");
    }

    if !verdict.observed_output.is_empty() {
        println!("\nYour output:\n{}", verdict.observed_output.trim_end());
    }
    if let Some(ref expected) = verdict.expected_output
        && !verdict.passed
    {
        println!("\nExpected output:\n{}", expected.trim_end());
    }
}

fn progress_action(config: &Config, action: ProgressAction) -> Result<()> {
    let mut store =
        ProgressStore::load(&config.progress_path).context("failed to load progress store")?;

    match action {
        ProgressAction::Show => {
            if store.lessons().is_empty() {
                println!("No lessons recorded yet.");
                return Ok(());
            }

            let mut lessons: Vec<_> = store.lessons().iter().collect();
            lessons.sort_by_key(|(id, _)| *id);

            for (lesson, &flag) in lessons {
                let status = if flag == 1 { "completed" } else { "in progress" };
                println!("  {lesson:<30} {status}");
            }
            println!(
                "\n{} of {} lessons completed",
                store.completed_count(),
                store.lessons().len()
            );
        }
        ProgressAction::Complete { lesson } => {
            store
                .set_complete(&lesson)
                .context("failed to persist progress")?;
            println!("Marked '{lesson}' as complete");
        }
        ProgressAction::Reset { lesson } => {
            store.reset(&lesson).context("failed to persist progress")?;
            println!("Reset progress for '{lesson}'");
        }
    }

    Ok(())
}

fn show_config(config: &Config) {
    println!("Interpreter: {}", config.interpreter.command.join(" "));
    println!("Source name: {}", config.interpreter.source_name);
    println!("Sandbox: {}", if config.sandbox.enabled { "enabled" } else { "disabled" });
    println!();
    println!("Wall time limit: {:?} s", config.default_limits.wall_time);
    println!("Output cap: {:?} bytes", config.default_limits.max_output);
    println!();
    println!("Progress store: {}", config.progress_path.display());
}

async fn init_config(output: &PathBuf, force: bool) -> Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists at '{}'. Use --force to overwrite.",
            output.display()
        );
    }

    tokio::fs::write(output, EXAMPLE_CONFIG)
        .await
        .context("failed to write configuration file")?;

    println!("Created configuration file at '{}'", output.display());
    Ok(())
}
