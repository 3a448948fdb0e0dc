//! Main CLI application for the peaceable queens solver

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use peaceable_queens::{
    board::parse_board_from_string,
    config::{CliOverrides, OutputFormat, Settings, SolverBackend},
    peaceable::{sweep, Instance, PeaceableProblem, SolutionValidator, SolveReport},
    utils::{ColorOutput, SolutionFormatter},
    PeaceError,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "config/default.yaml";
const DEFAULT_CNF: &str = "tmp.cnf";

#[derive(Parser)]
#[command(name = "peaceable_queens")]
#[command(about = "Peaceably coexisting armies of queens, via SAT")]
#[command(version = "0.1.0")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Args, Default)]
struct RunArgs {
    /// Size of the board
    #[arg(long, allow_negative_numbers = true)]
    n: Option<i64>,

    /// Number of queens per army
    #[arg(long, allow_negative_numbers = true)]
    k: Option<i64>,

    /// Output DIMACS CNF file path
    #[arg(long)]
    cnf: Option<PathBuf>,

    /// File containing n on the first line and k on the second
    #[arg(long)]
    instance: Option<PathBuf>,

    /// Solve the CNF
    #[arg(long)]
    solve: bool,

    /// Print encoding and solver statistics
    #[arg(long)]
    stats: bool,

    #[command(flatten)]
    common: CommonArgs,

    /// Save the solution board (text or JSON, per --format)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Default, Clone)]
struct CommonArgs {
    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Solver time limit in seconds (overrides config)
    #[arg(long)]
    timeout: Option<u64>,

    /// Solver backend (overrides config)
    #[arg(long, value_enum)]
    backend: Option<SolverBackend>,

    /// External solver executable (overrides config)
    #[arg(long)]
    solver: Option<PathBuf>,

    /// Output format (overrides config)
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a default configuration and sample instance files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Check a board file against the peaceable queens rules
    Validate {
        /// Board file: rows of W, B and . separated by spaces
        #[arg(short, long)]
        board: PathBuf,

        /// Expected queens per army
        #[arg(short, long)]
        k: usize,
    },

    /// Find the largest peaceful army for a board size
    Sweep {
        /// Size of the board
        #[arg(long)]
        n: usize,

        #[command(flatten)]
        common: CommonArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Setup { directory, force }) => {
            init_tracing(false);
            setup_command(directory, force)
        }
        Some(Commands::Validate { board, k }) => {
            init_tracing(false);
            validate_command(board, k)
        }
        Some(Commands::Sweep { n, common }) => {
            init_tracing(common.verbose);
            sweep_command(n, common).await
        }
        None => {
            init_tracing(cli.run.common.verbose);
            run_command(cli.run).await
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(common: &CommonArgs, cnf: Option<PathBuf>, stats: bool) -> Result<Settings> {
    let config_path = common
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));

    let mut settings = if config_path.exists() {
        Settings::from_file(&config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        if common.config.is_some() {
            anyhow::bail!("Config file {} not found", config_path.display());
        }
        Settings::default()
    };

    let cli_overrides = CliOverrides {
        backend: common.backend,
        solver_binary: common.solver.clone(),
        timeout_seconds: common.timeout,
        format: common.format,
        cnf_path: cnf,
        print_stats: stats,
    };
    settings.merge_with_cli(&cli_overrides);

    settings.validate().context("Configuration validation failed")?;
    Ok(settings)
}

fn resolve_instance(args: &RunArgs) -> Result<Instance> {
    if let Some(path) = &args.instance {
        return Instance::load(path)
            .with_context(|| format!("Failed to load instance from {}", path.display()));
    }

    match (args.n, args.k) {
        (Some(n), Some(k)) => Ok(Instance::new(n, k)?),
        _ => anyhow::bail!("Please specify n and k (--n and --k, or --instance)"),
    }
}

async fn run_command(args: RunArgs) -> Result<()> {
    let settings = load_settings(&args.common, args.cnf.clone(), args.stats)?;
    let instance = resolve_instance(&args)?;
    let verbose = args.common.verbose;

    let problem = PeaceableProblem::new(instance, settings.clone())
        .context("Failed to create peaceable queens problem")?;

    if verbose {
        println!("{}", ColorOutput::info(&format!("Instance: {}", instance)));
        println!("{}", problem.encoder().estimate_complexity());
    }
    if (settings.output.print_stats || verbose) && instance.is_feasible() {
        println!("{}", problem.encoder().statistics()?);
    }

    if !args.solve {
        return write_cnf_command(&problem, &settings);
    }

    let report = match problem.solve().await {
        Ok(report) => report,
        Err(PeaceError::Timeout(limit)) => {
            print_timeout(instance, limit, settings.output.format)?;
            return Ok(());
        }
        Err(e) => return Err(e).context("Failed to solve peaceable queens problem"),
    };

    print_report(instance, &report, &settings, verbose)?;

    if let (Some(path), Some(solution)) = (&args.output, report.verdict.solution()) {
        SolutionFormatter::save_solution(solution, path, settings.output.format)
            .context("Failed to save solution")?;
        println!("{}", ColorOutput::success(&format!("Solution saved to {}", path.display())));
    }

    Ok(())
}

fn write_cnf_command(problem: &PeaceableProblem, settings: &Settings) -> Result<()> {
    let instance = problem.instance();
    if !instance.is_feasible() {
        println!("UNSAT");
        println!(
            "{}",
            ColorOutput::warning(&format!(
                "k = {} exceeds the {} cells of the board; no formula written",
                instance.k,
                instance.cells()
            ))
        );
        return Ok(());
    }

    let path = settings
        .output
        .cnf_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CNF));
    let statistics = problem
        .encoder()
        .write_dimacs_file(&path)
        .with_context(|| format!("Failed to write CNF to {}", path.display()))?;

    println!(
        "Wrote {} ({} variables, {} clauses)",
        path.display(),
        statistics.variable_count,
        statistics.clause_count
    );
    Ok(())
}

fn print_report(instance: Instance, report: &SolveReport, settings: &Settings, verbose: bool) -> Result<()> {
    if settings.output.format == OutputFormat::Json {
        let json = serde_json::json!({
            "n": instance.n,
            "k": instance.k,
            "status": report.verdict.label(),
            "solution": report.verdict.solution(),
            "statistics": report.statistics,
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    println!("{}", report.verdict.label());
    if let Some(solution) = report.verdict.solution() {
        if verbose {
            println!("{}", SolutionFormatter::format_solution(solution, true));
        } else {
            print!("{}", solution.render());
        }
    }

    if settings.output.print_stats {
        if let Some(statistics) = &report.statistics {
            println!("\n{}", statistics);
        }
    }

    Ok(())
}

fn print_timeout(instance: Instance, limit: Duration, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        let json = serde_json::json!({
            "n": instance.n,
            "k": instance.k,
            "status": "UNKNOWN",
            "timeout_seconds": limit.as_secs(),
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        println!("UNKNOWN");
        println!(
            "{}",
            ColorOutput::warning(&format!("Solver timed out after {}s", limit.as_secs()))
        );
    }
    Ok(())
}

async fn sweep_command(n: usize, common: CommonArgs) -> Result<()> {
    if n == 0 {
        anyhow::bail!("Board size must be positive");
    }
    let settings = load_settings(&common, None, false)?;

    println!("{}", ColorOutput::info(&format!("Sweeping army sizes on a {}x{} board...", n, n)));
    let report = sweep(n, &settings).await.context("Sweep failed")?;

    if settings.output.format == OutputFormat::Json {
        let json = serde_json::json!({
            "n": report.n,
            "best_k": report.best.as_ref().map(|s| s.k),
            "first_unsat": report.first_unsat,
            "undecided": report.undecided,
            "solution": report.best,
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        print!("{}", SolutionFormatter::format_sweep(&report));
    }

    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Setting up project structure..."));

    let config_dir = directory.join("config");
    let instance_dir = directory.join("instances");

    for dir in [&config_dir, &instance_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    write_if_absent(&config_path, force, |path| {
        Settings::default().to_file(&path.to_path_buf())
    })?;

    let mut embedded = Settings::default();
    embedded.solver.backend = SolverBackend::Embedded;
    embedded.solver.timeout_seconds = 60;
    write_if_absent(&config_dir.join("embedded.yaml"), force, |path| {
        embedded.to_file(&path.to_path_buf())
    })?;

    for (n, k) in [(4, 2), (5, 4), (8, 9), (2, 1)] {
        let instance = Instance::new(n, k)?;
        let path = instance_dir.join(format!("queens_{}_{}.txt", n, k));
        write_if_absent(&path, force, |path| Ok(instance.save(path)?))?;
    }

    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit {}", config_path.display());
    println!(
        "2. Run: peaceable_queens --instance {} --solve",
        instance_dir.join("queens_4_2.txt").display()
    );

    Ok(())
}

fn write_if_absent<F>(path: &Path, force: bool, write: F) -> Result<()>
where
    F: FnOnce(&Path) -> Result<()>,
{
    if path.exists() && !force {
        println!("Skipped: {} (already exists)", path.display());
        return Ok(());
    }
    write(path).with_context(|| format!("Failed to create {}", path.display()))?;
    println!("Created: {}", path.display());
    Ok(())
}

fn validate_command(board_path: PathBuf, k: usize) -> Result<()> {
    let content = std::fs::read_to_string(&board_path)
        .with_context(|| format!("Failed to read board from {}", board_path.display()))?;
    let board = parse_board_from_string(&content)
        .with_context(|| format!("Failed to parse board from {}", board_path.display()))?;

    println!("{}", SolutionFormatter::format_board_with_coords(&board));

    let result = SolutionValidator::new(k).validate(&board);
    if result.is_valid {
        println!("{}", ColorOutput::success("Placement is peaceful"));
    } else {
        println!("{}", ColorOutput::error("Placement is invalid"));
        if let Some(error) = result.error_message {
            println!("Error: {}", error);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["peaceable_queens", "--n", "4", "--k", "2", "--solve", "--stats"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.run.n, Some(4));
        assert_eq!(cli.run.k, Some(2));
        assert!(cli.run.solve);
        assert!(cli.run.stats);

        let cli = Cli::try_parse_from(["peaceable_queens", "--n", "-1", "--k", "2"]).unwrap();
        assert_eq!(cli.run.n, Some(-1));

        let cli = Cli::try_parse_from(["peaceable_queens", "sweep", "--n", "5", "--backend", "embedded"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Sweep { n: 5, common: CommonArgs { backend: Some(SolverBackend::Embedded), .. } })
        ));
    }

    #[test]
    fn test_resolve_instance() {
        let args = RunArgs {
            n: Some(4),
            k: Some(2),
            ..RunArgs::default()
        };
        assert_eq!(resolve_instance(&args).unwrap(), Instance::new(4, 2).unwrap());

        let args = RunArgs {
            n: Some(4),
            ..RunArgs::default()
        };
        assert!(resolve_instance(&args).is_err());

        let args = RunArgs {
            n: Some(0),
            k: Some(2),
            ..RunArgs::default()
        };
        assert!(resolve_instance(&args).is_err());
    }

    #[test]
    fn test_setup_command() {
        let temp_dir = tempdir().unwrap();
        setup_command(temp_dir.path().to_path_buf(), false).unwrap();

        assert!(temp_dir.path().join("config/default.yaml").exists());
        assert!(temp_dir.path().join("config/embedded.yaml").exists());
        let instance = Instance::load(temp_dir.path().join("instances/queens_4_2.txt")).unwrap();
        assert_eq!(instance, Instance::new(4, 2).unwrap());
    }

    #[tokio::test]
    async fn test_write_cnf_without_solving() {
        let temp_dir = tempdir().unwrap();
        let cnf = temp_dir.path().join("q.cnf");
        let args = RunArgs {
            n: Some(3),
            k: Some(1),
            cnf: Some(cnf.clone()),
            ..RunArgs::default()
        };

        run_command(args).await.unwrap();
        assert!(std::fs::read_to_string(&cnf).unwrap().starts_with("p cnf"));
    }
}
