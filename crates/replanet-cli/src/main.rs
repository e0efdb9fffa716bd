mod console;
mod settings;
mod summary;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use replanet_core::decision::{Operator, ScriptedOperator, select_environment};
use replanet_core::id::EnvironmentId;
use replanet_core::{ConversionEngine, ProductPolicy};
use replanet_data::{load_catalog, load_configuration, save_configuration};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::console::ConsoleOperator;

#[derive(Debug, Parser)]
#[command(
    name = "replanet",
    version,
    about = "Move a colony layout from one planet environment to another."
)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List catalog environments with their products and raw resources.
    Environments(EnvironmentsArgs),
    /// Convert a configuration file to another environment.
    Convert(ConvertArgs),
}

#[derive(Debug, Parser)]
struct EnvironmentsArgs {
    /// Catalog directory (default: `catalog_dir` from replanet.toml).
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Settings file (default: ./replanet.toml if present).
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[derive(Debug, Parser)]
struct ConvertArgs {
    /// Catalog directory (default: `catalog_dir` from replanet.toml).
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Settings file (default: ./replanet.toml if present).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Configuration to convert (.ron, .json or .toml).
    #[arg(long)]
    input: PathBuf,

    /// Where to write the result (default: <stem>.converted.<ext> next to the input).
    #[arg(long)]
    output: Option<PathBuf>,

    /// Target environment id. Prompted for when omitted.
    #[arg(long)]
    environment: Option<u32>,

    /// Read answers from a file, one per line, instead of the terminal.
    #[arg(long)]
    answers: Option<PathBuf>,

    /// Which P2 products to offer for replacement.
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    All,
    First,
}

impl From<PolicyArg> for ProductPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::All => ProductPolicy::All,
            PolicyArg::First => ProductPolicy::First,
        }
    }
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        error!("{:?}", e);
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Environments(args) => cmd_environments(args),
        Command::Convert(args) => cmd_convert(args),
    }
}

fn cmd_environments(args: EnvironmentsArgs) -> anyhow::Result<()> {
    let settings = settings::load_or_default(args.settings.as_deref(), Path::new("."))?;
    let resolved = settings.merge(args.catalog, None)?;
    let catalog = load_catalog(&resolved.catalog_dir)
        .with_context(|| format!("load catalog from {}", resolved.catalog_dir.display()))?;
    print!("{}", summary::render_environments(&catalog));
    Ok(())
}

fn cmd_convert(args: ConvertArgs) -> anyhow::Result<()> {
    let settings = settings::load_or_default(args.settings.as_deref(), Path::new("."))?;
    let resolved = settings.merge(args.catalog, args.policy.map(ProductPolicy::from))?;
    debug!(?resolved, "settings resolved");

    let catalog = load_catalog(&resolved.catalog_dir)
        .with_context(|| format!("load catalog from {}", resolved.catalog_dir.display()))?;
    let mut config = load_configuration(&args.input)
        .with_context(|| format!("load configuration {}", args.input.display()))?;
    let output = resolved.output_path(&args.input, args.output)?;

    let answers = match &args.answers {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("read answers file {}", path.display()))?,
        ),
        None => None,
    };
    let mut operator: Box<dyn Operator + '_> = match &answers {
        Some(text) => Box::new(ScriptedOperator::from_lines(text.lines())),
        None => Box::new(ConsoleOperator::stdio(&catalog)),
    };

    let target = match args.environment {
        Some(id) => EnvironmentId(id),
        None => match select_environment(&catalog, config.environment, operator.as_mut()) {
            Ok(Some(id)) => id,
            Ok(None) => {
                info!("no environment selected, nothing written");
                println!("No environment selected; nothing to do.");
                return Ok(());
            }
            Err(e) => {
                warn!(error = %e, "environment selection skipped");
                println!("Invalid environment selection ({e}); nothing to do.");
                return Ok(());
            }
        },
    };

    let report = ConversionEngine::with_options(&catalog, resolved.options)
        .convert(&mut config, target, operator.as_mut())
        .with_context(|| format!("convert {}", args.input.display()))?;

    print!("{}", summary::render_report(&catalog, &report));

    save_configuration(&output, &config)
        .with_context(|| format!("write configuration {}", output.display()))?;
    println!("\nWrote {}", output.display());
    Ok(())
}
