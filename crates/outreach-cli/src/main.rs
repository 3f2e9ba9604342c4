mod cmd;
mod fixture;
mod output;
mod root;
mod settings;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, run::RunArgs, send::SendArgs, status::StatusArgs};
use settings::SettingsArgs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "outreach",
    about = "Resumable, paced direct-message delivery to the followers of target accounts",
    version,
    propagate_version = true
)]
struct Cli {
    /// Campaign root (default: nearest directory with outreach.yaml, else cwd)
    #[arg(long, global = true, env = "OUTREACH_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Log at debug level
    #[arg(long, global = true, short = 'v')]
    verbose: bool,

    #[command(flatten)]
    settings: SettingsArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Message every follower of every target, then retry failed recipients
    Run(RunArgs),

    /// Send one message to a single user
    Send(SendArgs),

    /// Summarize the delivery ledger
    Status(StatusArgs),

    /// Inspect and validate settings
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        match &cli.command {
            Commands::Run(_) | Commands::Send(_) => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = settings::resolve(&root, cli.settings).and_then(|settings| match cli.command {
        Commands::Run(args) => cmd::run::run(&root, &settings, args, cli.json),
        Commands::Send(args) => cmd::send::run(&settings, args, cli.json),
        Commands::Status(args) => cmd::status::run(&root, &settings, args, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&settings, subcommand, cli.json),
    });

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
