//! oractl binary — operator CLI for the Oracle lab deployment.
//!
//! Usage:
//! - Full setup: `oractl setup` (or `oractl install`)
//! - Clean rebuild: `oractl setup --clean` (or `oractl clean` / `oractl --clean`)
//! - Lifecycle: `oractl start|stop|restart|down|status|logs`

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};

use oractl::{
    lifecycle, ComposeCommand, LifecycleVerb, Settings, SetupOptions, StdinPrompt, Workspace,
};

#[derive(Parser, Debug)]
#[command(
    name = "oractl",
    version,
    about = "Lifecycle manager for the containerized Oracle database lab"
)]
struct Cli {
    /// Shorthand for `setup --clean` when given as the sole argument
    #[arg(long)]
    clean: bool,

    #[command(subcommand)]
    verb: Option<Verb>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Verb {
    /// Run the full setup flow (probe, clone, build, launch)
    Setup {
        /// Remove existing containers and the image before building
        #[arg(long)]
        clean: bool,
    },
    /// Alias for `setup`
    Install {
        /// Remove existing containers and the image before building
        #[arg(long)]
        clean: bool,
    },
    /// Alias for `setup --clean`
    Clean,
    /// Start existing containers
    Start,
    /// Stop containers
    Stop,
    /// Restart containers
    Restart,
    /// Remove containers
    Down,
    /// Show container state
    Status,
    /// Follow container logs (foreground)
    Logs,
}

fn usage_exit() -> ! {
    // Anything unrecognized, and a bare invocation, print usage and exit 1.
    let mut cmd = Cli::command();
    eprintln!("{}", cmd.render_help());
    std::process::exit(1);
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return;
        }
        Err(_) => usage_exit(),
    };

    // Default to info level if RUST_LOG not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .init();

    let verb = match (cli.verb, cli.clean) {
        (Some(verb), false) => verb,
        (None, true) => Verb::Clean,
        _ => usage_exit(),
    };

    let rt = tokio::runtime::Runtime::new().expect("tokio runtime");
    if let Err(e) = rt.block_on(run(verb)) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(verb: Verb) -> anyhow::Result<()> {
    let start_dir = std::env::current_dir().context("cannot determine current directory")?;
    let settings = Settings::default();

    match verb {
        Verb::Setup { clean } | Verb::Install { clean } => run_setup(start_dir, settings, clean).await,
        Verb::Clean => run_setup(start_dir, settings, true).await,
        Verb::Start => run_lifecycle(start_dir, settings, LifecycleVerb::Start).await,
        Verb::Stop => run_lifecycle(start_dir, settings, LifecycleVerb::Stop).await,
        Verb::Restart => run_lifecycle(start_dir, settings, LifecycleVerb::Restart).await,
        Verb::Down => run_lifecycle(start_dir, settings, LifecycleVerb::Down).await,
        Verb::Status => run_lifecycle(start_dir, settings, LifecycleVerb::Status).await,
        Verb::Logs => run_lifecycle(start_dir, settings, LifecycleVerb::Logs).await,
    }
}

async fn run_setup(
    start_dir: std::path::PathBuf,
    settings: Settings,
    clean: bool,
) -> anyhow::Result<()> {
    eprintln!("╔════════════════════════════════════════════════════════════════╗");
    eprintln!("║  oractl setup                                                  ║");
    eprintln!("╚════════════════════════════════════════════════════════════════╝");
    if clean {
        eprintln!("  Clean rebuild requested: containers and image will be removed");
    }

    let mut prompt = StdinPrompt;
    oractl::run_setup(start_dir, settings, SetupOptions { clean }, &mut prompt)
        .await
        .context("setup failed")?;
    Ok(())
}

async fn run_lifecycle(
    start_dir: std::path::PathBuf,
    settings: Settings,
    verb: LifecycleVerb,
) -> anyhow::Result<()> {
    let ws = Workspace::locate(start_dir, settings);
    let compose = ComposeCommand::detect(&ws.root).await?;
    lifecycle::dispatch(verb, &ws, &compose).await?;
    Ok(())
}
