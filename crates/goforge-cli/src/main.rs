mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    analyze::AnalyzeSubcommand, config::ConfigSubcommand, container::ContainerSubcommand,
    dependency::DependencySubcommand, docs::DocsSubcommand, profile::ProfileSubcommand,
    test::TestSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "goforge",
    about = "Development companion for Go projects: analysis, dependencies, tests, profiling, containers, docs",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from goforge.yaml or go.mod)
    #[arg(long, global = true, env = "GOFORGE_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze project structure and code quality
    Analyze {
        #[command(subcommand)]
        subcommand: AnalyzeSubcommand,
    },

    /// Check, update and audit module dependencies
    Dependency {
        #[command(subcommand)]
        subcommand: DependencySubcommand,
    },

    /// Generate test skeletons and measure coverage
    Test {
        #[command(subcommand)]
        subcommand: TestSubcommand,
    },

    /// Profile Go binaries
    Profile {
        #[command(subcommand)]
        subcommand: ProfileSubcommand,
    },

    /// Generate Dockerfiles and Kubernetes manifests
    Container {
        #[command(subcommand)]
        subcommand: ContainerSubcommand,
    },

    /// Generate API and user documentation
    Docs {
        #[command(subcommand)]
        subcommand: DocsSubcommand,
    },

    /// Show, validate or initialize goforge.yaml
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Serve the JSON API
    Api {
        /// Port to listen on (default: server.api_port, 0 = OS-assigned)
        #[arg(short = 'p', long)]
        port: Option<u16>,
    },

    /// Serve the JSON API and the web UI
    Web {
        /// Port to listen on (default: server.web_port, 0 = OS-assigned)
        #[arg(short = 'p', long)]
        port: Option<u16>,

        /// Don't open browser automatically
        #[arg(long)]
        no_open: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Api { .. } | Commands::Web { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Analyze { subcommand } => cmd::analyze::run(&root, subcommand, cli.json),
        Commands::Dependency { subcommand } => cmd::dependency::run(&root, subcommand, cli.json),
        Commands::Test { subcommand } => cmd::test::run(&root, subcommand, cli.json),
        Commands::Profile { subcommand } => cmd::profile::run(&root, subcommand, cli.json),
        Commands::Container { subcommand } => cmd::container::run(&root, subcommand, cli.json),
        Commands::Docs { subcommand } => cmd::docs::run(&root, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
        Commands::Api { port } => cmd::serve::run_api(&root, port),
        Commands::Web { port, no_open } => cmd::serve::run_web(&root, port, no_open),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
