//! Kubeschema CLI - validate Kubernetes manifests against cluster schemas

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod display;
mod error;
mod exit_codes;

use config::{REGISTRY_ENV, RegistryStore};
use error::Result;

#[derive(Parser)]
#[command(name = "kubeschema")]
#[command(author = "Kubeschema Contributors")]
#[command(version)]
#[command(about = "Validate Kubernetes manifests against CRDs and cluster OpenAPI schemas", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Registry file (default: <config dir>/kubeschema/registry.json)
    #[arg(long, global = true, env = REGISTRY_ENV)]
    registry: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage CRD schemas
    #[command(subcommand)]
    Crd(CrdCommands),

    /// Manage cluster OpenAPI documents
    #[command(subcommand)]
    Openapi(OpenapiCommands),

    /// Validate every resource in a manifest stream
    Validate {
        /// Manifest file, or - for stdin
        file: PathBuf,

        /// Output issues as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a single resource and show which schema matched
    Check {
        /// Resource file (JSON or YAML), or - for stdin
        file: PathBuf,

        /// Output the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show registry counts
    Summary {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum CrdCommands {
    /// Replace the loaded CRDs with those in a file
    Load {
        /// CRD file (JSON or YAML, multi-document), or - for stdin
        file: PathBuf,
    },

    /// Count the CRDs in a file without loading them
    Preview {
        file: PathBuf,
    },

    /// List loaded CRDs
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove a loaded CRD
    Remove {
        /// Position shown by `crd list`
        index: usize,
    },
}

#[derive(Subcommand)]
enum OpenapiCommands {
    /// Load every OpenAPI document in a file for a cluster version
    Load {
        /// OpenAPI or Swagger file, or - for stdin
        file: PathBuf,

        /// Cluster name
        #[arg(long)]
        cluster: String,

        /// Cluster version label
        #[arg(long = "version")]
        cluster_version: String,
    },

    /// Describe an OpenAPI file without loading it
    Preview {
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List loaded OpenAPI documents
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove a loaded OpenAPI document
    Remove {
        /// Position shown by `openapi list`
        index: usize,
    },
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let store = || RegistryStore::open(cli.registry.clone());

    match cli.command {
        Commands::Crd(command) => match command {
            CrdCommands::Load { file } => commands::crd::load(&store()?, &file),
            CrdCommands::Preview { file } => commands::crd::preview(&file),
            CrdCommands::List { json } => commands::crd::list(&store()?, json),
            CrdCommands::Remove { index } => commands::crd::remove(&store()?, index),
        },

        Commands::Openapi(command) => match command {
            OpenapiCommands::Load {
                file,
                cluster,
                cluster_version,
            } => commands::openapi::load(&store()?, &file, &cluster, &cluster_version),
            OpenapiCommands::Preview { file, json } => commands::openapi::preview(&file, json),
            OpenapiCommands::List { json } => commands::openapi::list(&store()?, json),
            OpenapiCommands::Remove { index } => commands::openapi::remove(&store()?, index),
        },

        Commands::Validate { file, json } => commands::validate::run(&store()?, &file, json),

        Commands::Check { file, json } => commands::check::run(&store()?, &file, json),

        Commands::Summary { json } => commands::summary::run(&store()?, json),
    }
}

fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() {
                exit_codes::USAGE_ERROR
            } else {
                exit_codes::SUCCESS
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    init_tracing(cli.debug);

    if let Err(err) = run(cli) {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}
