//! # scl CLI Entry Point
//!
//! Parses CLI arguments with clap and routes commands to their handlers.
//!
//! ## Commands
//!
//! - `get` - download or update dependencies from version control
//! - `completion` - print shell completion scripts

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use scl::commands;
use scl::config::{DEFAULT_VENDOR_DIR, GetConfig};
use scl::deps::Reporter;
use scl::logging;
use scl::vcs::{SystemVcs, VcsKind};

#[derive(Parser)]
#[command(name = "scl")]
#[command(about = "Scl is a tool for managing SCL source code.", version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download libraries from version control
    #[command(
        long_about = "Get downloads the dependencies specified by the URLs provided, cloning or checking them out from their VCS."
    )]
    Get(GetArgs),
    /// Generate shell completion scripts
    Completion { shell: Shell },
}

#[derive(Args)]
struct GetArgs {
    /// Dependencies to fetch, e.g. github.com/org/lib
    #[arg(value_name = "URL")]
    deps: Vec<String>,
    /// The root path under which the dependencies will be stored
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_VENDOR_DIR)]
    output_path: PathBuf,
    /// Update existing repositories to their newest version
    #[arg(short, long)]
    update: bool,
    /// Print names of repositories as they are acquired or updated
    #[arg(short, long)]
    verbose: bool,
    /// Backend to use when the URL does not identify one
    #[arg(long, value_enum, value_name = "VCS")]
    vcs: Option<VcsArg>,
    /// Exit with status 1 if any dependency fails
    #[arg(long)]
    strict: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum VcsArg {
    Git,
    Hg,
    Svn,
    Bzr,
}

impl From<VcsArg> for VcsKind {
    fn from(arg: VcsArg) -> Self {
        match arg {
            VcsArg::Git => VcsKind::Git,
            VcsArg::Hg => VcsKind::Mercurial,
            VcsArg::Svn => VcsKind::Subversion,
            VcsArg::Bzr => VcsKind::Bazaar,
        }
    }
}

impl GetArgs {
    fn config(&self) -> GetConfig {
        GetConfig {
            output_path: self.output_path.clone(),
            update: self.update,
            verbose: self.verbose,
            strict: self.strict,
            fallback_kind: self.vcs.map(VcsKind::from),
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if let Err(e) = logging::init("error") {
        eprintln!("warning: could not initialize logging: {}", e);
    }

    match cli.command {
        Commands::Get(args) => {
            let config = args.config();
            let adapter = SystemVcs::new().with_fallback(config.fallback_kind);
            let show_progress = console::Term::stderr().is_term();
            let mut reporter = Reporter::new(io::stdout(), io::stderr(), config.verbose)
                .with_progress(show_progress);

            let code = commands::get::run_get(
                &args.deps,
                &config,
                std::env::current_dir(),
                &adapter,
                &mut reporter,
            );
            Ok(ExitCode::from(code))
        }
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            let mut script = Vec::new();
            generate(shell, &mut cmd, bin_name, &mut script);
            io::stdout()
                .lock()
                .write_all(&script)
                .context("Failed to write completion script")?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
