//! CLI entrypoint for dlgate.

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dlgate_core::{ApiLevel, LoadMode, Loader};
use dlgate_harness::{LoadReport, Request, run_load, run_probe};
use dlgate_sys::SystemPlatform;

/// Map shared libraries into this process, falling back to the linker's
/// internal entry when the standard loader refuses on policy grounds.
#[derive(Debug, Parser)]
#[command(name = "dlgate")]
#[command(about = "Load shared libraries past linker namespace restrictions")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Bind symbols lazily instead of at load time.
    #[arg(long, global = true)]
    lazy: bool,

    /// Report this API level instead of the detected one.
    #[arg(long, global = true)]
    api_level: Option<u32>,

    /// Print the report as one JSON line.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load a library by absolute path.
    LoadPath {
        /// Path to the shared library.
        path: String,
    },
    /// Load a library by logical name (e.g. `z` for libz.so).
    LoadName {
        /// Logical library name.
        name: String,
    },
    /// Load a library and check that it exports a symbol.
    Probe {
        #[command(flatten)]
        target: ProbeTarget,
        /// Symbol to resolve.
        #[arg(long)]
        symbol: String,
    },
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
struct ProbeTarget {
    /// Path to the shared library.
    #[arg(long)]
    path: Option<String>,
    /// Logical library name.
    #[arg(long)]
    name: Option<String>,
}

impl ProbeTarget {
    fn into_request(self) -> Request {
        match (self.path, self.name) {
            (Some(path), _) => Request::Path(path),
            (None, Some(name)) => Request::Name(name),
            // clap's group requires exactly one; an empty name is reported as invalid.
            (None, None) => Request::Name(String::new()),
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("DLGATE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging();

    let platform = match cli.api_level {
        Some(level) => SystemPlatform::with_api_level(Some(ApiLevel(level))),
        None => SystemPlatform::new(),
    };
    let mode = if cli.lazy {
        LoadMode::Lazy
    } else {
        LoadMode::Now
    };
    let loader = Loader::new(platform).with_mode(mode);

    let report: LoadReport = match cli.command {
        Command::LoadPath { path } => run_load(&loader, &Request::Path(path)),
        Command::LoadName { name } => run_load(&loader, &Request::Name(name)),
        Command::Probe { target, symbol } => run_probe(&loader, &target.into_request(), &symbol),
    };

    if cli.json {
        println!("{}", report.to_json_line()?);
    } else {
        println!("{}", report.render());
    }

    if !report.passed() {
        std::process::exit(1);
    }
    Ok(())
}
