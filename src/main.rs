//! timepin - resolve npm dependency ranges as of a point in time

use clap::Parser;
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use timepin::cli::{CliArgs, Command};
use timepin::manifest_file::{read_manifest, write_manifest};
use timepin::output::{create_formatter, OutputFormat};
use timepin::progress::Spinner;
use timepin::{ManifestPinner, ReportGenerator, VersionResolver};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr so stdout stays machine-readable
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "timepin=debug"
    } else {
        "timepin=warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let config = args.resolver_config(&cwd)?;
    let resolver = VersionResolver::from_config(&config)?;

    if args.verbose {
        eprintln!("timepin v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Registry: {}", config.registry_url);
    }

    match args.command {
        Command::Report { timestamp, specs } => {
            let spinner = Spinner::start(
                !args.quiet,
                format!("Resolving {} spec(s)...", specs.len()),
            );
            let result = ReportGenerator::new(resolver)
                .with_concurrency(config.concurrency)
                .generate(&specs, &timestamp)
                .await;
            spinner.clear();

            let mut stdout = io::stdout().lock();
            for line in result? {
                writeln!(stdout, "{}", line)?;
            }
            stdout.flush()?;
        }
        Command::Pin {
            timestamp,
            path,
            write,
            diff,
        } => {
            let manifest = read_manifest(&path)?;

            let spinner = Spinner::start(!args.quiet, format!("Pinning {}...", path.display()));
            let result = ManifestPinner::new(resolver)
                .with_concurrency(config.concurrency)
                .pin(&manifest, &timestamp)
                .await;
            spinner.clear();
            let pinned = result?;

            if write {
                write_manifest(&path, &pinned)?;
                if !args.quiet {
                    eprintln!("Pinned {}", path.display());
                }
                if !diff {
                    return Ok(());
                }
            }

            let stdout = io::stdout();
            let formatter = create_formatter(OutputFormat::from_cli(diff), stdout.is_terminal());
            let mut stdout = stdout.lock();
            formatter.format(&manifest, &pinned, &mut stdout)?;
            stdout.flush()?;
        }
    }

    Ok(())
}
