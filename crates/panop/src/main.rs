mod cli;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use panop_core::{HttpTransport, OpCommand, Session, Target};

use crate::cli::Cli;
use crate::error::CliError;
use crate::output::{Printer, ResponseLog};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    // Reject bad names before touching credentials or the network.
    let target = Target::parse(&cli.target)?;

    let mut cfg = config::load(&cli)?;
    config::apply_overrides(&mut cfg, &cli);
    let closing = cfg.closing()?;

    let commands = config::commands(&cli, closing)?;
    let printer = Printer::new(cli.verbose > 0);
    for command in &commands {
        printer.classification(&target, command);
    }

    let credentials = config::credentials(&cfg)?;
    debug!(user = %credentials.username, target = %target, "requesting session key");

    let session = Session::connect(&target, &cfg.connect_options(), &credentials).await?;
    printer.session_key(session.key());

    let batch = cli.file.is_some();
    let mut log = cfg.log_dir.as_deref().map(|dir| ResponseLog::new(dir, &target));
    let mut failures = Vec::new();

    for command in &commands {
        match run_one(&session, command, &printer, log.as_mut(), batch).await {
            Ok(()) => {}
            Err(err) if batch => {
                printer.failure(command, &err);
                failures.push(err);
            }
            Err(err) => return Err(err),
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(CliError::BatchFailed {
            failed: failures.len(),
            total: commands.len(),
            errors: failures,
        })
    }
}

async fn run_one(
    session: &Session<HttpTransport>,
    command: &OpCommand,
    printer: &Printer,
    log: Option<&mut ResponseLog>,
    batch: bool,
) -> Result<(), CliError> {
    let outcome = session.run(command).await?;
    printer.response(command, &outcome, batch);

    if let Some(log) = log {
        let path = log.write(command, &outcome)?;
        info!(path = %path.display(), "response logged");
    }
    Ok(())
}
