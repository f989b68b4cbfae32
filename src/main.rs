//! dashcast CLI entry point

use std::io::{self, BufRead};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use dashcast::cli::{Cli, Commands, ServeArgs, WatchArgs};
use dashcast::client::{lookup, WatchClient};
use dashcast::{DashConfig, HostEvent, Session, SessionState};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return e.exit_code();
        }
    };

    let level = if cli.verbose { "debug" } else { config.logging.level.as_str() };
    if let Err(e) = init_logging(level) {
        eprintln!("Error: {:#}", e);
        return ExitCode::FAILURE;
    }

    let result = match &cli.command {
        Commands::Serve(args) => run_serve(config, args),
        Commands::Watch(args) => run_watch(args),
        Commands::Config => run_config(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            match e.downcast_ref::<dashcast::DashError>() {
                Some(dash) => dash.exit_code(),
                None => ExitCode::FAILURE,
            }
        }
    }
}

fn load_config(cli: &Cli) -> dashcast::Result<DashConfig> {
    match &cli.config {
        Some(path) => DashConfig::load_from(path),
        None => DashConfig::load(),
    }
}

/// Logs go to stderr so `watch` output on stdout stays clean
fn init_logging(level: &str) -> anyhow::Result<()> {
    let directive: Directive = format!("dashcast={}", level)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid log level '{}': {}", level, e))?;
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .init();
    Ok(())
}

/// Drive a session from newline-delimited JSON host events on stdin.
///
/// Lines that are not valid events, including non-UTF-8 bytes, are logged and
/// skipped. Only EOF or a read error ends the session.
fn run_serve(mut config: DashConfig, args: &ServeArgs) -> anyhow::Result<()> {
    args.apply(&mut config);
    let mut session = Session::init(&config)?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut line = Vec::new();
    let mut line_no = 0usize;
    loop {
        line.clear();
        let read = input
            .read_until(b'\n', &mut line)
            .context("Failed to read host events")?;
        if read == 0 {
            break;
        }
        line_no += 1;
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        match serde_json::from_slice::<HostEvent>(&line) {
            Ok(event) => session.dispatch(event),
            Err(e) => tracing::warn!("Skipping line {}: {}", line_no, e),
        }
    }

    tracing::info!("Host event stream closed");
    session.shutdown();
    Ok(())
}

/// Print every document as frames arrive. With `--field`, print only that
/// value, and only while the session is driving.
fn run_watch(args: &WatchArgs) -> anyhow::Result<()> {
    let mut client = WatchClient::connect((args.host.as_str(), args.port))
        .with_context(|| format!("Failed to connect to {}:{}", args.host, args.port))?;
    tracing::info!("Connected to {}:{}", args.host, args.port);

    loop {
        let document = client.next_document()?;
        match &args.field {
            Some(field) => {
                let state = lookup(&document, "state").and_then(|s| s.as_str());
                if state != Some(SessionState::Drive.as_str()) {
                    continue;
                }
                if let Some(value) = lookup(&document, field) {
                    println!("{}: {}", field, value);
                }
            }
            None => println!("{}", document),
        }
    }
}

fn run_config(config: &DashConfig) -> anyhow::Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}
