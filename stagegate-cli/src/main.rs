//! # stagegate
//!
//! Interactive terminal front end for the stock signup form.
//!
//! ```bash
//! # Default form, random palette
//! stagegate
//!
//! # Reproducible palette, delayed failure from a config file
//! stagegate --seed 42 --config form.json --log-level debug
//! ```
//!
//! Commands are read from stdin one per line; type `help` for the list. Logs
//! go to stderr so the rendered form on stdout stays readable.

mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{Command, HELP};
use stagegate::config::FormConfig;
use stagegate::events::LoggingEventSink;
use stagegate::runtime::FormDriver;
use stagegate::session::DispatchOutcome;
use stagegate::signup::signup_session;
use stagegate::stages::TerminalEffect;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(author, version, about = "Fill in the signup form, if you can", long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the favorite-color palette
    #[arg(short, long)]
    seed: Option<u64>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn load_config(cli: &Cli) -> Result<FormConfig> {
    let config = match &cli.config {
        Some(path) => FormConfig::from_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => FormConfig::default(),
    };
    Ok(match cli.seed {
        Some(seed) => config.with_palette_seed(seed),
        None => config,
    })
}

fn report(outcome: &DispatchOutcome) {
    match outcome {
        DispatchOutcome::Accepted { revealed, .. } if !revealed.is_empty() => {
            println!("-> new: {}", revealed.join(", "));
        }
        DispatchOutcome::Accepted { .. } => {}
        DispatchOutcome::Cleared { concealed, .. } if !concealed.is_empty() => {
            println!("-> hidden again: {}", concealed.join(", "));
        }
        DispatchOutcome::Cleared { .. } => {}
        DispatchOutcome::Rejected { stage_id } => println!("-> '{stage_id}' is not satisfied"),
        DispatchOutcome::Acknowledged { response, .. } => {
            if let Some(message) = &response.message {
                println!("-> {message}");
            }
        }
        DispatchOutcome::Terminal {
            effect: TerminalEffect::Delayed { .. },
            ..
        } => println!("-> creating account..."),
        DispatchOutcome::Terminal { .. } => {}
        DispatchOutcome::Discarded => println!("-> nothing happens"),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let config = load_config(&cli)?;
    let session = signup_session(&config, Arc::new(LoggingEventSink::debug()))
        .context("building the signup form")?;
    let mut driver = FormDriver::new(session).with_sink(Arc::new(LoggingEventSink::debug()));
    tracing::info!(session_id = %driver.session().session_id(), "Form ready");

    print!("{}", driver.view());
    println!("(type 'help' for commands)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else {
                    break;
                };
                let command = match commands::parse(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                };
                match command {
                    Command::Quit => break,
                    Command::Help => println!("{HELP}"),
                    Command::Show => print!("{}", driver.view()),
                    other => {
                        let Some(input) = other.into_input() else {
                            continue;
                        };
                        match driver.handle(input) {
                            Ok(outcome) => {
                                report(&outcome);
                                print!("{}", driver.view());
                            }
                            Err(e) => println!("error: {e}"),
                        }
                    }
                }
            }
            Some(signal) = driver.next_signal() => {
                if let Some(notice) = driver.apply_signal(signal).await {
                    if let Some(message) = notice.message {
                        println!("!! {message}");
                    }
                }
                print!("{}", driver.view());
            }
        }
    }

    driver.shutdown("input closed");
    Ok(())
}
