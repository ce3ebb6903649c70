use std::io::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use triage_core::AdmissionRecord;
use triage_engine::Session;
use triage_store::StateFile;

#[derive(Parser)]
#[command(name = "triage", version, about = "ER admission queue with durable triage ordering")]
struct Cli {
    /// State file path (default: ~/.triage/state.json)
    #[arg(long, global = true)]
    state_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register a patient
    Admit {
        name: String,
        /// Severity 1-4, 1 = critical
        #[arg(short, long)]
        severity: u8,
        /// Free-text condition; defaults to the severity label
        #[arg(short, long)]
        condition: Option<String>,
    },
    /// Treat the most urgent waiting patient
    Treat,
    /// Show the waiting queue in treatment order
    List,
    /// Show waiting/critical/treated totals
    Stats,
    /// Interactive console
    Console,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let state_path = cli.state_file.unwrap_or_else(default_state_path);
    let session = Session::start(StateFile::new(state_path));

    let exit_code = match cli.command {
        Command::Admit {
            name,
            severity,
            condition,
        } => match session.admit(&name, severity, condition.as_deref()) {
            Ok(record) => {
                println!(
                    "Admitted {} (token {}, {})",
                    record.name, record.arrival, record.severity
                );
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("rejected: {e}");
                ExitCode::FAILURE
            }
        },
        Command::Treat => {
            match session.treat_next() {
                Some(record) => println!("Treating: {} ({})", record.name, record.severity),
                None => println!("Nothing to treat: the queue is empty."),
            }
            ExitCode::SUCCESS
        }
        Command::List => {
            print_queue(&session.snapshot());
            ExitCode::SUCCESS
        }
        Command::Stats => {
            print_stats(&session);
            ExitCode::SUCCESS
        }
        Command::Console => run_console(&session).await,
    };

    // The single durability point: every exit path, including ctrl-c out of
    // the console, lands here before the process terminates.
    if let Err(e) = session.shutdown() {
        warn!(error = %e, "failed to persist state on shutdown");
        eprintln!("warning: could not save state: {e}");
    }

    exit_code
}

fn default_state_path() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
        .join(".triage")
        .join("state.json")
}

async fn run_console(session: &Session) -> ExitCode {
    println!("triage console: admit <name> <severity> [condition], treat, next, list, stats, quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        let _ = std::io::stdout().flush();

        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if !handle_console_line(session, line.trim()) {
                        break;
                    }
                }
                // EOF or a broken stdin both end the session cleanly.
                Ok(None) | Err(_) => break,
            },
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        }
    }
    ExitCode::SUCCESS
}

/// Returns false when the console should exit.
fn handle_console_line(session: &Session, line: &str) -> bool {
    let mut parts = line.split_whitespace();
    match parts.next() {
        None => {}
        Some("admit") => {
            let name = parts.next();
            let severity = parts.next().and_then(|raw| raw.parse::<u8>().ok());
            let condition = {
                let rest = parts.collect::<Vec<_>>().join(" ");
                (!rest.is_empty()).then_some(rest)
            };
            match (name, severity) {
                (Some(name), Some(severity)) => {
                    match session.admit(name, severity, condition.as_deref()) {
                        Ok(record) => println!(
                            "Admitted {} (token {}, {})",
                            record.name, record.arrival, record.severity
                        ),
                        Err(e) => println!("rejected: {e}"),
                    }
                }
                _ => println!("usage: admit <name> <severity 1-4> [condition]"),
            }
        }
        Some("treat") => match session.treat_next() {
            Some(record) => println!("Treating: {} ({})", record.name, record.severity),
            None => println!("Nothing to treat: the queue is empty."),
        },
        Some("next") => match session.peek_next() {
            Some(record) => println!("Next up: {} ({})", record.name, record.severity),
            None => println!("The queue is empty."),
        },
        Some("list") => print_queue(&session.snapshot()),
        Some("stats") => print_stats(session),
        Some("quit") | Some("exit") => return false,
        Some(other) => println!("unknown command: {other}"),
    }
    true
}

fn print_queue(records: &[AdmissionRecord]) {
    if records.is_empty() {
        println!("The queue is empty.");
        return;
    }
    println!("{:<7} {:<30} {:<25} NAME", "TOKEN", "SEVERITY", "CONDITION");
    for record in records {
        println!(
            "{:<7} {:<30} {:<25} {}",
            record.arrival,
            record.severity.to_string(),
            record.condition,
            record.name
        );
    }
}

fn print_stats(session: &Session) {
    let stats = session.stats();
    println!(
        "Waiting: {}   Critical: {}   Total Treated: {}",
        stats.waiting, stats.critical, stats.treated
    );
}
