//! Repindex CLI - interactive shell
//!
//! Registers objects in an in-memory catalog and prints the SQL, columns,
//! hashes, and filters compiled from them.

mod commands;

use clap::Parser;
use commands::{execute, Outcome};
use repindex::ReplicaIndex;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Interactive shell for repindex
#[derive(Parser, Debug)]
#[command(name = "repindex", version, about, long_about = None)]
struct Args {
    /// Run dot commands from a file and exit
    #[arg(short = 'f', long = "file")]
    file: Option<PathBuf>,

    /// Log filter directives, overriding RUST_LOG
    #[arg(long = "log")]
    log: Option<String>,
}

fn init_logging(directives: Option<&str>) {
    let filter = match directives {
        Some(directives) => EnvFilter::try_new(directives).map_err(drop),
        None => EnvFilter::try_from_default_env().map_err(drop),
    }
    .unwrap_or_else(|_| EnvFilter::new("repindex=info,warn"));
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .init();
}

/// Runs one line, printing its output. Returns false once the shell should stop.
fn run_line(index: &ReplicaIndex, line: &str) -> bool {
    let line = line.trim();
    if line.is_empty() || line.starts_with("--") {
        return true;
    }
    match execute(index, line) {
        Ok(Outcome::Output(output)) => {
            if !output.is_empty() {
                println!("{}", output);
            }
            true
        }
        Ok(Outcome::Quit) => false,
        Err(e) => {
            eprintln!("Error: {}", e);
            true
        }
    }
}

fn run_file(index: &ReplicaIndex, path: &Path) -> ExitCode {
    let script = match std::fs::read_to_string(path) {
        Ok(script) => script,
        Err(e) => {
            eprintln!("Error reading {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(file = %path.display(), "running script");
    for line in script.lines() {
        if !run_line(index, line) {
            break;
        }
    }
    ExitCode::SUCCESS
}

fn run_repl(index: &ReplicaIndex) -> ExitCode {
    println!("Repindex v{}", env!("CARGO_PKG_VERSION"));
    println!("Type .help for help, .quit to exit");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("repindex> ");
        if let Err(e) = stdout.flush() {
            eprintln!("Error writing prompt: {}", e);
            return ExitCode::FAILURE;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                continue;
            }
        }

        if !run_line(index, &line) {
            break;
        }
    }

    println!("Goodbye!");
    ExitCode::SUCCESS
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.log.as_deref());

    let index = ReplicaIndex::new();
    match &args.file {
        Some(path) => run_file(&index, path),
        None => run_repl(&index),
    }
}
