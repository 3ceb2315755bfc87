use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};
use memmap2::Mmap;

use rox::ast_printer::AstPrinter;
use rox::lox::{self, RunOutcome};
use rox::scanner::Scanner;
use rox::sink::{Diagnostics, ErrorSink, StdoutOutput};

#[derive(ClapParser, Debug)]
#[command(version, about = "Lox language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Print the tokens as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Parses input from a file as a program and prints its AST
    Parse {
        filename: PathBuf,

        /// Print the statements as JSON
        #[arg(long)]
        json: bool,
    },

    /// Evaluates input from a file as a single expression and prints the result
    Evaluate { filename: PathBuf },

    /// Runs input from a file as a Lox program
    Run { filename: PathBuf },
}

/// Maps the file read-only and checks that it is UTF-8.
fn read_file(filename: &Path) -> Result<Mmap> {
    info!("Reading file: {:?}", filename);

    let file = File::open(filename).context(format!("Failed to open file {:?}", filename))?;

    // SAFETY: the map is read-only and lives only for this process; the
    // source file is not expected to be modified while it is interpreted.
    let map = unsafe { Mmap::map(&file) }.context(format!("Failed to map file {:?}", filename))?;

    lox::source_text(&map).context(format!("File {:?} is not valid UTF-8", filename))?;

    info!("Read {} bytes from {:?}", map.len(), filename);

    Ok(map)
}

fn init_logger() -> Result<()> {
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    Builder::new()
        .format(|buf, record| {
            let module = record.module_path().unwrap_or("<unnamed>");
            let module = module.strip_prefix("rox::").unwrap_or(module);

            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug)
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

/// Prints every collected diagnostic to stderr and exits with the matching status.
fn finish(errors: &Diagnostics) -> ! {
    for message in errors.messages() {
        eprintln!("{}", message);
    }

    let outcome = RunOutcome::from_sink(errors);

    debug!("Exiting with {:?}", outcome);

    std::process::exit(outcome.exit_code())
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    if args.log {
        init_logger()?;
    } else {
        Builder::new().filter_level(log::LevelFilter::Off).init();
    }

    info!("CLI arguments: {:?}", args);

    let mut errors = Diagnostics::new();

    match args.commands {
        Commands::Tokenize { filename, json } => {
            info!("Running Tokenize subcommand");

            let map = read_file(&filename)?;
            let source = lox::source_text(&map)?;

            if json {
                let tokens = lox::tokenize(source, &mut errors);
                println!("{}", serde_json::to_string_pretty(&tokens)?);

                if errors.had_error() {
                    finish(&errors);
                }
            } else {
                for token in Scanner::new(source) {
                    match token {
                        Ok(token) => println!("{}", token),
                        Err(e) => {
                            eprintln!("{}", e);
                            errors.report(e);
                        }
                    }
                }

                // already printed in order with the tokens
                if errors.had_error() {
                    std::process::exit(RunOutcome::StaticError.exit_code());
                }
            }
        }

        Commands::Parse { filename, json } => {
            info!("Running Parse subcommand");

            let map = read_file(&filename)?;
            let statements = lox::parse(lox::source_text(&map)?, &mut errors);

            if errors.had_error() {
                finish(&errors);
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&statements)?);
            } else {
                for stmt in &statements {
                    println!("{}", AstPrinter::print_stmt(stmt));
                }
            }
        }

        Commands::Evaluate { filename } => {
            info!("Running Evaluate subcommand");

            let map = read_file(&filename)?;
            let mut output = StdoutOutput;

            match lox::evaluate(lox::source_text(&map)?, &mut errors, &mut output) {
                Some(value) => println!("{}", value),
                None => finish(&errors),
            }
        }

        Commands::Run { filename } => {
            info!("Running Run subcommand");

            let map = read_file(&filename)?;
            let mut output = StdoutOutput;

            let outcome = lox::run(lox::source_text(&map)?, &mut errors, &mut output);

            if outcome != RunOutcome::Success {
                finish(&errors);
            }

            info!("Program executed successfully");
        }
    }

    Ok(())
}
