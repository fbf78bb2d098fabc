use crate::config::Config;
use crate::error::CompilerError;
use crate::intermediate::IrGenerator;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::semantic::SemanticAnalyzer;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use clap::{Parser as ClapParser, Subcommand, ValueEnum};

mod config;
mod error;
mod intermediate;
mod lexer;
mod parser;
mod semantic;
mod token;

// Seeded example program, used when no source file is given.
const SAMPLE_CODE: &str = r#"// Sample C++ code
#include <iostream>

int main() {
    int x = 10;
    int y = 20;

    std::cout << "Sum: " << x + y << std::endl;

    return 0;
}"#;

#[derive(ClapParser)]
#[command(author, version, about = "C-like Compiler Phase Explorer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single analysis phase over a source file
    Run {
        /// The compiler phase to run
        #[arg(value_enum)]
        phase: Phase,
        /// Source file to analyze; the built-in sample program is used when omitted
        file: Option<PathBuf>,
        /// Also write the report to this file, verbatim
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Manage cphase configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Edit the config file for the current environment
    Edit,
    /// Show the current configuration
    Show,
    /// Initialize a new config file with defaults
    Init,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Phase {
    /// Tokenize the source into a classified token listing
    Lexical,
    /// Build an indented pseudo-parse-tree with inline diagnostics
    Syntax,
    /// Build a symbol table and report type/usage warnings
    Semantic,
    /// Emit a three-address-code instruction listing
    Intermediate,
}

impl Phase {
    fn title(&self) -> &'static str {
        match self {
            Phase::Lexical => "Lexical Analysis",
            Phase::Syntax => "Syntax Analysis",
            Phase::Semantic => "Semantic Analysis",
            Phase::Intermediate => "Intermediate Code",
        }
    }
}

fn read_source(file: &Option<PathBuf>) -> Result<String, CompilerError> {
    match file {
        Some(path) => {
            if !path.exists() {
                return Err(CompilerError::FileNotFound(format!(
                    "Source file not found: {}",
                    path.display()
                )));
            }
            fs::read_to_string(path).map_err(CompilerError::IO)
        }
        None => Ok(SAMPLE_CODE.to_string()),
    }
}

// Each phase is a pure computation over the source text; a panic here means
// an unexpected input shape, surfaced as a generic failure with the partial
// report discarded.
fn run_phase(phase: Phase, source: &str) -> Result<String, CompilerError> {
    panic::catch_unwind(AssertUnwindSafe(|| match phase {
        Phase::Lexical => Lexer::new(source).report(),
        Phase::Syntax => Parser::new(source).analyze(),
        Phase::Semantic => SemanticAnalyzer::new(source).analyze(),
        Phase::Intermediate => IrGenerator::new(source).generate(),
    }))
    .map_err(|_| CompilerError::PhaseFailure("An error occurred during processing.".to_string()))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::load();

    match cli.command {
        Commands::Run { phase, file, output } => {
            let source = read_source(&file)?;
            if source.trim().is_empty() {
                println!("Please enter some code first.");
                return Ok(());
            }

            println!("{}\n", phase.title());

            // Emulated backend round trip.
            thread::sleep(Duration::from_millis(config.delay_ms));

            match run_phase(phase, &source) {
                Ok(report) => {
                    println!("{}", report);
                    if let Some(path) = output {
                        fs::write(&path, &report).map_err(CompilerError::IO)?;
                    }
                }
                Err(err) => {
                    println!("Error: {}", err);
                }
            }
        }
        Commands::Config { command } => match command {
            ConfigCommands::Edit => {
                let editor = std::env::var("EDITOR").unwrap_or_else(|_| {
                    if cfg!(windows) {
                        String::from("notepad")
                    } else {
                        String::from("nano")
                    }
                });

                let config_path = Config::get_config_path();
                if !config_path.exists() {
                    config.save()?;
                }

                std::process::Command::new(editor).arg(config_path).status()?;
            }
            ConfigCommands::Show => {
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
            ConfigCommands::Init => {
                let config_path = Config::get_config_path();
                if config_path.exists() {
                    println!("Config file already exists at: {}", config_path.display());
                    println!("Use 'cphase config edit' to modify it or remove the file to reinitialize.");
                } else {
                    Config::default().save()?;
                    println!("Initialized new config file at: {}", config_path.display());
                    println!("Use 'cphase config edit' to modify it.");
                }
            }
        },
    }

    Ok(())
}
