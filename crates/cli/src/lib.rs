pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "bookbot",
    about = "Bookbot operator CLI",
    long_about = "Inspect configuration, validate the recommendation catalog, and replay webhook requests offline.",
    after_help = "Examples:\n  bookbot config\n  bookbot catalog --path books.toml\n  bookbot fulfill --input request.json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate the recommendation catalog and summarise its classifiers and tables")]
    Catalog {
        #[arg(long, help = "Catalog file to check instead of the configured one")]
        path: Option<PathBuf>,
    },
    #[command(about = "Run one webhook request body through the intent dispatcher offline")]
    Fulfill {
        #[arg(long, help = "File holding the webhook request JSON (reads stdin when omitted)")]
        input: Option<PathBuf>,
        #[arg(long, help = "Catalog file to answer from instead of the configured one")]
        catalog: Option<PathBuf>,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Catalog { path } => commands::catalog::run(path.as_deref()),
        Command::Fulfill { input, catalog } => {
            commands::fulfill::run(input.as_deref(), catalog.as_deref())
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
