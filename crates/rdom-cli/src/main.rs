//! rdom CLI
//!
//! Command-line interface for inspecting source through the rdom model

mod commands;
mod output;

use clap::{Parser, Subcommand};
use colored::*;
use rdom_core::{Result, init_tracing_with_default};
use std::path::PathBuf;
use tracing::error;

use commands::GlobalOptions;

#[derive(Parser)]
#[command(name = "rdom")]
#[command(about = "rdom: inspect, re-emit and round-trip C#-style declarations")]
#[command(version = rdom_core::VERSION)]
#[command(
    long_about = "rdom builds an editable document model from C#-style source and emits syntax back from it.\n\
\n\
Examples:\n  \
rdom dump Widget.cs              # Show the model outline\n  \
rdom regions Widget.cs           # List #region groups\n  \
rdom emit --write Widget.cs      # Rewrite a file from its model\n  \
rdom check src/*.cs              # Verify round trips are stable\n  \
rdom literal 'Bar: typeof(string)'"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        help = "Path to configuration file (.rdomrc.toml/rdom.json/rdom.yaml)"
    )]
    config: Option<PathBuf>,

    /// Fail on the first construct that cannot be modelled
    #[arg(long, global = true)]
    strict: bool,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the model built from a file
    Dump {
        #[arg(help = "Source file")]
        file: PathBuf,
    },

    /// List #region/#endregion groups
    Regions {
        #[arg(help = "Source file")]
        file: PathBuf,
    },

    /// Emit syntax from the model
    Emit {
        #[arg(help = "Source file")]
        file: PathBuf,

        #[arg(long, help = "Overwrite the file instead of printing")]
        write: bool,
    },

    /// Check that emitting and rebuilding preserves the model
    Check {
        #[arg(required = true, help = "Source files")]
        files: Vec<PathBuf>,
    },

    /// Model a single annotation argument, e.g. `Bar: typeof(string)`
    Literal {
        #[arg(help = "Argument text")]
        argument: String,

        #[arg(long, default_value = "Value", help = "Name used for positional arguments")]
        owner: String,
    },
}

fn main() {
    let cli = Cli::parse();

    if !cli.no_color && std::env::var("NO_COLOR").is_err() {
        colored::control::set_override(true);
    } else {
        colored::control::set_override(false);
    }

    let log_level = match cli.verbose {
        0 => "rdom=error,rdom_core=error",
        1 => "rdom=warn,rdom_core=warn",
        2 => "rdom=info,rdom_core=info",
        3 => "rdom=debug,rdom_core=debug",
        _ => "rdom=trace,rdom_core=trace",
    };
    init_tracing_with_default(log_level);

    match run_command(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("rdom failed: {}", e);
            eprintln!("{} {}", "error:".red().bold(), e);
            std::process::exit(2);
        }
    }
}

fn run_command(cli: Cli) -> Result<bool> {
    let options = GlobalOptions {
        config: cli.config,
        strict: cli.strict,
    };

    match cli.command {
        Commands::Dump { file } => commands::dump_command(&file, &options)?,
        Commands::Regions { file } => commands::regions_command(&file, &options)?,
        Commands::Emit { file, write } => commands::emit_command(&file, write, &options)?,
        Commands::Check { files } => return commands::check_command(&files, &options),
        Commands::Literal { argument, owner } => commands::literal_command(&argument, &owner)?,
    }
    Ok(true)
}
