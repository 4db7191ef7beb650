use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod convert;
mod info;
mod validate;

pub use config::Config;

/// seqxml - SeqXML inspection and conversion tool
#[derive(Parser)]
#[command(name = "seqxml")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display document metadata and record statistics
    Info {
        /// Input SeqXML file path (.gz is decompressed)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Parse every record and report the first error
    Validate {
        /// Input SeqXML file path (.gz is decompressed)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Rewrite a SeqXML file of any supported version as SeqXML 0.4
    Convert {
        /// Input SeqXML file path (.gz is decompressed)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output SeqXML file path
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        #[command(flatten)]
        overrides: convert::DocumentOverrides,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Info { file, config } => info::run(file, Config::load(config.as_deref())?),
        Commands::Validate { file, config } => {
            validate::run(file, Config::load(config.as_deref())?)
        }
        Commands::Convert {
            input,
            output,
            config,
            overrides,
        } => convert::run(input, output, Config::load(config.as_deref())?, overrides),
    }
}
