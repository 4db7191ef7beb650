//! # seqxml
//!
//! A command-line tool for inspecting, validating and converting SeqXML files.
//!
//! ## Usage
//!
//! ```bash
//! # Show document metadata and record statistics
//! seqxml info sequences.xml
//!
//! # Check that every record parses
//! seqxml validate sequences.xml.gz
//!
//! # Rewrite any supported version as SeqXML 0.4
//! seqxml convert old.xml new.xml --source UniProt --indent 2
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
