// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! Argument parsing for the `praxis` binary, mirroring the shape of the
//! teacher's `clap`-derived `Cli`/`Commands` (trimmed to this runtime's three
//! operations: run a DSL file once, validate one without executing it, or
//! join the P2P network and serve).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "praxis", about = "Peer-to-peer agent runtime", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the TOML config file (defaults built in if omitted).
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v = debug, -vv = trace).
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Tokenize, parse, and execute a DSL file, printing the result as JSON.
    Run {
        /// Path to the DSL script to run.
        file: PathBuf,
    },

    /// Start the P2P node (mDNS discovery, card/tool/RPC protocols) and
    /// block until interrupted.
    Serve,

    /// Parse a DSL file and report whether it is well-formed, without
    /// executing it. Exits non-zero on a parse error.
    Validate {
        /// Path to the DSL script to validate.
        file: PathBuf,
    },
}
