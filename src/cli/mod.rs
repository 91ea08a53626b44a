// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the sieve command-line interface.
//!
//! Three subcommands: `inspect` to examine `.sieve` files, `search` to query
//! them, and `split` to separate an embedded module from the index data.

pub mod display;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "sieve",
    about = "Inspect and query .sieve search indexes",
    version
)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the header, section sizes and compressibility of a .sieve file
    Inspect {
        /// Path to .sieve file
        file: PathBuf,
    },

    /// Search a .sieve file and display results
    Search {
        /// Path to .sieve file
        file: PathBuf,

        /// Search query
        query: String,

        /// Maximum number of results to return (0 = default)
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Skip the fuzzy tier
        #[arg(long)]
        no_fuzzy: bool,

        /// Skip the prefix tier
        #[arg(long)]
        no_prefix: bool,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the index data and the embedded module to separate files
    Split {
        /// Path to .sieve file
        file: PathBuf,

        /// Output path for the index without the module
        #[arg(long)]
        index: PathBuf,

        /// Output path for the module bytes
        #[arg(long)]
        module: PathBuf,
    },
}
