//! CLI module for the Bookrec API
//!
//! Subcommands:
//! - `serve`: run the HTTP + WebSocket server
//! - `seed`: load books into the catalog from a JSON file

pub mod seed;
pub mod serve;

use clap::{Parser, Subcommand};

/// Bookrec - book recommendation API
#[derive(Parser)]
#[command(name = "bookrec")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve,

    /// Load books into the catalog from a JSON file
    Seed(seed::SeedArgs),
}
