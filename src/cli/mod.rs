//! CLI module

pub mod serve;

use clap::{Parser, Subcommand};

/// cacheside - cache-aside HTTP service backed by Redis
#[derive(Parser)]
#[command(name = "cacheside")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,
}
