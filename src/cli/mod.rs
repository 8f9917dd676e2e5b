//! CLI module for the Admin Console

pub mod serve;

use clap::{Parser, Subcommand};

/// Admin Console - account, session and team administration
#[derive(Parser)]
#[command(name = "admin-console")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,
}
