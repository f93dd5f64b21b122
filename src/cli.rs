use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "menuql")]
#[command(author, version, about = "Menu catalogue served over an object-query layer")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Start {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run an object query and print the results
    Query {
        /// Query text, e.g. "SELECT m FROM Menu m WHERE m.menuCode = 7"
        #[arg(required = true)]
        oql: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Run against a fresh in-memory database seeded with fixtures
        #[arg(long)]
        memory: bool,

        /// Print the generated SQL instead of running the query
        #[arg(long)]
        explain: bool,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
