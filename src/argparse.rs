use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub fn parse() -> Cli {
    Cli::parse()
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Turn console debugging information on
    #[arg(short, long)]
    pub console: bool,

    /// Log to a file
    #[arg(short, long, value_name = "FILE", default_value = "invernadero.log")]
    pub log_file: PathBuf,

    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the ingestion and dashboard web service
    Serve {
        /// Address and port to listen on
        #[arg(short, long, value_name = "ADDR:PORT", default_value = "0.0.0.0:5000")]
        listen: String,
    },

    /// Send synthetic sensor readings to the web service
    Send {
        /// Ingestion endpoint URL
        #[arg(
            short,
            long,
            value_name = "URL",
            default_value = "http://localhost:5000/lectura"
        )]
        url: String,

        /// Number of readings to send
        #[arg(short, long, default_value_t = 10)]
        count: usize,

        /// Seconds to wait between readings
        #[arg(short, long, value_name = "SECONDS", default_value_t = 1)]
        interval: u64,
    },
}
