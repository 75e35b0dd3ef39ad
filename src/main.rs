use crate::argparse::Commands;
use anyhow::Result;
use invernadero::{sender, server, storage};
use std::time::Duration;
use tracing::Level;
// Include these modules as part of the binary crate, not the library crate
// as this contains the actual implementation of the logging facility
mod argparse;
mod logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = argparse::parse();

    let g_level = match cli.verbose {
        0 => Level::ERROR,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };

    let _guards = logging::init(g_level, cli.console, Some(cli.log_file));

    match cli.command {
        Commands::Serve { listen } => {
            let settings = invernadero::get_storage_settings();
            let storage = storage::Storage::new(&settings.url, &settings.api_key)?;
            server::serve(&listen, storage).await?;
        }
        Commands::Send {
            url,
            count,
            interval,
        } => {
            sender::run(&url, count, Duration::from_secs(interval)).await?;
        }
    }
    Ok(())
}
