use anyhow::Result;
use clap::Parser;
use slides_translate::app::{self, Outcome};
use slides_translate::config::{Args, Config};
use slides_translate::error::Error;
use slides_translate::logging;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    // Held until exit so buffered file output is flushed
    let _log_guard = logging::init(args.log_level, args.log_file())?;

    info!("Starting slides-translate");

    // Credentials and language codes are checked before any network access
    let config = Config::load(args)?;
    let http = reqwest::Client::new();

    match app::run(&config, http).await {
        Ok(Outcome::Applied(response)) => {
            info!(
                "Translation applied to presentation {}",
                response.presentation_id
            );
            Ok(())
        }
        Ok(Outcome::Planned(operations)) => {
            info!("Dry run finished with {} planned replacements", operations.len());
            Ok(())
        }
        Err(e) => {
            if matches!(e.downcast_ref::<Error>(), Some(Error::NoOperations)) {
                error!("No text replacements found.");
            } else {
                error!("Translation failed: {:#}", e);
            }
            Err(e)
        }
    }
}
