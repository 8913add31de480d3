pub mod cache;
pub mod catalog;
pub mod commands;
pub mod config;
mod error;
pub mod progress;
pub mod recommend;
pub mod submissions;

use std::io::{BufRead, Write};

use tracing::{info, warn};

pub use commands::{dispatch, handle_line, AppState, Request, Response};
pub use config::Settings;
pub use error::{Result, TrackerError};
pub use progress::{Exercise, Intensity, ProgressStore, UserProgress, WorkoutPlan};

/// Answer one JSON request per input line with one JSON response per output line.
/// Blank lines are skipped and lines that are not UTF-8 get a 400. Returns the
/// number of requests handled.
pub fn serve<R: BufRead, W: Write>(state: &AppState, reader: R, mut writer: W) -> std::io::Result<usize> {
    let mut handled = 0;
    for raw in reader.split(b'\n') {
        let response = match String::from_utf8(raw?) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => handle_line(state, &line),
            Err(e) => {
                warn!("Rejected request that is not valid UTF-8: {}", e);
                Response::error(400, "Invalid request: not valid UTF-8")
            }
        };
        writeln!(writer, "{}", response.to_line())?;
        writer.flush()?;
        handled += 1;
    }
    Ok(handled)
}

pub fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::load()?;
    let state = AppState::open(&settings)?;
    info!(
        "Serving requests on stdin (data file {:?}, listing TTL {}s)",
        state.data_file(),
        settings.listing_ttl_secs
    );

    let stdin = std::io::stdin();
    let handled = serve(&state, stdin.lock(), std::io::stdout().lock())?;
    info!("Input closed after {} requests", handled);
    Ok(())
}
