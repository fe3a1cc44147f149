use std::env;

use anyhow::{Context, Result};
use reelspin::{app::App, config::SpinConfig, constants::LOOP_TIME, platform};
use tracing::info;

/// Spins played when `--spins` is not given.
const DEFAULT_SPINS: usize = 5;

/// Runs the reel demo: `reelspin [--spins N]`.
///
/// Tuning is read from `REELS_*` environment variables, verbosity from `RUST_LOG`.
pub fn main() -> Result<()> {
    platform::init_console().context("Could not initialize console")?;

    let spins = parse_spins(env::args().skip(1))?;
    let config = SpinConfig::load().context("Could not load configuration")?;
    let mut app = App::new(config, spins).context("Could not create app")?;

    info!(loop_time = ?LOOP_TIME, spins, "Starting reel loop");
    while app.run()? {}
    info!("All spins played, exiting");

    Ok(())
}

fn parse_spins(mut args: impl Iterator<Item = String>) -> Result<usize> {
    let mut spins = DEFAULT_SPINS;
    while let Some(arg) = args.next() {
        if arg == "--spins" || arg == "-n" {
            let value = args.next().context("--spins requires a value")?;
            spins = value.parse().with_context(|| format!("Invalid spin count: {value}"))?;
        }
    }
    Ok(spins)
}
