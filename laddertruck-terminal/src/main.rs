/// Laddertruck Terminal - ladder truck viewer
///
/// Renders the articulated fire truck in four orthographic views.
/// Controls:
///   - h: Show or hide the key list
///   - Scroll wheel: Zoom
///   - Esc / Ctrl-C: Quit

use anyhow::{Context, Result};
use laddertruck_terminal::{logging, Config, TerminalApp};
use tracing::info;

fn main() -> Result<()> {
    let config = Config::from_env()?;
    logging::init(&config.log_path)?;
    info!(?config, "starting laddertruck terminal");

    let mut app = TerminalApp::new(&config).context("failed to start the terminal viewer")?;
    app.run()?;

    println!("Thank you for using Laddertruck!");
    Ok(())
}
