mod app;
mod camera;
mod clipboard;
mod config;
mod decoder;
mod download;
mod errors;
mod generator;
mod input;
mod messages;
mod services;
mod still_image;
mod view;

#[cfg(test)]
mod test_support;

use app::App;
use config::Config;

use anyhow::Result;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they don't interleave with the rendered screen
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    tracing::info!("Starting qrdesk QR code generator & scanner");

    let config = Config::load()?;
    config.validate()?;

    // LocalSet for !Send futures (needed for Scanner which holds the camera stream)
    let local = tokio::task::LocalSet::new();

    local.run_until(async move { run_app(config).await }).await
}

async fn run_app(config: Config) -> Result<()> {
    let (action_tx, action_rx) = mpsc::channel(10);
    input::spawn_stdin_reader(action_tx);
    eprintln!("{}", input::HELP);

    App::new(config)?.run(action_rx).await
}
