mod api;
mod app;
mod cache;
mod commands;
mod config;
mod db;
mod event;
mod guard;
mod logging;
mod query;
mod session;
mod store;
mod ui;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "d9s")]
#[command(about = "A terminal admin dashboard for users and products, inspired by k9s")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/d9s/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// API base URL, overriding the config file
  #[arg(long)]
  base_url: Option<String>,

  /// Forget the stored session and exit
  #[arg(long)]
  logout: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  let _log_guard = logging::init()?;

  let mut config = config::Config::load(args.config.as_deref())?;
  if let Some(base_url) = args.base_url {
    config.api.base_url = base_url;
  }

  if args.logout {
    session::SessionStorage::open()?.clear()?;
    println!("Signed out.");
    return Ok(());
  }

  info!(base_url = %config.api.base_url, "starting d9s");

  let mut app = app::App::new(config)?;
  app.run().await?;

  Ok(())
}
