use clap::Parser;
use meld::config::{self, ConfigError};
use meld::gui::app::{AppInit, AppModel};
use meld::sys::runtime;
use relm4::prelude::*;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "meld", version, about, long_about = None)]
struct Cli {
    /// Config file to use instead of the per-user one
    #[arg(short = 'c', long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write the bundled config to the config path (if absent) and exit
    #[arg(long)]
    write_default_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => Some(path),
        None => config::get_config_path()
            .inspect_err(|e| log::warn!("{}", e))
            .ok(),
    };

    if cli.write_default_config {
        let path = config_path.ok_or(ConfigError::ConfigDirNotFound)?;
        if config::write_default_config(&path)? {
            println!("Wrote {}", path.display());
        } else {
            println!("{} already exists, leaving it alone", path.display());
        }
        return Ok(());
    }

    let config = config::load_or_default(config_path.as_deref());

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(config_path.clone(), tx);

    // GTK must not see our own flags
    let app = RelmApp::new("org.meld.meld").with_args(Vec::new());

    app.run::<AppModel>(AppInit {
        config,
        config_path,
        events: rx,
    });
    Ok(())
}
