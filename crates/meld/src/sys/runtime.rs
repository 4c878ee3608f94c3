use crate::events::AppEvent;
use async_channel::Sender;
use std::path::PathBuf;
use std::thread;
use tokio::runtime::Runtime;

/// Runs the config watcher on its own tokio runtime. Without a config path
/// there is nothing to watch.
pub fn start_background_services(config_path: Option<PathBuf>, tx: Sender<AppEvent>) {
    let Some(config_path) = config_path else {
        log::warn!("No config path, hot reload disabled");
        return;
    };

    thread::spawn(move || {
        let rt = match Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                log::error!("Failed to create Tokio runtime: {}", e);
                return;
            }
        };

        rt.block_on(async {
            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::config::run_async_watcher(config_path, tx).await;
                });
            }

            std::future::pending::<()>().await;
        });
    });
}
