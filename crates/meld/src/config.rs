use crate::events::AppEvent;
use crate::sys::action::{ExecAction, ShellCommand};
use async_channel::Sender;
use directories::ProjectDirs;
use metaball::{
    Color, MenuConfig, MenuError, MenuItem, NormalizedPoint, ResolvedConfig, StyleLayer,
    TextStyleLayer,
};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

fn default_item_radius() -> f64 {
    60.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemConfig {
    pub label: String,
    pub x: f64,
    pub y: f64,
    #[serde(default = "default_item_radius")]
    pub radius: f64,
    #[serde(default)]
    pub style: StyleLayer,
    #[serde(default)]
    pub text_style: TextStyleLayer,
    pub exec: Option<ShellCommand>,
}

impl ItemConfig {
    pub fn to_menu_item(&self) -> Result<MenuItem, MenuError> {
        let item = MenuItem::new(
            self.label.as_str(),
            NormalizedPoint::new(self.x, self.y),
            self.radius,
        )?
        .with_style(self.style.clone())
        .with_text_style(self.text_style.clone());

        Ok(match &self.exec {
            Some(exec) => item.with_action(ExecAction::new(exec.clone())),
            None => item,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: i32,
    pub height: i32,
    /// Cover the whole output as a layer-shell overlay instead of opening a
    /// regular window.
    pub overlay: bool,
    pub background: Option<Color>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Meld".to_string(),
            width: 1000,
            height: 800,
            overlay: false,
            background: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub menu: MenuConfig,
    pub window: WindowConfig,
    pub items: Vec<ItemConfig>,
}

impl Config {
    /// Validates the menu settings and builds one [`MenuItem`] per entry.
    pub fn prepare(&self) -> Result<(ResolvedConfig, Vec<MenuItem>), MenuError> {
        let resolved = self.menu.resolve()?;
        let items = self
            .items
            .iter()
            .map(ItemConfig::to_menu_item)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((resolved, items))
    }

    /// [`Config::prepare`], retried with the bundled config and finally with
    /// an empty menu on default styles.
    pub fn prepare_or_default(&self) -> (ResolvedConfig, Vec<MenuItem>) {
        self.prepare()
            .or_else(|e| {
                log::error!("Invalid config, using the bundled one: {}", e);
                default_config().prepare()
            })
            .unwrap_or_else(|e| {
                log::error!("Bundled config is invalid, starting empty: {}", e);
                (ResolvedConfig::default(), Vec::new())
            })
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "meld", "meld").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

/// Reads `path` (optional) with `MELD_*` environment overrides on top, e.g.
/// `MELD_MENU__MAX_DISTANCE=200`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("MELD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn default_config() -> Config {
    match parse_config(DEFAULT_CONFIG) {
        Ok(c) => c,
        Err(e) => {
            log::error!("Bundled config is invalid: {}", e);
            Config::default()
        }
    }
}

/// Reads the config at `path`, or the bundled one if the file does not
/// exist.
pub fn reload(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        load_config_from(path)
    } else {
        log::info!(
            "No config at {}, using defaults (write one with --write-default-config)",
            path.display()
        );
        Ok(default_config())
    }
}

/// Like [`reload`], but a broken file also falls back to the bundled config.
pub fn load_or_default(path: Option<&Path>) -> Config {
    let Some(path) = path else {
        return default_config();
    };

    match reload(path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load {}: {}", path.display(), e);
            default_config()
        }
    }
}

/// Writes the bundled config to `path` unless a file is already there.
/// Returns whether anything was written.
pub fn write_default_config(path: &Path) -> Result<bool, ConfigError> {
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if path.exists() {
        return Ok(false);
    }
    fs_err::write(path, DEFAULT_CONFIG)?;
    Ok(true)
}

pub async fn run_async_watcher(config_path: PathBuf, tx: Sender<AppEvent>) {
    let config_path = match std::path::absolute(&config_path) {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let (config_dir, config_name) = match (config_path.parent(), config_path.file_name()) {
        (Some(dir), Some(name)) => (dir.to_path_buf(), name.to_owned()),
        _ => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }
    log::debug!("Watching {}", config_path.display());

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                // editors often replace the file, so match on the name only
                if meaningful_event
                    && event
                        .paths
                        .iter()
                        .any(|p| p.file_name() == Some(config_name.as_os_str()))
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metaball::style::{FontWeight, Justification};

    #[test]
    fn bundled_config_parses_and_prepares() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.items.len(), 3);
        assert_eq!(config.window.title, "Meld");
        assert!(!config.window.overlay);

        let (resolved, items) = config.prepare().unwrap();
        assert_eq!(resolved.pointer_radius, 50.0);
        assert_eq!(resolved.max_distance, 300.0);
        assert!(items.iter().all(MenuItem::has_action));

        let text = resolved.item_text_style(&TextStyleLayer::default());
        assert_eq!(text.font_weight, FontWeight::Bold);
        assert_eq!(text.font_size, 24.0);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config = parse_config(
            r##"
            [menu.item_text_style]
            justification = "LEFT"

            [[items]]
            label = "solo"
            x = 0.5
            y = 0.5

            [items.style]
            fill_color = "#ff000080"
            "##,
        )
        .unwrap();

        assert_eq!(config.window, WindowConfig::default());
        assert_eq!(config.menu.max_distance, 300.0);
        assert_eq!(config.items[0].radius, 60.0);
        assert!(config.items[0].exec.is_none());

        let (resolved, items) = config.prepare().unwrap();
        assert!(!items[0].has_action());
        let style = resolved.item_style(&items[0].style);
        assert_eq!(style.fill_color, "#ff000080".parse::<Color>().unwrap());
        let text = resolved.item_text_style(&items[0].text_style);
        assert_eq!(text.justification, Justification::Left);
    }

    #[test]
    fn invalid_item_fails_preparation() {
        let config = parse_config(
            r#"
            [[items]]
            label = "bad"
            x = 0.5
            y = 0.5
            radius = -4
            "#,
        )
        .unwrap();
        assert!(matches!(
            config.prepare(),
            Err(MenuError::InvalidItem { .. })
        ));
    }

    #[test]
    fn invalid_config_prepares_the_bundled_menu_instead() {
        let config = parse_config(
            r#"
            [[items]]
            label = "bad"
            x = 0.5
            y = 0.5
            radius = -4
            "#,
        )
        .unwrap();

        let (resolved, items) = config.prepare_or_default();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].label.as_str(), "Terminal");
        assert_eq!(resolved.pointer_radius, 50.0);
    }

    #[test]
    fn environment_overrides_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs_err::write(&path, "[menu]\nhandle_len_rate = 1.5\n").unwrap();

        assert_eq!(load_config_from(&path).unwrap().menu.handle_len_rate, 1.5);

        // no other test reads handle_len_rate through the environment
        unsafe { std::env::set_var("MELD_MENU__HANDLE_LEN_RATE", "3.5") };
        let loaded = load_config_from(&path);
        unsafe { std::env::remove_var("MELD_MENU__HANDLE_LEN_RATE") };

        assert_eq!(loaded.unwrap().menu.handle_len_rate, 3.5);
    }

    #[test]
    fn unknown_color_is_a_parse_error() {
        let result = parse_config(
            r#"
            [menu.item_style]
            fill_color = "not-a-color"
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Config(_))));
    }

    #[test]
    fn missing_file_falls_back_to_bundled_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_or_default(Some(&dir.path().join("absent.toml")));
        assert_eq!(config.items.len(), 3);
    }

    #[test]
    fn reload_reports_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs_err::write(&path, "[menu]\nmax_distance = \"far\"\n").unwrap();

        assert!(reload(&path).is_err());
        assert_eq!(load_or_default(Some(&path)).items.len(), 3);
    }

    #[test]
    fn write_default_config_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        assert!(write_default_config(&path).unwrap());
        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.items.len(), 3);

        fs_err::write(&path, "[window]\ntitle = \"mine\"\n").unwrap();
        assert!(!write_default_config(&path).unwrap());
        assert_eq!(load_or_default(Some(&path)).window.title, "mine");
    }
}
