//! Configuration provider and menu source resolver: the baseline menu from
//! a TOML config file, named menus from `menus/*.json`, plus a filesystem
//! watcher that feeds reload events into the driver loop.

use crate::events::AppEvent;
use async_channel::Sender;
use directories::ProjectDirs;
use gyre_core::menu::{ActionDescriptor, MenuConfiguration, MenuItem, MenuName};
use gyre_core::schema::{AppearanceOverride, BehaviorOverride, ItemDefinition, MenuDefinition, SCHEMA_VERSION};
use gyre_core::source::{MenuSource, MenuSourceResolver, SourceError};
use gyre_core::lifecycle::NavigationContext;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::RwLock;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Named menus the navigation contexts map onto.
pub const APP_CONTEXT_MENU: &str = "app";
pub const TASK_SWITCHER_MENU: &str = "task-switcher";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to determine config directory")]
    ConfigDirNotFound,
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("config defines no menu items")]
    NoItems,
    #[error("notify error: {0}")]
    Notify(#[from] notify::Error),
}

#[derive(Debug, Clone)]
pub struct Paths {
    pub config_path: PathBuf,
    pub menus_dir: PathBuf,
}

impl Paths {
    pub fn discover() -> Result<Self, ConfigError> {
        let proj_dirs =
            ProjectDirs::from("org", "troia", "gyre").ok_or(ConfigError::ConfigDirNotFound)?;
        Ok(Self {
            config_path: proj_dirs.config_dir().join("config.toml"),
            menus_dir: proj_dirs.config_dir().join("menus"),
        })
    }
}

/// The TOML surface of the config file: the same record as a serialized
/// menu definition, with every section optional.
#[derive(Debug, Clone, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    name: Option<MenuName>,
    #[serde(default)]
    center_title: Option<String>,
    #[serde(default)]
    items: Vec<ItemDefinition>,
    #[serde(default)]
    appearance: Option<AppearanceOverride>,
    #[serde(default)]
    behavior: Option<BehaviorOverride>,
}

pub fn load_config(paths: &Paths) -> Result<MenuConfiguration, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from(paths.config_path.clone()).required(false))
        .add_source(config::Environment::with_prefix("GYRE"))
        .build()?;

    let raw: RawConfig = s.try_deserialize()?;
    if raw.items.is_empty() {
        return Err(ConfigError::NoItems);
    }

    let definition = MenuDefinition {
        version: SCHEMA_VERSION,
        name: raw.name,
        description: None,
        center_title: raw.center_title,
        items: raw.items,
        appearance: raw.appearance,
        behavior: raw.behavior,
    };
    Ok(definition.into_configuration(&MenuConfiguration::new(Vec::new())))
}

/// Load the baseline, falling back to a one-item setup menu that opens the
/// config file when nothing usable is on disk.
pub fn load_or_setup(paths: &Paths) -> MenuConfiguration {
    match load_config(paths) {
        Ok(config) => config,
        Err(err) => {
            log::warn!("using setup menu, config unavailable: {err}");
            setup_menu(paths)
        }
    }
}

fn setup_menu(paths: &Paths) -> MenuConfiguration {
    let mut item = MenuItem::new(
        "settings",
        "Settings",
        ActionDescriptor::Launch { path: paths.config_path.display().to_string() },
    );
    item.icon = gyre_core::icon::IconName::new("preferences-system");
    MenuConfiguration::new(vec![item])
}

pub fn write_default_config(paths: &Paths) -> std::io::Result<PathBuf> {
    if let Some(parent) = paths.config_path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    fs_err::create_dir_all(&paths.menus_dir)?;
    if !paths.config_path.exists() {
        fs_err::write(&paths.config_path, DEFAULT_CONFIG)?;
    }
    Ok(paths.config_path.clone())
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

/// Resolves abstract menu sources against the config directory. Shared
/// between the driver loop and the socket tasks, hence the lock around the
/// baseline snapshot.
pub struct FsMenuResolver {
    baseline: RwLock<MenuConfiguration>,
    menus_dir: PathBuf,
}

impl FsMenuResolver {
    pub fn new(baseline: MenuConfiguration, menus_dir: PathBuf) -> Self {
        Self { baseline: RwLock::new(baseline), menus_dir }
    }

    pub fn baseline(&self) -> MenuConfiguration {
        self.baseline.read().clone()
    }

    pub fn set_baseline(&self, config: MenuConfiguration) {
        *self.baseline.write() = config;
    }

    pub fn resolve_context(
        &self,
        context: NavigationContext,
    ) -> Result<MenuConfiguration, SourceError> {
        match context {
            NavigationContext::Default => Ok(self.baseline()),
            NavigationContext::Application => {
                self.resolve(&MenuSource::Named(MenuName::new(APP_CONTEXT_MENU)))
            }
            NavigationContext::TaskSwitcher => {
                self.resolve(&MenuSource::Named(MenuName::new(TASK_SWITCHER_MENU)))
            }
        }
    }

    fn from_file(&self, path: &Path) -> Result<MenuConfiguration, SourceError> {
        let json = fs_err::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SourceError::NotFound(path.display().to_string())
            } else {
                SourceError::Unreadable(e.to_string())
            }
        })?;
        self.from_json(&json)
    }

    fn from_json(&self, json: &str) -> Result<MenuConfiguration, SourceError> {
        let definition = MenuDefinition::parse(json)?;
        Ok(definition.into_configuration(&self.baseline.read()))
    }
}

impl MenuSourceResolver for FsMenuResolver {
    fn resolve(&self, source: &MenuSource) -> Result<MenuConfiguration, SourceError> {
        match source {
            MenuSource::Default => Ok(self.baseline()),
            MenuSource::Named(name) => {
                self.from_file(&self.menus_dir.join(format!("{name}.json")))
            }
            MenuSource::File(path) => self.from_file(path),
            MenuSource::Inline(json) => self.from_json(json),
        }
    }

    fn named_menus(&self) -> Vec<MenuName> {
        let Ok(read_dir) = fs_err::read_dir(&self.menus_dir) else {
            return Vec::new();
        };
        let mut names: Vec<MenuName> = read_dir
            .flatten()
            .filter_map(|entry| {
                let path = entry.path();
                (path.extension().and_then(|s| s.to_str()) == Some("json"))
                    .then(|| path.file_stem().and_then(|s| s.to_str()).map(MenuName::new))
                    .flatten()
            })
            .collect();
        names.sort();
        names
    }
}

/// Watch the config directory (config file and named menus alike) and emit
/// a reload event on any meaningful change.
pub async fn run_async_watcher(paths: Paths, tx: Sender<AppEvent>) {
    let Some(config_dir) = paths.config_path.parent().map(Path::to_path_buf) else {
        return;
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("failed to create config directory for watching: {e}");
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
            log::error!("failed to create watcher: {e}");
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::Recursive) {
        log::error!("failed to watch config directory: {e}");
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );
                let relevant = event.paths.iter().any(|p| {
                    p == &paths.config_path || p.starts_with(&paths.menus_dir)
                });

                if meaningful && relevant && tx.send(AppEvent::ConfigReload).await.is_err() {
                    break;
                }
            }
            Err(e) => log::error!("watch error: {e}"),
        }
    }
}
