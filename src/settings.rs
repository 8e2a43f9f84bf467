use log::{LevelFilter, debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, RwLock};

use crate::pdf::{DocumentOptions, OutlineOptions, RasterOptions, Rgba};
use crate::text_buffer::DEFAULT_CHUNK_SIZE;
use crate::viewport::ViewerGeometry;

const SETTINGS_FILENAME: &str = "config.yaml";
const APP_NAME: &str = "pdfpane";

/// Continuous viewer layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    pub window_width: u32,
    pub window_height: u32,
    /// Page width as a percentage of page height
    pub aspect_percent: u32,
    /// Horizontal inset in page units; the viewer renders with it negated
    pub x_offset: i32,
    pub page_gap: u32,
    pub scroll_step: u32,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            window_width: 1750,
            window_height: 1600,
            aspect_percent: 72,
            x_offset: 46,
            page_gap: 30,
            scroll_step: 200,
        }
    }
}

impl ViewerSettings {
    pub fn geometry(&self) -> ViewerGeometry {
        ViewerGeometry::new(
            self.window_width,
            self.window_height,
            self.aspect_percent,
            self.page_gap,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub background: Rgba,

    #[serde(default = "default_chunk_size")]
    pub text_chunk_size: usize,

    /// Byte budget per outline line; unlimited when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toc_line_limit: Option<usize>,

    #[serde(default = "default_search_hit_max")]
    pub search_hit_max: u32,

    #[serde(default)]
    pub viewer: ViewerSettings,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_search_hit_max() -> u32 {
    512
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            background: Rgba::default(),
            text_chunk_size: default_chunk_size(),
            toc_line_limit: None,
            search_hit_max: default_search_hit_max(),
            viewer: ViewerSettings::default(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    pub fn document_options(&self) -> DocumentOptions {
        DocumentOptions {
            raster: RasterOptions {
                background: self.background,
            },
            outline: OutlineOptions {
                chunk_size: self.text_chunk_size,
                line_limit: self.toc_line_limit,
            },
            text_chunk_size: self.text_chunk_size,
        }
    }

    /// Parsed `log_level`, falling back to `Info` for unknown names
    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or_else(|_| {
            warn!("Unknown log level {:?}, using info", self.log_level);
            LevelFilter::Info
        })
    }
}

static SETTINGS: LazyLock<RwLock<Settings>> = LazyLock::new(|| RwLock::new(Settings::default()));

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|config| config.join(APP_NAME).join(SETTINGS_FILENAME))
}

/// Load settings from `path_override` or the default location into the
/// process-wide store. A missing default file is created with defaults.
pub fn load_settings(path_override: Option<&Path>) {
    if let Some(path) = path_override {
        if let Some(settings) = read_settings_file(path) {
            store(settings);
        }
        return;
    }

    let Some(path) = default_config_path() else {
        warn!("Could not determine config directory, using default settings");
        return;
    };
    if path.exists() {
        if let Some(settings) = read_settings_file(&path) {
            store(settings);
        }
    } else {
        info!("Settings file not found, creating with defaults at {path:?}");
        save_settings_to_file(&Settings::default(), &path);
    }
}

fn store(settings: Settings) {
    if let Ok(mut global) = SETTINGS.write() {
        *global = settings;
    }
}

/// Parse one settings file. Unreadable or invalid files are logged and
/// yield `None`.
pub fn read_settings_file(path: &Path) -> Option<Settings> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            error!("Failed to read settings file {path:?}: {e}");
            return None;
        }
    };

    match serde_yaml::from_str::<Settings>(&content) {
        Ok(settings) => {
            debug!("Loaded settings from {path:?}");
            Some(settings)
        }
        Err(e) => {
            error!("Failed to parse settings file {path:?}: {e}");
            None
        }
    }
}

pub fn save_settings_to_file(settings: &Settings, path: &Path) {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory {parent:?}: {e}");
                return;
            }
        }
    }

    let body = match serde_yaml::to_string(settings) {
        Ok(body) => body,
        Err(e) => {
            error!("Failed to serialize settings: {e}");
            return;
        }
    };

    match fs::write(path, format!("{SETTINGS_HEADER}{body}")) {
        Ok(()) => debug!("Saved settings to {path:?}"),
        Err(e) => error!("Failed to save settings to {path:?}: {e}"),
    }
}

const SETTINGS_HEADER: &str = r"# pdfpane settings
#
# background:      RGBA painted under every page
# text_chunk_size: growth step of outline/search text buffers
# toc_line_limit:  optional byte cap per outline line
# viewer:          continuous strip layout used by `pdfpane strip`

";

/// Snapshot of the current settings
pub fn current() -> Settings {
    SETTINGS
        .read()
        .map(|s| s.clone())
        .unwrap_or_default()
}
