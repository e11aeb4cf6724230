// Label defaults persisted as TOML in the platform config directory

use crate::errors::ConfigError;
use crate::layout::{LineBreakMode, TextAlign};
use crate::opener::DEFAULT_SCHEMES;
use crate::registry::RangePolicy;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

const QUALIFIER: &str = "net.roblillack";
const ORGANIZATION: &str = "LinkedLabel";
const APPLICATION: &str = "linked-label";
const CONFIG_FILE_NAME: &str = "linked_label.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub text_size: u8,
    pub text_font: u8,
    /// RGBA, as FLTK packs it.
    pub link_color: u32,
    pub underline_links: bool,
    pub line_break_mode: LineBreakMode,
    /// 0 means unlimited.
    pub number_of_lines: usize,
    pub alignment: TextAlign,
    pub range_policy: RangePolicy,
    pub openable_schemes: Vec<String>,
}

impl Default for LabelConfig {
    fn default() -> Self {
        LabelConfig {
            text_size: 14,
            text_font: 0,
            link_color: 0x0000_FFFF,
            underline_links: true,
            line_break_mode: LineBreakMode::WordWrap,
            number_of_lines: 0,
            alignment: TextAlign::Left,
            range_policy: RangePolicy::Clamp,
            openable_schemes: DEFAULT_SCHEMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

pub fn config_file_path() -> Option<PathBuf> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

pub fn load_config(path: &Path) -> Result<LabelConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the config from the default location. A missing file silently yields
/// the defaults; an unreadable or malformed one is logged first.
pub fn load_or_default() -> LabelConfig {
    let Some(path) = config_file_path() else {
        return LabelConfig::default();
    };
    load_or_default_from(&path)
}

pub fn load_or_default_from(path: &Path) -> LabelConfig {
    match load_config(path) {
        Ok(config) => config,
        Err(ConfigError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
            LabelConfig::default()
        }
        Err(err) => {
            tracing::warn!("{err}; using default label settings");
            LabelConfig::default()
        }
    }
}

pub fn save_config(path: &Path, config: &LabelConfig) -> Result<(), ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let toml = toml::to_string_pretty(config)?;
    fs::write(path, toml).map_err(io_err)
}
