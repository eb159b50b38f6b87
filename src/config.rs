use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::error::Error;

/// Setting that points at an alternate language server jar.
///
/// The key keeps the spelling the published extension has always used, so
/// existing user settings keep working.
pub const SERVER_PATH_SETTING: &str = "xml.laguageServerPath";

/// Returns the path to the data directory for xml-client.
/// Uses $XDG_DATA_HOME/xml-client if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/xml-client,
/// or ./xml-client if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join(LOG_FILE_NAME)
}

pub(crate) const LOG_FILE_NAME: &str = "xml-client.log";

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("xml-client")
}

/// User settings read once at activation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Settings {
    #[serde(rename = "xml.laguageServerPath", default)]
    pub language_server_path: Option<String>,
}

impl Settings {
    /// Builds settings from the value the host reports for [`SERVER_PATH_SETTING`].
    ///
    /// Anything other than a string (including `null`) counts as "not configured".
    pub fn from_server_path_value(value: Option<Value>) -> Self {
        let language_server_path = match value {
            Some(Value::String(path)) => Some(path),
            _ => None,
        };
        Self {
            language_server_path,
        }
    }

    /// Reads a flat JSON settings file such as an editor's `settings.json`.
    /// Unrelated keys are ignored.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| Error::Settings {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}
