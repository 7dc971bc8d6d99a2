//! On-disk settings and session storage.
//!
//! Everything lives in one TOML file, `<config dir>/corral/session.toml`, where
//! the config dir comes from `dirs::config_dir()` unless `CORRAL_CONFIG_DIR`
//! points elsewhere:
//!
//! ```toml
//! api_url = "https://ledger.example.com/api"
//!
//! [session]
//! access_token = "..."
//! current_user = "{...}"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use anyhow::{Context as _, Result};
use corral_business::{TokenStore, TokenStoreError};
use serde::{Deserialize, Serialize};

const CONFIG_DIR_ENV: &str = "CORRAL_CONFIG_DIR";
const FILE_NAME: &str = "session.toml";

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsFile {
    /// Base URL used when neither `--api-url` nor `CORRAL_API_URL` is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(default)]
    pub session: BTreeMap<String, String>,
}

impl SettingsFile {
    /// `$CORRAL_CONFIG_DIR/session.toml`, or `<config dir>/corral/session.toml`.
    pub fn default_path() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir).join(FILE_NAME));
        }
        let base = dirs::config_dir().context("Could not find the configuration directory")?;
        Ok(base.join("corral").join(FILE_NAME))
    }

    /// A missing file reads as the default settings.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize settings")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }
}

/// [`TokenStore`] backed by the `[session]` table of the settings file.
///
/// Every write rewrites the whole file.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    settings: Mutex<SettingsFile>,
}

impl FileTokenStore {
    pub fn open(path: PathBuf) -> Result<Self> {
        let settings = SettingsFile::load(&path)?;
        Ok(Self {
            path,
            settings: Mutex::new(settings),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn api_url(&self) -> Option<String> {
        self.lock().api_url.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SettingsFile> {
        self.settings.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self, change: impl FnOnce(&mut SettingsFile)) -> Result<(), TokenStoreError> {
        let mut settings = self.lock();
        change(&mut settings);
        settings
            .save(&self.path)
            .map_err(|e| TokenStoreError(format!("{e:#}")))
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().session.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), TokenStoreError> {
        self.write(|s| {
            s.session.insert(key.to_owned(), value.to_owned());
        })
    }

    fn remove(&self, key: &str) -> Result<(), TokenStoreError> {
        if self.lock().session.contains_key(key) {
            self.write(|s| {
                s.session.remove(key);
            })
        } else {
            Ok(())
        }
    }
}
