//! Directory loading from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{CoreError, CoreResult};

use super::types::{Directory, Settings, SitesFile, WorkersFile};

/// Loads the runtime directory from a configuration directory.
///
/// # Directory Structure
///
/// ```text
/// config/fieldops/
/// ├── workers.yaml    # worker profiles (name, email, hourly rate)
/// ├── sites.yaml      # buildings and work orders
/// └── settings.yaml   # engine settings (optional)
/// ```
#[derive(Debug)]
pub struct DirectoryLoader;

impl DirectoryLoader {
    /// Loads the directory from the specified path.
    ///
    /// `settings.yaml` is optional; defaults apply when it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ConfigNotFound`] when a required file is
    /// missing and [`CoreError::ConfigParse`] when a file contains invalid
    /// YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> CoreResult<Directory> {
        let path = path.as_ref();

        let workers: WorkersFile = Self::load_yaml(&path.join("workers.yaml"))?;
        let sites: SitesFile = Self::load_yaml(&path.join("sites.yaml"))?;

        let settings_path = path.join("settings.yaml");
        let settings = if settings_path.exists() {
            Self::load_yaml::<Settings>(&settings_path)?
        } else {
            Settings::default()
        };

        Ok(Directory::new(
            workers.workers,
            sites.buildings,
            sites.work_orders,
            settings,
        ))
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> CoreResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| CoreError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParse {
            path: path_str,
            message: e.to_string(),
        })
    }
}
