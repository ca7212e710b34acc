//! Catalog, settings and text input resolution.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use blueprint_kit_lib::{vanilla, Catalog, Settings};

/// Catalog export file used when `--catalog` is not given.
pub const CATALOG_ENV: &str = "BLUEPRINT_KIT_CATALOG";
/// Settings JSON file used when `--settings` is not given.
pub const SETTINGS_ENV: &str = "BLUEPRINT_KIT_SETTINGS";

/// Flag value first, then a non-empty environment variable.
fn resolve_path(flag: Option<&Path>, env_key: &str) -> Option<PathBuf> {
    flag.map(Path::to_path_buf).or_else(|| {
        std::env::var_os(env_key)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    })
}

/// Load the catalog named by the flag or environment, else the embedded vanilla one.
pub fn load_catalog(flag: Option<&Path>) -> Result<Arc<Catalog>> {
    match resolve_path(flag, CATALOG_ENV) {
        Some(path) => {
            let catalog = Catalog::from_path(&path)
                .with_context(|| format!("failed to load catalog from {}", path.display()))?;
            Ok(Arc::new(catalog))
        }
        None => {
            debug!("using embedded vanilla catalog");
            vanilla::catalog().context("failed to load the embedded vanilla catalog")
        }
    }
}

/// Load settings named by the flag or environment, else the defaults.
pub fn load_settings(flag: Option<&Path>) -> Result<Settings> {
    match resolve_path(flag, SETTINGS_ENV) {
        Some(path) => Settings::from_path(&path)
            .with_context(|| format!("failed to load settings from {}", path.display())),
        None => Ok(Settings::default()),
    }
}

/// Read a whole file, or stdin when no path is given.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}

/// Write `text` to a file, or print it when no path is given.
pub fn write_output(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
        }
        None => {
            println!("{}", text);
            Ok(())
        }
    }
}
