//! Per-configuration YAML registry.
//!
//! # Storage layout
//!
//! ```text
//! ~/.tether/
//!   configurations/
//!     <configuration_name>.yaml   (one file per configuration — mode 0600)
//! ```
//!
//! # API pattern
//!
//! Every function touching the registry has two forms:
//! - `fn_at(home: &Path, …)` — explicit home; used in tests with `TempDir`
//! - `fn(…)` — derives home from `dirs::home_dir()`, delegates to `_at`
//!
//! Tests must NEVER call the no-arg wrappers; always use `_at`.

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::error::RegistryError;
use crate::types::{Configuration, ConfigurationName};

// ---------------------------------------------------------------------------
// 1. Path helpers
// ---------------------------------------------------------------------------

/// `<home>/.tether/configurations/`
///
/// Creates the directory (mode `0700`) if it does not yet exist.
pub fn configurations_dir_at(home: &Path) -> Result<PathBuf, RegistryError> {
    let dir = home.join(".tether").join("configurations");
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
        set_dir_permissions(&dir)?;
    }
    Ok(dir)
}

/// `<home>/.tether/configurations/<name>.yaml` — pure, no I/O.
pub fn configuration_path_at(home: &Path, name: &ConfigurationName) -> PathBuf {
    home.join(".tether")
        .join("configurations")
        .join(format!("{}.yaml", name.0))
}

// ---------------------------------------------------------------------------
// 2. Load
// ---------------------------------------------------------------------------

/// Load a single configuration from `<home>/.tether/configurations/<name>.yaml`.
///
/// Returns `RegistryError::ConfigurationNotFound` if absent,
/// `RegistryError::Parse` (with path + line context) if malformed YAML.
pub fn load_configuration_at(
    home: &Path,
    name: &ConfigurationName,
) -> Result<Configuration, RegistryError> {
    let path = configuration_path_at(home, name);
    if !path.exists() {
        return Err(RegistryError::ConfigurationNotFound { path });
    }
    let contents = std::fs::read_to_string(&path)?;
    serde_yaml::from_str(&contents).map_err(|e| RegistryError::Parse { path, source: e })
}

/// `load_configuration_at` convenience wrapper.
pub fn load_configuration(name: &ConfigurationName) -> Result<Configuration, RegistryError> {
    load_configuration_at(&home()?, name)
}

/// Walk `<home>/.tether/configurations/*.yaml` and return every registered
/// configuration, sorted by name.
pub fn list_configurations_at(home: &Path) -> Result<Vec<Configuration>, RegistryError> {
    let dir = home.join(".tether").join("configurations");
    if !dir.exists() {
        return Ok(vec![]);
    }

    let mut entries: Vec<_> = std::fs::read_dir(&dir)?.filter_map(|e| e.ok()).collect();
    entries.sort_by_key(|e| e.file_name());

    let mut result = Vec::new();
    for entry in entries {
        let fname = entry.file_name();
        let name = fname.to_string_lossy();
        if !name.ends_with(".yaml") {
            continue;
        }
        let contents = std::fs::read_to_string(entry.path())?;
        let configuration: Configuration = serde_yaml::from_str(&contents).map_err(|e| {
            RegistryError::Parse {
                path: entry.path(),
                source: e,
            }
        })?;
        result.push(configuration);
    }
    result.sort_by(|a, b| a.name.0.cmp(&b.name.0));
    Ok(result)
}

/// `list_configurations_at` convenience wrapper.
pub fn list_configurations() -> Result<Vec<Configuration>, RegistryError> {
    list_configurations_at(&home()?)
}

// ---------------------------------------------------------------------------
// 3. Save (atomic)
// ---------------------------------------------------------------------------

/// Atomically save a configuration to `<home>/.tether/configurations/<name>.yaml`.
///
/// Write flow: serialize → `.yaml.tmp` sibling → `chmod 0600` → `rename`.
/// `.tmp` is always in the same directory as the target (same filesystem — no EXDEV on macOS).
pub fn save_configuration_at(
    home: &Path,
    configuration: &Configuration,
) -> Result<(), RegistryError> {
    configurations_dir_at(home)?; // create dir + 0700 if absent
    let path = configuration_path_at(home, &configuration.name);
    let tmp_path = path.with_file_name(format!("{}.yaml.tmp", configuration.name.0));

    let yaml = serde_yaml::to_string(configuration)?;
    std::fs::write(&tmp_path, yaml)?;
    set_file_permissions(&tmp_path)?;
    std::fs::rename(&tmp_path, &path)?;
    Ok(())
}

/// `save_configuration_at` convenience wrapper.
pub fn save_configuration(configuration: &Configuration) -> Result<(), RegistryError> {
    save_configuration_at(&home()?, configuration)
}

// ---------------------------------------------------------------------------
// 4. Define
// ---------------------------------------------------------------------------

/// Register a configuration named `name`.
///
/// Creates `<home>/.tether/configurations/<name>.yaml`.
/// Idempotent: if the file already exists, loads and returns it unchanged.
pub fn define_at(
    home: &Path,
    name: ConfigurationName,
    description: Option<String>,
) -> Result<Configuration, RegistryError> {
    let yaml_path = configuration_path_at(home, &name);
    if yaml_path.exists() {
        return load_configuration_at(home, &name);
    }

    let now = Utc::now();
    let configuration = Configuration {
        name,
        description,
        created_at: now,
        updated_at: now,
    };

    save_configuration_at(home, &configuration)?;
    Ok(configuration)
}

/// `define_at` convenience wrapper.
pub fn define(
    name: ConfigurationName,
    description: Option<String>,
) -> Result<Configuration, RegistryError> {
    define_at(&home()?, name, description)
}

// ---------------------------------------------------------------------------
// 5. Selection
// ---------------------------------------------------------------------------

/// Resolve a caller's requested configuration names into an ordered list.
///
/// - Request order is preserved; duplicates collapse to the first occurrence.
/// - Requested names with no registry entry are skipped.
/// - An empty request selects every registered configuration, sorted by name.
/// - Zero matches → `RegistryError::NoConfigurationsSelected`, carrying the
///   requested names. This is the caller-side guard that fires before any
///   sync run begins.
pub fn select_configurations_at(
    home: &Path,
    requested: &[&str],
) -> Result<Vec<Configuration>, RegistryError> {
    let all = list_configurations_at(home)?;

    let selected: Vec<Configuration> = if requested.is_empty() {
        all
    } else {
        let mut seen: Vec<&str> = Vec::new();
        let mut selected = Vec::new();
        for &name in requested {
            if seen.contains(&name) {
                continue;
            }
            seen.push(name);
            if let Some(configuration) = all.iter().find(|c| c.name.0 == name) {
                selected.push(configuration.clone());
            }
        }
        selected
    };

    if selected.is_empty() {
        return Err(RegistryError::NoConfigurationsSelected {
            requested: requested.iter().map(|s| s.to_string()).collect(),
        });
    }
    Ok(selected)
}

/// `select_configurations_at` convenience wrapper.
pub fn select_configurations(requested: &[&str]) -> Result<Vec<Configuration>, RegistryError> {
    select_configurations_at(&home()?, requested)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn home() -> Result<PathBuf, RegistryError> {
    dirs::home_dir().ok_or(RegistryError::HomeNotFound)
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), RegistryError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), RegistryError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), RegistryError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), RegistryError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
