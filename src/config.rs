use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.config/orgsync)
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("orgsync"))
}

/// Get the state directory path (~/.local/state/orgsync)
pub fn state_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".local").join("state").join("orgsync"))
}

/// Lock file guarding a reconciliation cycle
pub fn lease_path() -> Result<PathBuf> {
    Ok(state_dir()?.join("cycle.lock"))
}

/// Resolve the desired-state file: explicit flag or config-dir default
pub fn desired_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(expand(path)),
        None => Ok(config_dir()?.join("organization.toml")),
    }
}

/// Resolve the live snapshot file: explicit flag or config-dir default
pub fn live_snapshot_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(expand(path)),
        None => Ok(config_dir()?.join("live.json")),
    }
}

fn expand(path: &Path) -> PathBuf {
    let binding = path.to_string_lossy().into_owned();
    let expanded = shellexpand::tilde(&binding);
    PathBuf::from(expanded.as_ref())
}
