use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$NANRO_HOME`, else `~/.nanro`.
pub fn nanro_home() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("NANRO_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set (or set NANRO_HOME)")?;
    Ok(PathBuf::from(home).join(".nanro"))
}

pub fn ensure_nanro_home() -> Result<PathBuf> {
    let dir = nanro_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn session_path() -> Result<PathBuf> {
    Ok(ensure_nanro_home()?.join("session.json"))
}

pub fn statements_dir() -> Result<PathBuf> {
    Ok(ensure_nanro_home()?.join("statements"))
}
