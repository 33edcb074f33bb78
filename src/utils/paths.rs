use anyhow::{anyhow, Result};
use std::path::PathBuf;

pub fn get_todo_desk_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
    Ok(home.join(".todo-desk"))
}

pub fn get_config_path() -> Result<PathBuf> {
    let dir = get_todo_desk_dir()?;
    Ok(dir.join("config.toml"))
}

pub fn get_local_state_path() -> Result<PathBuf> {
    let dir = get_todo_desk_dir()?;
    Ok(dir.join("local_state.json"))
}

pub fn get_logs_dir() -> Result<PathBuf> {
    let dir = get_todo_desk_dir()?;
    Ok(dir.join("logs"))
}
