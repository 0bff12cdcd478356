use std::path::{Path, PathBuf};

use anyhow::{ensure, Context};
use toml::{map::Map, Value};

/// Directory holding the workspace `Cargo.toml`.
///
/// Falls back to the current directory when cargo is not around to ask,
/// which is the case for an installed binary.
pub fn workspace_dir() -> PathBuf {
    let output = std::process::Command::new(env!("CARGO"))
        .arg("locate-project")
        .arg("--workspace")
        .arg("--message-format=plain")
        .output();

    let located = output
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .and_then(|path| {
            Path::new(path.trim()).parent().map(Path::to_path_buf)
        });

    match located {
        Some(dir) => dir,
        None => PathBuf::from("."),
    }
}

pub fn load_config(config_name: &str) -> anyhow::Result<Map<String, Value>> {
    let path = workspace_dir().join(config_name);
    ensure!(path.is_file(), "config file not found: {}", path.display());

    let config = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", config_name))?;

    toml::from_str::<Map<String, Value>>(&config)
        .with_context(|| format!("failed to parse {}", config_name))
}
