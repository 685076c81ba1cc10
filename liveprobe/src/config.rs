use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG: &str = "liveprobe.yaml";

/// Optional file-level defaults. Command-line flags take precedence.
#[derive(Debug, Default, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub concurrency: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub probes: Option<Vec<String>>,
    pub skip_default: Option<bool>,
    pub same_line_ports: Option<bool>,
    pub format: Option<String>,
}

/// Load `path`, or `./liveprobe.yaml` when present. An explicit path that cannot be
/// read or parsed is an error; a missing default file is not.
pub fn load_config(path: Option<&Path>) -> Result<Option<Config>> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let p = Path::new(DEFAULT_CONFIG);
            if p.exists() { p.to_path_buf() } else { return Ok(None); }
        }
    };
    let s = fs::read_to_string(&path)
        .with_context(|| format!("reading config {}", path.display()))?;
    parse_config(&s).with_context(|| format!("parsing config {}", path.display())).map(Some)
}

pub fn parse_config(s: &str) -> Result<Config> {
    Ok(serde_yaml::from_str(s)?)
}
