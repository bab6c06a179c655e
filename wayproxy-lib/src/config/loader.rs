use std::fs;
use std::path::Path;

use super::root::Config;
use super::validator::validate;
use crate::error::{ProxyError, Result};

/// Read, parse, and validate a TOML config file.
pub fn load_from_path<P: AsRef<Path>>(p: P) -> Result<Config> {
    let txt = fs::read_to_string(p).map_err(|e| ProxyError::Config(format!("failed to read config file: {e}")))?;
    let cfg: Config = toml::from_str(&txt).map_err(|e| ProxyError::Config(format!("failed to parse config: {e}")))?;

    validate(&cfg).map_err(ProxyError::Config)?;

    Ok(cfg)
}
