//! Fence config loader (strict parsing).

pub mod schema;

use std::fs;

use netfence_core::error::{NetFenceError, Result};

pub use schema::{FenceConfig, FenceSection, RuleEntry};

pub fn load_from_file(path: &str) -> Result<FenceConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| NetFenceError::BadConfig(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<FenceConfig> {
    let cfg: FenceConfig = serde_yaml::from_str(s)
        .map_err(|e| NetFenceError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
