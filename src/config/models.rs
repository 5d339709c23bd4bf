//! The configuration model.
//!
//! This is what the user provides in `csvql.toml`. The CLI overrides certain
//! aspects of it when running commands, and the runtime model is derived
//! from the merged result.

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::IpAddr;
use std::path::PathBuf;

/// The persisted csvql configuration model.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(flatten)]
    pub core: Core,

    #[serde(default)]
    pub serve: Serve,
}

/// Core options.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Core {
    /// The directory holding the CSV tables [default: data]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PathBuf>,
}

/// Config options for the serve system.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Serve {
    /// The address to serve on [default: 127.0.0.1]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<IpAddr>,
    /// The port to serve on [default: 8080]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Open a browser tab once the tables are loaded [default: false]
    #[serde(default)]
    pub open: bool,
    /// Additional headers to send in responses
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

const DEFAULT_CONFIG_FILE: &str = "csvql.toml";

/// Load the configuration, given an optional file. Falling back to
/// `csvql.toml` in the current directory, and to defaults when that is
/// absent too. An explicitly named file must exist.
pub fn load(path: Option<PathBuf>) -> Result<Configuration> {
    let (path, explicit) = match path {
        Some(path) => (path, true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    if !path.exists() {
        ensure!(!explicit, "config file {:?} does not exist", path);
        tracing::debug!("no {DEFAULT_CONFIG_FILE}, using defaults");
        return Ok(Configuration::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("error reading config file {:?}", path))?;
    toml::from_str(&content).with_context(|| format!("error parsing config file {:?}", path))
}
