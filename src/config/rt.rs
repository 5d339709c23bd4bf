//! Runtime config, derived from the merged configuration model.

use super::Configuration;
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 8080;

/// Runtime config shared by every command.
#[derive(Clone, Debug)]
pub struct RtcCore {
    /// The directory holding the CSV tables.
    pub data_dir: PathBuf,
}

impl RtcCore {
    pub fn new(config: &Configuration) -> Self {
        Self {
            data_dir: config
                .core
                .data
                .clone()
                .unwrap_or_else(|| PathBuf::from("data")),
        }
    }
}

/// Runtime config for the serve system.
#[derive(Clone, Debug)]
pub struct RtcServe {
    /// Runtime config for the core system.
    pub core: RtcCore,
    /// The IP address to serve on.
    pub address: IpAddr,
    /// The port to serve on.
    pub port: u16,
    /// Open a browser tab once the tables are loaded.
    pub open: bool,
    /// Additional headers to include in responses.
    pub headers: HashMap<String, String>,
}

impl RtcServe {
    pub fn new(config: &Configuration) -> Self {
        Self {
            core: RtcCore::new(config),
            address: config
                .serve
                .address
                .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST)),
            port: config.serve.port.unwrap_or(DEFAULT_PORT),
            open: config.serve.open,
            headers: config.serve.headers.clone(),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.address, self.port)
    }

    /// The URL clients reach the server under.
    pub fn http_addr(&self) -> String {
        format!("http://{}", self.socket_addr())
    }
}
