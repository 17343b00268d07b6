//! Immutable runtime configuration, fixed at startup.

use crate::probe::ProbeKind;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3006;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind: IpAddr,
    pub port: u16,
    /// Directory served for non-API paths, if any
    pub static_dir: Option<PathBuf>,
    pub probe: ProbeKind,
    /// Home directory used to abbreviate working directories
    pub home_dir: Option<PathBuf>,
}

impl Config {
    /// Build the config, resolving the home directory once.
    pub fn new(bind: IpAddr, port: u16, static_dir: Option<PathBuf>, probe: ProbeKind) -> Self {
        Self {
            bind,
            port,
            static_dir,
            probe,
            home_dir: dirs::home_dir(),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}
