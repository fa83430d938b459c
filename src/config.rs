//! Environment-variable configuration for the demo server.
//!
//! The binary prefers CLI flags; when none are given it falls back to the
//! environment:
//!
//! - `ORIGIN_GATE_ALLOW`: `|`-delimited allow-list
//! - `ORIGIN_GATE_BLOCK`: `|`-delimited block-list
//! - `ORIGIN_GATE_BIND_ALL`: set to `true` to bind 0.0.0.0 (for Docker)
//!
//! Exactly one of the two lists must be set; configuring both (or neither)
//! is ambiguous and rejected.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use tracing::{info, warn};

use crate::cors::{GateMode, OriginGate};
use crate::error::{Error, Result};

/// Name of the allow-list environment variable.
pub const ALLOW_ENV: &str = "ORIGIN_GATE_ALLOW";

/// Name of the block-list environment variable.
pub const BLOCK_ENV: &str = "ORIGIN_GATE_BLOCK";

/// Name of the bind-all environment variable.
pub const BIND_ALL_ENV: &str = "ORIGIN_GATE_BIND_ALL";

/// Gate configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Which policy the configured list applies.
    pub mode: GateMode,
    /// The raw `|`-delimited list specification.
    pub list: String,
    /// Address the demo server binds to.
    pub bind_addr: IpAddr,
}

impl GateConfig {
    /// Resolves the gate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when both or neither of `ORIGIN_GATE_ALLOW`
    /// and `ORIGIN_GATE_BLOCK` are set.
    pub fn from_env() -> Result<Self> {
        let allow = env::var(ALLOW_ENV).ok().filter(|v| !v.trim().is_empty());
        let block = env::var(BLOCK_ENV).ok().filter(|v| !v.trim().is_empty());

        let (mode, list) = match (allow, block) {
            (Some(_), Some(_)) => {
                return Err(Error::config(format!(
                    "{ALLOW_ENV} and {BLOCK_ENV} are both set; pick one"
                )));
            }
            (None, None) => {
                return Err(Error::config(format!(
                    "neither {ALLOW_ENV} nor {BLOCK_ENV} is set"
                )));
            }
            (Some(list), None) => (GateMode::Allow, list),
            (None, Some(list)) => (GateMode::Block, list),
        };

        let bind_all = env::var(BIND_ALL_ENV)
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(false);

        let bind_addr = if bind_all {
            warn!("binding to 0.0.0.0 ({BIND_ALL_ENV}=true)");
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        } else {
            info!("binding to localhost only (127.0.0.1)");
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        };

        Ok(Self {
            mode,
            list,
            bind_addr,
        })
    }

    /// Builds the configured gate.
    pub fn gate(&self) -> OriginGate {
        match self.mode {
            GateMode::Allow => OriginGate::allow(self.list.as_str()),
            GateMode::Block => OriginGate::block(self.list.as_str()),
        }
    }

    /// Socket address for binding the demo server.
    pub fn socket_addr(&self, port: u16) -> SocketAddr {
        SocketAddr::new(self.bind_addr, port)
    }
}
