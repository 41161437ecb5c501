//! Configuration types for the Axum HTTP server.

use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};

/// Configuration for the Axum HTTP server.
///
/// # Examples
///
/// ```
/// use acp_axum::config::AxumConfig;
///
/// // Use default configuration
/// let config = AxumConfig::default();
///
/// // Custom configuration
/// let config = AxumConfig {
///     bind_address: "127.0.0.1:3000".parse().unwrap(),
///     page_limit: 50,
/// };
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AxumConfig {
    /// The address to bind the server to
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// The largest page a listing endpoint will return
    #[serde(default = "default_page_limit")]
    pub page_limit: usize,
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8080))
}

fn default_page_limit() -> usize {
    100
}

impl Default for AxumConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            page_limit: default_page_limit(),
        }
    }
}
