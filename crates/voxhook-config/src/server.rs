use std::{net::SocketAddr, path::PathBuf};

use serde::Deserialize;

use crate::{cors::CorsConfig, health::HealthConfig};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub listen_address: Option<SocketAddr>,
    /// Directory holding the browser form, served for any unmatched path
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default)]
    pub cors: Option<CorsConfig>,
}
