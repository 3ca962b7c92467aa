use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
}

impl Config {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.host, self.server.port)
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Largest accepted request body, in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    3000
}

fn default_max_body_bytes() -> usize {
    100 * 1024 // 100 KiB
}

/// Product dataset configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    /// Keep the parsed dataset in memory until the file changes
    #[serde(default)]
    pub cache: bool,
    /// Seconds a cached snapshot is trusted before the file is re-read
    #[serde(default = "default_cache_refresh_secs")]
    pub cache_refresh_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            cache: false,
            cache_refresh_secs: default_cache_refresh_secs(),
        }
    }
}

fn default_cache_refresh_secs() -> u64 {
    5
}

fn default_data_file() -> PathBuf {
    PathBuf::from("data/full-products.json")
}

/// Static asset configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssetsConfig {
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,
    /// Entry-point document served at `/`, relative to `public_dir`
    #[serde(default = "default_index_file")]
    pub index_file: PathBuf,
}

impl AssetsConfig {
    pub fn index_path(&self) -> PathBuf {
        self.public_dir.join(&self.index_file)
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            public_dir: default_public_dir(),
            index_file: default_index_file(),
        }
    }
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_index_file() -> PathBuf {
    PathBuf::from("index.html")
}
