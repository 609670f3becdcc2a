use camino::{Utf8Path as Path, Utf8PathBuf as PathBuf};
use color_eyre::eyre::{eyre, Context, Result};
use serde::Deserialize;

use crate::catalog::storage_key::DEFAULT_NAMESPACE;

pub const DEFAULT_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_PASSWORD_ENV: &str = "KAVIAN_SMTP_PASSWORD";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct TomlServer {
    address: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct TomlMail {
    relay: String,
    username: String,
    recipient: String,
    password_env: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct TomlCatalog {
    namespace: Option<String>,
    storage_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct TomlConfig {
    #[serde(rename = "Server")]
    pub server: Option<TomlServer>,
    #[serde(rename = "Mail")]
    pub mail: Option<TomlMail>,
    #[serde(rename = "Catalog")]
    pub catalog: Option<TomlCatalog>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            address: DEFAULT_ADDRESS.to_owned(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailConfig {
    /// SMTP relay host
    pub relay: String,
    pub username: String,
    /// Every contact submission is sent here
    pub recipient: String,
    /// Name of the environment variable holding the SMTP password
    pub password_env: String,
}

impl MailConfig {
    pub fn password(&self) -> Result<String> {
        std::env::var(&self.password_env).wrap_err_with(|| {
            format!(
                "SMTP password environment variable {} is not set",
                self.password_env
            )
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub namespace: String,
    /// JSON file backing the storage area. In-memory if not set.
    pub storage_path: Option<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            namespace: DEFAULT_NAMESPACE.to_owned(),
            storage_path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub server: ServerConfig,
    pub mail: Option<MailConfig>,
    pub catalog: CatalogConfig,
}

impl Config {
    pub fn mail(&self) -> Result<&MailConfig> {
        self.mail
            .as_ref()
            .ok_or_else(|| eyre!("config has no [Mail] section"))
    }
}

pub async fn read_config(path: &Path) -> Result<Config> {
    let toml_str = tokio::fs::read_to_string(path)
        .await
        .context(format!("Error reading config file {}", path))?;
    parse_config(&toml_str)
}

pub fn parse_config(toml_str: &str) -> Result<Config> {
    let toml_config: TomlConfig = toml::from_str(toml_str).context("Error parsing config file")?;
    let server = toml_config
        .server
        .map(|server| ServerConfig {
            address: server
                .address
                .unwrap_or_else(|| DEFAULT_ADDRESS.to_owned()),
            port: server.port.unwrap_or(DEFAULT_PORT),
        })
        .unwrap_or_default();
    let mail = toml_config.mail.map(|mail| MailConfig {
        relay: mail.relay,
        username: mail.username,
        recipient: mail.recipient,
        password_env: mail
            .password_env
            .unwrap_or_else(|| DEFAULT_PASSWORD_ENV.to_owned()),
    });
    let catalog = toml_config
        .catalog
        .map(|catalog| CatalogConfig {
            namespace: catalog
                .namespace
                .filter(|ns| !ns.is_empty())
                .unwrap_or_else(|| DEFAULT_NAMESPACE.to_owned()),
            storage_path: catalog.storage_path.map(PathBuf::from),
        })
        .unwrap_or_default();
    Ok(Config {
        server,
        mail,
        catalog,
    })
}
