use std::fmt;
use std::path::Path;
use std::time::Duration;

use reqwest::{Client, NoProxy, Proxy, Url};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{AdapterError, Result};

/// Settings file section holding [`AdapterSettings`]
pub const SETTINGS_SECTION: &str = "RestAdapterSettings";

/// Overrides `BasePath` when set
pub const BASE_PATH_ENV: &str = "REST_ADAPTER_BASE_PATH";

const LOCAL_HOSTS: [&str; 3] = ["localhost", "127.0.0.1", "::1"];

/// How to reach the remote repository service
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AdapterSettings {
    pub base_path: String,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub proxy: Option<ProxyDetails>,
}

#[derive(Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProxyDetails {
    pub address: String,
    #[serde(default)]
    pub bypass_on_local: bool,
    #[serde(default)]
    pub bypass_list: Option<Vec<String>>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl fmt::Debug for ProxyDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyDetails")
            .field("address", &self.address)
            .field("bypass_on_local", &self.bypass_on_local)
            .field("bypass_list", &self.bypass_list)
            .field("user_name", &self.user_name)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

impl ProxyDetails {
    /// Hosts that skip the proxy
    pub fn bypass_hosts(&self) -> Vec<String> {
        let mut hosts = self.bypass_list.clone().unwrap_or_default();
        if self.bypass_on_local {
            for host in LOCAL_HOSTS {
                if !hosts.iter().any(|h| h == host) {
                    hosts.push(host.to_string());
                }
            }
        }
        hosts
    }

    fn to_proxy(&self) -> Result<Proxy> {
        if self.address.trim().is_empty() {
            return Err(AdapterError::InvalidConfig {
                message: "proxy address cannot be empty".to_string(),
            });
        }

        let mut proxy = Proxy::all(&self.address).map_err(|e| AdapterError::InvalidConfig {
            message: format!("invalid proxy address {}: {}", self.address, e),
        })?;

        if let Some(user_name) = &self.user_name {
            proxy = proxy.basic_auth(user_name, self.password.as_deref().unwrap_or_default());
        }

        let bypass = self.bypass_hosts();
        if !bypass.is_empty() {
            proxy = proxy.no_proxy(NoProxy::from_string(&bypass.join(",")));
        }

        Ok(proxy)
    }
}

impl AdapterSettings {
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            request_timeout_secs: None,
            proxy: None,
        }
    }

    /// Parse settings from the JSON text of a settings file
    pub fn from_json(text: &str) -> Result<Self> {
        let mut document: serde_json::Value = serde_json::from_str(text)?;
        let section = document
            .get_mut(SETTINGS_SECTION)
            .map(serde_json::Value::take)
            .ok_or_else(|| AdapterError::InvalidConfig {
                message: format!("missing {} section", SETTINGS_SECTION),
            })?;
        Ok(serde_json::from_value(section)?)
    }

    pub fn with_base_path_override(mut self, base_path: Option<String>) -> Self {
        if let Some(base_path) = base_path.filter(|p| !p.trim().is_empty()) {
            debug!(base_path = %base_path, "Base path overridden from environment");
            self.base_path = base_path;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.base_url()?;
        if let Some(proxy) = &self.proxy {
            proxy.to_proxy()?;
        }
        Ok(())
    }

    pub fn base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.base_path).map_err(|e| AdapterError::InvalidConfig {
            message: format!("invalid base path {}: {}", self.base_path, e),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(AdapterError::InvalidConfig {
                message: format!("unsupported base path scheme {}", other),
            }),
        }
    }

    /// HTTP client honouring the timeout and proxy settings
    pub fn build_client(&self) -> Result<Client> {
        let mut builder =
            Client::builder().user_agent(concat!("rest-adapter/", env!("CARGO_PKG_VERSION")));

        if let Some(secs) = self.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(proxy) = &self.proxy {
            builder = builder.proxy(proxy.to_proxy()?);
        }

        builder.build().map_err(|e| AdapterError::InvalidConfig {
            message: format!("failed to build HTTP client: {}", e),
        })
    }
}

/// Load and validate settings from a file, applying the environment override
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<AdapterSettings> {
    let path = path.as_ref();
    info!(settings_path = %path.display(), "Loading adapter settings");

    let text = std::fs::read_to_string(path)?;
    let settings =
        AdapterSettings::from_json(&text)?.with_base_path_override(std::env::var(BASE_PATH_ENV).ok());
    settings.validate()?;

    debug!(?settings, "Adapter settings loaded");
    Ok(settings)
}
