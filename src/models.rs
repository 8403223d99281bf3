// ABOUTME: Shared data models for SwiftDash
// ABOUTME: Settings, categories, services and the input normalization applied before storage

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DashError, DashResult};

/// Host used when no settings record has been written yet
pub const DEFAULT_HOST: &str = "192.168.1.100";

/// Group label for services without a category
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Global connection defaults (single record)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(rename = "useHTTPS", default)]
    pub use_https: bool,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: default_host(),
            use_https: false,
        }
    }
}

/// A named category; services refer to it by name only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// A bookmarked network service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub port: u16,
    #[serde(rename = "customHost", default)]
    pub custom_host: Option<String>,
    #[serde(rename = "customUseHTTPS", default)]
    pub custom_use_https: Option<bool>,
    #[serde(rename = "symbolName", default)]
    pub symbol_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Raw field values for creating or updating a service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub port: Option<i64>,
    #[serde(rename = "customHost", default)]
    pub custom_host: Option<String>,
    #[serde(rename = "customUseHTTPS", default)]
    pub custom_use_https: Option<bool>,
    #[serde(rename = "symbolName", default)]
    pub symbol_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Service fields that passed validation and normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceFields {
    pub name: String,
    pub port: u16,
    pub custom_host: Option<String>,
    pub custom_use_https: Option<bool>,
    pub symbol_name: Option<String>,
    pub category: Option<String>,
}

impl ServiceInput {
    /// Validate the port, normalize the optional strings and fill in the default name.
    /// The name is kept as typed; only an empty one is replaced.
    /// Nothing is stored when this fails.
    pub fn validate(self) -> DashResult<ServiceFields> {
        let port = validate_port(self.port)?;
        let name = if self.name.is_empty() {
            default_service_name(i64::from(port))
        } else {
            self.name
        };

        Ok(ServiceFields {
            name,
            port,
            custom_host: normalize_optional(self.custom_host),
            custom_use_https: self.custom_use_https,
            symbol_name: normalize_optional(self.symbol_name),
            category: normalize_optional(self.category),
        })
    }
}

/// Accept only ports in 1..=65535
pub fn validate_port(port: Option<i64>) -> DashResult<u16> {
    match port {
        Some(p) if p > 0 && p < 65536 => Ok(p as u16),
        Some(p) => Err(DashError::InvalidPort(p.to_string())),
        None => Err(DashError::InvalidPort("missing".to_string())),
    }
}

/// Trim a value; blank becomes `None`
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Name given to a service created without one
pub fn default_service_name(port: i64) -> String {
    format!("Service :{}", port)
}

/// Services sharing a display category, in display order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceGroup<T = Service> {
    pub category: String,
    pub services: Vec<T>,
}

/// A service as the list view renders it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceView {
    #[serde(flatten)]
    pub service: Service,
    pub url: String,
    pub icon: String,
}
