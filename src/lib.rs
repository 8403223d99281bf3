// ABOUTME: Main library for SwiftDash
// ABOUTME: Contains app setup, the response envelope, and module declarations

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::process::ExitCode;

// Module declarations
pub mod cli;
pub mod collation;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod launcher;
pub mod models;
pub mod resolver;
pub mod symbols;

use crate::config::AppConfig;
use crate::db::DashboardStore;
use crate::launcher::SystemOpener;

/// Standard response format handed to the presentation layer
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub messages: Messages,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Messages {
    pub error: Vec<String>,
    pub warning: Vec<String>,
    pub info: Vec<String>,
    pub success: Vec<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            messages: Messages::default(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            messages: Messages {
                error: vec![message],
                ..Default::default()
            },
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn with_warning(mut self, message: String) -> Self {
        self.messages.warning.push(message);
        self
    }

    pub fn with_info(mut self, message: String) -> Self {
        self.messages.info.push(message);
        self
    }
}

/// Load config, start logging and open the store
fn start() -> anyhow::Result<DashboardStore> {
    let config = AppConfig::load().context("Failed to load config")?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();
    log::debug!("Using database {}", config.describe_database());

    let store = match config.database_path() {
        Some(path) => DashboardStore::open_at(path),
        None => DashboardStore::open(),
    }
    .context("Failed to open database")?;

    if config.seed_default_categories {
        store
            .ensure_default_categories()
            .context("Failed to seed default categories")?;
    }

    Ok(store)
}

pub fn run() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match cli::parse(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}\n\n{}", e, cli::USAGE);
            return ExitCode::from(2);
        }
    };

    if let cli::Command::Help = command {
        println!("{}", cli::USAGE);
        return ExitCode::SUCCESS;
    }

    let store = match start() {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let output = cli::dispatch(&store, &SystemOpener, command);
    println!("{}", output.json);
    if output.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shapes() {
        let ok = ApiResponse::success(3).with_info("note".to_string());
        assert!(ok.success);
        assert_eq!(ok.data, Some(3));
        assert_eq!(ok.messages.info, vec!["note".to_string()]);

        let err: ApiResponse<()> = ApiResponse::error("boom".to_string());
        assert!(!err.success);
        assert!(err.data.is_none());
        assert_eq!(err.messages.error, vec!["boom".to_string()]);

        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["messages"]["error"][0], "boom");
        assert!(json["timestamp"].is_string());
    }
}
