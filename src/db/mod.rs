// ABOUTME: Database module exports for SwiftDash
// ABOUTME: Contains the SQLite store for settings, categories and services

pub mod store;

pub use store::{DashboardStore, DEFAULT_CATEGORIES};
