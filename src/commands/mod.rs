// ABOUTME: Presentation-facing commands
// ABOUTME: Raw form input in, ApiResponse out; grouped by services, categories and settings

pub mod categories;
pub mod services;
pub mod settings;

pub use categories::*;
pub use services::*;
pub use settings::*;
