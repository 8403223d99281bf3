// ABOUTME: Settings commands
// ABOUTME: Default host/scheme and the icon catalog search used by the service form

use crate::db::DashboardStore;
use crate::models::Settings;
use crate::symbols;
use crate::ApiResponse;

/// Get application settings, creating defaults on first access
pub fn get_settings(store: &DashboardStore) -> ApiResponse<Settings> {
    match store.get_or_create_settings() {
        Ok(settings) => ApiResponse::success(settings),
        Err(e) => ApiResponse::error(format!("Failed to get settings: {}", e)),
    }
}

/// Set the default host
pub fn set_host(store: &DashboardStore, host: &str) -> ApiResponse<Settings> {
    match store.set_host(host) {
        Ok(settings) if settings.host.trim().is_empty() => ApiResponse::success(settings)
            .with_warning(
                "Default host is empty; services without their own host cannot be opened"
                    .to_string(),
            ),
        Ok(settings) => ApiResponse::success(settings),
        Err(e) => ApiResponse::error(format!("Failed to update settings: {}", e)),
    }
}

/// Set the default scheme
pub fn set_use_https(store: &DashboardStore, use_https: bool) -> ApiResponse<Settings> {
    match store.set_use_https(use_https) {
        Ok(settings) => ApiResponse::success(settings),
        Err(e) => ApiResponse::error(format!("Failed to update settings: {}", e)),
    }
}

/// Search the icon catalog
pub fn search_symbols(query: &str) -> ApiResponse<Vec<String>> {
    ApiResponse::success(
        symbols::search_symbols(query)
            .into_iter()
            .map(str::to_string)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_round_trip() {
        let store = DashboardStore::open_in_memory().unwrap();
        assert_eq!(get_settings(&store).data.unwrap(), Settings::default());

        set_host(&store, "nas.local");
        set_use_https(&store, true);
        let settings = get_settings(&store).data.unwrap();
        assert_eq!(settings.host, "nas.local");
        assert!(settings.use_https);
    }

    #[test]
    fn test_empty_host_is_accepted_with_warning() {
        let store = DashboardStore::open_in_memory().unwrap();
        let response = set_host(&store, "");
        assert!(response.success);
        assert_eq!(response.messages.warning.len(), 1);
        assert_eq!(response.data.unwrap().host, "");
    }

    #[test]
    fn test_symbol_search() {
        let response = search_symbols("bell");
        assert_eq!(
            response.data.unwrap(),
            vec!["bell.fill".to_string(), "bell.badge.fill".to_string()]
        );
    }
}
