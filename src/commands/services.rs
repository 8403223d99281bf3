// ABOUTME: Service commands
// ABOUTME: CRUD for services plus URL resolution, preview and handoff to the system opener

use serde::{Deserialize, Serialize};

use crate::db::DashboardStore;
use crate::launcher::UrlOpener;
use crate::models::{Service, ServiceGroup, ServiceInput, ServiceView, Settings};
use crate::resolver::{build_url, launch_url, preview_label, ServiceDraft};
use crate::symbols::symbol_or_default;
use crate::ApiResponse;

/// Service form values as typed by the user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub port: String,
    #[serde(default)]
    pub host: String,
    #[serde(rename = "useHTTPS", default)]
    pub use_https: Option<bool>,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub category: String,
}

impl From<ServiceForm> for ServiceInput {
    fn from(form: ServiceForm) -> Self {
        ServiceInput {
            name: form.name,
            // Unparsable port text is the same as no port
            port: form.port.trim().parse().ok(),
            custom_host: Some(form.host),
            custom_use_https: form.use_https,
            symbol_name: Some(form.symbol),
            category: Some(form.category),
        }
    }
}

/// What the form shows beneath its fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicePreview {
    pub label: String,
    pub submittable: bool,
}

fn view(service: Service, settings: &Settings) -> ServiceView {
    let url = build_url(&service, settings);
    let icon = symbol_or_default(service.symbol_name.as_deref()).to_string();
    ServiceView { service, url, icon }
}

fn find_service(store: &DashboardStore, id: &str) -> Result<Service, String> {
    store
        .get_service(id)
        .map_err(|e| format!("Failed to get service: {}", e))?
        .ok_or_else(|| format!("Service not found: {}", id))
}

fn load_settings(store: &DashboardStore) -> Result<Settings, String> {
    store
        .get_or_create_settings()
        .map_err(|e| format!("Failed to get settings: {}", e))
}

/// Get all services grouped by category, with resolved URLs
pub fn get_services(store: &DashboardStore) -> ApiResponse<Vec<ServiceGroup<ServiceView>>> {
    let settings = match load_settings(store) {
        Ok(s) => s,
        Err(e) => return ApiResponse::error(e),
    };

    match store.list_services() {
        Ok(groups) => ApiResponse::success(
            groups
                .into_iter()
                .map(|group| ServiceGroup {
                    category: group.category,
                    services: group
                        .services
                        .into_iter()
                        .map(|s| view(s, &settings))
                        .collect(),
                })
                .collect(),
        ),
        Err(e) => ApiResponse::error(format!("Failed to get services: {}", e)),
    }
}

/// Get a single service
pub fn get_service(store: &DashboardStore, id: &str) -> ApiResponse<ServiceView> {
    let settings = match load_settings(store) {
        Ok(s) => s,
        Err(e) => return ApiResponse::error(e),
    };

    match find_service(store, id) {
        Ok(service) => ApiResponse::success(view(service, &settings)),
        Err(e) => ApiResponse::error(e),
    }
}

/// Create a new service
pub fn create_service(store: &DashboardStore, form: ServiceForm) -> ApiResponse<ServiceView> {
    let settings = match load_settings(store) {
        Ok(s) => s,
        Err(e) => return ApiResponse::error(e),
    };

    match store.create_service(form.into()) {
        Ok(service) => ApiResponse::success(view(service, &settings)),
        Err(e) => ApiResponse::error(format!("Failed to create service: {}", e)),
    }
}

/// Update an existing service
pub fn update_service(
    store: &DashboardStore,
    id: &str,
    form: ServiceForm,
) -> ApiResponse<ServiceView> {
    let settings = match load_settings(store) {
        Ok(s) => s,
        Err(e) => return ApiResponse::error(e),
    };

    match store.update_service(id, form.into()) {
        Ok(service) => ApiResponse::success(view(service, &settings)),
        Err(e) => ApiResponse::error(format!("Failed to update service: {}", e)),
    }
}

/// Delete a service
pub fn delete_service(store: &DashboardStore, id: &str) -> ApiResponse<()> {
    match store.delete_service(id) {
        Ok(_) => ApiResponse::success(()),
        Err(e) => ApiResponse::error(format!("Failed to delete service: {}", e)),
    }
}

/// Resolve a service's URL without opening it
pub fn service_url(store: &DashboardStore, id: &str) -> ApiResponse<String> {
    let settings = match load_settings(store) {
        Ok(s) => s,
        Err(e) => return ApiResponse::error(e),
    };

    match find_service(store, id) {
        Ok(service) => ApiResponse::success(build_url(&service, &settings)),
        Err(e) => ApiResponse::error(e),
    }
}

/// Resolve a service's URL and hand it to the opener
pub fn open_service(
    store: &DashboardStore,
    opener: &dyn UrlOpener,
    id: &str,
) -> ApiResponse<String> {
    let settings = match load_settings(store) {
        Ok(s) => s,
        Err(e) => return ApiResponse::error(e),
    };
    let service = match find_service(store, id) {
        Ok(s) => s,
        Err(e) => return ApiResponse::error(e),
    };

    let url = match launch_url(&service, &settings) {
        Some(url) => url,
        None => {
            return ApiResponse::error(format!(
                "Cannot open '{}': no host configured",
                service.name
            ))
        }
    };

    // The outcome of the handoff is not acted on beyond reporting it
    if let Err(e) = opener.open_url(&url) {
        log::warn!("Failed to open {}: {}", url, e);
        return ApiResponse::success(url).with_warning(format!("Opener reported: {}", e));
    }
    ApiResponse::success(url)
}

/// Label and readiness for a service that is still being edited
pub fn preview_service(store: &DashboardStore, draft: ServiceDraft) -> ApiResponse<ServicePreview> {
    match load_settings(store) {
        Ok(settings) => ApiResponse::success(ServicePreview {
            label: preview_label(&draft, &settings),
            submittable: draft.is_submittable(&settings),
        }),
        Err(e) => ApiResponse::error(e),
    }
}
