// ABOUTME: Category commands
// ABOUTME: CRUD for categories; rename and delete cascade to the services that reference them

use crate::db::DashboardStore;
use crate::models::Category;
use crate::ApiResponse;

/// Get all categories, sorted by name
pub fn get_categories(store: &DashboardStore) -> ApiResponse<Vec<Category>> {
    match store.get_categories() {
        Ok(categories) => ApiResponse::success(categories),
        Err(e) => ApiResponse::error(format!("Failed to get categories: {}", e)),
    }
}

/// Names the service form offers in its category picker
pub fn get_category_choices(store: &DashboardStore) -> ApiResponse<Vec<String>> {
    match store.category_choices() {
        Ok(choices) => ApiResponse::success(choices),
        Err(e) => ApiResponse::error(format!("Failed to get category choices: {}", e)),
    }
}

/// Create a new category
pub fn add_category(store: &DashboardStore, name: &str) -> ApiResponse<Category> {
    match store.add_category(name) {
        Ok(category) => ApiResponse::success(category),
        Err(e) => ApiResponse::error(format!("Failed to add category: {}", e)),
    }
}

/// Rename a category
pub fn rename_category(store: &DashboardStore, id: &str, name: &str) -> ApiResponse<Category> {
    match store.rename_category(id, name) {
        Ok(category) => ApiResponse::success(category),
        Err(e) => ApiResponse::error(format!("Failed to rename category: {}", e)),
    }
}

/// Delete a category; services keep existing but lose the reference
pub fn delete_category(store: &DashboardStore, id: &str) -> ApiResponse<usize> {
    match store.delete_category(id) {
        Ok(0) => ApiResponse::success(0),
        Ok(cleared) => ApiResponse::success(cleared)
            .with_info(format!("{} service(s) moved to Uncategorized", cleared)),
        Err(e) => ApiResponse::error(format!("Failed to delete category: {}", e)),
    }
}

/// Add the default categories that are missing
pub fn seed_default_categories(store: &DashboardStore) -> ApiResponse<usize> {
    match store.seed_default_categories() {
        Ok(added) => ApiResponse::success(added),
        Err(e) => ApiResponse::error(format!("Failed to seed categories: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ServiceInput;

    #[test]
    fn test_duplicate_is_reported() {
        let store = DashboardStore::open_in_memory().unwrap();
        assert!(add_category(&store, "Media").success);

        let response = add_category(&store, "media");
        assert!(!response.success);
        assert!(response.messages.error[0].contains("already exists"));
    }

    #[test]
    fn test_delete_reports_cleared_services() {
        let store = DashboardStore::open_in_memory().unwrap();
        let home = add_category(&store, "Home").data.unwrap();
        for port in [8123, 1880] {
            store
                .create_service(ServiceInput {
                    port: Some(port),
                    category: Some("Home".to_string()),
                    ..Default::default()
                })
                .unwrap();
        }

        let response = delete_category(&store, &home.id);
        assert_eq!(response.data, Some(2));
        assert_eq!(response.messages.info.len(), 1);
        assert!(get_categories(&store).data.unwrap().is_empty());
    }

    #[test]
    fn test_rename_to_same_name_fails() {
        let store = DashboardStore::open_in_memory().unwrap();
        let home = add_category(&store, "Home").data.unwrap();
        assert!(!rename_category(&store, &home.id, "home").success);
        assert!(rename_category(&store, &home.id, "House").success);
    }
}
